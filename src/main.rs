//! Process entry point: ordered bootstrap, then the console dispatch loop.
//!
//! The console loop is the stand-in front end: it reads prefixed lines from
//! stdin and routes them through the command tree exactly the way a gateway
//! listener would route chat messages.

mod cli;

use clap::Parser;
use crossterm::style::Stylize;
use herald::builtin::register_builtins;
use herald::command::{CommandTree, DispatchOutcome};
use herald::config::load_config;
use herald::context::Context;
use herald::logging;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    // Bootstrap order matters: config first (logging needs the log dir and
    // debug mode), then the log sinks, then command registration. Any
    // failure aborts before the dispatch loop starts.
    let mut config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: config: {e}");
            std::process::exit(1);
        }
    };
    if let Some(dir) = args.log_dir {
        config.log_dir = dir;
    }
    if args.verbose {
        config.log_level = Some("trace".into());
    }

    let _log_guard = match logging::init(&config, !args.no_color) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("HERALD_BUILD_GIT_HASH"),
        built = env!("HERALD_BUILD_TIMESTAMP"),
        environment = %config.environment,
        "starting herald"
    );

    let mut tree = CommandTree::new();
    if let Err(e) = register_builtins(&mut tree) {
        error!(error = %e, "command registration failed");
        eprintln!("error: registration: {e}");
        std::process::exit(1);
    }

    let color = !args.no_color;
    let ctx = Context::new(config);
    run_console(&ctx, &tree, color).await;
    info!("herald shutting down");
}

/// Read prefixed command lines from stdin until EOF or `quit`.
async fn run_console(ctx: &Context, tree: &CommandTree, color: bool) {
    let prefix = ctx.config().prefix.clone();
    println!(
        "{} console ready; commands start with `{prefix}`, `{prefix}quit` exits",
        ctx.bot_name()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "stdin read failed");
                break;
            }
        };

        // Non-prefixed lines are ordinary chatter, not commands.
        let Some(input) = line.trim().strip_prefix(&prefix) else {
            debug!("ignoring non-command input");
            continue;
        };
        if matches!(input.trim(), "quit" | "exit") {
            break;
        }

        match tree.dispatch(ctx, input).await {
            DispatchOutcome::Reply(text) => println!("{text}"),
            DispatchOutcome::Failed(e) => {
                let msg = format!("error: {e}");
                if color {
                    println!("{}", msg.red());
                } else {
                    println!("{msg}");
                }
            }
            DispatchOutcome::Incomplete { path } => {
                let msg = format!("`{path}` needs a subcommand; try `{prefix}help`");
                if color {
                    println!("{}", msg.yellow());
                } else {
                    println!("{msg}");
                }
            }
            DispatchOutcome::Unknown(name) => {
                let msg = format!("unknown command `{name}`; try `{prefix}help`");
                if color {
                    println!("{}", msg.dark_grey());
                } else {
                    println!("{msg}");
                }
            }
            DispatchOutcome::Empty => {}
        }
    }
}
