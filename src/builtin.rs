//! Built-in commands registered during bootstrap.
//!
//! These exercise both registration paths: `ping` and `help` are plain
//! top-level commands, while the `bot` group nests `info` and `uptime` and
//! exposes them through the root aliases `about` and `uptime`.

use crate::command::{CommandSpec, CommandTree, Handler};
use crate::context::Context;
use crate::error::{CommandError, RegistrationError};
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Register every built-in command on the given tree.
pub fn register_builtins(tree: &mut CommandTree) -> Result<(), RegistrationError> {
    tree.register(
        CommandSpec::new("ping")
            .describe("Liveness check.")
            .handler(PingCommand),
    )?;

    let bot = tree.register(CommandSpec::new("bot").describe("Bot introspection commands."))?;
    tree.register_child(
        bot,
        CommandSpec::new("info")
            .describe("Show name, version, environment, and uptime.")
            .root_aliases(["about"])
            .handler(InfoCommand),
    )?;
    tree.register_child(
        bot,
        CommandSpec::new("uptime")
            .describe("Show time since startup.")
            .root_aliases(["uptime"])
            .handler(UptimeCommand),
    )?;

    // Help renders the final tree, which includes help itself, so its text
    // is filled in after registration through a shared slot.
    let text = Arc::new(OnceLock::new());
    tree.register(
        CommandSpec::new("help")
            .aliases(["h"])
            .describe("List available commands.")
            .handler(HelpCommand { text: text.clone() }),
    )?;
    let _ = text.set(render_help(tree));
    Ok(())
}

/// Render one help line per attached command.
pub fn render_help(tree: &CommandTree) -> String {
    let mut lines = vec!["Available commands:".to_string()];
    for (id, cmd) in tree.commands() {
        let mut names = tree.qualified_name(id);
        if !cmd.aliases().is_empty() {
            names.push_str(&format!(" | {}", cmd.aliases().join(" | ")));
        }
        if !cmd.root_aliases().is_empty() {
            names.push_str(&format!(" (root: {})", cmd.root_aliases().join(", ")));
        }
        if cmd.description().is_empty() {
            lines.push(format!("  {names}"));
        } else {
            lines.push(format!("  {names} - {}", cmd.description()));
        }
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

struct PingCommand;

#[async_trait]
impl Handler for PingCommand {
    async fn invoke(&self, _ctx: &Context, _args: &[&str]) -> Result<String, CommandError> {
        Ok("pong".to_string())
    }
}

struct InfoCommand;

#[async_trait]
impl Handler for InfoCommand {
    async fn invoke(&self, ctx: &Context, _args: &[&str]) -> Result<String, CommandError> {
        Ok(format!(
            "{} v{} ({}), up {}",
            ctx.bot_name(),
            ctx.version(),
            ctx.config().environment,
            format_duration(ctx.uptime())
        ))
    }
}

struct UptimeCommand;

#[async_trait]
impl Handler for UptimeCommand {
    async fn invoke(&self, ctx: &Context, _args: &[&str]) -> Result<String, CommandError> {
        Ok(format!("up {}", format_duration(ctx.uptime())))
    }
}

struct HelpCommand {
    text: Arc<OnceLock<String>>,
}

#[async_trait]
impl Handler for HelpCommand {
    async fn invoke(&self, _ctx: &Context, _args: &[&str]) -> Result<String, CommandError> {
        self.text
            .get()
            .cloned()
            .ok_or_else(|| CommandError::ExecutionFailed("help text not initialized".into()))
    }
}

fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if parts.is_empty() || seconds > 0 {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DispatchOutcome;
    use crate::config::Config;

    fn tree_and_ctx() -> (CommandTree, Context) {
        let mut tree = CommandTree::new();
        register_builtins(&mut tree).unwrap();
        (tree, Context::new(Config::default()))
    }

    async fn reply(tree: &CommandTree, ctx: &Context, input: &str) -> String {
        match tree.dispatch(ctx, input).await {
            DispatchOutcome::Reply(text) => text,
            other => panic!("expected reply for `{input}`, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ping_replies_pong() {
        let (tree, ctx) = tree_and_ctx();
        assert_eq!(reply(&tree, &ctx, "ping").await, "pong");
    }

    #[tokio::test]
    async fn about_is_a_root_alias_for_bot_info() {
        let (tree, ctx) = tree_and_ctx();
        let via_path = reply(&tree, &ctx, "bot info").await;
        let via_alias = reply(&tree, &ctx, "about").await;
        assert!(via_path.starts_with("herald v"));
        assert!(via_alias.starts_with("herald v"));
        // `info` alone must stay scoped under the group.
        assert!(matches!(
            tree.dispatch(&ctx, "info").await,
            DispatchOutcome::Unknown(_)
        ));
    }

    #[tokio::test]
    async fn uptime_is_reachable_both_ways() {
        let (tree, ctx) = tree_and_ctx();
        assert!(reply(&tree, &ctx, "bot uptime").await.starts_with("up "));
        assert!(reply(&tree, &ctx, "uptime").await.starts_with("up "));
    }

    #[tokio::test]
    async fn help_lists_the_tree() {
        let (tree, ctx) = tree_and_ctx();
        let help = reply(&tree, &ctx, "help").await;
        assert!(help.contains("bot info"));
        assert!(help.contains("(root: about)"));
        assert!(help.contains("help"));
        // Alias reaches the same handler.
        assert_eq!(reply(&tree, &ctx, "h").await, help);
    }

    #[tokio::test]
    async fn bare_group_is_incomplete() {
        let (tree, ctx) = tree_and_ctx();
        assert!(matches!(
            tree.dispatch(&ctx, "bot").await,
            DispatchOutcome::Incomplete { path } if path == "bot"
        ));
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(59)), "59s");
        assert_eq!(format_duration(Duration::from_secs(3_600)), "1h");
        assert_eq!(format_duration(Duration::from_secs(90_061)), "1d 1h 1m 1s");
        assert_eq!(format_duration(Duration::from_secs(120)), "2m");
    }
}
