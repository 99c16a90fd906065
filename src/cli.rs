//! CLI argument parsing via clap.

use clap::Parser;
use std::path::PathBuf;

/// A chat-bot core with a root-alias command tree and a console front end.
#[derive(Debug, Parser)]
#[command(name = "herald", version)]
pub struct Args {
    /// Path to config file (default: ./herald.toml or ~/.config/herald/herald.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override the log directory.
    #[arg(long = "log-dir")]
    pub log_dir: Option<PathBuf>,

    /// Force trace-level logging regardless of environment.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn defaults_are_unset() {
        let args = Args::parse_from(["herald"]);
        assert!(args.config.is_none());
        assert!(args.log_dir.is_none());
        assert!(!args.verbose);
        assert!(!args.no_color);
    }

    #[test]
    fn config_accepts_short_and_long() {
        let args = Args::parse_from(["herald", "-c", "custom.toml"]);
        assert_eq!(args.config.as_deref(), Some("custom.toml"));
        let args = Args::parse_from(["herald", "--config", "custom.toml"]);
        assert_eq!(args.config.as_deref(), Some("custom.toml"));
    }

    #[test]
    fn log_dir_and_flags_parse() {
        let args = Args::parse_from(["herald", "--log-dir", "/tmp/hl", "-v", "--no-color"]);
        assert_eq!(args.log_dir.as_deref(), Some(std::path::Path::new("/tmp/hl")));
        assert!(args.verbose);
        assert!(args.no_color);
    }
}
