//! Configuration loading from TOML files and environment variables.
//!
//! Config is loaded in this order of precedence (highest wins):
//! 1. Environment variables (`HERALD_ENV`, `HERALD_PREFIX`, `HERALD_LOG_DIR`)
//! 2. TOML file specified via --config CLI flag
//! 3. ./herald.toml in the current directory
//! 4. $XDG_CONFIG_HOME/herald/herald.toml (or ~/.config/herald/herald.toml)
//! 5. Built-in defaults

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_BOT_NAME: &str = "herald";
const DEFAULT_PREFIX: &str = "!";
const DEFAULT_ENVIRONMENT: &str = "local";
const DEFAULT_LOG_DIR: &str = "logs";

// ---------------------------------------------------------------------------
// Resolved config
// ---------------------------------------------------------------------------

/// Fully resolved configuration used by the rest of the process.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot display name used in banners and `bot info`.
    pub name: String,
    /// Command prefix expected in front of console/chat input.
    pub prefix: String,
    /// Deployment tag; any value containing `local` enables debug mode.
    pub environment: String,
    /// Directory receiving the rotating log files.
    pub log_dir: PathBuf,
    /// Explicit base log level; overrides the environment-derived default.
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: DEFAULT_BOT_NAME.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: None,
        }
    }
}

impl Config {
    /// Debug mode follows the deployment tag: anything `local` runs with
    /// trace-level logging by default, everything else at info.
    pub fn debug_mode(&self) -> bool {
        self.environment.contains("local")
    }
}

// ---------------------------------------------------------------------------
// File schema
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    bot: BotSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BotSection {
    name: Option<String>,
    prefix: Option<String>,
    environment: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingSection {
    dir: Option<PathBuf>,
    level: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from the --config flag);
/// when given, the file must exist.
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    load_config_with(path_override, &default_search_paths(), &|key| {
        std::env::var(key).ok()
    })
}

/// Loading core with injected search paths and env lookup, so tests can run
/// hermetically.
pub(crate) fn load_config_with<FEnv>(
    path_override: Option<&str>,
    search_paths: &[PathBuf],
    env_lookup: &FEnv,
) -> Result<Config, ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    if let Some(path) = path_override {
        // An explicitly requested file that is missing is an error, unlike
        // the optional search-path candidates below.
        let text = std::fs::read_to_string(path)?;
        apply_file(&mut config, &text)?;
    } else if let Some(found) = search_paths.iter().find(|p| p.is_file()) {
        let text = std::fs::read_to_string(found)?;
        apply_file(&mut config, &text)?;
    }

    apply_env_overrides(&mut config, env_lookup);
    validate(&config)?;
    Ok(config)
}

fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("herald.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("herald").join("herald.toml"));
    }
    paths
}

fn apply_file(config: &mut Config, text: &str) -> Result<(), ConfigError> {
    let file: FileConfig = toml::from_str(text)?;
    if let Some(name) = file.bot.name {
        config.name = name;
    }
    if let Some(prefix) = file.bot.prefix {
        config.prefix = prefix;
    }
    if let Some(environment) = file.bot.environment {
        config.environment = environment;
    }
    if let Some(dir) = file.logging.dir {
        config.log_dir = dir;
    }
    if let Some(level) = file.logging.level {
        config.log_level = Some(level);
    }
    Ok(())
}

fn apply_env_overrides<FEnv>(config: &mut Config, env_lookup: &FEnv)
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(environment) = env_lookup("HERALD_ENV") {
        config.environment = environment;
    }
    if let Some(prefix) = env_lookup("HERALD_PREFIX") {
        config.prefix = prefix;
    }
    if let Some(dir) = env_lookup("HERALD_LOG_DIR") {
        config.log_dir = PathBuf::from(dir);
    }
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Invalid("bot.name must not be empty".into()));
    }
    if config.prefix.is_empty() {
        return Err(ConfigError::Invalid("bot.prefix must not be empty".into()));
    }
    if config.prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(
            "bot.prefix must not contain whitespace".into(),
        ));
    }
    if let Some(level) = &config.log_level {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level `{level}` is not one of trace/debug/info/warn/error"
            )));
        }
    }
    Ok(())
}
