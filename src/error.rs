//! Unified error types for the bot core.

use std::fmt;

// ---------------------------------------------------------------------------
// RegistrationError
// ---------------------------------------------------------------------------

/// Errors raised while declaring or attaching commands.
///
/// These are configuration mistakes and surface during startup, before the
/// dispatcher processes any input. A collision detected here is fatal by
/// policy: a silent one would let one command shadow another at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A command was declared with an empty name.
    EmptyName,
    /// An alias or root alias was an empty string.
    InvalidAlias { command: String },
    /// A name is already bound in the namespace it was registered into.
    DuplicateName { name: String, existing: String },
    /// `register_child` was given a command that is not in the tree.
    UnknownParent,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "command name must not be empty"),
            Self::InvalidAlias { command } => {
                write!(f, "command `{command}` declares an empty alias")
            }
            Self::DuplicateName { name, existing } => {
                write!(f, "name `{name}` is already bound to `{existing}`")
            }
            Self::UnknownParent => write!(f, "parent command is not attached to this tree"),
        }
    }
}

impl std::error::Error for RegistrationError {}

// ---------------------------------------------------------------------------
// CommandError
// ---------------------------------------------------------------------------

/// Errors arising from command handler execution.
#[derive(Debug)]
pub enum CommandError {
    /// The user supplied arguments the handler couldn't use.
    InvalidArguments(String),
    /// The handler ran but encountered a failure.
    ExecutionFailed(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArguments(msg) => write!(f, "invalid arguments: {msg}"),
            Self::ExecutionFailed(msg) => write!(f, "execution failed: {msg}"),
        }
    }
}

impl std::error::Error for CommandError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// BootstrapError — top-level
// ---------------------------------------------------------------------------

/// Top-level startup error. Any variant aborts the process before the
/// dispatch loop begins.
#[derive(Debug)]
pub enum BootstrapError {
    Config(ConfigError),
    Registration(RegistrationError),
    /// Log sink initialization failed (directory creation, subscriber setup).
    Logging(String),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Registration(e) => write!(f, "registration: {e}"),
            Self::Logging(msg) => write!(f, "logging: {msg}"),
        }
    }
}

impl std::error::Error for BootstrapError {}

impl From<ConfigError> for BootstrapError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<RegistrationError> for BootstrapError {
    fn from(e: RegistrationError) -> Self {
        Self::Registration(e)
    }
}
