//! Process context handed to command handlers.
//!
//! There is deliberately no global bot instance. The context is built once in
//! `main` after configuration loads and is passed by reference into every
//! handler invocation, so components state their dependency explicitly
//! instead of reaching for process-wide state.

use crate::config::Config;
use std::time::{Duration, Instant};

/// Shared, read-only state for the running bot process.
pub struct Context {
    config: Config,
    version: &'static str,
    started_at: Instant,
}

impl Context {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION"),
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bot_name(&self) -> &str {
        &self.config.name
    }

    pub fn version(&self) -> &str {
        self.version
    }

    /// Time since the context was constructed during bootstrap.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
