//! Herald — a chat-bot process core built around a command tree.
//!
//! The crate's one structural extension over a conventional command tree is
//! the *root alias*: a nested command can bind one or more short names at the
//! top of the tree while keeping its qualified path for organization and
//! help text. Everything else is process bootstrap: configuration, rotating
//! file logs, and a console dispatch loop.
//!
//! # Quick start
//!
//! ```no_run
//! use herald::builtin::register_builtins;
//! use herald::command::{CommandTree, DispatchOutcome};
//! use herald::config::load_config;
//! use herald::context::Context;
//!
//! # async fn example() {
//! let config = load_config(None).unwrap();
//! let mut tree = CommandTree::new();
//! register_builtins(&mut tree).unwrap();
//! let ctx = Context::new(config);
//! if let DispatchOutcome::Reply(text) = tree.dispatch(&ctx, "ping").await {
//!     println!("{text}");
//! }
//! # }
//! ```

pub mod builtin;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
