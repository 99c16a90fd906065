//! Command declaration and the handler contract.
//!
//! Commands are declared with [`CommandSpec`] — a builder carrying the
//! command's full identity (name, aliases, root aliases, description) plus
//! its handler — and attached to a [`CommandTree`] in a separate step. Root
//! aliases are the one extension over a conventional command tree: they bind
//! the command at the top of the tree no matter how deeply it is nested, so a
//! sub-command can keep its qualified path for organization while still being
//! invocable through a short top-level name.

pub mod tree;

pub use tree::{CommandTree, DispatchOutcome};

use crate::context::Context;
use crate::error::{CommandError, RegistrationError};
use async_trait::async_trait;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Handler trait
// ---------------------------------------------------------------------------

/// A command handler invoked when dispatch matches its command.
///
/// Implement this trait for each command. Handlers receive the process
/// [`Context`] and the input tokens left over after the command path was
/// consumed, and return the reply text.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn invoke(&self, ctx: &Context, args: &[&str]) -> Result<String, CommandError>;
}

// ---------------------------------------------------------------------------
// CommandSpec
// ---------------------------------------------------------------------------

/// A command declaration, not yet attached to any tree.
///
/// Construction is side-effect free; attachment (and collision checking
/// against live names) happens in [`CommandTree::register`] and
/// [`CommandTree::register_child`]. A spec without a handler attaches as a
/// pure group node.
pub struct CommandSpec {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) aliases: Vec<String>,
    pub(crate) root_aliases: Vec<String>,
    pub(crate) handler: Option<Arc<dyn Handler>>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            aliases: Vec::new(),
            root_aliases: Vec::new(),
            handler: None,
        }
    }

    /// Set the help-text description.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Add ordinary aliases, resolved within the command's parent namespace.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Add root aliases, resolved at the top of the tree regardless of how
    /// deeply the command ends up nested.
    pub fn root_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_aliases
            .extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Set the handler invoked on match.
    pub fn handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Check the declaration's own identity fields.
    ///
    /// Empty names and empty alias strings are configuration errors caught
    /// here; duplicate detection against live tree state is the attachment
    /// step's job.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        let empty_alias = self
            .aliases
            .iter()
            .chain(self.root_aliases.iter())
            .any(String::is_empty);
        if empty_alias {
            return Err(RegistrationError::InvalidAlias {
                command: self.name.clone(),
            });
        }
        Ok(())
    }
}
