//! The command tree: ownership, attachment, resolution, dispatch.
//!
//! The tree owns every command in an arena and exposes two namespaces per
//! node: the root map on the tree itself and a child map on each group. Root
//! aliases land in the root map at attachment time, which is the entire trick
//! behind top-level shortcuts for nested commands.
//!
//! Collisions are a startup-time configuration error by policy. Registration
//! validates the whole batch of names a declaration would bind before
//! inserting any of them, so a failed registration leaves the tree exactly as
//! it was.

use super::{CommandSpec, Handler};
use crate::context::Context;
use crate::error::{CommandError, RegistrationError};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Command storage
// ---------------------------------------------------------------------------

/// Arena handle for a command owned by a [`CommandTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(usize);

/// A command attached to the tree.
///
/// A command with children acts as a group; a group may additionally carry
/// its own handler. The tree owns the parent/child wiring — a command only
/// records where it sits.
pub struct Command {
    name: String,
    description: String,
    aliases: Vec<String>,
    root_aliases: Vec<String>,
    handler: Option<Arc<dyn Handler>>,
    parent: Option<CommandId>,
    children: HashMap<String, CommandId>,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn root_aliases(&self) -> &[String] {
        &self.root_aliases
    }

    pub fn parent(&self) -> Option<CommandId> {
        self.parent
    }
}

// ---------------------------------------------------------------------------
// Dispatch outcome
// ---------------------------------------------------------------------------

/// Result of dispatching one line of input.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// A handler ran and produced reply text.
    Reply(String),
    /// A handler ran and failed.
    Failed(CommandError),
    /// The input resolved to a group with no handler of its own.
    Incomplete { path: String },
    /// The first token named no root-level command.
    Unknown(String),
    /// The input was empty or whitespace.
    Empty,
}

// ---------------------------------------------------------------------------
// CommandTree
// ---------------------------------------------------------------------------

/// The dispatcher-rooted command namespace.
#[derive(Default)]
pub struct CommandTree {
    commands: Vec<Command>,
    root: HashMap<String, CommandId>,
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a declaration at the root of the tree.
    ///
    /// The command's name, aliases and root aliases all bind in the root
    /// namespace. Returns the new command's id for use as a group parent.
    pub fn register(&mut self, spec: CommandSpec) -> Result<CommandId, RegistrationError> {
        self.attach(None, spec)
    }

    /// Attach a declaration under an existing group.
    ///
    /// The command's name and aliases bind in the parent's child namespace;
    /// its root aliases bind in the root namespace, whatever the parent's
    /// depth.
    pub fn register_child(
        &mut self,
        parent: CommandId,
        spec: CommandSpec,
    ) -> Result<CommandId, RegistrationError> {
        if parent.0 >= self.commands.len() {
            return Err(RegistrationError::UnknownParent);
        }
        self.attach(Some(parent), spec)
    }

    fn attach(
        &mut self,
        parent: Option<CommandId>,
        spec: CommandSpec,
    ) -> Result<CommandId, RegistrationError> {
        spec.validate()?;

        let qualified = match parent {
            Some(p) => format!("{} {}", self.qualified_name(p), spec.name),
            None => spec.name.clone(),
        };

        // Names this declaration binds in its parent's namespace and in the
        // root namespace. For a top-level declaration those are the same map.
        let mut scoped_keys: Vec<&str> = Vec::new();
        let mut root_keys: Vec<&str> = Vec::new();
        match parent {
            Some(_) => {
                scoped_keys.push(&spec.name);
                scoped_keys.extend(spec.aliases.iter().map(String::as_str));
                root_keys.extend(spec.root_aliases.iter().map(String::as_str));
            }
            None => {
                root_keys.push(&spec.name);
                root_keys.extend(spec.aliases.iter().map(String::as_str));
                root_keys.extend(spec.root_aliases.iter().map(String::as_str));
            }
        }

        // Validate the whole batch before touching either map, so a
        // collision cannot leave a partial registration behind.
        if let Some(p) = parent {
            self.check_batch(&scoped_keys, &self.commands[p.0].children, &qualified)?;
        }
        self.check_batch(&root_keys, &self.root, &qualified)?;

        let id = CommandId(self.commands.len());
        self.commands.push(Command {
            name: spec.name,
            description: spec.description,
            aliases: spec.aliases,
            root_aliases: spec.root_aliases,
            handler: spec.handler,
            parent,
            children: HashMap::new(),
        });

        let cmd = &self.commands[id.0];
        match parent {
            Some(p) => {
                let mut keys: Vec<String> = vec![cmd.name.clone()];
                keys.extend(cmd.aliases.iter().cloned());
                let root_keys: Vec<String> = cmd.root_aliases.clone();
                for key in keys {
                    self.commands[p.0].children.insert(key, id);
                }
                for key in root_keys {
                    self.root.insert(key, id);
                }
            }
            None => {
                let mut keys: Vec<String> = vec![cmd.name.clone()];
                keys.extend(cmd.aliases.iter().cloned());
                keys.extend(cmd.root_aliases.iter().cloned());
                for key in keys {
                    self.root.insert(key, id);
                }
            }
        }

        debug!(
            command = %qualified,
            root_aliases = ?self.commands[id.0].root_aliases,
            "registered command"
        );
        Ok(id)
    }

    /// Check a batch of keys against a live namespace and against itself.
    fn check_batch(
        &self,
        keys: &[&str],
        namespace: &HashMap<String, CommandId>,
        qualified: &str,
    ) -> Result<(), RegistrationError> {
        for (i, key) in keys.iter().enumerate() {
            if let Some(existing) = namespace.get(*key) {
                return Err(RegistrationError::DuplicateName {
                    name: (*key).to_string(),
                    existing: self.qualified_name(*existing),
                });
            }
            if keys[..i].contains(key) {
                return Err(RegistrationError::DuplicateName {
                    name: (*key).to_string(),
                    existing: qualified.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, id: CommandId) -> &Command {
        &self.commands[id.0]
    }

    /// Look up a name in the root namespace.
    pub fn lookup_root(&self, name: &str) -> Option<CommandId> {
        self.root.get(name).copied()
    }

    /// Look up a name among a group's immediate children.
    pub fn lookup_child(&self, parent: CommandId, name: &str) -> Option<CommandId> {
        self.commands[parent.0].children.get(name).copied()
    }

    /// The command's canonical space-joined path from the root.
    pub fn qualified_name(&self, id: CommandId) -> String {
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let cmd = &self.commands[current.0];
            parts.push(cmd.name.as_str());
            cursor = cmd.parent;
        }
        parts.reverse();
        parts.join(" ")
    }

    /// Iterate every attached command in registration order.
    pub fn commands(&self) -> impl Iterator<Item = (CommandId, &Command)> {
        self.commands
            .iter()
            .enumerate()
            .map(|(i, cmd)| (CommandId(i), cmd))
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Walk the tree along `tokens`, consuming them while they name children.
    ///
    /// Returns the deepest matched command and the unconsumed tokens. The
    /// first token is resolved in the root namespace only — a nested
    /// command's bare name does not match at the root unless it was declared
    /// as a root alias.
    pub fn resolve<'t>(&self, tokens: &'t [&'t str]) -> Option<(CommandId, &'t [&'t str])> {
        let (first, mut rest) = tokens.split_first()?;
        let mut id = self.lookup_root(first)?;
        while let Some((token, more)) = rest.split_first() {
            match self.lookup_child(id, token) {
                Some(child) => {
                    id = child;
                    rest = more;
                }
                None => break,
            }
        }
        Some((id, rest))
    }

    /// Tokenize one line of input, resolve it, and run the matched handler.
    pub async fn dispatch(&self, ctx: &Context, input: &str) -> DispatchOutcome {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        let Some(first) = tokens.first() else {
            return DispatchOutcome::Empty;
        };
        let Some((id, args)) = self.resolve(&tokens) else {
            trace!(name = %first, "no root-level match");
            return DispatchOutcome::Unknown((*first).to_string());
        };
        let cmd = &self.commands[id.0];
        let Some(handler) = &cmd.handler else {
            return DispatchOutcome::Incomplete {
                path: self.qualified_name(id),
            };
        };
        trace!(command = %self.qualified_name(id), ?args, "dispatching");
        match handler.invoke(ctx, args).await {
            Ok(reply) => DispatchOutcome::Reply(reply),
            Err(e) => DispatchOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandSpec;
    use crate::config::Config;
    use async_trait::async_trait;

    struct TagHandler(&'static str);

    #[async_trait]
    impl Handler for TagHandler {
        async fn invoke(&self, _ctx: &Context, args: &[&str]) -> Result<String, CommandError> {
            Ok(format!("{}:{}", self.0, args.join(",")))
        }
    }

    fn ctx() -> Context {
        Context::new(Config::default())
    }

    async fn reply(tree: &CommandTree, input: &str) -> String {
        match tree.dispatch(&ctx(), input).await {
            DispatchOutcome::Reply(text) => text,
            other => panic!("expected reply for `{input}`, got {other:?}"),
        }
    }

    #[test]
    fn names_aliases_and_root_aliases_bind() {
        let mut tree = CommandTree::new();
        let id = tree
            .register(
                CommandSpec::new("status")
                    .aliases(["st"])
                    .root_aliases(["s"])
                    .handler(TagHandler("status")),
            )
            .unwrap();
        assert_eq!(tree.lookup_root("status"), Some(id));
        assert_eq!(tree.lookup_root("st"), Some(id));
        assert_eq!(tree.lookup_root("s"), Some(id));
        assert_eq!(tree.lookup_root("x"), None);
    }

    #[test]
    fn child_aliases_stay_parent_scoped() {
        let mut tree = CommandTree::new();
        let group = tree.register(CommandSpec::new("g")).unwrap();
        let sub = tree
            .register_child(
                group,
                CommandSpec::new("sub").aliases(["sb"]).handler(TagHandler("sub")),
            )
            .unwrap();
        assert_eq!(tree.lookup_child(group, "sub"), Some(sub));
        assert_eq!(tree.lookup_child(group, "sb"), Some(sub));
        assert_eq!(tree.lookup_root("sub"), None);
        assert_eq!(tree.lookup_root("sb"), None);
    }

    #[tokio::test]
    async fn root_alias_reaches_nested_command() {
        let mut tree = CommandTree::new();
        let group = tree.register(CommandSpec::new("g")).unwrap();
        tree.register_child(
            group,
            CommandSpec::new("sub")
                .root_aliases(["s"])
                .handler(TagHandler("sub")),
        )
        .unwrap();

        assert_eq!(reply(&tree, "g sub").await, "sub:");
        assert_eq!(reply(&tree, "s").await, "sub:");
        assert!(matches!(
            tree.dispatch(&ctx(), "sub").await,
            DispatchOutcome::Unknown(name) if name == "sub"
        ));
    }

    #[tokio::test]
    async fn root_alias_works_three_groups_deep() {
        let mut tree = CommandTree::new();
        let a = tree.register(CommandSpec::new("a")).unwrap();
        let b = tree.register_child(a, CommandSpec::new("b")).unwrap();
        let c = tree.register_child(b, CommandSpec::new("c")).unwrap();
        tree.register_child(
            c,
            CommandSpec::new("deep")
                .root_aliases(["x"])
                .handler(TagHandler("deep")),
        )
        .unwrap();

        assert_eq!(reply(&tree, "a b c deep").await, "deep:");
        assert_eq!(reply(&tree, "x").await, "deep:");
    }

    #[tokio::test]
    async fn leftover_tokens_become_arguments() {
        let mut tree = CommandTree::new();
        let group = tree.register(CommandSpec::new("g")).unwrap();
        tree.register_child(group, CommandSpec::new("sub").handler(TagHandler("sub")))
            .unwrap();

        assert_eq!(reply(&tree, "g sub one two").await, "sub:one,two");
    }

    #[test]
    fn root_alias_collision_fails_atomically() {
        let mut tree = CommandTree::new();
        tree.register(
            CommandSpec::new("first")
                .root_aliases(["s"])
                .handler(TagHandler("first")),
        )
        .unwrap();
        let group = tree.register(CommandSpec::new("g")).unwrap();

        let err = tree
            .register_child(
                group,
                CommandSpec::new("second")
                    .aliases(["sec"])
                    .root_aliases(["s"])
                    .handler(TagHandler("second")),
            )
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateName {
                name: "s".into(),
                existing: "first".into()
            }
        );
        // Nothing from the failed declaration resolves.
        assert_eq!(tree.lookup_child(group, "second"), None);
        assert_eq!(tree.lookup_child(group, "sec"), None);
        assert_eq!(tree.lookup_root("s"), tree.lookup_root("first"));
    }

    #[test]
    fn root_alias_collides_with_top_level_name() {
        let mut tree = CommandTree::new();
        tree.register(CommandSpec::new("status").handler(TagHandler("status")))
            .unwrap();
        let group = tree.register(CommandSpec::new("g")).unwrap();

        let err = tree
            .register_child(
                group,
                CommandSpec::new("sub")
                    .root_aliases(["status"])
                    .handler(TagHandler("sub")),
            )
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateName { .. }));
    }

    #[test]
    fn duplicate_within_one_declaration_is_rejected() {
        let mut tree = CommandTree::new();
        let err = tree
            .register(
                CommandSpec::new("status")
                    .aliases(["s"])
                    .root_aliases(["s"])
                    .handler(TagHandler("status")),
            )
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateName {
                name: "s".into(),
                existing: "status".into()
            }
        );
        assert!(tree.lookup_root("status").is_none());
    }

    #[test]
    fn sibling_name_collision_is_rejected() {
        let mut tree = CommandTree::new();
        let group = tree.register(CommandSpec::new("g")).unwrap();
        tree.register_child(group, CommandSpec::new("sub").handler(TagHandler("one")))
            .unwrap();
        let err = tree
            .register_child(group, CommandSpec::new("sub").handler(TagHandler("two")))
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateName {
                name: "sub".into(),
                existing: "g sub".into()
            }
        );
    }

    #[tokio::test]
    async fn no_root_aliases_matches_base_behavior() {
        let mut tree = CommandTree::new();
        let group = tree.register(CommandSpec::new("g")).unwrap();
        tree.register_child(group, CommandSpec::new("plain").handler(TagHandler("plain")))
            .unwrap();

        assert_eq!(reply(&tree, "g plain").await, "plain:");
        assert!(matches!(
            tree.dispatch(&ctx(), "plain").await,
            DispatchOutcome::Unknown(_)
        ));
    }

    #[tokio::test]
    async fn handlerless_group_reports_incomplete() {
        let mut tree = CommandTree::new();
        let group = tree.register(CommandSpec::new("g").describe("a group")).unwrap();
        tree.register_child(group, CommandSpec::new("sub").handler(TagHandler("sub")))
            .unwrap();

        assert!(matches!(
            tree.dispatch(&ctx(), "g").await,
            DispatchOutcome::Incomplete { path } if path == "g"
        ));
    }

    #[tokio::test]
    async fn empty_input_is_empty_outcome() {
        let tree = CommandTree::new();
        assert!(matches!(
            tree.dispatch(&ctx(), "   ").await,
            DispatchOutcome::Empty
        ));
    }

    #[test]
    fn qualified_names_walk_the_parent_chain() {
        let mut tree = CommandTree::new();
        let a = tree.register(CommandSpec::new("a")).unwrap();
        let b = tree.register_child(a, CommandSpec::new("b")).unwrap();
        let c = tree
            .register_child(b, CommandSpec::new("c").handler(TagHandler("c")))
            .unwrap();
        assert_eq!(tree.qualified_name(c), "a b c");
        assert_eq!(tree.get(c).parent(), Some(b));
    }

    #[test]
    fn register_child_rejects_foreign_parent() {
        let mut tree = CommandTree::new();
        let mut other = CommandTree::new();
        let foreign = other.register(CommandSpec::new("g")).unwrap();
        // Same-arena ids are dense from zero, so a foreign id into an empty
        // tree is out of bounds.
        let err = tree
            .register_child(foreign, CommandSpec::new("sub").handler(TagHandler("sub")))
            .unwrap_err();
        assert_eq!(err, RegistrationError::UnknownParent);
    }
}
