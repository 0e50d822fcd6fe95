//! Element registry: parse-tree context -> ASG node.
//!
//! One registry per [`super::Program`]; it is written only while the
//! builder passes run and frozen afterwards. Contexts are keyed by
//! [`SyntaxNodePtr`], so the registry stays valid however the caller
//! re-roots cursors into the tree.

use rustc_hash::FxHashMap;

use crate::parser::{SyntaxNode, SyntaxNodePtr};

use super::node::NodeId;

#[derive(Debug, Default)]
pub struct ElementRegistry {
    map: FxHashMap<SyntaxNodePtr, NodeId>,
    frozen: bool,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `ctx -> node`. Each context registers exactly once; a
    /// second registration is a builder bug.
    pub(crate) fn record(&mut self, ctx: SyntaxNodePtr, node: NodeId) {
        debug_assert!(!self.frozen, "registry is frozen");
        let previous = self.map.insert(ctx, node);
        debug_assert!(
            previous.is_none(),
            "context registered twice: {previous:?} replaced by {node:?}"
        );
    }

    /// The node built from `ctx`, if any.
    pub fn lookup(&self, ctx: &SyntaxNodePtr) -> Option<NodeId> {
        self.map.get(ctx).copied()
    }

    /// [`Self::lookup`] keyed by a live cursor.
    pub fn lookup_node(&self, node: &SyntaxNode) -> Option<NodeId> {
        self.lookup(&SyntaxNodePtr::new(node))
    }

    /// Walk the ancestors of `ctx` (nearest first) and return the first
    /// registered node accepted by `is_owner`.
    pub fn owner_of(
        &self,
        ctx: &SyntaxNode,
        mut is_owner: impl FnMut(NodeId) -> bool,
    ) -> Option<NodeId> {
        ctx.ancestors()
            .skip(1)
            .filter_map(|ancestor| self.lookup_node(&ancestor))
            .find(|&id| is_owner(id))
    }

    /// Number of registered contexts.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over all (context, node) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&SyntaxNodePtr, NodeId)> {
        self.map.iter().map(|(ctx, &id)| (ctx, id))
    }

    /// Seal the registry once all passes have completed.
    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}
