//! The Program: root of one ASG.

use std::path::{Path, PathBuf};

use rowan::GreenNode;

use crate::base::{LineIndex, Position, SourcePos, Span, TextRange, TextSize};
use crate::parser::{SyntaxKind, SyntaxNode, SyntaxNodePtr};

use super::diagnostics::Diagnostic;
use super::node::{AsgNode, NodeData, NodeId, NodeKind};
use super::registry::ElementRegistry;

/// The ASG of one source file: an arena of nodes rooted at a Program
/// node, the element registry mapping parse-tree contexts to nodes, and
/// the semantic diagnostics gathered while building.
///
/// The Program owns the preprocessed text and the green tree, so cursors
/// into the parse tree can be re-created at any time via [`Program::root_syntax`].
#[derive(Debug)]
pub struct Program {
    file: Option<PathBuf>,
    text: String,
    green: GreenNode,
    line_index: LineIndex,
    nodes: Vec<AsgNode>,
    registry: ElementRegistry,
    units: Vec<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl Program {
    /// Create a Program with just its root node. The builder passes
    /// populate everything else.
    pub(crate) fn new(file: Option<&Path>, text: String, green: GreenNode) -> Self {
        let line_index = LineIndex::new(&text);
        let mut program = Self {
            file: file.map(Path::to_path_buf),
            text,
            green,
            line_index,
            nodes: Vec::new(),
            registry: ElementRegistry::new(),
            units: Vec::new(),
            diagnostics: Vec::new(),
        };
        let root_ctx = SyntaxNodePtr::new(&program.root_syntax());
        program.registry.record(root_ctx.clone(), NodeId(0));
        program.nodes.push(AsgNode {
            id: NodeId(0),
            parent: None,
            ctx: root_ctx,
            children: Vec::new(),
            data: NodeData::Program,
        });
        program
    }

    // =========================================================================
    // Tree access
    // =========================================================================

    /// The root ASG node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// A fresh cursor at the root of the parse tree.
    pub fn root_syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn node(&self, id: NodeId) -> &AsgNode {
        &self.nodes[id.0 as usize]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut AsgNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of nodes in the ASG.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes, in creation (pass) order.
    pub fn nodes(&self) -> impl Iterator<Item = &AsgNode> {
        self.nodes.iter()
    }

    /// The compilation units, in source order (nested units after their
    /// containing unit).
    pub fn units(&self) -> &[NodeId] {
        &self.units
    }

    pub(crate) fn push_unit(&mut self, unit: NodeId) {
        self.units.push(unit);
    }

    /// Find a compilation unit by its PROGRAM-ID (case-insensitive).
    pub fn unit_by_name(&self, name: &str) -> Option<NodeId> {
        self.units
            .iter()
            .copied()
            .find(|&id| match self.node(id).data() {
                NodeData::CompilationUnit(data) => data.name.eq_ignore_ascii_case(name),
                _ => false,
            })
    }

    /// Direct children of `id` with the given kind.
    pub fn children_of_kind(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.node(id)
            .children()
            .iter()
            .copied()
            .filter(|&child| self.node(child).kind() == kind)
            .collect()
    }

    /// First direct child of `id` with the given kind.
    pub fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.node(id)
            .children()
            .iter()
            .copied()
            .find(|&child| self.node(child).kind() == kind)
    }

    /// Preorder traversal of the subtree under `id`, including `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            // Children pushed in reverse so they pop in order.
            for &child in self.node(current).children().iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    // =========================================================================
    // Node construction (the uniform add contract)
    // =========================================================================

    /// Construct a child node bound to `ctx`, register the context, and
    /// append the child to `owner`'s children. Every builder pass creates
    /// nodes exclusively through this method.
    pub(crate) fn add_child(&mut self, owner: NodeId, ctx: &SyntaxNode, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let ptr = SyntaxNodePtr::new(ctx);
        self.registry.record(ptr.clone(), id);
        self.nodes.push(AsgNode {
            id,
            parent: Some(owner),
            ctx: ptr,
            children: Vec::new(),
            data,
        });
        self.nodes[owner.0 as usize].children.push(id);
        id
    }

    // =========================================================================
    // Registry and contexts
    // =========================================================================

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ElementRegistry {
        &mut self.registry
    }

    /// The parse-tree context of a node, as a live cursor.
    pub fn ctx_of(&self, id: NodeId) -> SyntaxNode {
        self.node(id).ctx.to_node(&self.root_syntax())
    }

    // =========================================================================
    // Text and positions
    // =========================================================================

    /// The preprocessed text this ASG was built from.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// 0-indexed span of a text range.
    pub fn span_of_range(&self, range: TextRange) -> Span {
        let start = self.line_index.line_col(range.start());
        let end = self.line_index.line_col(range.end());
        Span::new(
            Position::new(start.line as usize, start.col as usize),
            Position::new(end.line as usize, end.col as usize),
        )
    }

    /// 0-indexed span of a node's context.
    pub fn span_of(&self, id: NodeId) -> Span {
        self.span_of_range(self.node(id).ctx.text_range())
    }

    /// 1-indexed error position for a byte offset.
    pub fn source_pos(&self, offset: TextSize) -> SourcePos {
        let line_col = self.line_index.line_col(offset);
        SourcePos::new(self.file.clone(), line_col.line + 1, line_col.col + 1)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Name of a syntax kind for error messages.
    pub(crate) fn context_name(kind: SyntaxKind) -> String {
        format!("{kind:?}")
    }
}
