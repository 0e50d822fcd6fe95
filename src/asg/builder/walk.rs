//! Tree-walk plumbing and CST extraction helpers shared by the passes.

use smol_str::SmolStr;

use crate::asg::Program;
use crate::asg::error::BuildError;
use crate::asg::reference::{Operand, RefKind, SymbolRef};
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Preorder walk of `root`'s subtree, pruning nested compilation units:
/// each unit's passes walk only its own contexts.
pub(crate) fn walk_pruned<F>(root: &SyntaxNode, f: &mut F) -> Result<(), BuildError>
where
    F: FnMut(&SyntaxNode) -> Result<(), BuildError>,
{
    f(root)?;
    for child in root.children() {
        if child.kind() != SyntaxKind::COMPILATION_UNIT {
            walk_pruned(&child, f)?;
        }
    }
    Ok(())
}

/// Direct non-trivia tokens of `node`.
pub(crate) fn direct_tokens(node: &SyntaxNode) -> Vec<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(SyntaxElement::into_token)
        .filter(|token| !token.kind().is_trivia())
        .collect()
}

/// First direct token of the given kind.
pub(crate) fn first_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(SyntaxElement::into_token)
        .find(|token| token.kind() == kind)
}

/// Whether `node` has a direct token of the given kind.
pub(crate) fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    first_token(node, kind).is_some()
}

/// First direct child node of the given kind.
pub(crate) fn first_child(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.children().find(|child| child.kind() == kind)
}

/// Direct child nodes of the given kind.
pub(crate) fn children_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Vec<SyntaxNode> {
    node.children()
        .filter(|child| child.kind() == kind)
        .collect()
}

/// The defining name token of an entry: the first WORD (or INTEGER for
/// numeric paragraph names) among its direct tokens.
pub(crate) fn name_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    direct_tokens(node)
        .into_iter()
        .find(|token| matches!(token.kind(), SyntaxKind::WORD | SyntaxKind::INTEGER))
}

/// Build a pending [`SymbolRef`] from a NAME_REF context.
pub(crate) fn symbol_ref(program: &Program, ctx: &SyntaxNode, kind: RefKind) -> SymbolRef {
    let name = name_token(ctx)
        .map(|token| SmolStr::new(token.text()))
        .unwrap_or_default();
    let qualifiers = children_of_kind(ctx, SyntaxKind::QUALIFIER)
        .iter()
        .filter_map(name_token)
        .map(|token| SmolStr::new(token.text()))
        .collect();
    let span = program.span_of_range(ctx.text_range());
    SymbolRef::pending(name, qualifiers, kind, span)
}

/// Build an [`Operand`] from a LITERAL or NAME_REF context.
pub(crate) fn operand(program: &Program, ctx: &SyntaxNode, kind: RefKind) -> Operand {
    if ctx.kind() == SyntaxKind::NAME_REF {
        Operand::DataRef(symbol_ref(program, ctx, kind))
    } else {
        Operand::Literal(SmolStr::new(ctx.text().to_string().trim()))
    }
}

/// Split the operand child nodes (NAME_REF / LITERAL) of `ctx` into
/// segments at the first occurrence of each separator keyword, in order.
/// Absent separators yield empty segments, so callers can destructure
/// positionally.
pub(crate) fn segment_operands(ctx: &SyntaxNode, separators: &[SyntaxKind]) -> Vec<Vec<SyntaxNode>> {
    let mut segments: Vec<Vec<SyntaxNode>> = vec![Vec::new()];
    let mut next_sep = 0;
    for element in ctx.children_with_tokens() {
        match element {
            SyntaxElement::Token(token) => {
                if let Some(skip) = separators[next_sep..]
                    .iter()
                    .position(|&kind| kind == token.kind())
                {
                    for _ in 0..=skip {
                        segments.push(Vec::new());
                    }
                    next_sep += skip + 1;
                }
            }
            SyntaxElement::Node(node) => {
                if matches!(node.kind(), SyntaxKind::NAME_REF | SyntaxKind::LITERAL) {
                    if let Some(segment) = segments.last_mut() {
                        segment.push(node);
                    }
                }
            }
        }
    }
    while segments.len() < separators.len() + 1 {
        segments.push(Vec::new());
    }
    segments
}

/// Collapse the text of a node to single-spaced words, for free-form
/// comment entries.
pub(crate) fn collapsed_text(node: &SyntaxNode) -> String {
    node.text()
        .to_string()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
