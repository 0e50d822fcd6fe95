//! Semantic findings recorded on the ASG.
//!
//! These never abort a build: the ASG completes and downstream tools
//! decide what to treat as an error.

use std::fmt;

use smol_str::SmolStr;

use crate::base::Span;

use super::node::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A name reference with no matching definition.
    UnresolvedReference { name: SmolStr, span: Span },
    /// A reference that matched several same-rank definitions; all of
    /// them are kept on the placeholder.
    AmbiguousReference {
        name: SmolStr,
        span: Span,
        candidates: Vec<NodeId>,
    },
    /// Two definitions with the same name in one scope.
    DuplicateDefinition {
        name: SmolStr,
        span: Span,
        previous: NodeId,
    },
}

impl Diagnostic {
    pub fn name(&self) -> &SmolStr {
        match self {
            Diagnostic::UnresolvedReference { name, .. }
            | Diagnostic::AmbiguousReference { name, .. }
            | Diagnostic::DuplicateDefinition { name, .. } => name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Diagnostic::UnresolvedReference { span, .. }
            | Diagnostic::AmbiguousReference { span, .. }
            | Diagnostic::DuplicateDefinition { span, .. } => *span,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.span();
        match self {
            Diagnostic::UnresolvedReference { name, .. } => {
                write!(
                    f,
                    "{}:{}: unresolved reference '{name}'",
                    span.start.line + 1,
                    span.start.column + 1
                )
            }
            Diagnostic::AmbiguousReference { name, candidates, .. } => {
                write!(
                    f,
                    "{}:{}: ambiguous reference '{name}' ({} candidates)",
                    span.start.line + 1,
                    span.start.column + 1,
                    candidates.len()
                )
            }
            Diagnostic::DuplicateDefinition { name, .. } => {
                write!(
                    f,
                    "{}:{}: duplicate definition of '{name}'",
                    span.start.line + 1,
                    span.start.column + 1
                )
            }
        }
    }
}
