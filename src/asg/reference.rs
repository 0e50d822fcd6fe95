//! Cross-references between ASG nodes.
//!
//! A [`SymbolRef`] is a non-owning link: it carries the raw name as
//! written, the `OF`/`IN` qualifier chain, and a [`RefTarget`] that is
//! either the id of the defining node or an unresolved placeholder. An
//! unresolved reference is never dropped; ambiguous lookups keep every
//! candidate on the placeholder and consumers decide.

use smol_str::SmolStr;

use crate::base::Span;

use super::node::NodeId;

/// What namespace a reference is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    /// Data description entries.
    Data,
    /// Paragraphs and sections.
    Procedure,
    /// File-control entries.
    File,
    /// SPECIAL-NAMES mnemonics.
    Mnemonic,
}

/// Resolution state of a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    /// The reference resolved to exactly one definition.
    Resolved(NodeId),
    /// No unique definition. `candidates` is empty when nothing matched
    /// and holds every same-rank match when the lookup was ambiguous.
    Unresolved { candidates: Vec<NodeId> },
}

impl RefTarget {
    pub fn is_resolved(&self) -> bool {
        matches!(self, RefTarget::Resolved(_))
    }

    /// The resolved node, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            RefTarget::Resolved(id) => Some(*id),
            RefTarget::Unresolved { .. } => None,
        }
    }
}

/// A use of a name inside a clause or statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    /// The name as written (original case preserved).
    pub name: SmolStr,
    /// `OF`/`IN` qualifiers, innermost first: `AMOUNT OF REC OF GROUP`
    /// yields `["REC", "GROUP"]`.
    pub qualifiers: Vec<SmolStr>,
    pub kind: RefKind,
    pub target: RefTarget,
    /// Where the reference appears, in the preprocessed text.
    pub span: Span,
}

impl SymbolRef {
    /// A reference that has not been through resolution yet.
    pub fn pending(name: SmolStr, qualifiers: Vec<SmolStr>, kind: RefKind, span: Span) -> Self {
        Self {
            name,
            qualifiers,
            kind,
            target: RefTarget::Unresolved {
                candidates: Vec::new(),
            },
            span,
        }
    }
}

/// A statement operand: a literal or a data reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// Literal text as written, quotes included; figurative constants
    /// keep their keyword spelling.
    Literal(SmolStr),
    DataRef(SymbolRef),
}

impl Operand {
    /// The literal text, if this operand is a literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Operand::Literal(text) => Some(text),
            Operand::DataRef(_) => None,
        }
    }

    /// The reference, if this operand is a data reference.
    pub fn as_ref(&self) -> Option<&SymbolRef> {
        match self {
            Operand::Literal(_) => None,
            Operand::DataRef(symbol) => Some(symbol),
        }
    }
}
