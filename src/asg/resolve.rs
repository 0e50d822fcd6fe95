//! Name resolution.
//!
//! A [`UnitIndex`] is built per compilation unit once the data passes
//! complete: declaration-ordered name tables for data entries, procedure
//! names, files, and mnemonics, plus each data entry's ancestor-name
//! chain for `OF`/`IN` qualification. The [`Resolver`] runs the lookup
//! order: local procedure names, the unit's data division (with
//! bottom-up qualification), then GLOBAL items of enclosing units.
//! Failures become placeholders; ambiguity keeps every candidate.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::Program;
use super::diagnostics::Diagnostic;
use super::node::{NodeData, NodeId, NodeKind};
use super::reference::{RefKind, RefTarget, SymbolRef};

/// Case-folded lookup key.
fn key(name: &str) -> SmolStr {
    SmolStr::new(name.to_ascii_lowercase())
}

/// Per-unit symbol tables.
#[derive(Debug, Default)]
pub(crate) struct UnitIndex {
    /// Data entry name -> entries, in declaration order.
    data: IndexMap<SmolStr, Vec<NodeId>>,
    /// Subset of `data` declared GLOBAL (visible to nested programs).
    global_data: IndexMap<SmolStr, Vec<NodeId>>,
    /// Entry -> names of its ancestor entries/descriptors, nearest first.
    ancestors: FxHashMap<NodeId, Vec<SmolStr>>,
    /// Paragraph name -> paragraphs.
    paragraphs: IndexMap<SmolStr, Vec<NodeId>>,
    /// Section name -> sections.
    sections: IndexMap<SmolStr, Vec<NodeId>>,
    /// Paragraph -> its section (absent for division-level paragraphs).
    paragraph_section: FxHashMap<NodeId, NodeId>,
    /// File name -> file-control entries.
    files: IndexMap<SmolStr, Vec<NodeId>>,
    /// Mnemonic name -> SPECIAL-NAMES entry.
    mnemonics: IndexMap<SmolStr, NodeId>,
}

impl UnitIndex {
    /// Build the tables for `unit`, reporting duplicate definitions.
    pub(crate) fn build(program: &Program, unit: NodeId) -> (Self, Vec<Diagnostic>) {
        let mut index = Self::default();
        let mut diagnostics = Vec::new();

        for id in unit_nodes(program, unit) {
            let node = program.node(id);
            match node.data() {
                NodeData::DataDescriptionEntry(entry) => {
                    let Some(name) = &entry.name else { continue };
                    let name_key = key(name);
                    let bucket = index.data.entry(name_key.clone()).or_default();
                    // Same name under the same parent is a duplicate; the
                    // same name in different records is legal and needs
                    // qualification.
                    if let Some(&previous) = bucket
                        .iter()
                        .find(|&&other| program.node(other).parent() == node.parent())
                    {
                        diagnostics.push(Diagnostic::DuplicateDefinition {
                            name: name.clone(),
                            span: program.span_of(id),
                            previous,
                        });
                    }
                    bucket.push(id);
                    if entry.global {
                        index.global_data.entry(name_key).or_default().push(id);
                    }
                    index.ancestors.insert(id, ancestor_names(program, id));
                }
                NodeData::Paragraph(paragraph) => {
                    let name_key = key(&paragraph.name);
                    let section = enclosing_section(program, id);
                    let bucket = index.paragraphs.entry(name_key).or_default();
                    if let Some(&previous) = bucket.iter().find(|&&other| {
                        enclosing_section(program, other) == section
                    }) {
                        diagnostics.push(Diagnostic::DuplicateDefinition {
                            name: paragraph.name.clone(),
                            span: program.span_of(id),
                            previous,
                        });
                    }
                    bucket.push(id);
                    if let Some(section) = section {
                        index.paragraph_section.insert(id, section);
                    }
                }
                NodeData::ProcedureSection(section) => {
                    index
                        .sections
                        .entry(key(&section.name))
                        .or_default()
                        .push(id);
                }
                NodeData::FileControlEntry(file) => {
                    let bucket = index.files.entry(key(&file.name)).or_default();
                    if let Some(&previous) = bucket.first() {
                        diagnostics.push(Diagnostic::DuplicateDefinition {
                            name: file.name.clone(),
                            span: program.span_of(id),
                            previous,
                        });
                    }
                    bucket.push(id);
                }
                NodeData::MnemonicEntry(entry) => {
                    index.mnemonics.insert(key(&entry.mnemonic), id);
                }
                _ => {}
            }
        }
        (index, diagnostics)
    }

    pub(crate) fn data_candidates(&self, name: &str) -> &[NodeId] {
        self.data.get(&key(name)).map(Vec::as_slice).unwrap_or(&[])
    }

    fn global_candidates(&self, name: &str) -> &[NodeId] {
        self.global_data
            .get(&key(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn file(&self, name: &str) -> &[NodeId] {
        self.files.get(&key(name)).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn mnemonic(&self, name: &str) -> Option<NodeId> {
        self.mnemonics.get(&key(name)).copied()
    }

    /// Whether the qualifier chain matches the entry's ancestors,
    /// bottom-up: each qualifier must appear, in order, walking outward.
    fn qualifiers_match(&self, entry: NodeId, qualifiers: &[SmolStr]) -> bool {
        if qualifiers.is_empty() {
            return true;
        }
        let Some(ancestors) = self.ancestors.get(&entry) else {
            return false;
        };
        let mut next = 0;
        for ancestor in ancestors {
            if next < qualifiers.len() && ancestor.eq_ignore_ascii_case(&qualifiers[next]) {
                next += 1;
            }
        }
        next == qualifiers.len()
    }
}

/// ASG nodes of one unit, excluding nested units' subtrees.
fn unit_nodes(program: &Program, unit: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![unit];
    while let Some(current) = stack.pop() {
        out.push(current);
        for &child in program.node(current).children().iter().rev() {
            if program.node(child).kind() != NodeKind::CompilationUnit {
                stack.push(child);
            }
        }
    }
    out
}

/// Names of the data/file ancestors of `entry`, nearest first.
fn ancestor_names(program: &Program, entry: NodeId) -> Vec<SmolStr> {
    let mut names = Vec::new();
    let mut current = program.node(entry).parent();
    while let Some(id) = current {
        let node = program.node(id);
        match node.data() {
            NodeData::DataDescriptionEntry(data) => {
                if let Some(name) = &data.name {
                    names.push(name.clone());
                }
            }
            NodeData::FileDescriptionEntry(data) => names.push(data.name.clone()),
            NodeData::DataDivision | NodeData::ProgramUnit => break,
            _ => {}
        }
        current = node.parent();
    }
    names
}

/// The section a paragraph belongs to, if any.
fn enclosing_section(program: &Program, paragraph: NodeId) -> Option<NodeId> {
    let mut current = program.node(paragraph).parent();
    while let Some(id) = current {
        match program.node(id).kind() {
            NodeKind::ProcedureSection => return Some(id),
            NodeKind::ProcedureDivision => return None,
            _ => current = program.node(id).parent(),
        }
    }
    None
}

/// Outcome of one lookup.
pub(crate) struct Resolution {
    pub target: RefTarget,
    pub diagnostic: Option<Diagnostic>,
}

impl Resolution {
    fn resolved(id: NodeId) -> Self {
        Self {
            target: RefTarget::Resolved(id),
            diagnostic: None,
        }
    }
}

/// Query-time resolution over a unit and its enclosing chain.
pub(crate) struct Resolver<'a> {
    /// The unit's own index followed by enclosing units', innermost
    /// first.
    chain: Vec<&'a UnitIndex>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(chain: Vec<&'a UnitIndex>) -> Self {
        Self { chain }
    }

    fn own(&self) -> &UnitIndex {
        self.chain[0]
    }

    /// Resolve a data-name reference: the unit's data division first,
    /// then GLOBAL items of enclosing units.
    pub(crate) fn resolve_data(&self, symbol: &SymbolRef) -> Resolution {
        let own = self.own();
        let matched: Vec<NodeId> = own
            .data_candidates(&symbol.name)
            .iter()
            .copied()
            .filter(|&id| own.qualifiers_match(id, &symbol.qualifiers))
            .collect();
        if let Some(resolution) = self.pick(symbol, matched) {
            return resolution;
        }
        for index in &self.chain[1..] {
            let matched: Vec<NodeId> = index
                .global_candidates(&symbol.name)
                .iter()
                .copied()
                .filter(|&id| index.qualifiers_match(id, &symbol.qualifiers))
                .collect();
            if let Some(resolution) = self.pick(symbol, matched) {
                return resolution;
            }
        }
        self.unresolved(symbol)
    }

    /// Resolve a procedure-name reference: paragraphs of the current
    /// section first, then all paragraphs and sections of the unit.
    pub(crate) fn resolve_procedure(
        &self,
        symbol: &SymbolRef,
        current_section: Option<NodeId>,
    ) -> Resolution {
        let own = self.own();
        let name_key = key(&symbol.name);
        if let Some(section) = current_section {
            let local: Vec<NodeId> = own
                .paragraphs
                .get(&name_key)
                .map(Vec::as_slice)
                .unwrap_or(&[])
                .iter()
                .copied()
                .filter(|id| own.paragraph_section.get(id) == Some(&section))
                .collect();
            if let Some(resolution) = self.pick(symbol, local) {
                return resolution;
            }
        }
        let mut matched: Vec<NodeId> = own
            .paragraphs
            .get(&name_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .to_vec();
        matched.extend_from_slice(
            own.sections
                .get(&name_key)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        );
        if let Some(resolution) = self.pick(symbol, matched) {
            return resolution;
        }
        self.unresolved(symbol)
    }

    /// Resolve a file-name reference against the unit's file-control
    /// entries.
    pub(crate) fn resolve_file(&self, symbol: &SymbolRef) -> Resolution {
        let matched = self.own().file(&symbol.name).to_vec();
        self.pick(symbol, matched)
            .unwrap_or_else(|| self.unresolved(symbol))
    }

    /// Resolve a mnemonic reference against SPECIAL-NAMES.
    pub(crate) fn resolve_mnemonic(&self, symbol: &SymbolRef) -> Resolution {
        match self.own().mnemonic(&symbol.name) {
            Some(id) => Resolution::resolved(id),
            None => self.unresolved(symbol),
        }
    }

    /// One candidate resolves; several stay on the placeholder with an
    /// ambiguity diagnostic; none falls through to the next scope.
    fn pick(&self, symbol: &SymbolRef, matched: Vec<NodeId>) -> Option<Resolution> {
        match matched.len() {
            0 => None,
            1 => Some(Resolution::resolved(matched[0])),
            _ => Some(Resolution {
                diagnostic: Some(Diagnostic::AmbiguousReference {
                    name: symbol.name.clone(),
                    span: symbol.span,
                    candidates: matched.clone(),
                }),
                target: RefTarget::Unresolved {
                    candidates: matched,
                },
            }),
        }
    }

    fn unresolved(&self, symbol: &SymbolRef) -> Resolution {
        Resolution {
            target: RefTarget::Unresolved {
                candidates: Vec::new(),
            },
            diagnostic: Some(Diagnostic::UnresolvedReference {
                name: symbol.name.clone(),
                span: symbol.span,
            }),
        }
    }

    /// Resolve in place: set the target and hand back any diagnostic.
    pub(crate) fn apply(&self, symbol: &mut SymbolRef, current_section: Option<NodeId>) -> Option<Diagnostic> {
        let resolution = match symbol.kind {
            RefKind::Data => self.resolve_data(symbol),
            RefKind::Procedure => self.resolve_procedure(symbol, current_section),
            RefKind::File => self.resolve_file(symbol),
            RefKind::Mnemonic => self.resolve_mnemonic(symbol),
        };
        symbol.target = resolution.target;
        resolution.diagnostic
    }
}
