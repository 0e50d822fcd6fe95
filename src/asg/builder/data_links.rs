//! Pass 3: inter-entry references.
//!
//! Requires the data-entries pass so every referenceable name exists.
//! Builds the unit's symbol index, then resolves REDEFINES targets,
//! OCCURS DEPENDING ON objects, RENAMES ranges, and links each level-88
//! condition entry to its conditional variable.

use crate::asg::error::BuildError;
use crate::asg::node::{DataEntryKind, NodeData, NodeId, NodeKind};
use crate::asg::reference::{RefTarget, SymbolRef};
use crate::asg::resolve::{Resolver, UnitIndex};

use super::BuildContext;

pub(crate) fn run(cx: &mut BuildContext, unit: NodeId) -> Result<(), BuildError> {
    let (index, duplicates) = UnitIndex::build(&cx.program, unit);
    for diagnostic in duplicates {
        cx.program.add_diagnostic(diagnostic);
    }
    cx.indexes.insert(unit, index);

    let entries = entries_of(cx, unit);
    for entry in entries {
        link_condition_subject(cx, entry);
        link_redefines(cx, unit, entry);
        link_clause_refs(cx, unit, entry);
    }
    Ok(())
}

fn entries_of(cx: &BuildContext, unit: NodeId) -> Vec<NodeId> {
    cx.program
        .descendants(unit)
        .into_iter()
        .filter(|&id| cx.program.node(id).kind() == NodeKind::DataDescriptionEntry)
        .collect()
}

/// 88-level entries condition the entry they are declared under.
fn link_condition_subject(cx: &mut BuildContext, entry: NodeId) {
    let node = cx.program.node(entry);
    let NodeData::DataDescriptionEntry(data) = node.data() else {
        return;
    };
    if data.kind != DataEntryKind::Condition || data.condition_subject.is_some() {
        return;
    }
    let parent = node.parent().filter(|&parent| {
        cx.program.node(parent).kind() == NodeKind::DataDescriptionEntry
    });
    if let Some(parent) = parent {
        if let NodeData::DataDescriptionEntry(data) = &mut cx.program.node_mut(entry).data {
            data.condition_subject = Some(parent);
        }
    }
}

/// REDEFINES names the immediately preceding entry at the same level:
/// search the earlier siblings first, then fall back to the unit index.
fn link_redefines(cx: &mut BuildContext, unit: NodeId, entry: NodeId) {
    let Some(clause) = cx.program.child_of_kind(entry, NodeKind::RedefinesClause) else {
        return;
    };
    let target_name = match cx.program.node(clause).data() {
        NodeData::RedefinesClause(data) => data.target.name.clone(),
        _ => return,
    };

    let parent = cx.program.node(entry).parent();
    let sibling = parent.and_then(|parent| {
        let siblings = cx.program.node(parent).children();
        siblings
            .iter()
            .copied()
            .take_while(|&id| id != entry)
            .filter(|&id| {
                cx.program
                    .node(id)
                    .name()
                    .is_some_and(|name| name.eq_ignore_ascii_case(&target_name))
            })
            .last()
    });

    let resolved = sibling.or_else(|| {
        let index = &cx.indexes[&unit];
        match index.data_candidates(&target_name) {
            [single] => Some(*single),
            _ => None,
        }
    });

    match resolved {
        Some(target) => {
            if let NodeData::RedefinesClause(data) = &mut cx.program.node_mut(clause).data {
                data.target.target = RefTarget::Resolved(target);
            }
        }
        None => {
            let diagnostic = {
                let NodeData::RedefinesClause(data) = cx.program.node(clause).data() else {
                    return;
                };
                crate::asg::Diagnostic::UnresolvedReference {
                    name: data.target.name.clone(),
                    span: data.target.span,
                }
            };
            cx.program.add_diagnostic(diagnostic);
        }
    }
}

/// OCCURS DEPENDING ON and RENAMES operands resolve through the unit
/// index like any other data reference.
fn link_clause_refs(cx: &mut BuildContext, unit: NodeId, entry: NodeId) {
    let clauses: Vec<NodeId> = cx
        .program
        .node(entry)
        .children()
        .iter()
        .copied()
        .filter(|&id| {
            matches!(
                cx.program.node(id).kind(),
                NodeKind::OccursClause | NodeKind::RenamesClause
            )
        })
        .collect();

    for clause in clauses {
        // Take pending refs out, resolve, and write back.
        let mut pending: Vec<(usize, SymbolRef)> = Vec::new();
        match cx.program.node(clause).data() {
            NodeData::OccursClause(data) => {
                if let Some(symbol) = &data.depending_on {
                    pending.push((0, symbol.clone()));
                }
            }
            NodeData::RenamesClause(data) => {
                pending.push((0, data.from.clone()));
                if let Some(thru) = &data.thru {
                    pending.push((1, thru.clone()));
                }
            }
            _ => {}
        }

        let resolver = Resolver::new(vec![&cx.indexes[&unit]]);
        let mut diagnostics = Vec::new();
        for (_, symbol) in pending.iter_mut() {
            if let Some(diagnostic) = resolver.apply(symbol, None) {
                diagnostics.push(diagnostic);
            }
        }

        match &mut cx.program.node_mut(clause).data {
            NodeData::OccursClause(data) => {
                if let Some((_, symbol)) = pending.into_iter().next() {
                    data.depending_on = Some(symbol);
                }
            }
            NodeData::RenamesClause(data) => {
                for (slot, symbol) in pending {
                    if slot == 0 {
                        data.from = symbol;
                    } else {
                        data.thru = Some(symbol);
                    }
                }
            }
            _ => {}
        }
        for diagnostic in diagnostics {
            cx.program.add_diagnostic(diagnostic);
        }
    }
}
