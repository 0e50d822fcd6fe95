//! Pass 5: FD/SD clauses and the FD <-> SELECT cross-link.

use crate::asg::builder::walk::{
    children_of_kind, first_child, has_token, symbol_ref, walk_pruned,
};
use crate::asg::error::BuildError;
use crate::asg::node::{DataRecordsData, LabelRecordsData, NodeData, NodeId, NodeKind};
use crate::asg::reference::{RefKind, RefTarget};
use crate::asg::resolve::Resolver;
use crate::asg::Diagnostic;
use crate::parser::{SyntaxKind, SyntaxNode};

use super::BuildContext;
use super::data_entries::contains_data;

pub(crate) fn run(cx: &mut BuildContext, unit: NodeId) -> Result<(), BuildError> {
    attach_clauses(cx, unit)?;
    cross_link(cx, unit);
    Ok(())
}

fn attach_clauses(cx: &mut BuildContext, unit: NodeId) -> Result<(), BuildError> {
    let unit_ctx = cx.program.ctx_of(unit);
    let Some(program_unit_ctx) = first_child(&unit_ctx, SyntaxKind::PROGRAM_UNIT) else {
        return Ok(());
    };

    let mut walker = |ctx: &SyntaxNode| -> Result<(), BuildError> {
        let data = match ctx.kind() {
            SyntaxKind::BLOCK_CONTAINS_CLAUSE => {
                NodeData::BlockContainsClause(contains_data(ctx))
            }
            SyntaxKind::RECORD_CONTAINS_CLAUSE => {
                NodeData::RecordContainsClause(contains_data(ctx))
            }
            SyntaxKind::LABEL_RECORDS_CLAUSE => NodeData::LabelRecordsClause(LabelRecordsData {
                standard: has_token(ctx, SyntaxKind::STANDARD_KW),
            }),
            SyntaxKind::DATA_RECORDS_CLAUSE => {
                let mut records = Vec::new();
                let resolver = Resolver::new(vec![&cx.indexes[&unit]]);
                let mut diagnostics = Vec::new();
                for name_ctx in children_of_kind(ctx, SyntaxKind::NAME_REF) {
                    let mut symbol = symbol_ref(&cx.program, &name_ctx, RefKind::Data);
                    if let Some(diagnostic) = resolver.apply(&mut symbol, None) {
                        diagnostics.push(diagnostic);
                    }
                    records.push(symbol);
                }
                for diagnostic in diagnostics {
                    cx.program.add_diagnostic(diagnostic);
                }
                NodeData::DataRecordsClause(DataRecordsData { records })
            }
            _ => return Ok(()),
        };
        let owner = cx.find_owner(ctx, &[NodeKind::FileDescriptionEntry])?;
        cx.program.add_child(owner, ctx, data);
        Ok(())
    };

    for child in program_unit_ctx.children() {
        if child.kind() != SyntaxKind::COMPILATION_UNIT {
            walk_pruned(&child, &mut walker)?;
        }
    }
    Ok(())
}

/// Pair each FD/SD with the SELECT entry carrying the same file name,
/// in both directions. A missing partner is a semantic diagnostic, not
/// an error.
fn cross_link(cx: &mut BuildContext, unit: NodeId) {
    let nodes = cx.program.descendants(unit);
    let descriptors: Vec<NodeId> = nodes
        .iter()
        .copied()
        .filter(|&id| cx.program.node(id).kind() == NodeKind::FileDescriptionEntry)
        .collect();
    let selects: Vec<NodeId> = nodes
        .iter()
        .copied()
        .filter(|&id| cx.program.node(id).kind() == NodeKind::FileControlEntry)
        .collect();

    for descriptor in descriptors {
        let name = match cx.program.node(descriptor).data() {
            NodeData::FileDescriptionEntry(data) => data.name.clone(),
            _ => continue,
        };
        let partner = selects.iter().copied().find(|&select| {
            cx.program
                .node(select)
                .name()
                .is_some_and(|select_name| select_name.eq_ignore_ascii_case(&name))
        });
        match partner {
            Some(select) => {
                if let NodeData::FileDescriptionEntry(data) =
                    &mut cx.program.node_mut(descriptor).data
                {
                    data.file_control = Some(select);
                }
                if let NodeData::FileControlEntry(data) = &mut cx.program.node_mut(select).data {
                    data.file_description = Some(descriptor);
                }
            }
            None => {
                let span = cx.program.span_of(descriptor);
                cx.program.add_diagnostic(Diagnostic::UnresolvedReference {
                    name,
                    span,
                });
            }
        }
    }

    for select in selects {
        let unlinked = matches!(
            cx.program.node(select).data(),
            NodeData::FileControlEntry(data) if data.file_description.is_none()
        );
        if unlinked {
            let (name, span) = match cx.program.node(select).data() {
                NodeData::FileControlEntry(data) => {
                    (data.name.clone(), cx.program.span_of(select))
                }
                _ => continue,
            };
            cx.program
                .add_diagnostic(Diagnostic::UnresolvedReference { name, span });
        }
    }
}
