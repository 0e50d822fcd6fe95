//! Pass 4: SELECT clauses.
//!
//! Attaches ASSIGN/ORGANIZATION/ACCESS MODE/KEY/STATUS clause nodes to
//! the file-control entries created by the skeleton pass. Data-name
//! operands (record keys, file status) resolve immediately; the data
//! passes have already run.

use smol_str::SmolStr;

use crate::asg::builder::walk::{direct_tokens, first_child, symbol_ref, walk_pruned};
use crate::asg::error::BuildError;
use crate::asg::node::{
    AccessModeClauseData, AssignClauseData, KeyClauseData, NodeData, NodeId, NodeKind,
    OrganizationClauseData,
};
use crate::asg::reference::RefKind;
use crate::asg::resolve::Resolver;
use crate::parser::{SyntaxKind, SyntaxNode};

use super::BuildContext;

pub(crate) fn run(cx: &mut BuildContext, unit: NodeId) -> Result<(), BuildError> {
    let unit_ctx = cx.program.ctx_of(unit);
    let Some(program_unit_ctx) = first_child(&unit_ctx, SyntaxKind::PROGRAM_UNIT) else {
        return Ok(());
    };

    let mut walker = |ctx: &SyntaxNode| -> Result<(), BuildError> {
        let data = match ctx.kind() {
            SyntaxKind::ASSIGN_CLAUSE => {
                let target = direct_tokens(ctx)
                    .into_iter()
                    .find(|token| {
                        matches!(token.kind(), SyntaxKind::WORD | SyntaxKind::STRING)
                    })
                    .map(|token| SmolStr::new(token.text()))
                    .unwrap_or_default();
                NodeData::AssignClause(AssignClauseData { target })
            }
            SyntaxKind::ORGANIZATION_CLAUSE => {
                let organization = direct_tokens(ctx)
                    .into_iter()
                    .filter(|token| {
                        !matches!(
                            token.kind(),
                            SyntaxKind::ORGANIZATION_KW | SyntaxKind::IS_KW
                        )
                    })
                    .map(|token| token.text().to_ascii_uppercase())
                    .collect::<Vec<_>>()
                    .join(" ");
                NodeData::OrganizationClause(OrganizationClauseData {
                    organization: SmolStr::new(organization),
                })
            }
            SyntaxKind::ACCESS_MODE_CLAUSE => {
                let mode = direct_tokens(ctx)
                    .last()
                    .map(|token| SmolStr::new(token.text().to_ascii_uppercase()))
                    .unwrap_or_default();
                NodeData::AccessModeClause(AccessModeClauseData { mode })
            }
            SyntaxKind::RECORD_KEY_CLAUSE
            | SyntaxKind::ALTERNATE_KEY_CLAUSE
            | SyntaxKind::RELATIVE_KEY_CLAUSE
            | SyntaxKind::FILE_STATUS_CLAUSE => {
                let Some(name_ctx) = first_child(ctx, SyntaxKind::NAME_REF) else {
                    return Ok(());
                };
                let mut symbol = symbol_ref(&cx.program, &name_ctx, RefKind::Data);
                let resolver = Resolver::new(vec![&cx.indexes[&unit]]);
                let diagnostic = resolver.apply(&mut symbol, None);
                if let Some(diagnostic) = diagnostic {
                    cx.program.add_diagnostic(diagnostic);
                }
                let data = KeyClauseData { name: symbol };
                match ctx.kind() {
                    SyntaxKind::RECORD_KEY_CLAUSE => NodeData::RecordKeyClause(data),
                    SyntaxKind::ALTERNATE_KEY_CLAUSE => NodeData::AlternateKeyClause(data),
                    SyntaxKind::RELATIVE_KEY_CLAUSE => NodeData::RelativeKeyClause(data),
                    _ => NodeData::FileStatusClause(data),
                }
            }
            _ => return Ok(()),
        };
        let owner = cx.find_owner(ctx, &[NodeKind::FileControlEntry])?;
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
