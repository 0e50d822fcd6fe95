//! Pass 2: data description entries and their clauses.
//!
//! Entries nest by level-number comparison with a stack machine: on an
//! entry with level L, pop while the stack top's level >= L, then parent
//! under the stack top (or the containing section/descriptor) and push.
//! Level 66 attaches to the current record, 88 to the nearest preceding
//! entry, 01 and 77 reset the stack.

use smol_str::SmolStr;

use crate::asg::builder::walk::{
    children_of_kind, direct_tokens, first_child, first_token, has_token, symbol_ref, walk_pruned,
};
use crate::asg::error::BuildError;
use crate::asg::node::{
    ContainsClauseData, DataDescriptionEntryData, DataEntryKind, NodeData, NodeId, NodeKind,
    OccursClauseData, PictureClauseData, RedefinesClauseData, RenamesClauseData, SignClauseData,
    UsageClauseData, ValueClauseData, ValueRange,
};
use crate::asg::reference::RefKind;
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode};

use super::BuildContext;

const CONTAINERS: &[NodeKind] = &[
    NodeKind::FileDescriptionEntry,
    NodeKind::FileSection,
    NodeKind::WorkingStorageSection,
    NodeKind::LocalStorageSection,
    NodeKind::LinkageSection,
];

pub(crate) fn run(cx: &mut BuildContext, unit: NodeId) -> Result<(), BuildError> {
    let unit_ctx = cx.program.ctx_of(unit);
    let Some(program_unit_ctx) = first_child(&unit_ctx, SyntaxKind::PROGRAM_UNIT) else {
        return Ok(());
    };

    // (level, node) pairs of the open record path; container the stack
    // is rooted in.
    let mut stack: Vec<(u8, NodeId)> = Vec::new();
    let mut current_container: Option<NodeId> = None;

    let mut walker = |ctx: &SyntaxNode| -> Result<(), BuildError> {
        if ctx.kind() != SyntaxKind::DATA_DESCRIPTION_ENTRY {
            return Ok(());
        }
        let container = cx.find_owner(ctx, CONTAINERS)?;
        if current_container != Some(container) {
            stack.clear();
            current_container = Some(container);
        }

        let level = entry_level(ctx);
        let owner = match level {
            66 => stack.first().map(|&(_, id)| id).unwrap_or(container),
            88 => stack.last().map(|&(_, id)| id).unwrap_or(container),
            1 | 77 => {
                stack.clear();
                container
            }
            _ => {
                while stack.last().is_some_and(|&(top, _)| top >= level) {
                    stack.pop();
                }
                stack.last().map(|&(_, id)| id).unwrap_or(container)
            }
        };

        let entry = cx.program.add_child(owner, ctx, entry_data(ctx, level));
        if !matches!(level, 66 | 88) {
            stack.push((level, entry));
        }
        add_clauses(cx, entry, ctx);
        Ok(())
    };

    for child in program_unit_ctx.children() {
        if child.kind() != SyntaxKind::COMPILATION_UNIT {
            walk_pruned(&child, &mut walker)?;
        }
    }
    Ok(())
}

fn entry_level(ctx: &SyntaxNode) -> u8 {
    first_token(ctx, SyntaxKind::INTEGER)
        .and_then(|token| token.text().parse().ok())
        .unwrap_or(1)
}

fn entry_data(ctx: &SyntaxNode, level: u8) -> NodeData {
    let name = direct_tokens(ctx)
        .into_iter()
        .find(|token| token.kind() == SyntaxKind::WORD)
        .map(|token| SmolStr::new(token.text()));
    let kind = match level {
        66 => DataEntryKind::Renames,
        88 => DataEntryKind::Condition,
        _ => DataEntryKind::Item,
    };
    let global = first_child(ctx, SyntaxKind::GLOBAL_CLAUSE).is_some();
    let external = first_child(ctx, SyntaxKind::EXTERNAL_CLAUSE).is_some();
    NodeData::DataDescriptionEntry(DataDescriptionEntryData {
        level,
        name,
        kind,
        global,
        external,
        condition_subject: None,
    })
}

/// Create one clause node per clause context under `entry`.
fn add_clauses(cx: &mut BuildContext, entry: NodeId, entry_ctx: &SyntaxNode) {
    for clause in entry_ctx.children() {
        let data = match clause.kind() {
            SyntaxKind::PICTURE_CLAUSE => NodeData::PictureClause(PictureClauseData {
                picture: picture_string(&clause),
            }),
            SyntaxKind::USAGE_CLAUSE => NodeData::UsageClause(UsageClauseData {
                usage: direct_tokens(&clause)
                    .last()
                    .map(|token| SmolStr::new(token.text()))
                    .unwrap_or_default(),
            }),
            SyntaxKind::VALUE_CLAUSE => NodeData::ValueClause(ValueClauseData {
                values: value_ranges(&clause),
            }),
            SyntaxKind::REDEFINES_CLAUSE => {
                let Some(target) = first_child(&clause, SyntaxKind::NAME_REF) else {
                    continue;
                };
                NodeData::RedefinesClause(RedefinesClauseData {
                    target: symbol_ref(&cx.program, &target, RefKind::Data),
                })
            }
            SyntaxKind::RENAMES_CLAUSE => {
                let refs = children_of_kind(&clause, SyntaxKind::NAME_REF);
                let Some(from) = refs.first() else { continue };
                NodeData::RenamesClause(RenamesClauseData {
                    from: symbol_ref(&cx.program, from, RefKind::Data),
                    thru: refs
                        .get(1)
                        .map(|ctx| symbol_ref(&cx.program, ctx, RefKind::Data)),
                })
            }
            SyntaxKind::OCCURS_CLAUSE => NodeData::OccursClause(occurs_data(cx, &clause)),
            SyntaxKind::SIGN_CLAUSE => NodeData::SignClause(SignClauseData {
                leading: has_token(&clause, SyntaxKind::LEADING_KW),
                separate: has_token(&clause, SyntaxKind::SEPARATE_KW),
            }),
            SyntaxKind::JUSTIFIED_CLAUSE => NodeData::JustifiedClause,
            SyntaxKind::BLANK_WHEN_ZERO_CLAUSE => NodeData::BlankWhenZeroClause,
            SyntaxKind::SYNCHRONIZED_CLAUSE => NodeData::SynchronizedClause,
            SyntaxKind::GLOBAL_CLAUSE => NodeData::GlobalClause,
            SyntaxKind::EXTERNAL_CLAUSE => NodeData::ExternalClause,
            _ => continue,
        };
        cx.program.add_child(entry, &clause, data);
    }
}

/// The picture character-string: the clause tokens minus the
/// PIC/PICTURE/IS introducers, concatenated without spacing.
fn picture_string(clause: &SyntaxNode) -> SmolStr {
    let mut out = String::new();
    for token in direct_tokens(clause) {
        if matches!(
            token.kind(),
            SyntaxKind::PIC_KW | SyntaxKind::PICTURE_KW | SyntaxKind::IS_KW
        ) {
            continue;
        }
        out.push_str(token.text());
    }
    SmolStr::new(out)
}

/// `VALUE lit [THRU lit] [, lit ...]` into ranges.
fn value_ranges(clause: &SyntaxNode) -> Vec<ValueRange> {
    let mut ranges: Vec<ValueRange> = Vec::new();
    let mut thru_pending = false;
    for element in clause.children_with_tokens() {
        match element {
            SyntaxElement::Token(token)
                if matches!(token.kind(), SyntaxKind::THRU_KW | SyntaxKind::THROUGH_KW) =>
            {
                thru_pending = true;
            }
            SyntaxElement::Node(node) if node.kind() == SyntaxKind::LITERAL => {
                let text = SmolStr::new(node.text().to_string().trim());
                if thru_pending {
                    if let Some(last) = ranges.last_mut() {
                        last.thru = Some(text);
                    }
                    thru_pending = false;
                } else {
                    ranges.push(ValueRange {
                        from: text,
                        thru: None,
                    });
                }
            }
            _ => {}
        }
    }
    ranges
}

fn occurs_data(cx: &BuildContext, clause: &SyntaxNode) -> OccursClauseData {
    let mut integers = direct_tokens(clause)
        .into_iter()
        .filter(|token| token.kind() == SyntaxKind::INTEGER)
        .filter_map(|token| token.text().parse::<u32>().ok());
    let min = integers.next().unwrap_or(1);
    let max = has_token(clause, SyntaxKind::TO_KW).then(|| integers.next()).flatten();

    // The DEPENDING ON object is the first NAME_REF after DEPENDING; the
    // sort-key references before it are not captured here.
    let mut depending_on = None;
    let mut seen_depending = false;
    let mut indexed_by = Vec::new();
    let mut seen_indexed = false;
    for element in clause.children_with_tokens() {
        match element {
            SyntaxElement::Token(token) => match token.kind() {
                SyntaxKind::DEPENDING_KW => seen_depending = true,
                SyntaxKind::INDEXED_KW => seen_indexed = true,
                SyntaxKind::WORD if seen_indexed => {
                    indexed_by.push(SmolStr::new(token.text()));
                }
                _ => {}
            },
            SyntaxElement::Node(node) => {
                if node.kind() == SyntaxKind::NAME_REF && seen_depending && depending_on.is_none() {
                    depending_on = Some(symbol_ref(&cx.program, &node, RefKind::Data));
                }
            }
        }
    }

    OccursClauseData {
        min,
        max,
        depending_on,
        indexed_by,
    }
}

/// FD-level BLOCK/RECORD CONTAINS parsing shared with the
/// file-description pass.
pub(crate) fn contains_data(clause: &SyntaxNode) -> ContainsClauseData {
    let mut integers = direct_tokens(clause)
        .into_iter()
        .filter(|token| token.kind() == SyntaxKind::INTEGER)
        .filter_map(|token| token.text().parse::<u32>().ok());
    let min = integers.next().unwrap_or(0);
    let max = integers.next();
    ContainsClauseData { min, max }
}
