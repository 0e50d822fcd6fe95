//! Pass orchestration.
//!
//! Builds one [`Program`] from a parse tree: a compilation-unit collector
//! followed by a fixed, strictly ordered sequence of passes over each
//! unit. Later passes may reference artifacts created by earlier ones;
//! no pass rewrites a field an earlier pass has set.

mod data_entries;
mod data_links;
mod file_control;
mod file_description;
mod procedure_skeleton;
mod program_skeleton;
mod statement_fill;
pub(crate) mod walk;

use std::path::Path;

use rowan::GreenNode;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::parser::{SyntaxKind, SyntaxNode};

use super::Program;
use super::error::BuildError;
use super::node::{CompilationUnitData, NodeData, NodeId, NodeKind};
use super::resolve::UnitIndex;

type PassFn = fn(&mut BuildContext, NodeId) -> Result<(), BuildError>;

/// The ordered pass sequence. Each entry is a full tree walk over one
/// compilation unit.
const PASSES: &[(&str, PassFn)] = &[
    ("program-skeleton", program_skeleton::run),
    ("data-entries", data_entries::run),
    ("data-links", data_links::run),
    ("file-control", file_control::run),
    ("file-description", file_description::run),
    ("procedure-skeleton", procedure_skeleton::run),
    ("statement-fill", statement_fill::run),
];

/// Shared state of one build: the growing program plus the per-unit
/// symbol indexes built once the data passes complete.
pub(crate) struct BuildContext {
    pub(crate) program: Program,
    pub(crate) indexes: FxHashMap<NodeId, UnitIndex>,
}

impl BuildContext {
    /// The `find_owner` protocol: nearest registered ancestor of `ctx`
    /// whose node kind is in `kinds`. A miss is a structural error.
    pub(crate) fn find_owner(
        &self,
        ctx: &SyntaxNode,
        kinds: &[NodeKind],
    ) -> Result<NodeId, BuildError> {
        self.program
            .registry()
            .owner_of(ctx, |id| kinds.contains(&self.program.node(id).kind()))
            .ok_or_else(|| self.unowned(ctx))
    }

    pub(crate) fn unowned(&self, ctx: &SyntaxNode) -> BuildError {
        BuildError::UnownedContext {
            context: Program::context_name(ctx.kind()),
            pos: self.program.source_pos(ctx.text_range().start()),
        }
    }

    /// The nearest enclosing compilation unit of `unit`, if any.
    pub(crate) fn enclosing_unit(&self, unit: NodeId) -> Option<NodeId> {
        let mut current = self.program.node(unit).parent();
        while let Some(id) = current {
            if self.program.node(id).kind() == NodeKind::CompilationUnit {
                return Some(id);
            }
            current = self.program.node(id).parent();
        }
        None
    }
}

/// Build the ASG for a parse tree.
pub(crate) fn build_program(
    file: Option<&Path>,
    text: String,
    green: GreenNode,
) -> Result<Program, BuildError> {
    let program = Program::new(file, text, green);
    let mut cx = BuildContext {
        program,
        indexes: FxHashMap::default(),
    };

    collect_units(&mut cx)?;

    for unit in cx.program.units().to_vec() {
        for (name, pass) in PASSES {
            pass(&mut cx, unit)?;
            debug!(pass = name, unit = unit.raw(), "pass complete");
        }
    }

    cx.program.registry_mut().freeze();
    Ok(cx.program)
}

/// Allocate one CompilationUnit node per PROGRAM-ID, walking top-down so
/// nested units land under their containing unit.
fn collect_units(cx: &mut BuildContext) -> Result<(), BuildError> {
    let root_syntax = cx.program.root_syntax();
    let units: Vec<SyntaxNode> = root_syntax
        .descendants()
        .filter(|node| node.kind() == SyntaxKind::COMPILATION_UNIT)
        .collect();

    for ctx in units {
        let owner = cx
            .program
            .registry()
            .owner_of(&ctx, |id| {
                cx.program.node(id).kind() == NodeKind::CompilationUnit
            })
            .unwrap_or(cx.program.root());
        let name = unit_name(&ctx).unwrap_or_else(|| SmolStr::new("Unnamed"));
        let id = cx.program.add_child(
            owner,
            &ctx,
            NodeData::CompilationUnit(CompilationUnitData { name }),
        );
        cx.program.push_unit(id);
    }
    Ok(())
}

/// The PROGRAM-ID, normalized the way unit names are reported: first
/// letter upper-case, the rest lower-case (`HELLO` -> `Hello`).
fn unit_name(unit_ctx: &SyntaxNode) -> Option<SmolStr> {
    let program_unit = walk::first_child(unit_ctx, SyntaxKind::PROGRAM_UNIT)?;
    let id_division = walk::first_child(&program_unit, SyntaxKind::IDENTIFICATION_DIVISION)?;
    let program_id = walk::first_child(&id_division, SyntaxKind::PROGRAM_ID_PARAGRAPH)?;
    let token = walk::direct_tokens(&program_id)
        .into_iter()
        .find(|token| matches!(token.kind(), SyntaxKind::WORD | SyntaxKind::STRING))?;
    let raw = token.text().trim_matches(['\'', '"']);
    Some(capitalize(raw))
}

fn capitalize(name: &str) -> SmolStr {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }
    out.extend(chars.flat_map(char::to_lowercase));
    SmolStr::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_normalizes_case() {
        assert_eq!(capitalize("HELLO"), "Hello");
        assert_eq!(capitalize("payRoll"), "Payroll");
        assert_eq!(capitalize("X"), "X");
    }
}
