//! Pass 1: program units, divisions, and their top-level skeleton.
//!
//! Creates the ProgramUnit, the four divisions, environment paragraphs
//! and file-control entries, data sections and file descriptors, and
//! procedure sections/paragraphs. Every later pass navigates this
//! skeleton through the registry.

use smol_str::SmolStr;

use crate::asg::builder::walk::{
    collapsed_text, direct_tokens, first_child, has_token, name_token, walk_pruned,
};
use crate::asg::error::BuildError;
use crate::asg::node::{
    FileControlEntryData, FileDescriptionEntryData, FileDescriptorKind,
    IdentificationDivisionData, IdentificationParagraphData, MnemonicEntryData, NodeData, NodeId,
    NodeKind, ParagraphData, ProcedureDivisionData, ProcedureSectionData, SourceComputerData,
};
use crate::parser::{SyntaxKind, SyntaxNode};

use super::BuildContext;

pub(crate) fn run(cx: &mut BuildContext, unit: NodeId) -> Result<(), BuildError> {
    let unit_ctx = cx.program.ctx_of(unit);
    let Some(program_unit_ctx) = first_child(&unit_ctx, SyntaxKind::PROGRAM_UNIT) else {
        return Err(cx.unowned(&unit_ctx));
    };
    let program_unit = cx
        .program
        .add_child(unit, &program_unit_ctx, NodeData::ProgramUnit);

    let mut walker = |ctx: &SyntaxNode| -> Result<(), BuildError> {
        match ctx.kind() {
            SyntaxKind::IDENTIFICATION_DIVISION => {
                let program_name = program_name(ctx).unwrap_or_default();
                cx.program.add_child(
                    program_unit,
                    ctx,
                    NodeData::IdentificationDivision(IdentificationDivisionData { program_name }),
                );
            }
            SyntaxKind::IDENTIFICATION_PARAGRAPH => {
                let owner = cx.find_owner(ctx, &[NodeKind::IdentificationDivision])?;
                let keyword = direct_tokens(ctx)
                    .first()
                    .map(|token| SmolStr::new(token.text()))
                    .unwrap_or_default();
                cx.program.add_child(
                    owner,
                    ctx,
                    NodeData::IdentificationParagraph(IdentificationParagraphData {
                        keyword,
                        text: collapsed_text(ctx),
                    }),
                );
            }
            SyntaxKind::ENVIRONMENT_DIVISION => {
                cx.program
                    .add_child(program_unit, ctx, NodeData::EnvironmentDivision);
            }
            SyntaxKind::CONFIGURATION_SECTION => {
                let owner = cx.find_owner(ctx, &[NodeKind::EnvironmentDivision])?;
                cx.program.add_child(owner, ctx, NodeData::ConfigurationSection);
            }
            SyntaxKind::SOURCE_COMPUTER_PARAGRAPH => {
                let owner = cx.find_owner(ctx, &[NodeKind::ConfigurationSection])?;
                let debugging_mode = has_token(ctx, SyntaxKind::DEBUGGING_KW);
                cx.program.add_child(
                    owner,
                    ctx,
                    NodeData::SourceComputerParagraph(SourceComputerData { debugging_mode }),
                );
            }
            SyntaxKind::OBJECT_COMPUTER_PARAGRAPH => {
                let owner = cx.find_owner(ctx, &[NodeKind::ConfigurationSection])?;
                cx.program
                    .add_child(owner, ctx, NodeData::ObjectComputerParagraph);
            }
            SyntaxKind::SPECIAL_NAMES_PARAGRAPH => {
                let owner = cx.find_owner(ctx, &[NodeKind::ConfigurationSection])?;
                cx.program
                    .add_child(owner, ctx, NodeData::SpecialNamesParagraph);
            }
            SyntaxKind::MNEMONIC_ENTRY => {
                let owner = cx.find_owner(ctx, &[NodeKind::SpecialNamesParagraph])?;
                let tokens = direct_tokens(ctx);
                let environment = tokens
                    .first()
                    .map(|token| SmolStr::new(token.text()))
                    .unwrap_or_default();
                let mnemonic = tokens
                    .last()
                    .map(|token| SmolStr::new(token.text()))
                    .unwrap_or_default();
                cx.program.add_child(
                    owner,
                    ctx,
                    NodeData::MnemonicEntry(MnemonicEntryData {
                        environment,
                        mnemonic,
                    }),
                );
            }
            SyntaxKind::INPUT_OUTPUT_SECTION => {
                let owner = cx.find_owner(ctx, &[NodeKind::EnvironmentDivision])?;
                cx.program.add_child(owner, ctx, NodeData::InputOutputSection);
            }
            SyntaxKind::FILE_CONTROL_PARAGRAPH => {
                let owner = cx.find_owner(ctx, &[NodeKind::InputOutputSection])?;
                cx.program
                    .add_child(owner, ctx, NodeData::FileControlParagraph);
            }
            SyntaxKind::FILE_CONTROL_ENTRY => {
                let owner = cx.find_owner(ctx, &[NodeKind::FileControlParagraph])?;
                let name = name_token(ctx)
                    .map(|token| SmolStr::new(token.text()))
                    .unwrap_or_default();
                let optional = has_token(ctx, SyntaxKind::OPTIONAL_KW);
                cx.program.add_child(
                    owner,
                    ctx,
                    NodeData::FileControlEntry(FileControlEntryData {
                        name,
                        optional,
                        file_description: None,
                    }),
                );
            }
            SyntaxKind::DATA_DIVISION => {
                cx.program.add_child(program_unit, ctx, NodeData::DataDivision);
            }
            SyntaxKind::FILE_SECTION => {
                let owner = cx.find_owner(ctx, &[NodeKind::DataDivision])?;
                cx.program.add_child(owner, ctx, NodeData::FileSection);
            }
            SyntaxKind::WORKING_STORAGE_SECTION => {
                let owner = cx.find_owner(ctx, &[NodeKind::DataDivision])?;
                cx.program
                    .add_child(owner, ctx, NodeData::WorkingStorageSection);
            }
            SyntaxKind::LOCAL_STORAGE_SECTION => {
                let owner = cx.find_owner(ctx, &[NodeKind::DataDivision])?;
                cx.program
                    .add_child(owner, ctx, NodeData::LocalStorageSection);
            }
            SyntaxKind::LINKAGE_SECTION => {
                let owner = cx.find_owner(ctx, &[NodeKind::DataDivision])?;
                cx.program.add_child(owner, ctx, NodeData::LinkageSection);
            }
            SyntaxKind::FILE_DESCRIPTION_ENTRY => {
                let owner = cx.find_owner(ctx, &[NodeKind::FileSection])?;
                let name = name_token(ctx)
                    .map(|token| SmolStr::new(token.text()))
                    .unwrap_or_default();
                let kind = if has_token(ctx, SyntaxKind::SD_KW) {
                    FileDescriptorKind::Sd
                } else {
                    FileDescriptorKind::Fd
                };
                cx.program.add_child(
                    owner,
                    ctx,
                    NodeData::FileDescriptionEntry(FileDescriptionEntryData {
                        name,
                        kind,
                        file_control: None,
                    }),
                );
            }
            SyntaxKind::PROCEDURE_DIVISION => {
                cx.program.add_child(
                    program_unit,
                    ctx,
                    NodeData::ProcedureDivision(ProcedureDivisionData { using: Vec::new() }),
                );
            }
            SyntaxKind::PROCEDURE_SECTION => {
                let owner = cx.find_owner(ctx, &[NodeKind::ProcedureDivision])?;
                let name = name_token(ctx)
                    .map(|token| SmolStr::new(token.text()))
                    .unwrap_or_default();
                cx.program.add_child(
                    owner,
                    ctx,
                    NodeData::ProcedureSection(ProcedureSectionData { name }),
                );
            }
            SyntaxKind::PARAGRAPH => {
                let owner =
                    cx.find_owner(ctx, &[NodeKind::ProcedureSection, NodeKind::ProcedureDivision])?;
                let name = name_token(ctx)
                    .map(|token| SmolStr::new(token.text()))
                    .unwrap_or_default();
                cx.program
                    .add_child(owner, ctx, NodeData::Paragraph(ParagraphData { name }));
            }
            _ => {}
        }
        Ok(())
    };

    for child in program_unit_ctx.children() {
        if child.kind() != SyntaxKind::COMPILATION_UNIT {
            walk_pruned(&child, &mut walker)?;
        }
    }
    Ok(())
}

/// The PROGRAM-ID name as written.
fn program_name(id_division_ctx: &SyntaxNode) -> Option<SmolStr> {
    let paragraph = first_child(id_division_ctx, SyntaxKind::PROGRAM_ID_PARAGRAPH)?;
    direct_tokens(&paragraph)
        .into_iter()
        .find(|token| matches!(token.kind(), SyntaxKind::WORD | SyntaxKind::STRING))
        .map(|token| SmolStr::new(token.text().trim_matches(['\'', '"'])))
}
