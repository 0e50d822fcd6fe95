//! Pass 6: sentences and statement skeletons.
//!
//! Statements own their nested statements (IF branches, inline PERFORM
//! bodies, AT END handlers) because the owner lookup finds the nearest
//! registered statement before the sentence. Operands stay empty until
//! the statement pass fills them.

use crate::asg::builder::walk::{first_child, walk_pruned};
use crate::asg::error::BuildError;
use crate::asg::node::{
    AcceptData, ArithmeticData, CallData, ComputeData, ConditionData, DisplayData, ExecData,
    FileListData, GoToData, MoveData, NodeData, NodeId, NodeKind, PerformData, ReadData, SetData,
    StatementData, TargetListData, WriteData,
};
use crate::parser::{SyntaxKind, SyntaxNode};

use super::BuildContext;

pub(crate) fn run(cx: &mut BuildContext, unit: NodeId) -> Result<(), BuildError> {
    let unit_ctx = cx.program.ctx_of(unit);
    let Some(program_unit_ctx) = first_child(&unit_ctx, SyntaxKind::PROGRAM_UNIT) else {
        return Ok(());
    };

    let mut walker = |ctx: &SyntaxNode| -> Result<(), BuildError> {
        if ctx.kind() == SyntaxKind::SENTENCE {
            let owner = cx.find_owner(ctx, &[
                NodeKind::Paragraph,
                NodeKind::ProcedureSection,
                NodeKind::ProcedureDivision,
            ])?;
            cx.program.add_child(owner, ctx, NodeData::Sentence);
            return Ok(());
        }
        let Some(skeleton) = statement_skeleton(ctx.kind()) else {
            return Ok(());
        };
        let owner = cx.find_owner(ctx, &[NodeKind::Statement, NodeKind::Sentence])?;
        cx.program.add_child(owner, ctx, NodeData::Statement(skeleton));
        Ok(())
    };

    for child in program_unit_ctx.children() {
        if child.kind() != SyntaxKind::COMPILATION_UNIT {
            walk_pruned(&child, &mut walker)?;
        }
    }
    Ok(())
}

fn statement_skeleton(kind: SyntaxKind) -> Option<StatementData> {
    let data = match kind {
        SyntaxKind::MOVE_STATEMENT => StatementData::Move(MoveData::default()),
        SyntaxKind::DISPLAY_STATEMENT => StatementData::Display(DisplayData::default()),
        SyntaxKind::ACCEPT_STATEMENT => StatementData::Accept(AcceptData::default()),
        SyntaxKind::ADD_STATEMENT => StatementData::Add(ArithmeticData::default()),
        SyntaxKind::SUBTRACT_STATEMENT => StatementData::Subtract(ArithmeticData::default()),
        SyntaxKind::MULTIPLY_STATEMENT => StatementData::Multiply(ArithmeticData::default()),
        SyntaxKind::DIVIDE_STATEMENT => StatementData::Divide(ArithmeticData::default()),
        SyntaxKind::COMPUTE_STATEMENT => StatementData::Compute(ComputeData::default()),
        SyntaxKind::IF_STATEMENT => StatementData::If(ConditionData::default()),
        SyntaxKind::PERFORM_STATEMENT => StatementData::Perform(PerformData::default()),
        SyntaxKind::GO_TO_STATEMENT => StatementData::GoTo(GoToData::default()),
        SyntaxKind::CALL_STATEMENT => StatementData::Call(CallData::default()),
        SyntaxKind::STOP_STATEMENT => StatementData::Stop,
        SyntaxKind::EXIT_STATEMENT => StatementData::Exit,
        SyntaxKind::CONTINUE_STATEMENT => StatementData::Continue,
        SyntaxKind::OPEN_STATEMENT => StatementData::Open(FileListData::default()),
        SyntaxKind::CLOSE_STATEMENT => StatementData::Close(FileListData::default()),
        SyntaxKind::READ_STATEMENT => StatementData::Read(ReadData::default()),
        SyntaxKind::WRITE_STATEMENT => StatementData::Write(WriteData::default()),
        SyntaxKind::SET_STATEMENT => StatementData::Set(SetData::default()),
        SyntaxKind::INITIALIZE_STATEMENT => StatementData::Initialize(TargetListData::default()),
        SyntaxKind::EXEC_STATEMENT => StatementData::Exec(ExecData::default()),
        _ => return None,
    };
    Some(data)
}
