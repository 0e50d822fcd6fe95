//! Pass 7: statement operands and reference resolution.
//!
//! Walks every statement skeleton, extracts its operands from the parse
//! tree, and resolves each data-name, procedure-name, file-name, and
//! mnemonic reference against the artifacts of the earlier passes. A
//! lookup miss becomes an unresolved placeholder plus a diagnostic; it
//! never aborts the build.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::asg::Program;
use crate::asg::builder::walk::{
    children_of_kind, direct_tokens, first_child, operand, symbol_ref, segment_operands,
};
use crate::asg::error::BuildError;
use crate::asg::node::{
    AcceptData, ArithmeticData, CallData, ComputeData, ConditionData, DisplayData, ExecData,
    FileListData, GoToData, MoveData, NodeData, NodeId, NodeKind, PerformData, ProcedureRange,
    ReadData, SetData, StatementData, TargetListData, WriteData,
};
use crate::asg::reference::{Operand, RefKind, SymbolRef};
use crate::asg::resolve::{Resolver, UnitIndex};
use crate::parser::{SyntaxKind, SyntaxNode};

use super::BuildContext;

/// ACCEPT FROM sources that are registers, not user mnemonics.
const SPECIAL_REGISTERS: &[&str] = &["DATE", "DAY", "TIME", "DAY-OF-WEEK"];

pub(crate) fn run(cx: &mut BuildContext, unit: NodeId) -> Result<(), BuildError> {
    fill_division_using(cx, unit);

    let statements: Vec<NodeId> = cx
        .program
        .descendants(unit)
        .into_iter()
        .filter(|&id| cx.program.node(id).kind() == NodeKind::Statement)
        .collect();

    for statement in statements {
        let ctx = cx.program.ctx_of(statement);
        let Some(mut data) = extract(&cx.program, &ctx) else {
            continue;
        };
        let section = enclosing_proc_section(&cx.program, statement);
        let chain = resolver_chain(&cx.program, &cx.indexes, unit);
        let resolver = Resolver::new(chain);
        let mut diagnostics = Vec::new();
        visit_refs(&mut data, &mut |symbol: &mut SymbolRef| {
            if symbol.kind == RefKind::Mnemonic && is_special_register(&symbol.name) {
                return;
            }
            if let Some(diagnostic) = resolver.apply(symbol, section) {
                diagnostics.push(diagnostic);
            }
        });
        cx.program.node_mut(statement).data = NodeData::Statement(data);
        for diagnostic in diagnostics {
            cx.program.add_diagnostic(diagnostic);
        }
    }
    Ok(())
}

fn is_special_register(name: &str) -> bool {
    SPECIAL_REGISTERS
        .iter()
        .any(|register| register.eq_ignore_ascii_case(name))
}

/// The resolver scope chain: the unit itself, then enclosing units
/// (whose indexes exist already; units are processed outside-in).
fn resolver_chain<'a>(
    program: &Program,
    indexes: &'a FxHashMap<NodeId, UnitIndex>,
    unit: NodeId,
) -> Vec<&'a UnitIndex> {
    let mut chain = Vec::new();
    let mut current = Some(unit);
    while let Some(id) = current {
        if let Some(index) = indexes.get(&id) {
            chain.push(index);
        }
        current = enclosing_unit(program, id);
    }
    chain
}

fn enclosing_unit(program: &Program, unit: NodeId) -> Option<NodeId> {
    let mut current = program.node(unit).parent();
    while let Some(id) = current {
        if program.node(id).kind() == NodeKind::CompilationUnit {
            return Some(id);
        }
        current = program.node(id).parent();
    }
    None
}

fn enclosing_proc_section(program: &Program, statement: NodeId) -> Option<NodeId> {
    let mut current = program.node(statement).parent();
    while let Some(id) = current {
        match program.node(id).kind() {
            NodeKind::ProcedureSection => return Some(id),
            NodeKind::ProcedureDivision => return None,
            _ => current = program.node(id).parent(),
        }
    }
    None
}

/// `PROCEDURE DIVISION USING` parameters resolve as data names.
fn fill_division_using(cx: &mut BuildContext, unit: NodeId) {
    let Some(division) = cx
        .program
        .descendants(unit)
        .into_iter()
        .find(|&id| cx.program.node(id).kind() == NodeKind::ProcedureDivision)
    else {
        return;
    };
    let ctx = cx.program.ctx_of(division);
    let Some(using_ctx) = first_child(&ctx, SyntaxKind::USING_PHRASE) else {
        return;
    };

    let mut using = Vec::new();
    let mut diagnostics = Vec::new();
    {
        let resolver = Resolver::new(resolver_chain(&cx.program, &cx.indexes, unit));
        for name_ctx in children_of_kind(&using_ctx, SyntaxKind::NAME_REF) {
            let mut symbol = symbol_ref(&cx.program, &name_ctx, RefKind::Data);
            if let Some(diagnostic) = resolver.apply(&mut symbol, None) {
                diagnostics.push(diagnostic);
            }
            using.push(symbol);
        }
    }
    if let NodeData::ProcedureDivision(data) = &mut cx.program.node_mut(division).data {
        data.using = using;
    }
    for diagnostic in diagnostics {
        cx.program.add_diagnostic(diagnostic);
    }
}

// ============================================================================
// OPERAND EXTRACTION
// ============================================================================

fn refs(program: &Program, nodes: &[SyntaxNode], kind: RefKind) -> Vec<SymbolRef> {
    nodes
        .iter()
        .filter(|node| node.kind() == SyntaxKind::NAME_REF)
        .map(|node| symbol_ref(program, node, kind))
        .collect()
}

fn first_ref(program: &Program, nodes: &[SyntaxNode], kind: RefKind) -> Option<SymbolRef> {
    nodes
        .iter()
        .find(|node| node.kind() == SyntaxKind::NAME_REF)
        .map(|node| symbol_ref(program, node, kind))
}

fn operands(program: &Program, nodes: &[SyntaxNode]) -> Vec<Operand> {
    nodes.iter().map(|node| operand(program, node, RefKind::Data)).collect()
}

fn extract(program: &Program, ctx: &SyntaxNode) -> Option<StatementData> {
    let data = match ctx.kind() {
        SyntaxKind::MOVE_STATEMENT => {
            let segments = segment_operands(ctx, &[SyntaxKind::TO_KW]);
            StatementData::Move(MoveData {
                source: segments[0]
                    .first()
                    .map(|node| operand(program, node, RefKind::Data)),
                targets: refs(program, &segments[1], RefKind::Data),
            })
        }
        SyntaxKind::DISPLAY_STATEMENT => {
            let segments = segment_operands(ctx, &[SyntaxKind::UPON_KW]);
            StatementData::Display(DisplayData {
                operands: operands(program, &segments[0]),
                upon: first_ref(program, &segments[1], RefKind::Mnemonic),
            })
        }
        SyntaxKind::ACCEPT_STATEMENT => {
            let segments = segment_operands(ctx, &[SyntaxKind::FROM_KW]);
            StatementData::Accept(AcceptData {
                target: first_ref(program, &segments[0], RefKind::Data),
                from: first_ref(program, &segments[1], RefKind::Mnemonic),
            })
        }
        SyntaxKind::ADD_STATEMENT => StatementData::Add(arithmetic(
            program,
            ctx,
            &[SyntaxKind::TO_KW, SyntaxKind::GIVING_KW],
        )),
        SyntaxKind::SUBTRACT_STATEMENT => StatementData::Subtract(arithmetic(
            program,
            ctx,
            &[SyntaxKind::FROM_KW, SyntaxKind::GIVING_KW],
        )),
        SyntaxKind::MULTIPLY_STATEMENT => StatementData::Multiply(arithmetic(
            program,
            ctx,
            &[SyntaxKind::BY_KW, SyntaxKind::GIVING_KW],
        )),
        SyntaxKind::DIVIDE_STATEMENT => {
            let segments =
                segment_operands(ctx, &[SyntaxKind::GIVING_KW, SyntaxKind::REMAINDER_KW]);
            let mut data = ArithmeticData {
                operands: operands(program, &segments[0]),
                targets: Vec::new(),
                giving: refs(program, &segments[1], RefKind::Data),
            };
            data.targets.extend(refs(program, &segments[2], RefKind::Data));
            StatementData::Divide(data)
        }
        SyntaxKind::COMPUTE_STATEMENT => {
            let segments = segment_operands(ctx, &[SyntaxKind::EQ]);
            let expression_operands = first_child(ctx, SyntaxKind::EXPRESSION)
                .map(|expression| {
                    let children: Vec<SyntaxNode> = expression.children().collect();
                    operands(program, &children)
                })
                .unwrap_or_default();
            StatementData::Compute(ComputeData {
                targets: refs(program, &segments[0], RefKind::Data),
                operands: expression_operands,
            })
        }
        SyntaxKind::IF_STATEMENT => {
            let condition_operands = first_child(ctx, SyntaxKind::CONDITION)
                .map(|condition| {
                    let children: Vec<SyntaxNode> = condition.children().collect();
                    operands(program, &children)
                })
                .unwrap_or_default();
            StatementData::If(ConditionData {
                operands: condition_operands,
            })
        }
        SyntaxKind::PERFORM_STATEMENT => StatementData::Perform(perform(program, ctx)),
        SyntaxKind::GO_TO_STATEMENT => {
            let segments = segment_operands(ctx, &[SyntaxKind::DEPENDING_KW]);
            StatementData::GoTo(GoToData {
                targets: refs(program, &segments[0], RefKind::Procedure),
                depending_on: first_ref(program, &segments[1], RefKind::Data),
            })
        }
        SyntaxKind::CALL_STATEMENT => {
            let direct: Vec<SyntaxNode> = ctx.children().collect();
            let target = direct
                .iter()
                .find(|node| {
                    matches!(node.kind(), SyntaxKind::NAME_REF | SyntaxKind::LITERAL)
                })
                .map(|node| operand(program, node, RefKind::Data));
            let using = first_child(ctx, SyntaxKind::USING_PHRASE)
                .map(|phrase| {
                    let children: Vec<SyntaxNode> = phrase.children().collect();
                    operands(program, &children)
                })
                .unwrap_or_default();
            StatementData::Call(CallData { target, using })
        }
        SyntaxKind::STOP_STATEMENT => StatementData::Stop,
        SyntaxKind::EXIT_STATEMENT => StatementData::Exit,
        SyntaxKind::CONTINUE_STATEMENT => StatementData::Continue,
        SyntaxKind::OPEN_STATEMENT => {
            let mut files = Vec::new();
            for phrase in children_of_kind(ctx, SyntaxKind::OPEN_PHRASE) {
                for name_ctx in children_of_kind(&phrase, SyntaxKind::NAME_REF) {
                    files.push(symbol_ref(program, &name_ctx, RefKind::File));
                }
            }
            StatementData::Open(FileListData { files })
        }
        SyntaxKind::CLOSE_STATEMENT => {
            let direct: Vec<SyntaxNode> = ctx.children().collect();
            StatementData::Close(FileListData {
                files: refs(program, &direct, RefKind::File),
            })
        }
        SyntaxKind::READ_STATEMENT => {
            let segments = segment_operands(ctx, &[SyntaxKind::INTO_KW]);
            StatementData::Read(ReadData {
                file: first_ref(program, &segments[0], RefKind::File),
                into: first_ref(program, &segments[1], RefKind::Data),
            })
        }
        SyntaxKind::WRITE_STATEMENT => {
            let segments = segment_operands(ctx, &[SyntaxKind::FROM_KW]);
            StatementData::Write(WriteData {
                record: first_ref(program, &segments[0], RefKind::Data),
                from: first_ref(program, &segments[1], RefKind::Data),
            })
        }
        SyntaxKind::SET_STATEMENT => {
            let segments = segment_operands(
                ctx,
                &[SyntaxKind::TO_KW, SyntaxKind::UP_KW, SyntaxKind::DOWN_KW],
            );
            let value = segments[1..]
                .iter()
                .flatten()
                .next()
                .map(|node| operand(program, node, RefKind::Data));
            StatementData::Set(SetData {
                targets: refs(program, &segments[0], RefKind::Data),
                value,
            })
        }
        SyntaxKind::INITIALIZE_STATEMENT => {
            let direct: Vec<SyntaxNode> = ctx.children().collect();
            StatementData::Initialize(TargetListData {
                targets: refs(program, &direct, RefKind::Data),
            })
        }
        SyntaxKind::EXEC_STATEMENT => StatementData::Exec(exec(program, ctx)),
        _ => return None,
    };
    Some(data)
}

fn arithmetic(program: &Program, ctx: &SyntaxNode, separators: &[SyntaxKind]) -> ArithmeticData {
    let segments = segment_operands(ctx, separators);
    ArithmeticData {
        operands: operands(program, &segments[0]),
        targets: refs(program, &segments[1], RefKind::Data),
        giving: refs(program, &segments[2], RefKind::Data),
    }
}

fn perform(program: &Program, ctx: &SyntaxNode) -> PerformData {
    let target = first_child(ctx, SyntaxKind::PERFORM_TARGET).and_then(|target_ctx| {
        let names = children_of_kind(&target_ctx, SyntaxKind::NAME_REF);
        let from = names
            .first()
            .map(|node| symbol_ref(program, node, RefKind::Procedure))?;
        let thru = names
            .get(1)
            .map(|node| symbol_ref(program, node, RefKind::Procedure));
        Some(ProcedureRange { from, thru })
    });

    let mut perform_operands = Vec::new();
    if let Some(condition) = first_child(ctx, SyntaxKind::CONDITION) {
        let children: Vec<SyntaxNode> = condition.children().collect();
        perform_operands.extend(operands(program, &children));
    }
    if let Some(varying) = first_child(ctx, SyntaxKind::PERFORM_VARYING) {
        let children: Vec<SyntaxNode> = varying
            .children()
            .filter(|node| {
                matches!(node.kind(), SyntaxKind::NAME_REF | SyntaxKind::LITERAL)
            })
            .collect();
        perform_operands.extend(operands(program, &children));
        if let Some(condition) = first_child(&varying, SyntaxKind::CONDITION) {
            let children: Vec<SyntaxNode> = condition.children().collect();
            perform_operands.extend(operands(program, &children));
        }
    }

    PerformData {
        target,
        operands: perform_operands,
    }
}

/// The EXEC language word and the verbatim embedded text between it and
/// END-EXEC.
fn exec(program: &Program, ctx: &SyntaxNode) -> ExecData {
    let tokens = direct_tokens(ctx);
    let language = tokens
        .iter()
        .find(|token| token.kind() == SyntaxKind::WORD)
        .map(|token| SmolStr::new(token.text().to_ascii_uppercase()))
        .unwrap_or_default();
    let language_end = tokens
        .iter()
        .find(|token| token.kind() == SyntaxKind::WORD)
        .map(|token| u32::from(token.text_range().end()) as usize);
    let exec_end = tokens
        .iter()
        .find(|token| token.kind() == SyntaxKind::END_EXEC_KW)
        .map(|token| u32::from(token.text_range().start()) as usize);
    let payload = match (language_end, exec_end) {
        (Some(start), Some(end)) if start <= end => {
            program.text()[start..end].trim().to_string()
        }
        _ => String::new(),
    };
    ExecData { language, payload }
}

// ============================================================================
// REFERENCE VISITOR
// ============================================================================

/// Apply `f` to every [`SymbolRef`] reachable from `data`.
fn visit_refs(data: &mut StatementData, f: &mut dyn FnMut(&mut SymbolRef)) {
    let visit_operand = |operand: &mut Operand, f: &mut dyn FnMut(&mut SymbolRef)| {
        if let Operand::DataRef(symbol) = operand {
            f(symbol);
        }
    };
    match data {
        StatementData::Move(data) => {
            if let Some(source) = &mut data.source {
                visit_operand(source, f);
            }
            data.targets.iter_mut().for_each(|symbol| f(symbol));
        }
        StatementData::Display(data) => {
            data.operands
                .iter_mut()
                .for_each(|operand| visit_operand(operand, f));
            if let Some(upon) = &mut data.upon {
                f(upon);
            }
        }
        StatementData::Accept(data) => {
            if let Some(target) = &mut data.target {
                f(target);
            }
            if let Some(from) = &mut data.from {
                f(from);
            }
        }
        StatementData::Add(data)
        | StatementData::Subtract(data)
        | StatementData::Multiply(data)
        | StatementData::Divide(data) => {
            data.operands
                .iter_mut()
                .for_each(|operand| visit_operand(operand, f));
            data.targets.iter_mut().for_each(|symbol| f(symbol));
            data.giving.iter_mut().for_each(|symbol| f(symbol));
        }
        StatementData::Compute(data) => {
            data.targets.iter_mut().for_each(|symbol| f(symbol));
            data.operands
                .iter_mut()
                .for_each(|operand| visit_operand(operand, f));
        }
        StatementData::If(data) => {
            data.operands
                .iter_mut()
                .for_each(|operand| visit_operand(operand, f));
        }
        StatementData::Perform(data) => {
            if let Some(range) = &mut data.target {
                f(&mut range.from);
                if let Some(thru) = &mut range.thru {
                    f(thru);
                }
            }
            data.operands
                .iter_mut()
                .for_each(|operand| visit_operand(operand, f));
        }
        StatementData::GoTo(data) => {
            data.targets.iter_mut().for_each(|symbol| f(symbol));
            if let Some(depending) = &mut data.depending_on {
                f(depending);
            }
        }
        StatementData::Call(data) => {
            if let Some(target) = &mut data.target {
                visit_operand(target, f);
            }
            data.using
                .iter_mut()
                .for_each(|operand| visit_operand(operand, f));
        }
        StatementData::Stop | StatementData::Exit | StatementData::Continue => {}
        StatementData::Open(data) | StatementData::Close(data) => {
            data.files.iter_mut().for_each(|symbol| f(symbol));
        }
        StatementData::Read(data) => {
            if let Some(file) = &mut data.file {
                f(file);
            }
            if let Some(into) = &mut data.into {
                f(into);
            }
        }
        StatementData::Write(data) => {
            if let Some(record) = &mut data.record {
                f(record);
            }
            if let Some(from) = &mut data.from {
                f(from);
            }
        }
        StatementData::Set(data) => {
            data.targets.iter_mut().for_each(|symbol| f(symbol));
            if let Some(value) = &mut data.value {
                visit_operand(value, f);
            }
        }
        StatementData::Initialize(data) => {
            data.targets.iter_mut().for_each(|symbol| f(symbol));
        }
        StatementData::Exec(_) => {}
    }
}
