//! Procedure division: sections, paragraphs, sentences, and statements.

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

use super::{at_operand_start, literal, name_ref, operand};

/// Statement verbs: used to dispatch and to stop operand consumption.
const VERBS: &[SyntaxKind] = &[
    SyntaxKind::ACCEPT_KW,
    SyntaxKind::ADD_KW,
    SyntaxKind::CALL_KW,
    SyntaxKind::CLOSE_KW,
    SyntaxKind::COMPUTE_KW,
    SyntaxKind::CONTINUE_KW,
    SyntaxKind::DISPLAY_KW,
    SyntaxKind::DIVIDE_KW,
    SyntaxKind::EXEC_KW,
    SyntaxKind::EXIT_KW,
    SyntaxKind::GO_KW,
    SyntaxKind::IF_KW,
    SyntaxKind::INITIALIZE_KW,
    SyntaxKind::MOVE_KW,
    SyntaxKind::MULTIPLY_KW,
    SyntaxKind::OPEN_KW,
    SyntaxKind::PERFORM_KW,
    SyntaxKind::READ_KW,
    SyntaxKind::SET_KW,
    SyntaxKind::STOP_KW,
    SyntaxKind::SUBTRACT_KW,
    SyntaxKind::WRITE_KW,
];

/// Tokens that close an open statement list (ELSE branches and scope
/// terminators).
const STATEMENT_ENDERS: &[SyntaxKind] = &[
    SyntaxKind::ELSE_KW,
    SyntaxKind::END_IF_KW,
    SyntaxKind::END_PERFORM_KW,
    SyntaxKind::END_READ_KW,
    SyntaxKind::END_WRITE_KW,
];

/// `PROCEDURE DIVISION [USING name+]. [sections | paragraphs | sentences]`
pub(crate) fn procedure_division(p: &mut Parser) {
    p.start_node(SyntaxKind::PROCEDURE_DIVISION);
    p.bump(); // PROCEDURE
    p.expect(SyntaxKind::DIVISION_KW);
    if p.eat(SyntaxKind::USING_KW) {
        p.start_node(SyntaxKind::USING_PHRASE);
        p.skip_trivia();
        while p.at(SyntaxKind::WORD) {
            name_ref(p);
            p.skip_trivia();
        }
        p.finish_node();
    }
    p.expect_period();

    while !at_division_end(p) {
        p.skip_trivia();
        if at_division_end(p) {
            break;
        }
        if at_section_header(p) {
            procedure_section(p);
        } else if at_paragraph_header(p) {
            paragraph(p);
        } else {
            sentence(p);
        }
    }
    p.finish_node();
}

fn at_division_end(p: &Parser) -> bool {
    p.at_eof()
        || ((p.at(SyntaxKind::IDENTIFICATION_KW) || p.at(SyntaxKind::ID_KW))
            && p.nth(1) == SyntaxKind::DIVISION_KW)
        || (p.at(SyntaxKind::END_KW) && p.nth(1) == SyntaxKind::PROGRAM_KW)
}

fn at_section_header(p: &Parser) -> bool {
    (p.at(SyntaxKind::WORD) || p.at(SyntaxKind::INTEGER))
        && p.nth(1) == SyntaxKind::SECTION_KW
}

fn at_paragraph_header(p: &Parser) -> bool {
    (p.at(SyntaxKind::WORD) || p.at(SyntaxKind::INTEGER)) && p.nth(1) == SyntaxKind::PERIOD
}

/// `name SECTION. paragraph*`
fn procedure_section(p: &mut Parser) {
    p.start_node(SyntaxKind::PROCEDURE_SECTION);
    p.bump(); // section name
    p.bump(); // SECTION (nth(1) checked by the caller)
    p.expect_period();
    loop {
        p.skip_trivia();
        if at_division_end(p) || at_section_header(p) {
            break;
        }
        if at_paragraph_header(p) {
            paragraph(p);
        } else {
            sentence(p);
        }
    }
    p.finish_node();
}

/// `name. sentence*`
fn paragraph(p: &mut Parser) {
    p.start_node(SyntaxKind::PARAGRAPH);
    p.bump(); // paragraph name
    p.expect_period();
    loop {
        p.skip_trivia();
        if at_division_end(p) || at_section_header(p) || at_paragraph_header(p) {
            break;
        }
        sentence(p);
    }
    p.finish_node();
}

/// `statement* .`
fn sentence(p: &mut Parser) {
    p.start_node(SyntaxKind::SENTENCE);
    loop {
        p.skip_trivia();
        if p.at_separator_period() {
            p.bump();
            break;
        }
        if at_division_end(p) {
            p.error("sentence is missing its period");
            break;
        }
        statement(p);
    }
    p.finish_node();
}

/// Parse statements until a period, a closing keyword, or the end of the
/// enclosing construct. Used by IF branches and inline PERFORM bodies.
fn statement_list(p: &mut Parser) {
    loop {
        p.skip_trivia();
        if p.at_eof() || p.at_separator_period() || p.at_any(STATEMENT_ENDERS) {
            return;
        }
        if at_division_end(p) {
            return;
        }
        statement(p);
    }
}

pub(crate) fn statement(p: &mut Parser) {
    p.skip_trivia();
    match p.current_kind() {
        SyntaxKind::MOVE_KW => move_statement(p),
        SyntaxKind::DISPLAY_KW => display_statement(p),
        SyntaxKind::ACCEPT_KW => accept_statement(p),
        SyntaxKind::ADD_KW => add_statement(p),
        SyntaxKind::SUBTRACT_KW => subtract_statement(p),
        SyntaxKind::MULTIPLY_KW => multiply_statement(p),
        SyntaxKind::DIVIDE_KW => divide_statement(p),
        SyntaxKind::COMPUTE_KW => compute_statement(p),
        SyntaxKind::IF_KW => if_statement(p),
        SyntaxKind::PERFORM_KW => perform_statement(p),
        SyntaxKind::GO_KW => go_to_statement(p),
        SyntaxKind::CALL_KW => call_statement(p),
        SyntaxKind::STOP_KW => stop_statement(p),
        SyntaxKind::EXIT_KW => exit_statement(p),
        SyntaxKind::CONTINUE_KW => continue_statement(p),
        SyntaxKind::OPEN_KW => open_statement(p),
        SyntaxKind::CLOSE_KW => close_statement(p),
        SyntaxKind::READ_KW => read_statement(p),
        SyntaxKind::WRITE_KW => write_statement(p),
        SyntaxKind::SET_KW => set_statement(p),
        SyntaxKind::INITIALIZE_KW => initialize_statement(p),
        SyntaxKind::EXEC_KW => exec_statement(p),
        _ => {
            p.error_recover("expected a statement", VERBS);
        }
    }
}

/// `MOVE [CORRESPONDING] operand TO name+`
fn move_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::MOVE_STATEMENT);
    p.bump();
    p.eat_any(&[SyntaxKind::CORRESPONDING_KW, SyntaxKind::CORR_KW]);
    operand(p);
    p.expect(SyntaxKind::TO_KW);
    name_ref_list(p);
    p.finish_node();
}

/// `DISPLAY operand+ [UPON mnemonic]`
fn display_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::DISPLAY_STATEMENT);
    p.bump();
    p.skip_trivia();
    if !at_operand_start(p) {
        p.error("expected an operand after DISPLAY");
    }
    loop {
        p.skip_trivia();
        if !at_operand_start(p) {
            break;
        }
        operand(p);
    }
    if p.eat(SyntaxKind::UPON_KW) {
        name_ref(p);
    }
    p.finish_node();
}

/// `ACCEPT name [FROM source]`
fn accept_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::ACCEPT_STATEMENT);
    p.bump();
    name_ref(p);
    if p.eat(SyntaxKind::FROM_KW) {
        p.skip_trivia();
        if p.at(SyntaxKind::WORD) {
            name_ref(p);
        } else {
            p.error("expected a source after FROM");
        }
    }
    p.finish_node();
}

/// `ADD operand+ TO name+ [GIVING name+]`
fn add_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::ADD_STATEMENT);
    p.bump();
    operand_list(p);
    if p.eat(SyntaxKind::TO_KW) {
        name_ref_list(p);
    }
    if p.eat(SyntaxKind::GIVING_KW) {
        name_ref_list(p);
    }
    p.finish_node();
}

/// `SUBTRACT operand+ FROM name+ [GIVING name+]`
fn subtract_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::SUBTRACT_STATEMENT);
    p.bump();
    operand_list(p);
    p.expect(SyntaxKind::FROM_KW);
    name_ref_list(p);
    if p.eat(SyntaxKind::GIVING_KW) {
        name_ref_list(p);
    }
    p.finish_node();
}

/// `MULTIPLY operand BY name+ [GIVING name+]`
fn multiply_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::MULTIPLY_STATEMENT);
    p.bump();
    operand(p);
    p.expect(SyntaxKind::BY_KW);
    name_ref_list(p);
    if p.eat(SyntaxKind::GIVING_KW) {
        name_ref_list(p);
    }
    p.finish_node();
}

/// `DIVIDE operand {INTO | BY} operand+ [GIVING name+] [REMAINDER name]`
fn divide_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::DIVIDE_STATEMENT);
    p.bump();
    operand(p);
    if !p.eat_any(&[SyntaxKind::INTO_KW, SyntaxKind::BY_KW]) {
        p.error("expected INTO or BY");
    }
    operand_list(p);
    if p.eat(SyntaxKind::GIVING_KW) {
        name_ref_list(p);
    }
    if p.eat(SyntaxKind::REMAINDER_KW) {
        name_ref(p);
    }
    p.finish_node();
}

/// `COMPUTE name+ [ROUNDED] = arithmetic-expression`
fn compute_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::COMPUTE_STATEMENT);
    p.bump();
    p.skip_trivia();
    while p.at(SyntaxKind::WORD) {
        name_ref(p);
        p.eat(SyntaxKind::ROUNDED_KW);
        p.skip_trivia();
    }
    p.expect(SyntaxKind::EQ);
    expression(p);
    p.finish_node();
}

/// An arithmetic expression: operands and operators until something else.
fn expression(p: &mut Parser) {
    p.start_node(SyntaxKind::EXPRESSION);
    loop {
        p.skip_trivia();
        if at_operand_start(p) {
            operand(p);
        } else if p.at_any(&[
            SyntaxKind::PLUS,
            SyntaxKind::MINUS,
            SyntaxKind::STAR,
            SyntaxKind::SLASH,
            SyntaxKind::POWER,
            SyntaxKind::LPAREN,
            SyntaxKind::RPAREN,
        ]) {
            p.bump();
        } else {
            break;
        }
    }
    p.finish_node();
}

/// A condition: operands joined by relational and logical operators.
fn condition(p: &mut Parser) {
    p.start_node(SyntaxKind::CONDITION);
    loop {
        p.skip_trivia();
        if at_operand_start(p) {
            operand(p);
        } else if p.at_any(&[
            SyntaxKind::EQ,
            SyntaxKind::LT,
            SyntaxKind::GT,
            SyntaxKind::LE,
            SyntaxKind::GE,
            SyntaxKind::PLUS,
            SyntaxKind::MINUS,
            SyntaxKind::STAR,
            SyntaxKind::SLASH,
            SyntaxKind::POWER,
            SyntaxKind::LPAREN,
            SyntaxKind::RPAREN,
            SyntaxKind::AND_KW,
            SyntaxKind::OR_KW,
            SyntaxKind::NOT_KW,
            SyntaxKind::IS_KW,
            SyntaxKind::EQUAL_KW,
            SyntaxKind::GREATER_KW,
            SyntaxKind::LESS_KW,
            SyntaxKind::THAN_KW,
            SyntaxKind::TO_KW,
        ]) {
            p.bump();
        } else {
            break;
        }
    }
    p.finish_node();
}

/// `IF condition THEN? statements [ELSE statements] END-IF?`
fn if_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::IF_STATEMENT);
    p.bump();
    condition(p);
    p.eat(SyntaxKind::THEN_KW);
    statement_list(p);
    if p.eat(SyntaxKind::ELSE_KW) {
        statement_list(p);
    }
    p.eat(SyntaxKind::END_IF_KW);
    p.finish_node();
}

/// `PERFORM [target] [n TIMES | UNTIL cond | VARYING ...]` or an inline
/// `PERFORM ... END-PERFORM` body.
fn perform_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::PERFORM_STATEMENT);
    p.bump();
    p.skip_trivia();

    let has_target = p.at(SyntaxKind::WORD)
        || (p.at(SyntaxKind::INTEGER) && p.nth(1) != SyntaxKind::TIMES_KW);
    if has_target {
        p.start_node(SyntaxKind::PERFORM_TARGET);
        name_ref(p);
        if p.eat_any(&[SyntaxKind::THRU_KW, SyntaxKind::THROUGH_KW]) {
            name_ref(p);
        }
        p.finish_node();
    }

    p.skip_trivia();
    let mut inline_phrase = false;
    if p.at(SyntaxKind::INTEGER) && p.nth(1) == SyntaxKind::TIMES_KW {
        p.bump();
        p.bump();
        inline_phrase = true;
    } else if p.eat(SyntaxKind::UNTIL_KW) {
        condition(p);
        inline_phrase = true;
    } else if p.at(SyntaxKind::VARYING_KW) {
        p.start_node(SyntaxKind::PERFORM_VARYING);
        p.bump();
        name_ref(p);
        p.expect(SyntaxKind::FROM_KW);
        operand(p);
        p.expect(SyntaxKind::BY_KW);
        operand(p);
        p.expect(SyntaxKind::UNTIL_KW);
        condition(p);
        p.finish_node();
        inline_phrase = true;
    }

    if !has_target && (inline_phrase || !p.at_separator_period()) {
        statement_list(p);
        p.expect(SyntaxKind::END_PERFORM_KW);
    }
    p.finish_node();
}

/// `GO TO name+ [DEPENDING ON name]`
fn go_to_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::GO_TO_STATEMENT);
    p.bump();
    p.eat(SyntaxKind::TO_KW);
    name_ref_list(p);
    if p.eat(SyntaxKind::DEPENDING_KW) {
        p.eat(SyntaxKind::ON_KW);
        name_ref(p);
    }
    p.finish_node();
}

/// `CALL {literal | name} [USING [BY REFERENCE|CONTENT] operand+]`
fn call_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::CALL_STATEMENT);
    p.bump();
    operand(p);
    if p.eat(SyntaxKind::USING_KW) {
        p.start_node(SyntaxKind::USING_PHRASE);
        loop {
            p.skip_trivia();
            if p.at(SyntaxKind::BY_KW) {
                p.bump();
                p.eat_any(&[SyntaxKind::REFERENCE_KW, SyntaxKind::CONTENT_KW]);
                p.skip_trivia();
            }
            if !at_operand_start(p) {
                break;
            }
            operand(p);
        }
        p.finish_node();
    }
    p.finish_node();
}

/// `STOP {RUN | literal}`
fn stop_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::STOP_STATEMENT);
    p.bump();
    if !p.eat(SyntaxKind::RUN_KW) {
        literal(p);
    }
    p.finish_node();
}

/// `EXIT [PROGRAM]`
fn exit_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::EXIT_STATEMENT);
    p.bump();
    p.eat(SyntaxKind::PROGRAM_KW);
    p.finish_node();
}

fn continue_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::CONTINUE_STATEMENT);
    p.bump();
    p.finish_node();
}

/// `OPEN {INPUT|OUTPUT|I-O|EXTEND file+}+`
fn open_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::OPEN_STATEMENT);
    p.bump();
    loop {
        p.skip_trivia();
        if !p.at_any(&[
            SyntaxKind::INPUT_KW,
            SyntaxKind::OUTPUT_KW,
            SyntaxKind::I_O_KW,
            SyntaxKind::EXTEND_KW,
        ]) {
            break;
        }
        p.start_node(SyntaxKind::OPEN_PHRASE);
        p.bump();
        p.skip_trivia();
        while p.at(SyntaxKind::WORD) {
            name_ref(p);
            p.skip_trivia();
        }
        p.finish_node();
    }
    p.finish_node();
}

/// `CLOSE file+`
fn close_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::CLOSE_STATEMENT);
    p.bump();
    name_ref_list(p);
    p.finish_node();
}

/// `READ file [NEXT] [RECORD] [INTO name] [AT END statements] END-READ?`
fn read_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::READ_STATEMENT);
    p.bump();
    name_ref(p);
    p.eat(SyntaxKind::NEXT_KW);
    p.eat(SyntaxKind::RECORD_KW);
    if p.eat(SyntaxKind::INTO_KW) {
        name_ref(p);
    }
    p.skip_trivia();
    if p.at(SyntaxKind::AT_KW) || p.at(SyntaxKind::END_KW) {
        p.start_node(SyntaxKind::AT_END_CLAUSE);
        p.eat(SyntaxKind::AT_KW);
        p.expect(SyntaxKind::END_KW);
        statement_list(p);
        p.finish_node();
    }
    p.eat(SyntaxKind::END_READ_KW);
    p.finish_node();
}

/// `WRITE record [FROM name] [BEFORE|AFTER ADVANCING operand [LINE(S)]]`
fn write_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::WRITE_STATEMENT);
    p.bump();
    name_ref(p);
    if p.eat(SyntaxKind::FROM_KW) {
        name_ref(p);
    }
    if p.eat_any(&[SyntaxKind::BEFORE_KW, SyntaxKind::AFTER_KW]) {
        p.eat(SyntaxKind::ADVANCING_KW);
        operand(p);
        p.eat_any(&[SyntaxKind::LINE_KW, SyntaxKind::LINES_KW]);
    }
    p.eat(SyntaxKind::END_WRITE_KW);
    p.finish_node();
}

/// `SET name+ TO operand` or `SET name {UP|DOWN} BY operand`
fn set_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::SET_STATEMENT);
    p.bump();
    name_ref_list(p);
    if p.eat(SyntaxKind::TO_KW) {
        operand(p);
    } else if p.eat_any(&[SyntaxKind::UP_KW, SyntaxKind::DOWN_KW]) {
        p.eat(SyntaxKind::BY_KW);
        operand(p);
    }
    p.finish_node();
}

/// `INITIALIZE name+`
fn initialize_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::INITIALIZE_STATEMENT);
    p.bump();
    name_ref_list(p);
    p.finish_node();
}

/// `EXEC language ... END-EXEC` - the embedded text is preserved raw.
fn exec_statement(p: &mut Parser) {
    p.start_node(SyntaxKind::EXEC_STATEMENT);
    p.bump(); // EXEC
    p.skip_trivia();
    if p.at(SyntaxKind::WORD) {
        p.bump(); // language (SQL, CICS, ...)
    }
    while !p.at_eof() && !p.at(SyntaxKind::END_EXEC_KW) {
        p.bump_any();
    }
    p.expect(SyntaxKind::END_EXEC_KW);
    p.finish_node();
}

/// One or more name references.
fn name_ref_list(p: &mut Parser) {
    p.skip_trivia();
    if !p.at(SyntaxKind::WORD) && !p.at(SyntaxKind::INTEGER) {
        p.error("expected a name");
        return;
    }
    while p.at(SyntaxKind::WORD) || p.at(SyntaxKind::INTEGER) {
        name_ref(p);
        p.skip_trivia();
    }
}

/// One or more operands.
fn operand_list(p: &mut Parser) {
    p.skip_trivia();
    if !at_operand_start(p) {
        p.error("expected an operand");
        return;
    }
    loop {
        p.skip_trivia();
        if !at_operand_start(p) {
            break;
        }
        operand(p);
    }
}
