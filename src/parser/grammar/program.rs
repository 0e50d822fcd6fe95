//! Source file, compilation units, and the identification division.

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

use super::{DIVISION_STARTS, data, environment, procedure};

/// `source_file := compilation_unit*`
pub(crate) fn source_file(p: &mut Parser) {
    p.start_node(SyntaxKind::SOURCE_FILE);
    p.skip_trivia();
    while !p.at_eof() {
        if at_unit_start(p) {
            compilation_unit(p);
        } else {
            // Skip to the next sentence boundary; an empty recovery set
            // guarantees progress even when the stray token is itself an
            // IDENTIFICATION keyword.
            p.error_recover("expected IDENTIFICATION DIVISION", &[]);
            if p.at_separator_period() {
                p.bump();
            }
        }
        p.skip_trivia();
    }
    p.finish_node();
}

fn at_unit_start(p: &Parser) -> bool {
    (p.at(SyntaxKind::IDENTIFICATION_KW) || p.at(SyntaxKind::ID_KW))
        && p.nth(1) == SyntaxKind::DIVISION_KW
}

/// One program: its divisions, any nested programs, and the optional
/// `END PROGRAM` marker. Nested programs appear before the containing
/// program's `END PROGRAM`, so recursion handles the containment.
fn compilation_unit(p: &mut Parser) {
    p.start_node(SyntaxKind::COMPILATION_UNIT);
    p.start_node(SyntaxKind::PROGRAM_UNIT);

    identification_division(p);
    p.skip_trivia();
    if p.at(SyntaxKind::ENVIRONMENT_KW) {
        environment::environment_division(p);
        p.skip_trivia();
    }
    if p.at(SyntaxKind::DATA_KW) {
        data::data_division(p);
        p.skip_trivia();
    }
    if p.at(SyntaxKind::PROCEDURE_KW) {
        procedure::procedure_division(p);
        p.skip_trivia();
    }
    while at_unit_start(p) {
        compilation_unit(p);
        p.skip_trivia();
    }
    p.finish_node(); // PROGRAM_UNIT

    p.skip_trivia();
    if p.at(SyntaxKind::END_KW) && p.nth(1) == SyntaxKind::PROGRAM_KW {
        end_program(p);
    }
    p.finish_node();
}

/// `END PROGRAM name.`
fn end_program(p: &mut Parser) {
    p.start_node(SyntaxKind::END_PROGRAM_STATEMENT);
    p.bump(); // END
    p.expect(SyntaxKind::PROGRAM_KW);
    if !p.eat(SyntaxKind::WORD) {
        p.eat(SyntaxKind::STRING);
    }
    p.expect_period();
    p.finish_node();
}

/// `IDENTIFICATION DIVISION. PROGRAM-ID. name. [comment paragraphs]`
fn identification_division(p: &mut Parser) {
    p.start_node(SyntaxKind::IDENTIFICATION_DIVISION);
    p.bump(); // IDENTIFICATION or ID
    p.expect(SyntaxKind::DIVISION_KW);
    p.expect_period();

    p.skip_trivia();
    if p.at(SyntaxKind::PROGRAM_ID_KW) {
        program_id_paragraph(p);
    } else {
        p.error("expected PROGRAM-ID paragraph");
    }

    loop {
        p.skip_trivia();
        if p.at_any(&[
            SyntaxKind::AUTHOR_KW,
            SyntaxKind::INSTALLATION_KW,
            SyntaxKind::DATE_WRITTEN_KW,
            SyntaxKind::DATE_COMPILED_KW,
            SyntaxKind::SECURITY_KW,
            SyntaxKind::REMARKS_KW,
        ]) {
            identification_paragraph(p);
        } else {
            break;
        }
    }
    p.finish_node();
}

/// `PROGRAM-ID. name [IS? attribute* PROGRAM?].`
fn program_id_paragraph(p: &mut Parser) {
    p.start_node(SyntaxKind::PROGRAM_ID_PARAGRAPH);
    p.bump(); // PROGRAM-ID
    p.expect_period();
    p.skip_trivia();
    if !p.eat(SyntaxKind::WORD) && !p.eat(SyntaxKind::STRING) {
        p.error("expected a program name");
    }
    // IS COMMON/INITIAL PROGRAM and similar attributes.
    while !p.at_eof() && !p.at_separator_period() && !p.at_any(DIVISION_STARTS) {
        p.bump_any();
    }
    p.expect_period();
    p.finish_node();
}

/// A comment paragraph (`AUTHOR.`, `DATE-WRITTEN.`, ...). The entry text
/// is free-form; it is preserved in the tree but not interpreted.
fn identification_paragraph(p: &mut Parser) {
    p.start_node(SyntaxKind::IDENTIFICATION_PARAGRAPH);
    p.bump(); // paragraph keyword
    p.expect_period();
    loop {
        p.skip_trivia();
        if p.at_eof()
            || p.at_any(DIVISION_STARTS)
            || p.at_any(&[
                SyntaxKind::AUTHOR_KW,
                SyntaxKind::INSTALLATION_KW,
                SyntaxKind::DATE_WRITTEN_KW,
                SyntaxKind::DATE_COMPILED_KW,
                SyntaxKind::SECURITY_KW,
                SyntaxKind::REMARKS_KW,
            ])
        {
            break;
        }
        p.bump_any();
    }
    p.finish_node();
}
