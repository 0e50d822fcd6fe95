//! Environment division: configuration and input-output sections.

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

use super::{DIVISION_STARTS, name_ref};

/// `ENVIRONMENT DIVISION. [configuration] [input-output]`
pub(crate) fn environment_division(p: &mut Parser) {
    p.start_node(SyntaxKind::ENVIRONMENT_DIVISION);
    p.bump(); // ENVIRONMENT
    p.expect(SyntaxKind::DIVISION_KW);
    p.expect_period();

    p.skip_trivia();
    if p.at(SyntaxKind::CONFIGURATION_KW) {
        configuration_section(p);
        p.skip_trivia();
    }
    if p.at(SyntaxKind::INPUT_OUTPUT_KW) {
        input_output_section(p);
    }
    p.finish_node();
}

fn configuration_section(p: &mut Parser) {
    p.start_node(SyntaxKind::CONFIGURATION_SECTION);
    p.bump(); // CONFIGURATION
    p.expect(SyntaxKind::SECTION_KW);
    p.expect_period();

    loop {
        p.skip_trivia();
        match p.current_kind() {
            SyntaxKind::SOURCE_COMPUTER_KW => {
                computer_paragraph(p, SyntaxKind::SOURCE_COMPUTER_PARAGRAPH)
            }
            SyntaxKind::OBJECT_COMPUTER_KW => {
                computer_paragraph(p, SyntaxKind::OBJECT_COMPUTER_PARAGRAPH)
            }
            SyntaxKind::SPECIAL_NAMES_KW => special_names_paragraph(p),
            _ => break,
        }
    }
    p.finish_node();
}

/// `SOURCE-COMPUTER. name [WITH DEBUGGING MODE].` and the OBJECT-COMPUTER
/// twin. The body tokens (including the debugging clause) are preserved
/// in the paragraph node.
fn computer_paragraph(p: &mut Parser, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    p.expect_period();
    while !p.at_eof() && !p.at_separator_period() && !at_environment_stop(p) {
        p.bump_any();
    }
    if p.at_separator_period() {
        p.bump();
    }
    p.finish_node();
}

/// `SPECIAL-NAMES. [environment-name IS mnemonic-name]* ... .`
///
/// Mnemonic definitions become MNEMONIC_ENTRY nodes; other clauses
/// (currency sign, decimal point) are preserved as raw tokens.
fn special_names_paragraph(p: &mut Parser) {
    p.start_node(SyntaxKind::SPECIAL_NAMES_PARAGRAPH);
    p.bump();
    p.expect_period();
    loop {
        p.skip_trivia();
        if p.at_eof() || p.at_separator_period() || at_environment_stop(p) {
            break;
        }
        if p.at(SyntaxKind::WORD) && p.nth(1) == SyntaxKind::IS_KW && p.nth(2) == SyntaxKind::WORD
        {
            p.start_node(SyntaxKind::MNEMONIC_ENTRY);
            p.bump(); // environment name
            p.eat(SyntaxKind::IS_KW);
            p.eat(SyntaxKind::WORD); // mnemonic name
            p.finish_node();
        } else {
            p.bump_any();
        }
    }
    if p.at_separator_period() {
        p.bump();
    }
    p.finish_node();
}

fn at_environment_stop(p: &Parser) -> bool {
    p.at_any(DIVISION_STARTS)
        || p.at_any(&[
            SyntaxKind::SOURCE_COMPUTER_KW,
            SyntaxKind::OBJECT_COMPUTER_KW,
            SyntaxKind::SPECIAL_NAMES_KW,
            SyntaxKind::INPUT_OUTPUT_KW,
            SyntaxKind::FILE_CONTROL_KW,
            SyntaxKind::I_O_CONTROL_KW,
            SyntaxKind::SELECT_KW,
        ])
}

fn input_output_section(p: &mut Parser) {
    p.start_node(SyntaxKind::INPUT_OUTPUT_SECTION);
    p.bump(); // INPUT-OUTPUT
    p.expect(SyntaxKind::SECTION_KW);
    p.expect_period();

    p.skip_trivia();
    if p.at(SyntaxKind::FILE_CONTROL_KW) {
        p.start_node(SyntaxKind::FILE_CONTROL_PARAGRAPH);
        p.bump();
        p.expect_period();
        loop {
            p.skip_trivia();
            if p.at(SyntaxKind::SELECT_KW) {
                file_control_entry(p);
            } else {
                break;
            }
        }
        p.finish_node();
    }
    p.skip_trivia();
    if p.at(SyntaxKind::I_O_CONTROL_KW) {
        p.start_node(SyntaxKind::I_O_CONTROL_PARAGRAPH);
        p.bump();
        p.expect_period();
        while !p.at_eof() && !p.at_separator_period() && !p.at_any(DIVISION_STARTS) {
            p.bump_any();
        }
        if p.at_separator_period() {
            p.bump();
        }
        p.finish_node();
    }
    p.finish_node();
}

/// `SELECT [OPTIONAL] file-name ASSIGN TO target [clauses...].`
fn file_control_entry(p: &mut Parser) {
    p.start_node(SyntaxKind::FILE_CONTROL_ENTRY);
    p.bump(); // SELECT
    p.eat(SyntaxKind::OPTIONAL_KW);
    if !p.eat(SyntaxKind::WORD) {
        p.error("expected a file name after SELECT");
    }

    loop {
        p.skip_trivia();
        if p.at_eof() || p.at_separator_period() || p.at(SyntaxKind::SELECT_KW)
            || p.at_any(DIVISION_STARTS)
        {
            break;
        }
        match p.current_kind() {
            SyntaxKind::ASSIGN_KW => assign_clause(p),
            SyntaxKind::ORGANIZATION_KW => organization_clause(p),
            SyntaxKind::ACCESS_KW => access_mode_clause(p),
            SyntaxKind::RECORD_KW => key_clause(p, SyntaxKind::RECORD_KEY_CLAUSE),
            SyntaxKind::ALTERNATE_KW => alternate_key_clause(p),
            SyntaxKind::RELATIVE_KW => key_clause(p, SyntaxKind::RELATIVE_KEY_CLAUSE),
            SyntaxKind::FILE_KW | SyntaxKind::STATUS_KW => file_status_clause(p),
            _ => {
                p.error_recover(
                    "unexpected token in SELECT entry",
                    &[SyntaxKind::SELECT_KW],
                );
            }
        }
    }
    p.expect_period();
    p.finish_node();
}

/// `ASSIGN TO? {word | literal}+`
fn assign_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::ASSIGN_CLAUSE);
    p.bump();
    p.eat(SyntaxKind::TO_KW);
    let mut any = false;
    while p.eat(SyntaxKind::WORD) || p.eat(SyntaxKind::STRING) {
        any = true;
    }
    if !any {
        p.error("expected an ASSIGN target");
    }
    p.finish_node();
}

/// `ORGANIZATION IS? [LINE] {SEQUENTIAL | RELATIVE | INDEXED}`
fn organization_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::ORGANIZATION_CLAUSE);
    p.bump();
    p.eat(SyntaxKind::IS_KW);
    p.eat(SyntaxKind::LINE_KW);
    if !p.eat_any(&[
        SyntaxKind::SEQUENTIAL_KW,
        SyntaxKind::RELATIVE_KW,
        SyntaxKind::INDEXED_KW,
    ]) {
        p.error("expected SEQUENTIAL, RELATIVE, or INDEXED");
    }
    p.finish_node();
}

/// `ACCESS MODE? IS? {SEQUENTIAL | RANDOM | DYNAMIC}`
fn access_mode_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::ACCESS_MODE_CLAUSE);
    p.bump();
    p.eat(SyntaxKind::MODE_KW);
    p.eat(SyntaxKind::IS_KW);
    if !p.eat_any(&[
        SyntaxKind::SEQUENTIAL_KW,
        SyntaxKind::RANDOM_KW,
        SyntaxKind::DYNAMIC_KW,
    ]) {
        p.error("expected SEQUENTIAL, RANDOM, or DYNAMIC");
    }
    p.finish_node();
}

/// `RECORD KEY IS? name` / `RELATIVE KEY IS? name`
fn key_clause(p: &mut Parser, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump(); // RECORD or RELATIVE
    p.expect(SyntaxKind::KEY_KW);
    p.eat(SyntaxKind::IS_KW);
    name_ref(p);
    p.finish_node();
}

/// `ALTERNATE RECORD? KEY IS? name`
fn alternate_key_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::ALTERNATE_KEY_CLAUSE);
    p.bump();
    p.eat(SyntaxKind::RECORD_KW);
    p.expect(SyntaxKind::KEY_KW);
    p.eat(SyntaxKind::IS_KW);
    name_ref(p);
    p.finish_node();
}

/// `FILE? STATUS IS? name`
fn file_status_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::FILE_STATUS_CLAUSE);
    if p.at(SyntaxKind::FILE_KW) {
        p.bump();
    }
    p.expect(SyntaxKind::STATUS_KW);
    p.eat(SyntaxKind::IS_KW);
    name_ref(p);
    p.finish_node();
}
