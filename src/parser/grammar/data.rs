//! Data division: file section, storage sections, and data description
//! entries.

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

use super::{DIVISION_STARTS, literal, name_ref};

/// `DATA DIVISION.` followed by the file/working-storage/local-storage/
/// linkage sections, in that order, each optional.
pub(crate) fn data_division(p: &mut Parser) {
    p.start_node(SyntaxKind::DATA_DIVISION);
    p.bump(); // DATA
    p.expect(SyntaxKind::DIVISION_KW);
    p.expect_period();

    p.skip_trivia();
    if p.at(SyntaxKind::FILE_KW) && p.nth(1) == SyntaxKind::SECTION_KW {
        file_section(p);
        p.skip_trivia();
    }
    storage_section(p, SyntaxKind::WORKING_STORAGE_KW, SyntaxKind::WORKING_STORAGE_SECTION);
    storage_section(p, SyntaxKind::LOCAL_STORAGE_KW, SyntaxKind::LOCAL_STORAGE_SECTION);
    storage_section(p, SyntaxKind::LINKAGE_KW, SyntaxKind::LINKAGE_SECTION);
    p.finish_node();
}

fn file_section(p: &mut Parser) {
    p.start_node(SyntaxKind::FILE_SECTION);
    p.bump(); // FILE
    p.expect(SyntaxKind::SECTION_KW);
    p.expect_period();
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::FD_KW) || p.at(SyntaxKind::SD_KW) {
            file_description_entry(p);
        } else {
            break;
        }
    }
    p.finish_node();
}

fn storage_section(p: &mut Parser, keyword: SyntaxKind, node: SyntaxKind) {
    p.skip_trivia();
    if !p.at(keyword) {
        return;
    }
    p.start_node(node);
    p.bump();
    p.expect(SyntaxKind::SECTION_KW);
    p.expect_period();
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::INTEGER) {
            data_description_entry(p);
        } else {
            break;
        }
    }
    p.finish_node();
}

/// `FD|SD file-name clauses... .` followed by its record descriptions,
/// which nest inside the entry node.
fn file_description_entry(p: &mut Parser) {
    p.start_node(SyntaxKind::FILE_DESCRIPTION_ENTRY);
    p.bump(); // FD or SD
    if !p.eat(SyntaxKind::WORD) {
        p.error("expected a file name after FD/SD");
    }

    loop {
        p.skip_trivia();
        if p.at_eof() || p.at_separator_period() {
            break;
        }
        // DATA here is the DATA RECORDS clause, not the next division.
        if p.at(SyntaxKind::DATA_KW)
            && matches!(p.nth(1), SyntaxKind::RECORD_KW | SyntaxKind::RECORDS_KW)
        {
            data_records_clause(p);
            continue;
        }
        if p.at_any(DIVISION_STARTS) || p.at(SyntaxKind::FD_KW) || p.at(SyntaxKind::SD_KW) {
            break;
        }
        match p.current_kind() {
            SyntaxKind::BLOCK_KW => block_contains_clause(p),
            SyntaxKind::RECORD_KW => record_contains_clause(p),
            SyntaxKind::LABEL_KW => label_records_clause(p),
            SyntaxKind::GLOBAL_KW => flag_clause(p, SyntaxKind::GLOBAL_CLAUSE),
            SyntaxKind::EXTERNAL_KW => flag_clause(p, SyntaxKind::EXTERNAL_CLAUSE),
            SyntaxKind::VALUE_KW | SyntaxKind::VALUES_KW => fd_value_clause(p),
            _ => {
                p.error_recover(
                    "unexpected token in file description entry",
                    &[SyntaxKind::FD_KW, SyntaxKind::SD_KW],
                );
            }
        }
    }
    p.expect_period();

    // Record descriptions for this file.
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::INTEGER) {
            data_description_entry(p);
        } else {
            break;
        }
    }
    p.finish_node();
}

/// `BLOCK CONTAINS? n [TO n] {RECORDS | CHARACTERS}`
fn block_contains_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::BLOCK_CONTAINS_CLAUSE);
    p.bump();
    p.eat(SyntaxKind::CONTAINS_KW);
    p.expect(SyntaxKind::INTEGER);
    if p.eat(SyntaxKind::TO_KW) {
        p.expect(SyntaxKind::INTEGER);
    }
    p.eat_any(&[SyntaxKind::RECORDS_KW, SyntaxKind::CHARACTERS_KW]);
    p.finish_node();
}

/// `RECORD CONTAINS? n [TO n] CHARACTERS?`
fn record_contains_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::RECORD_CONTAINS_CLAUSE);
    p.bump();
    p.eat(SyntaxKind::CONTAINS_KW);
    p.expect(SyntaxKind::INTEGER);
    if p.eat(SyntaxKind::TO_KW) {
        p.expect(SyntaxKind::INTEGER);
    }
    p.eat(SyntaxKind::CHARACTERS_KW);
    p.finish_node();
}

/// `LABEL RECORD|RECORDS IS|ARE? {STANDARD | OMITTED}`
fn label_records_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::LABEL_RECORDS_CLAUSE);
    p.bump();
    p.eat_any(&[SyntaxKind::RECORD_KW, SyntaxKind::RECORDS_KW]);
    p.eat_any(&[SyntaxKind::IS_KW, SyntaxKind::ARE_KW]);
    if !p.eat_any(&[SyntaxKind::STANDARD_KW, SyntaxKind::OMITTED_KW]) {
        p.error("expected STANDARD or OMITTED");
    }
    p.finish_node();
}

/// `DATA RECORD|RECORDS IS|ARE? name+`
fn data_records_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::DATA_RECORDS_CLAUSE);
    p.bump();
    p.eat_any(&[SyntaxKind::RECORD_KW, SyntaxKind::RECORDS_KW]);
    p.eat_any(&[SyntaxKind::IS_KW, SyntaxKind::ARE_KW]);
    p.skip_trivia();
    while p.at(SyntaxKind::WORD) {
        name_ref(p);
        p.skip_trivia();
    }
    p.finish_node();
}

fn flag_clause(p: &mut Parser, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    p.finish_node();
}

/// `VALUE OF label-name IS literal` on an FD entry; the operands are
/// preserved but not interpreted.
fn fd_value_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::VALUE_CLAUSE);
    p.bump();
    loop {
        p.skip_trivia();
        if p.at_eof()
            || p.at_separator_period()
            || p.at_any(&[
                SyntaxKind::BLOCK_KW,
                SyntaxKind::RECORD_KW,
                SyntaxKind::LABEL_KW,
                SyntaxKind::DATA_KW,
                SyntaxKind::GLOBAL_KW,
                SyntaxKind::EXTERNAL_KW,
            ])
        {
            break;
        }
        p.bump_any();
    }
    p.finish_node();
}

/// `level [name | FILLER] clauses... .`
///
/// Level 66 carries a RENAMES clause and 88 a condition VALUE clause; the
/// builder derives the entry kind from the level number.
pub(crate) fn data_description_entry(p: &mut Parser) {
    p.start_node(SyntaxKind::DATA_DESCRIPTION_ENTRY);
    p.bump(); // level number
    p.skip_trivia();
    if p.at(SyntaxKind::FILLER_KW) || p.at(SyntaxKind::WORD) {
        p.bump();
    }

    loop {
        p.skip_trivia();
        if p.at_eof() || p.at_separator_period() || p.at_any(DIVISION_STARTS) {
            break;
        }
        match p.current_kind() {
            SyntaxKind::REDEFINES_KW => redefines_clause(p),
            SyntaxKind::RENAMES_KW => renames_clause(p),
            SyntaxKind::PIC_KW | SyntaxKind::PICTURE_KW => picture_clause(p),
            SyntaxKind::USAGE_KW
            | SyntaxKind::COMP_KW
            | SyntaxKind::BINARY_KW
            | SyntaxKind::PACKED_DECIMAL_KW
            | SyntaxKind::POINTER_KW
            | SyntaxKind::INDEX_KW
            | SyntaxKind::DISPLAY_KW => usage_clause(p),
            SyntaxKind::SIGN_KW | SyntaxKind::LEADING_KW | SyntaxKind::TRAILING_KW => {
                sign_clause(p)
            }
            SyntaxKind::OCCURS_KW => occurs_clause(p),
            SyntaxKind::VALUE_KW | SyntaxKind::VALUES_KW => value_clause(p),
            SyntaxKind::JUSTIFIED_KW | SyntaxKind::JUST_KW => justified_clause(p),
            SyntaxKind::BLANK_KW => blank_when_zero_clause(p),
            SyntaxKind::SYNCHRONIZED_KW | SyntaxKind::SYNC_KW => synchronized_clause(p),
            SyntaxKind::GLOBAL_KW => flag_clause(p, SyntaxKind::GLOBAL_CLAUSE),
            SyntaxKind::EXTERNAL_KW => flag_clause(p, SyntaxKind::EXTERNAL_CLAUSE),
            _ => {
                p.error_recover("unexpected token in data description entry", &[]);
            }
        }
    }
    p.expect_period();
    p.finish_node();
}

/// `REDEFINES name`
fn redefines_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::REDEFINES_CLAUSE);
    p.bump();
    name_ref(p);
    p.finish_node();
}

/// `RENAMES name [THRU name]`
fn renames_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::RENAMES_CLAUSE);
    p.bump();
    name_ref(p);
    if p.eat_any(&[SyntaxKind::THRU_KW, SyntaxKind::THROUGH_KW]) {
        name_ref(p);
    }
    p.finish_node();
}

/// `PIC|PICTURE IS? picture-string`
///
/// The picture character-string is whatever contiguous run of tokens
/// follows; it ends at the first gap or at the separator period.
fn picture_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::PICTURE_CLAUSE);
    p.bump();
    p.eat(SyntaxKind::IS_KW);
    p.skip_trivia();
    if p.at_eof() || p.at_separator_period() {
        p.error("expected a picture string");
    } else {
        // Every gap lexes as a whitespace token, so the contiguous run
        // ends at the first trivia token or at the separator period.
        p.bump_any();
        while !p.at_eof() && !p.current_kind().is_trivia() && !p.at_separator_period() {
            p.bump_any();
        }
    }
    p.finish_node();
}

/// `USAGE IS? usage` or a bare usage word (`COMP-3`, `BINARY`, ...).
fn usage_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::USAGE_CLAUSE);
    if p.at(SyntaxKind::USAGE_KW) {
        p.bump();
        p.eat(SyntaxKind::IS_KW);
        p.skip_trivia();
    }
    if !p.eat_any(&[
        SyntaxKind::COMP_KW,
        SyntaxKind::BINARY_KW,
        SyntaxKind::PACKED_DECIMAL_KW,
        SyntaxKind::POINTER_KW,
        SyntaxKind::INDEX_KW,
        SyntaxKind::DISPLAY_KW,
    ]) {
        p.error("expected a usage");
    }
    p.finish_node();
}

/// `SIGN IS? {LEADING | TRAILING} [SEPARATE CHARACTER?]`
fn sign_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::SIGN_CLAUSE);
    if p.at(SyntaxKind::SIGN_KW) {
        p.bump();
        p.eat(SyntaxKind::IS_KW);
    }
    if !p.eat_any(&[SyntaxKind::LEADING_KW, SyntaxKind::TRAILING_KW]) {
        p.error("expected LEADING or TRAILING");
    }
    if p.eat(SyntaxKind::SEPARATE_KW) {
        p.eat(SyntaxKind::CHARACTER_KW);
    }
    p.finish_node();
}

/// `OCCURS n [TO n] TIMES? [DEPENDING ON? name] [ASCENDING|DESCENDING KEY
/// IS? name+]* [INDEXED BY? name+]`
fn occurs_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::OCCURS_CLAUSE);
    p.bump();
    p.expect(SyntaxKind::INTEGER);
    if p.eat(SyntaxKind::TO_KW) {
        p.expect(SyntaxKind::INTEGER);
    }
    p.eat(SyntaxKind::TIMES_KW);
    if p.eat(SyntaxKind::DEPENDING_KW) {
        p.eat(SyntaxKind::ON_KW);
        name_ref(p);
    }
    loop {
        p.skip_trivia();
        if p.at(SyntaxKind::ASCENDING_KW) || p.at(SyntaxKind::DESCENDING_KW) {
            p.bump();
            p.eat(SyntaxKind::KEY_KW);
            p.eat(SyntaxKind::IS_KW);
            p.skip_trivia();
            while p.at(SyntaxKind::WORD) {
                name_ref(p);
                p.skip_trivia();
            }
        } else {
            break;
        }
    }
    if p.eat(SyntaxKind::INDEXED_KW) {
        p.eat(SyntaxKind::BY_KW);
        p.skip_trivia();
        while p.at(SyntaxKind::WORD) {
            p.bump(); // index names are definitions, not references
            p.skip_trivia();
        }
    }
    p.finish_node();
}

/// `VALUE IS?|VALUES ARE? literal [THRU literal] [, literal ...]`
fn value_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::VALUE_CLAUSE);
    p.bump();
    p.eat_any(&[SyntaxKind::IS_KW, SyntaxKind::ARE_KW]);
    loop {
        literal(p);
        if p.eat_any(&[SyntaxKind::THRU_KW, SyntaxKind::THROUGH_KW]) {
            literal(p);
        }
        p.skip_trivia();
        p.eat(SyntaxKind::COMMA);
        p.skip_trivia();
        let kind = p.current_kind();
        if !(kind.is_literal_token() || kind.is_figurative() || kind == SyntaxKind::ALL_KW
            || kind == SyntaxKind::MINUS)
        {
            break;
        }
    }
    p.finish_node();
}

/// `JUSTIFIED|JUST RIGHT?`
fn justified_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::JUSTIFIED_CLAUSE);
    p.bump();
    p.eat(SyntaxKind::RIGHT_KW);
    p.finish_node();
}

/// `BLANK WHEN? ZERO`
fn blank_when_zero_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::BLANK_WHEN_ZERO_CLAUSE);
    p.bump();
    p.eat(SyntaxKind::WHEN_KW);
    if !p.eat_any(&[SyntaxKind::ZERO_KW, SyntaxKind::ZEROS_KW, SyntaxKind::ZEROES_KW]) {
        p.error("expected ZERO");
    }
    p.finish_node();
}

/// `SYNCHRONIZED|SYNC [LEFT | RIGHT]`
fn synchronized_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::SYNCHRONIZED_CLAUSE);
    p.bump();
    p.eat_any(&[SyntaxKind::LEFT_KW, SyntaxKind::RIGHT_KW]);
    p.finish_node();
}
