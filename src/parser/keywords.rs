//! Reserved-word recognition.
//!
//! COBOL is case-insensitive and its words contain hyphens, so keywords
//! are remapped from WORD tokens after lexing rather than being matched
//! by the tokenizer itself. All `COMPUTATIONAL`/`COMP` usage variants
//! collapse onto one kind; the token text keeps the distinction.

use super::syntax_kind::SyntaxKind;

/// Map an uppercased word to its keyword kind, if it is reserved.
pub fn keyword_kind(word: &str) -> Option<SyntaxKind> {
    use SyntaxKind::*;
    let upper = word.to_ascii_uppercase();
    if upper.starts_with("COMP") {
        if let Some(kind) = computational_kind(&upper) {
            return Some(kind);
        }
    }
    let kind = match upper.as_str() {
        "ACCEPT" => ACCEPT_KW,
        "ACCESS" => ACCESS_KW,
        "ADD" => ADD_KW,
        "ADVANCING" => ADVANCING_KW,
        "AFTER" => AFTER_KW,
        "ALL" => ALL_KW,
        "ALTERNATE" => ALTERNATE_KW,
        "AND" => AND_KW,
        "ARE" => ARE_KW,
        "ASCENDING" => ASCENDING_KW,
        "ASSIGN" => ASSIGN_KW,
        "AT" => AT_KW,
        "AUTHOR" => AUTHOR_KW,
        "BEFORE" => BEFORE_KW,
        "BINARY" => BINARY_KW,
        "BLANK" => BLANK_KW,
        "BLOCK" => BLOCK_KW,
        "BY" => BY_KW,
        "CALL" => CALL_KW,
        "CHARACTER" => CHARACTER_KW,
        "CHARACTERS" => CHARACTERS_KW,
        "CLOSE" => CLOSE_KW,
        "CONFIGURATION" => CONFIGURATION_KW,
        "CONTAINS" => CONTAINS_KW,
        "CONTENT" => CONTENT_KW,
        "CONTINUE" => CONTINUE_KW,
        "CORR" => CORR_KW,
        "CORRESPONDING" => CORRESPONDING_KW,
        "DATA" => DATA_KW,
        "DATE-COMPILED" => DATE_COMPILED_KW,
        "DATE-WRITTEN" => DATE_WRITTEN_KW,
        "DEBUGGING" => DEBUGGING_KW,
        "DECLARATIVES" => DECLARATIVES_KW,
        "DEPENDING" => DEPENDING_KW,
        "DESCENDING" => DESCENDING_KW,
        "DISPLAY" => DISPLAY_KW,
        "DIVIDE" => DIVIDE_KW,
        "DIVISION" => DIVISION_KW,
        "DOWN" => DOWN_KW,
        "DYNAMIC" => DYNAMIC_KW,
        "ELSE" => ELSE_KW,
        "END" => END_KW,
        "END-EXEC" => END_EXEC_KW,
        "END-IF" => END_IF_KW,
        "END-PERFORM" => END_PERFORM_KW,
        "END-READ" => END_READ_KW,
        "END-WRITE" => END_WRITE_KW,
        "ENVIRONMENT" => ENVIRONMENT_KW,
        "EQUAL" | "EQUALS" => EQUAL_KW,
        "EXEC" => EXEC_KW,
        "EXIT" => EXIT_KW,
        "EXTEND" => EXTEND_KW,
        "EXTERNAL" => EXTERNAL_KW,
        "FD" => FD_KW,
        "FILE" => FILE_KW,
        "FILE-CONTROL" => FILE_CONTROL_KW,
        "FILLER" => FILLER_KW,
        "FROM" => FROM_KW,
        "GIVING" => GIVING_KW,
        "GLOBAL" => GLOBAL_KW,
        "GO" => GO_KW,
        "GREATER" => GREATER_KW,
        "HIGH-VALUE" => HIGH_VALUE_KW,
        "HIGH-VALUES" => HIGH_VALUES_KW,
        "I-O" => I_O_KW,
        "I-O-CONTROL" => I_O_CONTROL_KW,
        "ID" => ID_KW,
        "IDENTIFICATION" => IDENTIFICATION_KW,
        "IF" => IF_KW,
        "IN" => IN_KW,
        "INDEX" => INDEX_KW,
        "INDEXED" => INDEXED_KW,
        "INITIALIZE" => INITIALIZE_KW,
        "INPUT" => INPUT_KW,
        "INPUT-OUTPUT" => INPUT_OUTPUT_KW,
        "INSTALLATION" => INSTALLATION_KW,
        "INTO" => INTO_KW,
        "IS" => IS_KW,
        "JUST" => JUST_KW,
        "JUSTIFIED" => JUSTIFIED_KW,
        "KEY" => KEY_KW,
        "LABEL" => LABEL_KW,
        "LEADING" => LEADING_KW,
        "LEFT" => LEFT_KW,
        "LESS" => LESS_KW,
        "LINE" => LINE_KW,
        "LINES" => LINES_KW,
        "LINKAGE" => LINKAGE_KW,
        "LOCAL-STORAGE" => LOCAL_STORAGE_KW,
        "LOW-VALUE" => LOW_VALUE_KW,
        "LOW-VALUES" => LOW_VALUES_KW,
        "MODE" => MODE_KW,
        "MOVE" => MOVE_KW,
        "MULTIPLY" => MULTIPLY_KW,
        "NEXT" => NEXT_KW,
        "NOT" => NOT_KW,
        "OBJECT-COMPUTER" => OBJECT_COMPUTER_KW,
        "OCCURS" => OCCURS_KW,
        "OF" => OF_KW,
        "OMITTED" => OMITTED_KW,
        "ON" => ON_KW,
        "OPEN" => OPEN_KW,
        "OPTIONAL" => OPTIONAL_KW,
        "OR" => OR_KW,
        "ORGANIZATION" => ORGANIZATION_KW,
        "OUTPUT" => OUTPUT_KW,
        "PACKED-DECIMAL" => PACKED_DECIMAL_KW,
        "PERFORM" => PERFORM_KW,
        "PIC" => PIC_KW,
        "PICTURE" => PICTURE_KW,
        "POINTER" => POINTER_KW,
        "PROCEDURE" => PROCEDURE_KW,
        "PROGRAM" => PROGRAM_KW,
        "PROGRAM-ID" => PROGRAM_ID_KW,
        "QUOTE" => QUOTE_KW,
        "QUOTES" => QUOTES_KW,
        "RANDOM" => RANDOM_KW,
        "READ" => READ_KW,
        "RECORD" => RECORD_KW,
        "RECORDS" => RECORDS_KW,
        "REDEFINES" => REDEFINES_KW,
        "REFERENCE" => REFERENCE_KW,
        "RELATIVE" => RELATIVE_KW,
        "REMAINDER" => REMAINDER_KW,
        "REMARKS" => REMARKS_KW,
        "RENAMES" => RENAMES_KW,
        "RIGHT" => RIGHT_KW,
        "ROUNDED" => ROUNDED_KW,
        "RUN" => RUN_KW,
        "SD" => SD_KW,
        "SECTION" => SECTION_KW,
        "SECURITY" => SECURITY_KW,
        "SELECT" => SELECT_KW,
        "SEPARATE" => SEPARATE_KW,
        "SEQUENTIAL" => SEQUENTIAL_KW,
        "SET" => SET_KW,
        "SIGN" => SIGN_KW,
        "SOURCE-COMPUTER" => SOURCE_COMPUTER_KW,
        "SPACE" => SPACE_KW,
        "SPACES" => SPACES_KW,
        "SPECIAL-NAMES" => SPECIAL_NAMES_KW,
        "STANDARD" => STANDARD_KW,
        "STATUS" => STATUS_KW,
        "STOP" => STOP_KW,
        "SUBTRACT" => SUBTRACT_KW,
        "SYNC" => SYNC_KW,
        "SYNCHRONIZED" => SYNCHRONIZED_KW,
        "THAN" => THAN_KW,
        "THEN" => THEN_KW,
        "THROUGH" => THROUGH_KW,
        "THRU" => THRU_KW,
        "TIMES" => TIMES_KW,
        "TO" => TO_KW,
        "TRAILING" => TRAILING_KW,
        "UNTIL" => UNTIL_KW,
        "UP" => UP_KW,
        "UPON" => UPON_KW,
        "USAGE" => USAGE_KW,
        "USING" => USING_KW,
        "VALUE" => VALUE_KW,
        "VALUES" => VALUES_KW,
        "VARYING" => VARYING_KW,
        "WHEN" => WHEN_KW,
        "WITH" => WITH_KW,
        "WORKING-STORAGE" => WORKING_STORAGE_KW,
        "WRITE" => WRITE_KW,
        "ZERO" => ZERO_KW,
        "ZEROES" => ZEROES_KW,
        "ZEROS" => ZEROS_KW,
        _ => return None,
    };
    Some(kind)
}

/// `COMP`, `COMP-1`..`COMP-5`, `COMPUTATIONAL`, `COMPUTATIONAL-1`..`-5`.
fn computational_kind(upper: &str) -> Option<SyntaxKind> {
    let rest = upper
        .strip_prefix("COMPUTATIONAL")
        .or_else(|| upper.strip_prefix("COMP"))?;
    match rest {
        "" => Some(SyntaxKind::COMP_KW),
        _ => {
            let digit = rest.strip_prefix('-')?;
            matches!(digit, "1" | "2" | "3" | "4" | "5").then_some(SyntaxKind::COMP_KW)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(keyword_kind("move"), Some(SyntaxKind::MOVE_KW));
        assert_eq!(keyword_kind("Move"), Some(SyntaxKind::MOVE_KW));
        assert_eq!(keyword_kind("MOVE"), Some(SyntaxKind::MOVE_KW));
    }

    #[test]
    fn hyphenated_keywords() {
        assert_eq!(keyword_kind("PROGRAM-ID"), Some(SyntaxKind::PROGRAM_ID_KW));
        assert_eq!(
            keyword_kind("working-storage"),
            Some(SyntaxKind::WORKING_STORAGE_KW)
        );
        assert_eq!(keyword_kind("END-EXEC"), Some(SyntaxKind::END_EXEC_KW));
    }

    #[test]
    fn computational_variants_collapse() {
        for word in ["COMP", "COMP-3", "COMPUTATIONAL", "COMPUTATIONAL-5", "comp-1"] {
            assert_eq!(keyword_kind(word), Some(SyntaxKind::COMP_KW), "{word}");
        }
        assert_eq!(keyword_kind("COMP-9"), None);
        assert_eq!(keyword_kind("COMPARE"), None);
    }

    #[test]
    fn plain_names_are_not_keywords() {
        assert_eq!(keyword_kind("CUST-REC"), None);
        assert_eq!(keyword_kind("HELLO"), None);
    }
}
