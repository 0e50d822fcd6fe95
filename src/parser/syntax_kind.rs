//! Syntax kinds for the rowan-based parse tree.
//!
//! This enum defines every token and node kind the grammar produces.
//! Node kinds are the grammar productions; the ASG builder dispatches on
//! them and the element registry keys contexts by them.

/// All syntax kinds (tokens and nodes) in the COBOL grammar.
///
/// Tokens are leaf nodes (words, literals, punctuation, keywords).
/// Nodes are composite (divisions, entries, clauses, statements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    WHITESPACE = 0,

    // =========================================================================
    // BASIC TOKENS
    // =========================================================================
    WORD,    // data/procedure/file names, picture strings, unreserved words
    INTEGER, // 42 (also level numbers)
    DECIMAL, // 3.14
    STRING,  // "text" or 'text', doubled-quote escape

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    PERIOD,    // .
    LPAREN,    // (
    RPAREN,    // )
    COMMA,     // ,
    SEMICOLON, // ;
    COLON,     // :
    EQ,        // =
    PLUS,      // +
    MINUS,     // -
    STAR,      // *
    SLASH,     // /
    POWER,     // **
    LT,        // <
    GT,        // >
    LE,        // <=
    GE,        // >=
    CURRENCY,  // $ (picture strings)

    // =========================================================================
    // KEYWORDS (contiguous; see is_keyword)
    // =========================================================================
    ACCEPT_KW,
    ACCESS_KW,
    ADD_KW,
    ADVANCING_KW,
    AFTER_KW,
    ALL_KW,
    ALTERNATE_KW,
    AND_KW,
    ARE_KW,
    ASCENDING_KW,
    ASSIGN_KW,
    AT_KW,
    AUTHOR_KW,
    BEFORE_KW,
    BINARY_KW,
    BLANK_KW,
    BLOCK_KW,
    BY_KW,
    CALL_KW,
    CHARACTER_KW,
    CHARACTERS_KW,
    CLOSE_KW,
    COMP_KW,
    COMPUTE_KW,
    CONFIGURATION_KW,
    CONTAINS_KW,
    CONTENT_KW,
    CONTINUE_KW,
    CORR_KW,
    CORRESPONDING_KW,
    DATA_KW,
    DATE_COMPILED_KW,
    DATE_WRITTEN_KW,
    DEBUGGING_KW,
    DECLARATIVES_KW,
    DEPENDING_KW,
    DESCENDING_KW,
    DISPLAY_KW,
    DIVIDE_KW,
    DIVISION_KW,
    DOWN_KW,
    DYNAMIC_KW,
    ELSE_KW,
    END_KW,
    END_EXEC_KW,
    END_IF_KW,
    END_PERFORM_KW,
    END_READ_KW,
    END_WRITE_KW,
    ENVIRONMENT_KW,
    EQUAL_KW,
    EXEC_KW,
    EXIT_KW,
    EXTEND_KW,
    EXTERNAL_KW,
    FD_KW,
    FILE_KW,
    FILE_CONTROL_KW,
    FILLER_KW,
    FROM_KW,
    GIVING_KW,
    GLOBAL_KW,
    GO_KW,
    GREATER_KW,
    HIGH_VALUE_KW,
    HIGH_VALUES_KW,
    I_O_KW,
    I_O_CONTROL_KW,
    ID_KW,
    IDENTIFICATION_KW,
    IF_KW,
    IN_KW,
    INDEX_KW,
    INDEXED_KW,
    INITIALIZE_KW,
    INPUT_KW,
    INPUT_OUTPUT_KW,
    INSTALLATION_KW,
    INTO_KW,
    IS_KW,
    JUST_KW,
    JUSTIFIED_KW,
    KEY_KW,
    LABEL_KW,
    LEADING_KW,
    LEFT_KW,
    LESS_KW,
    LINE_KW,
    LINES_KW,
    LINKAGE_KW,
    LOCAL_STORAGE_KW,
    LOW_VALUE_KW,
    LOW_VALUES_KW,
    MODE_KW,
    MOVE_KW,
    MULTIPLY_KW,
    NEXT_KW,
    NOT_KW,
    OBJECT_COMPUTER_KW,
    OCCURS_KW,
    OF_KW,
    OMITTED_KW,
    ON_KW,
    OPEN_KW,
    OPTIONAL_KW,
    OR_KW,
    ORGANIZATION_KW,
    OUTPUT_KW,
    PACKED_DECIMAL_KW,
    PERFORM_KW,
    PIC_KW,
    PICTURE_KW,
    POINTER_KW,
    PROCEDURE_KW,
    PROGRAM_KW,
    PROGRAM_ID_KW,
    QUOTE_KW,
    QUOTES_KW,
    RANDOM_KW,
    READ_KW,
    RECORD_KW,
    RECORDS_KW,
    REDEFINES_KW,
    REFERENCE_KW,
    RELATIVE_KW,
    REMAINDER_KW,
    REMARKS_KW,
    RENAMES_KW,
    RIGHT_KW,
    ROUNDED_KW,
    RUN_KW,
    SD_KW,
    SECTION_KW,
    SECURITY_KW,
    SELECT_KW,
    SEPARATE_KW,
    SEQUENTIAL_KW,
    SET_KW,
    SIGN_KW,
    SOURCE_COMPUTER_KW,
    SPACE_KW,
    SPACES_KW,
    SPECIAL_NAMES_KW,
    STANDARD_KW,
    STATUS_KW,
    STOP_KW,
    SUBTRACT_KW,
    SYNC_KW,
    SYNCHRONIZED_KW,
    THAN_KW,
    THEN_KW,
    THROUGH_KW,
    THRU_KW,
    TIMES_KW,
    TO_KW,
    TRAILING_KW,
    UNTIL_KW,
    UP_KW,
    UPON_KW,
    USAGE_KW,
    USING_KW,
    VALUE_KW,
    VALUES_KW,
    VARYING_KW,
    WHEN_KW,
    WITH_KW,
    WORKING_STORAGE_KW,
    WRITE_KW,
    ZERO_KW,
    ZEROES_KW,
    ZEROS_KW,

    // =========================================================================
    // COMPOSITE NODES - program structure
    // =========================================================================
    SOURCE_FILE,
    COMPILATION_UNIT,
    PROGRAM_UNIT,
    END_PROGRAM_STATEMENT,

    // Identification division
    IDENTIFICATION_DIVISION,
    PROGRAM_ID_PARAGRAPH,
    IDENTIFICATION_PARAGRAPH,

    // Environment division
    ENVIRONMENT_DIVISION,
    CONFIGURATION_SECTION,
    SOURCE_COMPUTER_PARAGRAPH,
    OBJECT_COMPUTER_PARAGRAPH,
    SPECIAL_NAMES_PARAGRAPH,
    MNEMONIC_ENTRY,
    INPUT_OUTPUT_SECTION,
    FILE_CONTROL_PARAGRAPH,
    I_O_CONTROL_PARAGRAPH,
    FILE_CONTROL_ENTRY,
    ASSIGN_CLAUSE,
    ORGANIZATION_CLAUSE,
    ACCESS_MODE_CLAUSE,
    RECORD_KEY_CLAUSE,
    ALTERNATE_KEY_CLAUSE,
    RELATIVE_KEY_CLAUSE,
    FILE_STATUS_CLAUSE,

    // Data division
    DATA_DIVISION,
    FILE_SECTION,
    WORKING_STORAGE_SECTION,
    LOCAL_STORAGE_SECTION,
    LINKAGE_SECTION,
    FILE_DESCRIPTION_ENTRY,
    BLOCK_CONTAINS_CLAUSE,
    RECORD_CONTAINS_CLAUSE,
    LABEL_RECORDS_CLAUSE,
    DATA_RECORDS_CLAUSE,
    DATA_DESCRIPTION_ENTRY,
    PICTURE_CLAUSE,
    USAGE_CLAUSE,
    VALUE_CLAUSE,
    REDEFINES_CLAUSE,
    RENAMES_CLAUSE,
    OCCURS_CLAUSE,
    SIGN_CLAUSE,
    JUSTIFIED_CLAUSE,
    BLANK_WHEN_ZERO_CLAUSE,
    SYNCHRONIZED_CLAUSE,
    GLOBAL_CLAUSE,
    EXTERNAL_CLAUSE,

    // Procedure division
    PROCEDURE_DIVISION,
    USING_PHRASE,
    PROCEDURE_SECTION,
    PARAGRAPH,
    SENTENCE,

    // Statements
    MOVE_STATEMENT,
    DISPLAY_STATEMENT,
    ACCEPT_STATEMENT,
    ADD_STATEMENT,
    SUBTRACT_STATEMENT,
    MULTIPLY_STATEMENT,
    DIVIDE_STATEMENT,
    COMPUTE_STATEMENT,
    IF_STATEMENT,
    PERFORM_STATEMENT,
    GO_TO_STATEMENT,
    CALL_STATEMENT,
    STOP_STATEMENT,
    EXIT_STATEMENT,
    CONTINUE_STATEMENT,
    OPEN_STATEMENT,
    CLOSE_STATEMENT,
    READ_STATEMENT,
    WRITE_STATEMENT,
    SET_STATEMENT,
    INITIALIZE_STATEMENT,
    EXEC_STATEMENT,

    // Operands and phrases
    NAME_REF,
    QUALIFIER,
    SUBSCRIPT,
    LITERAL,
    EXPRESSION,
    CONDITION,
    PERFORM_TARGET,
    PERFORM_VARYING,
    AT_END_CLAUSE,
    OPEN_PHRASE,

    // Error recovery
    ERROR,

    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE)
    }

    /// Check if this is a keyword token.
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::ACCEPT_KW as u16) && (self as u16) <= (Self::ZEROS_KW as u16)
    }

    /// Check if this is a literal-bearing token.
    pub fn is_literal_token(self) -> bool {
        matches!(self, Self::INTEGER | Self::DECIMAL | Self::STRING)
    }

    /// Check if this token can be a figurative constant operand.
    pub fn is_figurative(self) -> bool {
        matches!(
            self,
            Self::SPACE_KW
                | Self::SPACES_KW
                | Self::ZERO_KW
                | Self::ZEROS_KW
                | Self::ZEROES_KW
                | Self::HIGH_VALUE_KW
                | Self::HIGH_VALUES_KW
                | Self::LOW_VALUE_KW
                | Self::LOW_VALUES_KW
                | Self::QUOTE_KW
                | Self::QUOTES_KW
        )
    }

    /// Check if this node kind is one of the four division productions.
    pub fn is_division(self) -> bool {
        matches!(
            self,
            Self::IDENTIFICATION_DIVISION
                | Self::ENVIRONMENT_DIVISION
                | Self::DATA_DIVISION
                | Self::PROCEDURE_DIVISION
        )
    }

    /// Check if this node kind is a statement production.
    pub fn is_statement(self) -> bool {
        (self as u16) >= (Self::MOVE_STATEMENT as u16)
            && (self as u16) <= (Self::EXEC_STATEMENT as u16)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: repr(u16) with contiguous discriminants, bounds checked above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CobolLanguage {}

impl rowan::Language for CobolLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<CobolLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CobolLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CobolLanguage>;
pub type SyntaxNodePtr = rowan::ast::SyntaxNodePtr<CobolLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_range_is_contiguous() {
        assert!(SyntaxKind::ACCEPT_KW.is_keyword());
        assert!(SyntaxKind::ZEROS_KW.is_keyword());
        assert!(SyntaxKind::MOVE_KW.is_keyword());
        assert!(!SyntaxKind::WORD.is_keyword());
        assert!(!SyntaxKind::SOURCE_FILE.is_keyword());
    }

    #[test]
    fn rowan_roundtrip() {
        for kind in [
            SyntaxKind::WHITESPACE,
            SyntaxKind::MOVE_STATEMENT,
            SyntaxKind::ERROR,
        ] {
            let raw: rowan::SyntaxKind = kind.into();
            assert_eq!(SyntaxKind::from(raw), kind);
        }
    }
}
