//! Grammar front-end: logos lexer, recursive-descent parser, rowan CST.
//!
//! The parser consumes preprocessed text (see [`crate::preprocess`]) and
//! produces a lossless syntax tree whose composite node kinds are the
//! grammar productions. The ASG builder walks this tree; it never touches
//! raw text again.

pub mod keywords;
mod lexer;
mod parser;
mod syntax_kind;

pub(crate) mod grammar;

pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, ParseError, parse_source};
pub use syntax_kind::{
    CobolLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxNodePtr, SyntaxToken,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> SyntaxNode {
        let parse = parse_source(input);
        assert!(parse.ok(), "parse errors: {:?}", parse.errors);
        parse.syntax()
    }

    fn first_of(root: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
        root.descendants().find(|node| node.kind() == kind)
    }

    const HELLO: &str = "IDENTIFICATION DIVISION.\nPROGRAM-ID. HELLO.\nPROCEDURE DIVISION.\n    DISPLAY \"HI\".\n";

    #[test]
    fn hello_program_shape() {
        let root = parse_ok(HELLO);
        assert_eq!(root.kind(), SyntaxKind::SOURCE_FILE);
        let unit = first_of(&root, SyntaxKind::COMPILATION_UNIT).unwrap();
        assert!(first_of(&unit, SyntaxKind::PROGRAM_UNIT).is_some());
        assert!(first_of(&unit, SyntaxKind::IDENTIFICATION_DIVISION).is_some());
        assert!(first_of(&unit, SyntaxKind::PROCEDURE_DIVISION).is_some());
        let display = first_of(&unit, SyntaxKind::DISPLAY_STATEMENT).unwrap();
        let literal = first_of(&display, SyntaxKind::LITERAL).unwrap();
        assert_eq!(literal.text().to_string(), "\"HI\"");
    }

    #[test]
    fn lossless_roundtrip() {
        let parse = parse_source(HELLO);
        assert_eq!(parse.syntax().text().to_string(), HELLO);
    }

    #[test]
    fn data_division_entries() {
        let src = "IDENTIFICATION DIVISION.\nPROGRAM-ID. P.\nDATA DIVISION.\nWORKING-STORAGE SECTION.\n01 REC.\n   05 AMOUNT PIC S9(4)V99 VALUE ZERO.\n   05 FLAG PIC X.\n      88 FLAG-SET VALUE 'Y'.\n";
        let root = parse_ok(src);
        let entries: Vec<_> = root
            .descendants()
            .filter(|node| node.kind() == SyntaxKind::DATA_DESCRIPTION_ENTRY)
            .collect();
        assert_eq!(entries.len(), 4);
        let picture = first_of(&root, SyntaxKind::PICTURE_CLAUSE).unwrap();
        assert!(picture.text().to_string().contains("S9(4)V99"));
    }

    #[test]
    fn select_and_fd_parse() {
        let src = "IDENTIFICATION DIVISION.\nPROGRAM-ID. P.\nENVIRONMENT DIVISION.\nINPUT-OUTPUT SECTION.\nFILE-CONTROL.\n    SELECT IN-FILE ASSIGN TO 'IN.DAT'\n        ORGANIZATION IS LINE SEQUENTIAL\n        FILE STATUS IS WS-STATUS.\nDATA DIVISION.\nFILE SECTION.\nFD IN-FILE\n    LABEL RECORDS ARE STANDARD.\n01 IN-REC PIC X(80).\nWORKING-STORAGE SECTION.\n01 WS-STATUS PIC XX.\n";
        let root = parse_ok(src);
        assert!(first_of(&root, SyntaxKind::FILE_CONTROL_ENTRY).is_some());
        assert!(first_of(&root, SyntaxKind::ASSIGN_CLAUSE).is_some());
        assert!(first_of(&root, SyntaxKind::FILE_STATUS_CLAUSE).is_some());
        let fd = first_of(&root, SyntaxKind::FILE_DESCRIPTION_ENTRY).unwrap();
        // The record description nests inside its FD entry.
        assert!(first_of(&fd, SyntaxKind::DATA_DESCRIPTION_ENTRY).is_some());
    }

    #[test]
    fn nested_programs() {
        let src = "IDENTIFICATION DIVISION.\nPROGRAM-ID. OUTER.\nPROCEDURE DIVISION.\n    DISPLAY \"OUTER\".\nIDENTIFICATION DIVISION.\nPROGRAM-ID. INNER.\nPROCEDURE DIVISION.\n    DISPLAY \"INNER\".\nEND PROGRAM INNER.\nEND PROGRAM OUTER.\n";
        let root = parse_ok(src);
        let units: Vec<_> = root
            .descendants()
            .filter(|node| node.kind() == SyntaxKind::COMPILATION_UNIT)
            .collect();
        assert_eq!(units.len(), 2);
        // INNER nests inside OUTER's program unit.
        assert!(units[1]
            .ancestors()
            .any(|ancestor| ancestor == units[0]));
    }

    #[test]
    fn exec_statement_keeps_embedded_text() {
        let src = "IDENTIFICATION DIVISION.\nPROGRAM-ID. P.\nPROCEDURE DIVISION.\n    EXEC SQL SELECT 1 FROM DUAL END-EXEC.\n";
        let root = parse_ok(src);
        let exec = first_of(&root, SyntaxKind::EXEC_STATEMENT).unwrap();
        assert!(exec.text().to_string().contains("SELECT 1 FROM DUAL"));
    }

    #[test]
    fn missing_division_keyword_is_an_error() {
        let parse = parse_source("IDENTIFICATION DIVISION.\nPROGRAM-ID. P.\nPROCEDURE DIVSION.\n");
        assert!(!parse.ok());
    }

    #[test]
    fn qualified_reference_with_subscript() {
        let src = "IDENTIFICATION DIVISION.\nPROGRAM-ID. P.\nPROCEDURE DIVISION.\n    MOVE AMOUNT OF CUSTOMER (1) TO TOTAL.\n";
        let root = parse_ok(src);
        let name_ref = first_of(&root, SyntaxKind::NAME_REF).unwrap();
        assert!(first_of(&name_ref, SyntaxKind::QUALIFIER).is_some());
        assert!(first_of(&name_ref, SyntaxKind::SUBSCRIPT).is_some());
    }
}
