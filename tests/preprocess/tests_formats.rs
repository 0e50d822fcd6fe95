//! Format normalization through the public preprocessor entry point.

use cobol_asg::preprocess::{PreprocessOptions, SourceFormat, preprocess_source};
use rstest::rstest;

use crate::helpers;

#[rstest]
#[case('*')]
#[case('/')]
fn comment_indicators_blank_the_line(#[case] indicator: char) {
    let line = format!("000100{indicator} NOTHING TO SEE HERE");
    let out = preprocess_source(&line, None, &PreprocessOptions::default()).unwrap();
    assert_eq!(out.text, "");
}

#[rstest]
#[case(SourceFormat::Fixed, "000100 DISPLAY X.")]
#[case(SourceFormat::Variable, "000100 DISPLAY X.")]
#[case(SourceFormat::Tandem, " DISPLAY X.")]
fn every_format_yields_the_same_stream(#[case] format: SourceFormat, #[case] line: &str) {
    let options = PreprocessOptions {
        format,
        ..PreprocessOptions::default()
    };
    let out = preprocess_source(line, None, &options).unwrap();
    assert_eq!(out.text, "DISPLAY X.");
}

#[test]
fn fixed_format_strips_sequence_and_comment_lines() {
    let source = [
        "000100* COMMENT",
        "000200 IDENTIFICATION DIVISION.",
        "000300 PROGRAM-ID. FMT.",
    ]
    .join("\n");
    let out = preprocess_source(&source, None, &PreprocessOptions::default()).unwrap();
    // The comment line vanishes (blank line keeps numbering); the
    // sequence area is gone.
    assert_eq!(
        out.text,
        "\nIDENTIFICATION DIVISION.\nPROGRAM-ID. FMT."
    );
}

#[test]
fn fixed_format_discards_identification_area() {
    let line = format!("000100 DISPLAY \"OK\".{}REMARK", " ".repeat(72 - 20));
    assert!(line.chars().count() > 72);
    let out = preprocess_source(&line, None, &PreprocessOptions::default()).unwrap();
    assert_eq!(out.text, "DISPLAY \"OK\".");
}

#[test]
fn variable_format_has_no_right_margin() {
    let long = format!("000100 DISPLAY \"{}\".", "A".repeat(90));
    let options = PreprocessOptions {
        format: SourceFormat::Variable,
        ..PreprocessOptions::default()
    };
    let out = preprocess_source(&long, None, &options).unwrap();
    assert!(out.text.contains(&"A".repeat(90)));
}

#[test]
fn continuation_joins_a_split_literal() {
    let source = [
        "000100 DISPLAY \"FIRST PA",
        "000200-    \"RT\".",
    ]
    .join("\n");
    let out = preprocess_source(&source, None, &PreprocessOptions::default()).unwrap();
    assert!(out.text.contains("DISPLAY \"FIRST PART\"."));
}

#[test]
fn debug_lines_require_the_toggle() {
    let source = "000100D DISPLAY \"DBG\".";
    let off = preprocess_source(source, None, &PreprocessOptions::default()).unwrap();
    assert!(!off.text.contains("DBG"));

    let options = PreprocessOptions {
        debugging_mode: true,
        ..PreprocessOptions::default()
    };
    let on = preprocess_source(source, None, &options).unwrap();
    assert!(on.text.contains("DISPLAY \"DBG\"."));
}

#[test]
fn with_debugging_mode_clause_gates_debug_lines() {
    let source = [
        "000100 ENVIRONMENT DIVISION.",
        "000200 CONFIGURATION SECTION.",
        "000300 SOURCE-COMPUTER. IBM-370 WITH DEBUGGING MODE.",
        "000400D DISPLAY \"DBG\".",
    ]
    .join("\n");
    let out = preprocess_source(&source, None, &PreprocessOptions::default()).unwrap();
    assert!(out.text.contains("DISPLAY \"DBG\"."));
}

#[test]
fn preprocessing_is_idempotent_without_directives() {
    let fixture = [
        "IDENTIFICATION DIVISION.",
        "PROGRAM-ID. IDEM.",
        "PROCEDURE DIVISION.",
        "    DISPLAY \"STABLE\".",
    ]
    .join("\n");
    let once = helpers::preprocess(&fixture);
    // Re-wrap the output in the same format and run it through again.
    let twice = helpers::preprocess(&once.text);
    let trim = |text: &str| {
        text.lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(trim(&once.text), trim(&twice.text));
}

#[test]
fn source_artifact_keeps_the_original_text() {
    let source = "000100 DISPLAY \"X\".";
    let out = preprocess_source(source, None, &PreprocessOptions::default()).unwrap();
    assert_eq!(out.source, source);
    assert_ne!(out.source, out.text);
}
