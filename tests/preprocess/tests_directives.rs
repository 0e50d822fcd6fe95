//! COPY and REPLACE expansion against real copybook directories.

use std::fs;

use cobol_asg::preprocess::{PreprocessError, PreprocessOptions, SourceFormat, preprocess_source};

use crate::helpers::{self, collapse, preprocess_with_copy_dir, tandem};

fn write_copybook(dir: &std::path::Path, name: &str, content: &str) {
    fs::write(dir.join(name), tandem(content)).unwrap();
}

#[test]
fn copy_with_replacing_rewrites_tagged_words() {
    let dir = tempfile::tempdir().unwrap();
    write_copybook(
        dir.path(),
        "PART.cpy",
        "01 :TAG:-REC. 05 :TAG:-NAME PIC X(20).",
    );
    let out = preprocess_with_copy_dir(
        "COPY PART REPLACING ==:TAG:== BY CUST.",
        dir.path(),
    );
    assert!(
        out.text.contains("01 CUST-REC. 05 CUST-NAME PIC X(20)."),
        "got: {}",
        out.text
    );
}

#[test]
fn copy_expands_nested_copybooks() {
    let dir = tempfile::tempdir().unwrap();
    write_copybook(dir.path(), "OUTER.cpy", "01 O-REC. COPY INNER.");
    write_copybook(dir.path(), "INNER.cpy", "05 I-FIELD PIC 9.");
    let out = preprocess_with_copy_dir("COPY OUTER.", dir.path());
    assert!(out.text.contains("01 O-REC."));
    assert!(out.text.contains("05 I-FIELD PIC 9."));
    let names: Vec<_> = out
        .copybooks
        .iter()
        .map(|copybook| copybook.name.as_str())
        .collect();
    assert_eq!(names, ["OUTER", "INNER"]);
}

#[test]
fn recursive_copybooks_fail_naming_the_cycle() {
    let dir = tempfile::tempdir().unwrap();
    write_copybook(dir.path(), "A.cpy", "COPY B.");
    write_copybook(dir.path(), "B.cpy", "COPY A.");
    let options = PreprocessOptions {
        format: SourceFormat::Tandem,
        copy_dirs: vec![dir.path().to_path_buf()],
        ..PreprocessOptions::default()
    };
    let err = preprocess_source(&tandem("COPY A."), None, &options).unwrap_err();
    match err {
        PreprocessError::RecursiveCopybook { name, stack, .. } => {
            assert_eq!(name, "A");
            assert!(stack.contains(&"A".into()));
            assert!(stack.contains(&"B".into()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn copy_depth_limit_guards_deep_chains() {
    let dir = tempfile::tempdir().unwrap();
    write_copybook(dir.path(), "C0.cpy", "COPY C1.");
    write_copybook(dir.path(), "C1.cpy", "COPY C2.");
    write_copybook(dir.path(), "C2.cpy", "01 DEEP PIC X.");
    let options = PreprocessOptions {
        format: SourceFormat::Tandem,
        copy_dirs: vec![dir.path().to_path_buf()],
        max_copy_depth: 2,
        ..PreprocessOptions::default()
    };
    let err = preprocess_source(&tandem("COPY C0."), None, &options).unwrap_err();
    assert!(matches!(
        err,
        PreprocessError::CopyDepthExceeded { limit: 2, .. }
    ));
}

#[test]
fn copybook_lookup_is_case_insensitive_on_the_stem() {
    let dir = tempfile::tempdir().unwrap();
    write_copybook(dir.path(), "CUSTREC.CPY", "01 CUST PIC X.");
    let out = preprocess_with_copy_dir("COPY custrec.", dir.path());
    assert!(out.text.contains("01 CUST PIC X."));
}

#[test]
fn copy_of_library_searches_the_library_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("PAYLIB")).unwrap();
    write_copybook(&dir.path().join("PAYLIB"), "RATES.cpy", "01 RATE PIC 9V99.");
    let out = preprocess_with_copy_dir("COPY RATES OF PAYLIB.", dir.path());
    assert!(out.text.contains("01 RATE PIC 9V99."));
}

#[test]
fn replace_applies_to_later_copy_expansions() {
    // REPLACE X BY Y. COPY F. must equal inlining F's text and applying
    // the replacement, when F has no nested directives.
    let dir = tempfile::tempdir().unwrap();
    write_copybook(dir.path(), "F.cpy", "01 OLD-NAME PIC X.");
    let replaced = preprocess_with_copy_dir(
        "REPLACE ==OLD-NAME== BY ==NEW-NAME==.\nCOPY F.",
        dir.path(),
    );
    let inlined = helpers::preprocess(
        "REPLACE ==OLD-NAME== BY ==NEW-NAME==.\n01 OLD-NAME PIC X.",
    );
    assert_eq!(collapse(&replaced.text), collapse(&inlined.text));
    assert!(replaced.text.contains("01 NEW-NAME PIC X."));
}

#[test]
fn copy_replacing_word_and_literal_patterns() {
    let dir = tempfile::tempdir().unwrap();
    write_copybook(
        dir.path(),
        "MSGS.cpy",
        "01 GREETING PIC X(10) VALUE 'hello'.",
    );
    let out = preprocess_with_copy_dir(
        "COPY MSGS REPLACING GREETING BY SALUTATION 'hello' BY 'howdy'.",
        dir.path(),
    );
    assert!(out.text.contains("01 SALUTATION PIC X(10) VALUE 'howdy'."));
}

#[test]
fn missing_copybook_reports_position_and_paths() {
    let dir = tempfile::tempdir().unwrap();
    let options = PreprocessOptions {
        format: SourceFormat::Tandem,
        copy_dirs: vec![dir.path().to_path_buf()],
        ..PreprocessOptions::default()
    };
    let err =
        preprocess_source(&tandem("DISPLAY.\nCOPY GHOST."), None, &options).unwrap_err();
    match err {
        PreprocessError::CopybookNotFound { name, searched, pos } => {
            assert_eq!(name, "GHOST");
            assert_eq!(searched, vec![dir.path().to_path_buf()]);
            assert_eq!(pos.line, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}
