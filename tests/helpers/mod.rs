//! Shared fixtures for the integration suites.

use std::path::Path;

use cobol_asg::preprocess::{PreprocessOptions, PreprocessedFile, preprocess_source};
use cobol_asg::project::{BuildOptions, build_source};
use cobol_asg::{Program, SourceFormat};

/// Wrap free-form fixture text in tandem format: column 1 becomes the
/// indicator area, so every line gets a leading space.
pub fn tandem(source: &str) -> String {
    source
        .lines()
        .map(|line| format!(" {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn tandem_build_options() -> BuildOptions {
    BuildOptions {
        format: SourceFormat::Tandem,
        ..BuildOptions::default()
    }
}

pub fn tandem_preprocess_options() -> PreprocessOptions {
    PreprocessOptions {
        format: SourceFormat::Tandem,
        ..PreprocessOptions::default()
    }
}

/// Build a free-form fixture through the whole pipeline.
pub fn build(source: &str) -> Program {
    build_source(&tandem(source), None, &tandem_build_options())
        .expect("fixture should build")
}

/// Build with copybooks resolved against `dir`.
pub fn build_with_copy_dir(source: &str, dir: &Path) -> Program {
    let options = BuildOptions {
        copy_dirs: vec![dir.to_path_buf()],
        ..tandem_build_options()
    };
    build_source(&tandem(source), None, &options).expect("fixture should build")
}

/// Preprocess a free-form fixture.
pub fn preprocess(source: &str) -> PreprocessedFile {
    preprocess_source(&tandem(source), None, &tandem_preprocess_options())
        .expect("fixture should preprocess")
}

/// Preprocess with copybooks resolved against `dir`.
pub fn preprocess_with_copy_dir(source: &str, dir: &Path) -> PreprocessedFile {
    let options = PreprocessOptions {
        copy_dirs: vec![dir.to_path_buf()],
        ..tandem_preprocess_options()
    };
    preprocess_source(&tandem(source), None, &options).expect("fixture should preprocess")
}

/// Collapse all whitespace runs, for token-stream comparisons.
pub fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
