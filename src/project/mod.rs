//! Build driver: options, single-file builds, and batch builds.
//!
//! Ties the pipeline together: preprocess, parse, build the ASG. One
//! failing unit never aborts a batch; each path gets its own result.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use crate::asg::{BuildError, Program, build_program};
use crate::base::{LineIndex, SourcePos};
use crate::parser::{Parse, parse_source};
use crate::preprocess::{
    PreprocessError, PreprocessOptions, PreprocessedFile, SourceFormat, preprocess_file,
    preprocess_source,
};

/// Configuration for one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Physical source layout.
    pub format: SourceFormat,
    /// Copybook search directories; empty means the input's directory.
    pub copy_dirs: Vec<PathBuf>,
    /// Copybook extensions, with leading dot, in priority order.
    pub copy_extensions: Vec<String>,
    /// Maximum copybook nesting depth.
    pub max_copy_depth: usize,
    /// Include `D` indicator lines as source.
    pub debugging_mode: bool,
    /// Build the ASG even when the parser reported errors. Error regions
    /// produce no ASG nodes.
    pub lenient_parse: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        let preprocess = PreprocessOptions::default();
        Self {
            format: preprocess.format,
            copy_dirs: preprocess.copy_dirs,
            copy_extensions: preprocess.copy_extensions,
            max_copy_depth: preprocess.max_copy_depth,
            debugging_mode: preprocess.debugging_mode,
            lenient_parse: false,
        }
    }
}

impl BuildOptions {
    fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions {
            format: self.format,
            copy_dirs: self.copy_dirs.clone(),
            copy_extensions: self.copy_extensions.clone(),
            max_copy_depth: self.max_copy_depth,
            debugging_mode: self.debugging_mode,
        }
    }
}

/// Preprocess a file, returning the intermediate artifact.
pub fn preprocess(path: &Path, options: &BuildOptions) -> Result<PreprocessedFile, PreprocessError> {
    preprocess_file(path, &options.preprocess_options())
}

/// Build the ASG for a source file.
pub fn build_file(path: &Path, options: &BuildOptions) -> Result<Program, BuildError> {
    let preprocessed = preprocess_file(path, &options.preprocess_options())?;
    build_preprocessed(Some(path), preprocessed, options)
}

/// Build the ASG for an in-memory source. `file` only labels error
/// positions and anchors the default copybook directory.
pub fn build_source(
    source: &str,
    file: Option<&Path>,
    options: &BuildOptions,
) -> Result<Program, BuildError> {
    let preprocessed = preprocess_source(source, file, &options.preprocess_options())?;
    build_preprocessed(file, preprocessed, options)
}

fn build_preprocessed(
    file: Option<&Path>,
    preprocessed: PreprocessedFile,
    options: &BuildOptions,
) -> Result<Program, BuildError> {
    let parse = parse_source(&preprocessed.text);
    if !parse.ok() && !options.lenient_parse {
        return Err(parse_failure(file, &preprocessed.text, &parse));
    }
    debug!(
        copybooks = preprocessed.copybooks.len(),
        errors = parse.errors.len(),
        "parsed"
    );
    build_program(file, preprocessed.text, parse.green)
}

fn parse_failure(file: Option<&Path>, text: &str, parse: &Parse) -> BuildError {
    let first = &parse.errors[0];
    let line_col = LineIndex::new(text).line_col(first.range.start());
    BuildError::Parse {
        message: first.message.clone(),
        pos: SourcePos::new(
            file.map(Path::to_path_buf),
            line_col.line + 1,
            line_col.col + 1,
        ),
    }
}

/// Build every path, in parallel across programs. Each program gets a
/// fresh registry and preprocessor; a failure is reported in its slot
/// and never stops the rest of the batch.
pub fn build_batch(
    paths: &[PathBuf],
    options: &BuildOptions,
) -> Vec<(PathBuf, Result<Program, BuildError>)> {
    paths
        .par_iter()
        .map(|path| (path.clone(), build_file(path, options)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory fixtures use tandem format: column 1 is the indicator.
    fn tandem() -> BuildOptions {
        BuildOptions {
            format: SourceFormat::Tandem,
            ..BuildOptions::default()
        }
    }

    #[test]
    fn build_source_produces_a_program() {
        let source = " IDENTIFICATION DIVISION.\n PROGRAM-ID. T.\n PROCEDURE DIVISION.\n     DISPLAY \"X\".\n";
        let program = build_source(source, None, &tandem()).unwrap();
        assert_eq!(program.units().len(), 1);
        assert!(program.registry().is_frozen());
    }

    #[test]
    fn parse_errors_are_fatal_by_default() {
        let source = " IDENTIFICATION DIVISION.\n PROGRAM-ID. T.\n PROCEDURE DIVSION.\n";
        let err = build_source(source, None, &tandem()).unwrap_err();
        assert!(matches!(err, BuildError::Parse { .. }));
    }

    #[test]
    fn lenient_parse_still_builds() {
        let source = " IDENTIFICATION DIVISION.\n PROGRAM-ID. T.\n PROCEDURE DIVSION.\n";
        let options = BuildOptions {
            lenient_parse: true,
            ..tandem()
        };
        let program = build_source(source, None, &options).unwrap();
        assert_eq!(program.units().len(), 1);
    }

    #[test]
    fn batch_reports_per_file_results() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.cbl");
        let bad = dir.path().join("bad.cbl");
        std::fs::write(
            &good,
            "000100 IDENTIFICATION DIVISION.\n000200 PROGRAM-ID. G.\n",
        )
        .unwrap();
        std::fs::write(&bad, "000100 COPY MISSING.\n").unwrap();

        let results = build_batch(&[good.clone(), bad.clone()], &BuildOptions::default());
        assert_eq!(results.len(), 2);
        let by_path = |p: &PathBuf| results.iter().find(|(path, _)| path == p).unwrap();
        assert!(by_path(&good).1.is_ok());
        assert!(matches!(
            by_path(&bad).1,
            Err(BuildError::Preprocess(PreprocessError::CopybookNotFound { .. }))
        ));
    }
}
