//! COBOL source preprocessor.
//!
//! Turns raw COBOL-85 source into the normalized, fully expanded text the
//! grammar front-end consumes:
//!
//! 1. [`normalizer`] strips sequence numbers, applies indicator-area
//!    semantics (comments, continuations, debug lines) for the
//!    [`SourceFormat`] in use, and joins continued lines.
//! 2. The [`preprocessor`] scans the normalized stream at directive
//!    granularity and expands `COPY` (recursively, with `REPLACING`),
//!    tracks `REPLACE`/`REPLACE OFF` blocks, and passes
//!    `EXEC ... END-EXEC` regions through untouched.
//!
//! The result is a [`PreprocessedFile`] carrying both the original source
//! and the expanded text, retrievable as an intermediate artifact.

mod copybook;
mod error;
mod format;
mod normalizer;
mod preprocessor;
mod replace;
mod scan;

pub use error::PreprocessError;
pub use format::SourceFormat;
pub use preprocessor::{
    ExpandedCopybook, PreprocessOptions, PreprocessedFile, preprocess_file, preprocess_source,
};
