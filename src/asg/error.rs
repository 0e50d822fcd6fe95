//! Fatal build errors.

use thiserror::Error;

use crate::base::SourcePos;
use crate::preprocess::PreprocessError;

/// Errors that abort the build of one compilation unit.
///
/// Semantic findings (unresolved names, duplicates) are *not* errors;
/// they are recorded on the ASG as [`super::Diagnostic`]s.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The preprocessor rejected the source.
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),

    /// The grammar front-end rejected the preprocessed text.
    #[error("{pos}: parse error: {message}")]
    Parse { message: String, pos: SourcePos },

    /// A parse-tree context had no registered owner. This is a mismatch
    /// between the grammar and the builder, i.e. a bug; the offending
    /// context kind is kept for debugging.
    #[error("{pos}: no owner for context {context}")]
    UnownedContext { context: String, pos: SourcePos },
}
