//! Preprocessor error taxonomy.

use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::SourcePos;

/// Errors raised while normalizing and expanding COBOL source.
///
/// All variants are fatal for the compilation unit being preprocessed and
/// carry the 1-indexed source position of the offending text.
#[derive(Debug, Error)]
pub enum PreprocessError {
    /// A `COPY` named a copybook that no configured directory contains.
    #[error("{pos}: copybook '{name}' not found (searched {searched:?})")]
    CopybookNotFound {
        name: SmolStr,
        searched: Vec<PathBuf>,
        pos: SourcePos,
    },

    /// A copybook directly or indirectly copies itself.
    #[error("{pos}: recursive copybook '{name}' (expansion stack: {stack:?})")]
    RecursiveCopybook {
        name: SmolStr,
        stack: Vec<SmolStr>,
        pos: SourcePos,
    },

    /// Copybook nesting went past the configured limit without cycling.
    #[error("{pos}: copybook nesting exceeds {limit} levels")]
    CopyDepthExceeded { limit: usize, pos: SourcePos },

    /// A malformed directive or indicator area.
    #[error("{pos}: {message}")]
    Syntax { message: String, pos: SourcePos },

    /// Reading a source file or copybook failed.
    #[error("{pos}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        pos: SourcePos,
    },
}

impl PreprocessError {
    /// The source position the error points at.
    pub fn pos(&self) -> &SourcePos {
        match self {
            PreprocessError::CopybookNotFound { pos, .. }
            | PreprocessError::RecursiveCopybook { pos, .. }
            | PreprocessError::CopyDepthExceeded { pos, .. }
            | PreprocessError::Syntax { pos, .. }
            | PreprocessError::Io { pos, .. } => pos,
        }
    }

    pub(crate) fn syntax(message: impl Into<String>, pos: SourcePos) -> Self {
        PreprocessError::Syntax {
            message: message.into(),
            pos,
        }
    }
}
