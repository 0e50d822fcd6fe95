//! Foundation types for the COBOL ASG toolchain.
//!
//! This module provides fundamental types used throughout the pipeline:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for ASG nodes
//! - [`SourcePos`] - 1-indexed file/line/column attached to errors
//!
//! This module has NO dependencies on other cobol_asg modules.

mod position;
mod span;

pub use position::{Position, SourcePos, Span};
pub use span::{LineCol, LineIndex, TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
