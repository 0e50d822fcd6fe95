//! # cobol-asg
//!
//! COBOL-85 preprocessing, parsing, and Abstract Semantic Graph
//! construction.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project    → build driver: options, single-file and batch builds
//!   ↓
//! asg        → node model, element registry, builder passes, resolution
//!   ↓
//! parser     → logos lexer, recursive-descent parser, rowan CST
//!   ↓
//! preprocess → source normalizer, COPY/REPLACE expansion, copybooks
//!   ↓
//! base       → primitives (Span, LineIndex, SourcePos)
//! ```
//!
//! The pipeline: [`preprocess`] turns raw fixed/variable/tandem source
//! into an expanded character stream; [`parser`] produces a lossless
//! parse tree shaped like the grammar productions; [`asg`] runs a fixed
//! sequence of builder passes that create typed nodes, register each
//! parse-tree context, and resolve name references. [`project`] ties it
//! together:
//!
//! ```no_run
//! use cobol_asg::project::{BuildOptions, build_file};
//!
//! let program = build_file("payroll.cbl".as_ref(), &BuildOptions::default())?;
//! for &unit in program.units() {
//!     println!("unit {:?}", program.node(unit).name());
//! }
//! # Ok::<(), cobol_asg::asg::BuildError>(())
//! ```

// ============================================================================
// MODULES (dependency order: base → preprocess → parser → asg → project)
// ============================================================================

/// Foundation types: Span, LineIndex, SourcePos
pub mod base;

/// Preprocessor: normalizer, directives, copybooks
pub mod preprocess;

/// Parser: logos lexer, recursive-descent parser, rowan CST
pub mod parser;

/// The Abstract Semantic Graph and its builder
pub mod asg;

/// Build driver: options, file and batch builds
pub mod project;

// Re-export commonly needed items
pub use asg::{
    AsgNode, BuildError, Diagnostic, NodeData, NodeId, NodeKind, Operand, Program, RefKind,
    RefTarget, StatementData, SymbolRef,
};
pub use base::{LineCol, LineIndex, Position, SourcePos, Span, TextRange, TextSize};
pub use preprocess::{PreprocessError, PreprocessedFile, SourceFormat};
pub use project::{BuildOptions, build_batch, build_file, build_source};
