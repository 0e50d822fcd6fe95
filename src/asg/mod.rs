//! The Abstract Semantic Graph.
//!
//! A [`Program`] owns an arena of [`AsgNode`]s (common header + tagged
//! payload), the [`ElementRegistry`] mapping parse-tree contexts back to
//! the nodes built from them, and the semantic [`Diagnostic`]s gathered
//! while building. Construction runs a fixed sequence of passes (see
//! [`builder`]); cross-references are [`SymbolRef`]s resolved by the
//! statement pass, with unresolved names kept as placeholders.

pub(crate) mod builder;
mod diagnostics;
mod error;
mod node;
mod program;
mod reference;
pub(crate) mod registry;
mod resolve;

pub use diagnostics::Diagnostic;
pub use error::BuildError;
pub use node::{
    AcceptData, ArithmeticData, AsgNode, AssignClauseData, AccessModeClauseData, CallData,
    CompilationUnitData, ComputeData, ConditionData, ContainsClauseData,
    DataDescriptionEntryData, DataEntryKind, DataRecordsData, DisplayData, ExecData,
    FileControlEntryData, FileDescriptionEntryData, FileDescriptorKind, FileListData, GoToData,
    IdentificationDivisionData, IdentificationParagraphData, KeyClauseData, LabelRecordsData,
    MnemonicEntryData, MoveData, NodeData, NodeId, NodeKind, OccursClauseData,
    OrganizationClauseData, ParagraphData, PerformData, PictureClauseData, ProcedureDivisionData,
    ProcedureRange, ProcedureSectionData, ReadData, RedefinesClauseData, RenamesClauseData,
    SetData, SignClauseData, SourceComputerData, StatementData, TargetListData, UsageClauseData,
    ValueClauseData, ValueRange, WriteData,
};
pub use program::Program;
pub use reference::{Operand, RefKind, RefTarget, SymbolRef};
pub use registry::ElementRegistry;

pub(crate) use builder::build_program;
