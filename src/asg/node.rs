//! ASG node model.
//!
//! Every node is a small common header (id, parent, parse-tree context,
//! owned children) plus a tagged [`NodeData`] payload, one light variant
//! per element kind. Ownership is strictly tree-shaped; anything
//! cross-cutting is a [`SymbolRef`] holding an opaque [`NodeId`].

use smol_str::SmolStr;

use crate::parser::SyntaxNodePtr;

use super::reference::{Operand, SymbolRef};

/// Identity of a node, unique within its [`super::Program`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// One ASG node: header plus payload.
#[derive(Debug, Clone)]
pub struct AsgNode {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) ctx: SyntaxNodePtr,
    pub(crate) children: Vec<NodeId>,
    pub(crate) data: NodeData,
}

impl AsgNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Pointer to the parse-tree context this node was built from.
    pub fn ctx(&self) -> SyntaxNodePtr {
        self.ctx.clone()
    }

    /// Owned children, in creation order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    /// The defining name of this node, for the kinds that have one.
    pub fn name(&self) -> Option<&SmolStr> {
        match &self.data {
            NodeData::CompilationUnit(data) => Some(&data.name),
            NodeData::FileControlEntry(data) => Some(&data.name),
            NodeData::FileDescriptionEntry(data) => Some(&data.name),
            NodeData::DataDescriptionEntry(data) => data.name.as_ref(),
            NodeData::ProcedureSection(data) => Some(&data.name),
            NodeData::Paragraph(data) => Some(&data.name),
            NodeData::MnemonicEntry(data) => Some(&data.mnemonic),
            _ => None,
        }
    }
}

/// Discriminant of [`NodeData`], used for owner lookups and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    CompilationUnit,
    ProgramUnit,
    IdentificationDivision,
    IdentificationParagraph,
    EnvironmentDivision,
    ConfigurationSection,
    SourceComputerParagraph,
    ObjectComputerParagraph,
    SpecialNamesParagraph,
    MnemonicEntry,
    InputOutputSection,
    FileControlParagraph,
    FileControlEntry,
    AssignClause,
    OrganizationClause,
    AccessModeClause,
    RecordKeyClause,
    AlternateKeyClause,
    RelativeKeyClause,
    FileStatusClause,
    DataDivision,
    FileSection,
    WorkingStorageSection,
    LocalStorageSection,
    LinkageSection,
    FileDescriptionEntry,
    BlockContainsClause,
    RecordContainsClause,
    LabelRecordsClause,
    DataRecordsClause,
    DataDescriptionEntry,
    PictureClause,
    UsageClause,
    ValueClause,
    RedefinesClause,
    RenamesClause,
    OccursClause,
    SignClause,
    JustifiedClause,
    BlankWhenZeroClause,
    SynchronizedClause,
    GlobalClause,
    ExternalClause,
    ProcedureDivision,
    ProcedureSection,
    Paragraph,
    Sentence,
    Statement,
}

/// Payload of an ASG node.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The root; owns the compilation units.
    Program,
    CompilationUnit(CompilationUnitData),
    ProgramUnit,

    IdentificationDivision(IdentificationDivisionData),
    IdentificationParagraph(IdentificationParagraphData),

    EnvironmentDivision,
    ConfigurationSection,
    SourceComputerParagraph(SourceComputerData),
    ObjectComputerParagraph,
    SpecialNamesParagraph,
    MnemonicEntry(MnemonicEntryData),
    InputOutputSection,
    FileControlParagraph,
    FileControlEntry(FileControlEntryData),
    AssignClause(AssignClauseData),
    OrganizationClause(OrganizationClauseData),
    AccessModeClause(AccessModeClauseData),
    RecordKeyClause(KeyClauseData),
    AlternateKeyClause(KeyClauseData),
    RelativeKeyClause(KeyClauseData),
    FileStatusClause(KeyClauseData),

    DataDivision,
    FileSection,
    WorkingStorageSection,
    LocalStorageSection,
    LinkageSection,
    FileDescriptionEntry(FileDescriptionEntryData),
    BlockContainsClause(ContainsClauseData),
    RecordContainsClause(ContainsClauseData),
    LabelRecordsClause(LabelRecordsData),
    DataRecordsClause(DataRecordsData),
    DataDescriptionEntry(DataDescriptionEntryData),
    PictureClause(PictureClauseData),
    UsageClause(UsageClauseData),
    ValueClause(ValueClauseData),
    RedefinesClause(RedefinesClauseData),
    RenamesClause(RenamesClauseData),
    OccursClause(OccursClauseData),
    SignClause(SignClauseData),
    JustifiedClause,
    BlankWhenZeroClause,
    SynchronizedClause,
    GlobalClause,
    ExternalClause,

    ProcedureDivision(ProcedureDivisionData),
    ProcedureSection(ProcedureSectionData),
    Paragraph(ParagraphData),
    Sentence,
    Statement(StatementData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Program => NodeKind::Program,
            NodeData::CompilationUnit(_) => NodeKind::CompilationUnit,
            NodeData::ProgramUnit => NodeKind::ProgramUnit,
            NodeData::IdentificationDivision(_) => NodeKind::IdentificationDivision,
            NodeData::IdentificationParagraph(_) => NodeKind::IdentificationParagraph,
            NodeData::EnvironmentDivision => NodeKind::EnvironmentDivision,
            NodeData::ConfigurationSection => NodeKind::ConfigurationSection,
            NodeData::SourceComputerParagraph(_) => NodeKind::SourceComputerParagraph,
            NodeData::ObjectComputerParagraph => NodeKind::ObjectComputerParagraph,
            NodeData::SpecialNamesParagraph => NodeKind::SpecialNamesParagraph,
            NodeData::MnemonicEntry(_) => NodeKind::MnemonicEntry,
            NodeData::InputOutputSection => NodeKind::InputOutputSection,
            NodeData::FileControlParagraph => NodeKind::FileControlParagraph,
            NodeData::FileControlEntry(_) => NodeKind::FileControlEntry,
            NodeData::AssignClause(_) => NodeKind::AssignClause,
            NodeData::OrganizationClause(_) => NodeKind::OrganizationClause,
            NodeData::AccessModeClause(_) => NodeKind::AccessModeClause,
            NodeData::RecordKeyClause(_) => NodeKind::RecordKeyClause,
            NodeData::AlternateKeyClause(_) => NodeKind::AlternateKeyClause,
            NodeData::RelativeKeyClause(_) => NodeKind::RelativeKeyClause,
            NodeData::FileStatusClause(_) => NodeKind::FileStatusClause,
            NodeData::DataDivision => NodeKind::DataDivision,
            NodeData::FileSection => NodeKind::FileSection,
            NodeData::WorkingStorageSection => NodeKind::WorkingStorageSection,
            NodeData::LocalStorageSection => NodeKind::LocalStorageSection,
            NodeData::LinkageSection => NodeKind::LinkageSection,
            NodeData::FileDescriptionEntry(_) => NodeKind::FileDescriptionEntry,
            NodeData::BlockContainsClause(_) => NodeKind::BlockContainsClause,
            NodeData::RecordContainsClause(_) => NodeKind::RecordContainsClause,
            NodeData::LabelRecordsClause(_) => NodeKind::LabelRecordsClause,
            NodeData::DataRecordsClause(_) => NodeKind::DataRecordsClause,
            NodeData::DataDescriptionEntry(_) => NodeKind::DataDescriptionEntry,
            NodeData::PictureClause(_) => NodeKind::PictureClause,
            NodeData::UsageClause(_) => NodeKind::UsageClause,
            NodeData::ValueClause(_) => NodeKind::ValueClause,
            NodeData::RedefinesClause(_) => NodeKind::RedefinesClause,
            NodeData::RenamesClause(_) => NodeKind::RenamesClause,
            NodeData::OccursClause(_) => NodeKind::OccursClause,
            NodeData::SignClause(_) => NodeKind::SignClause,
            NodeData::JustifiedClause => NodeKind::JustifiedClause,
            NodeData::BlankWhenZeroClause => NodeKind::BlankWhenZeroClause,
            NodeData::SynchronizedClause => NodeKind::SynchronizedClause,
            NodeData::GlobalClause => NodeKind::GlobalClause,
            NodeData::ExternalClause => NodeKind::ExternalClause,
            NodeData::ProcedureDivision(_) => NodeKind::ProcedureDivision,
            NodeData::ProcedureSection(_) => NodeKind::ProcedureSection,
            NodeData::Paragraph(_) => NodeKind::Paragraph,
            NodeData::Sentence => NodeKind::Sentence,
            NodeData::Statement(_) => NodeKind::Statement,
        }
    }
}

// ============================================================================
// STRUCTURE PAYLOADS
// ============================================================================

#[derive(Debug, Clone)]
pub struct CompilationUnitData {
    /// The PROGRAM-ID name.
    pub name: SmolStr,
}

#[derive(Debug, Clone)]
pub struct IdentificationDivisionData {
    pub program_name: SmolStr,
}

/// AUTHOR, INSTALLATION, DATE-WRITTEN and friends; free-form text.
#[derive(Debug, Clone)]
pub struct IdentificationParagraphData {
    pub keyword: SmolStr,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct SourceComputerData {
    /// `WITH DEBUGGING MODE` present.
    pub debugging_mode: bool,
}

#[derive(Debug, Clone)]
pub struct MnemonicEntryData {
    /// The implementor environment name (`SYSOUT`, `C01`, ...).
    pub environment: SmolStr,
    /// The user-declared mnemonic.
    pub mnemonic: SmolStr,
}

// ============================================================================
// FILE CONTROL / FILE DESCRIPTION PAYLOADS
// ============================================================================

#[derive(Debug, Clone)]
pub struct FileControlEntryData {
    pub name: SmolStr,
    pub optional: bool,
    /// Cross-link to the FD/SD entry with the same file name.
    pub file_description: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct AssignClauseData {
    /// Assignment target as written (device word or literal).
    pub target: SmolStr,
}

#[derive(Debug, Clone)]
pub struct OrganizationClauseData {
    /// `SEQUENTIAL`, `LINE SEQUENTIAL`, `RELATIVE`, or `INDEXED`.
    pub organization: SmolStr,
}

#[derive(Debug, Clone)]
pub struct AccessModeClauseData {
    pub mode: SmolStr,
}

/// Shared payload of the key/status clauses: one data-name reference.
#[derive(Debug, Clone)]
pub struct KeyClauseData {
    pub name: SymbolRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDescriptorKind {
    Fd,
    Sd,
}

#[derive(Debug, Clone)]
pub struct FileDescriptionEntryData {
    pub name: SmolStr,
    pub kind: FileDescriptorKind,
    /// Cross-link to the SELECT entry with the same file name.
    pub file_control: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ContainsClauseData {
    pub min: u32,
    pub max: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct LabelRecordsData {
    /// true = STANDARD, false = OMITTED.
    pub standard: bool,
}

#[derive(Debug, Clone)]
pub struct DataRecordsData {
    pub records: Vec<SymbolRef>,
}

// ============================================================================
// DATA DESCRIPTION PAYLOADS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataEntryKind {
    /// Levels 01-49 and 77.
    Item,
    /// Level 66.
    Renames,
    /// Level 88.
    Condition,
}

#[derive(Debug, Clone)]
pub struct DataDescriptionEntryData {
    pub level: u8,
    /// None for FILLER and unnamed entries.
    pub name: Option<SmolStr>,
    pub kind: DataEntryKind,
    pub global: bool,
    pub external: bool,
    /// For level-88 entries: the conditional variable, linked in the
    /// data-links pass.
    pub condition_subject: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct PictureClauseData {
    /// The picture character-string, e.g. `S9(4)V99`.
    pub picture: SmolStr,
}

#[derive(Debug, Clone)]
pub struct UsageClauseData {
    /// The usage word as written (`COMP-3`, `BINARY`, `DISPLAY`, ...).
    pub usage: SmolStr,
}

#[derive(Debug, Clone)]
pub struct ValueRange {
    pub from: SmolStr,
    pub thru: Option<SmolStr>,
}

#[derive(Debug, Clone)]
pub struct ValueClauseData {
    pub values: Vec<ValueRange>,
}

#[derive(Debug, Clone)]
pub struct RedefinesClauseData {
    pub target: SymbolRef,
}

#[derive(Debug, Clone)]
pub struct RenamesClauseData {
    pub from: SymbolRef,
    pub thru: Option<SymbolRef>,
}

#[derive(Debug, Clone)]
pub struct OccursClauseData {
    pub min: u32,
    /// Present for `OCCURS min TO max DEPENDING ON`.
    pub max: Option<u32>,
    pub depending_on: Option<SymbolRef>,
    /// Index names declared by `INDEXED BY`.
    pub indexed_by: Vec<SmolStr>,
}

#[derive(Debug, Clone)]
pub struct SignClauseData {
    /// true = LEADING, false = TRAILING.
    pub leading: bool,
    pub separate: bool,
}

// ============================================================================
// PROCEDURE PAYLOADS
// ============================================================================

#[derive(Debug, Clone)]
pub struct ProcedureDivisionData {
    /// `PROCEDURE DIVISION USING` parameters.
    pub using: Vec<SymbolRef>,
}

#[derive(Debug, Clone)]
pub struct ProcedureSectionData {
    pub name: SmolStr,
}

#[derive(Debug, Clone)]
pub struct ParagraphData {
    pub name: SmolStr,
}

/// Statement payloads. Skeletons are created by the procedure pass with
/// empty operand lists; the statement pass fills them in.
#[derive(Debug, Clone)]
pub enum StatementData {
    Move(MoveData),
    Display(DisplayData),
    Accept(AcceptData),
    Add(ArithmeticData),
    Subtract(ArithmeticData),
    Multiply(ArithmeticData),
    Divide(ArithmeticData),
    Compute(ComputeData),
    If(ConditionData),
    Perform(PerformData),
    GoTo(GoToData),
    Call(CallData),
    Stop,
    Exit,
    Continue,
    Open(FileListData),
    Close(FileListData),
    Read(ReadData),
    Write(WriteData),
    Set(SetData),
    Initialize(TargetListData),
    Exec(ExecData),
}

impl StatementData {
    /// Short verb name for diagnostics and dumps.
    pub fn verb(&self) -> &'static str {
        match self {
            StatementData::Move(_) => "MOVE",
            StatementData::Display(_) => "DISPLAY",
            StatementData::Accept(_) => "ACCEPT",
            StatementData::Add(_) => "ADD",
            StatementData::Subtract(_) => "SUBTRACT",
            StatementData::Multiply(_) => "MULTIPLY",
            StatementData::Divide(_) => "DIVIDE",
            StatementData::Compute(_) => "COMPUTE",
            StatementData::If(_) => "IF",
            StatementData::Perform(_) => "PERFORM",
            StatementData::GoTo(_) => "GO TO",
            StatementData::Call(_) => "CALL",
            StatementData::Stop => "STOP",
            StatementData::Exit => "EXIT",
            StatementData::Continue => "CONTINUE",
            StatementData::Open(_) => "OPEN",
            StatementData::Close(_) => "CLOSE",
            StatementData::Read(_) => "READ",
            StatementData::Write(_) => "WRITE",
            StatementData::Set(_) => "SET",
            StatementData::Initialize(_) => "INITIALIZE",
            StatementData::Exec(_) => "EXEC",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MoveData {
    pub source: Option<Operand>,
    pub targets: Vec<SymbolRef>,
}

#[derive(Debug, Clone, Default)]
pub struct DisplayData {
    pub operands: Vec<Operand>,
    pub upon: Option<SymbolRef>,
}

#[derive(Debug, Clone, Default)]
pub struct AcceptData {
    pub target: Option<SymbolRef>,
    pub from: Option<SymbolRef>,
}

/// ADD/SUBTRACT/MULTIPLY/DIVIDE share this shape.
#[derive(Debug, Clone, Default)]
pub struct ArithmeticData {
    pub operands: Vec<Operand>,
    pub targets: Vec<SymbolRef>,
    pub giving: Vec<SymbolRef>,
}

#[derive(Debug, Clone, Default)]
pub struct ComputeData {
    pub targets: Vec<SymbolRef>,
    /// Operands referenced by the right-hand expression.
    pub operands: Vec<Operand>,
}

/// IF and the other condition carriers: the operands the condition reads.
#[derive(Debug, Clone, Default)]
pub struct ConditionData {
    pub operands: Vec<Operand>,
}

#[derive(Debug, Clone)]
pub struct ProcedureRange {
    pub from: SymbolRef,
    pub thru: Option<SymbolRef>,
}

#[derive(Debug, Clone, Default)]
pub struct PerformData {
    pub target: Option<ProcedureRange>,
    /// Operands read by UNTIL/VARYING phrases.
    pub operands: Vec<Operand>,
}

#[derive(Debug, Clone, Default)]
pub struct GoToData {
    pub targets: Vec<SymbolRef>,
    pub depending_on: Option<SymbolRef>,
}

#[derive(Debug, Clone, Default)]
pub struct CallData {
    pub target: Option<Operand>,
    pub using: Vec<Operand>,
}

#[derive(Debug, Clone, Default)]
pub struct FileListData {
    pub files: Vec<SymbolRef>,
}

#[derive(Debug, Clone, Default)]
pub struct ReadData {
    pub file: Option<SymbolRef>,
    pub into: Option<SymbolRef>,
}

#[derive(Debug, Clone, Default)]
pub struct WriteData {
    pub record: Option<SymbolRef>,
    pub from: Option<SymbolRef>,
}

#[derive(Debug, Clone, Default)]
pub struct SetData {
    pub targets: Vec<SymbolRef>,
    pub value: Option<Operand>,
}

#[derive(Debug, Clone, Default)]
pub struct TargetListData {
    pub targets: Vec<SymbolRef>,
}

/// An EXEC block; the embedded text is preserved verbatim.
#[derive(Debug, Clone, Default)]
pub struct ExecData {
    pub language: SmolStr,
    pub payload: String,
}
