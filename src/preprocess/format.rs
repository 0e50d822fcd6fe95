//! Physical source layouts.

/// Physical layout of COBOL source lines.
///
/// Decides which columns carry sequence numbers, the indicator, and
/// program text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceFormat {
    /// Columns 1-6 sequence area, column 7 indicator, columns 8-72
    /// program text, columns 73+ identification area (discarded).
    #[default]
    Fixed,
    /// Columns 1-6 sequence area, column 7 indicator, columns 8 to end of
    /// line program text (no right margin).
    Variable,
    /// Column 1 indicator, columns 2 to end of line program text.
    Tandem,
}

impl SourceFormat {
    /// 1-indexed column of the indicator area.
    pub fn indicator_column(self) -> u32 {
        match self {
            SourceFormat::Fixed | SourceFormat::Variable => 7,
            SourceFormat::Tandem => 1,
        }
    }
}
