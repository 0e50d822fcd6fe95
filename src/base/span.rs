//! Byte-offset to line/column conversion.

pub use text_size::{TextRange, TextSize};

/// A 0-indexed line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Maps byte offsets in one text to line/column pairs.
///
/// Built once per text; lookups are a binary search over line starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset to line/column. Offsets past the end clamp to
    /// the last position.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = u32::from(offset) - u32::from(self.line_starts[line]);
        LineCol {
            line: line as u32,
            col,
        }
    }

    /// Byte offset of the start of `line`, if it exists.
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        self.line_starts.get(line as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_col(TextSize::new(0)), LineCol { line: 0, col: 0 });
    }

    #[test]
    fn line_col_roundtrip() {
        let index = LineIndex::new("abc\ndef\n\nx");
        assert_eq!(index.line_col(TextSize::new(0)), LineCol { line: 0, col: 0 });
        assert_eq!(index.line_col(TextSize::new(3)), LineCol { line: 0, col: 3 });
        assert_eq!(index.line_col(TextSize::new(4)), LineCol { line: 1, col: 0 });
        assert_eq!(index.line_col(TextSize::new(8)), LineCol { line: 2, col: 0 });
        assert_eq!(index.line_col(TextSize::new(9)), LineCol { line: 3, col: 0 });
        // Past the end clamps.
        assert_eq!(index.line_col(TextSize::new(99)), LineCol { line: 3, col: 1 });
    }
}
