//! Source location types
//!
//! Two views of the same location are used throughout the crate:
//! - `TextRange`: byte offsets into the source text (what edits are expressed in)
//! - `Span`: 1-indexed line / 0-indexed column pairs (what humans read)

use serde::{Deserialize, Serialize};

/// Byte range in source text (`start..end`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width range at `offset`
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, other: &TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True when both ranges share at least one byte.
    ///
    /// Two zero-width ranges never overlap; a zero-width range overlaps a
    /// non-empty range only when it lies strictly inside it.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        if self.is_empty() && other.is_empty() {
            return false;
        }
        if self.is_empty() {
            return other.start < self.start && self.start < other.end;
        }
        if other.is_empty() {
            return self.start < other.start && other.start < self.end;
        }
        self.start < other.end && other.start < self.end
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Span in source code (1-indexed lines, 0-indexed columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

/// Byte offset → line/column conversion
///
/// Built on demand; edits are always produced as byte offsets and only
/// converted when a caller needs positions for display.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// (1-indexed line, 0-indexed byte column) for `offset`
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line];
        (line as u32 + 1, col as u32)
    }

    pub fn span(&self, range: TextRange) -> Span {
        let (start_line, start_col) = self.line_col(range.start);
        let (end_line, end_col) = self.line_col(range.end);
        Span::new(start_line, start_col, end_line, end_col)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
