//! Source positions, ranges and offset-to-line mapping
//!
//! Architecture: Value Objects - Locations are plain offsets into one source buffer
//! - A location can be shifted by a non-negative offset within the same buffer
//! - Ranges are inclusive at both ends, matching token-range fix-it conventions
//! - LineIndex translates offsets into human coordinates only at the edges

use serde::{Deserialize, Serialize};
use std::fmt;

/// A byte offset into a single source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceLocation {
    offset: usize,
}

impl SourceLocation {
    pub fn new(offset: usize) -> Self {
        Self { offset }
    }

    pub fn offset(self) -> usize {
        self.offset
    }

    /// Location `offset` bytes further into the same buffer
    pub fn with_offset(self, offset: usize) -> Self {
        Self {
            offset: self.offset + offset,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.offset)
    }
}

/// Inclusive source range: `end` addresses the last byte covered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub begin: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub fn new(begin: SourceLocation, end: SourceLocation) -> Self {
        debug_assert!(begin <= end, "range begins after it ends");
        Self { begin, end }
    }

    /// Number of bytes spanned, counting both ends
    pub fn len(&self) -> usize {
        self.end.offset() - self.begin.offset() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, location: SourceLocation) -> bool {
        self.begin <= location && location <= self.end
    }

    pub fn overlaps(&self, other: &SourceRange) -> bool {
        self.begin <= other.end && other.begin <= self.end
    }
}

/// A 1-indexed line and column; columns count characters, not bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets of one buffer to lines and columns and back
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of `location`; offsets past the end clamp to the last line
    ///
    /// An offset inside a multibyte character maps to that character's column,
    /// so an inclusive range end lands on its last character.
    pub fn position(&self, location: SourceLocation) -> Position {
        let mut offset = location.offset().min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let column = self.source[start..offset].chars().count();

        Position {
            line: line as u32 + 1,
            column: column as u32 + 1,
        }
    }

    /// Byte offset of a 1-indexed line and 0-indexed character column
    pub fn location(&self, line: usize, char_column: usize) -> Option<SourceLocation> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let text = self.line_text_from(start);
        let byte_column = match text.char_indices().nth(char_column) {
            Some((byte, _)) => byte,
            None if text.chars().count() == char_column => text.len(),
            None => return None,
        };
        Some(SourceLocation::new(start + byte_column))
    }

    /// Text of the 1-indexed `line`, without its terminator
    pub fn line_text(&self, line: u32) -> Option<&'a str> {
        let start = *self.line_starts.get((line as usize).checked_sub(1)?)?;
        Some(self.line_text_from(start))
    }

    fn line_text_from(&self, start: usize) -> &'a str {
        let rest = &self.source[start..];
        let end = rest.find('\n').unwrap_or(rest.len());
        rest[..end].trim_end_matches('\r')
    }
}
