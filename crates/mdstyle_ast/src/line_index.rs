//! Offset to line/column mapping.
//!
//! Only LF, CR and CRLF terminate a line. Unicode line and paragraph
//! separators (U+2028, U+2029), vertical tab, form feed and NEL are
//! ordinary characters here, as they are for markdown block structure.

use crate::{Location, Position, Span};

/// Pre-computed line starts for a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the first character of each line.
    line_starts: Vec<u32>,
    /// Byte offset where each line's content ends (before its terminator).
    line_ends: Vec<u32>,
    /// Total length of the source in bytes.
    len: u32,
}

impl LineIndex {
    /// Builds the index for `source`.
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0u32];
        let mut line_ends = Vec::new();
        let mut i = 0usize;

        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    line_ends.push(i as u32);
                    i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    line_starts.push(i as u32);
                }
                b'\n' => {
                    line_ends.push(i as u32);
                    i += 1;
                    line_starts.push(i as u32);
                }
                _ => i += 1,
            }
        }
        line_ends.push(bytes.len() as u32);

        Self {
            line_starts,
            line_ends,
            len: bytes.len() as u32,
        }
    }

    /// Returns the number of lines. An empty text has one (empty) line.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the 1-indexed line containing `offset`.
    ///
    /// An offset that points at a line terminator belongs to the line the
    /// terminator ends.
    pub fn line_of(&self, offset: u32) -> Option<u32> {
        if offset > self.len {
            return None;
        }
        let idx = self.line_starts.partition_point(|&start| start <= offset);
        Some(idx as u32)
    }

    /// Returns the content span of a 1-indexed line, without its terminator.
    pub fn line_span(&self, line: u32) -> Option<Span> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)?;
        let end = *self.line_ends.get(idx)?;
        Some(Span::new(start, end))
    }

    /// Iterates over `(line, content span)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (u32, Span)> + '_ {
        self.line_starts
            .iter()
            .zip(&self.line_ends)
            .enumerate()
            .map(|(idx, (&start, &end))| (idx as u32 + 1, Span::new(start, end)))
    }

    /// Maps a byte offset in `source` to a line/column position.
    ///
    /// Returns `None` if the offset lies past the end of the text or inside
    /// a multi-byte character. `source` must be the text the index was
    /// built from.
    pub fn position(&self, source: &str, offset: u32) -> Option<Position> {
        if offset > self.len || !source.is_char_boundary(offset as usize) {
            return None;
        }
        let line = self.line_of(offset)?;
        let line_start = self.line_starts[line as usize - 1];
        let column = source[line_start as usize..offset as usize].chars().count() as u32;
        Some(Position::new(line, column))
    }

    /// Maps a span to its start and end positions.
    pub fn location(&self, source: &str, span: Span) -> Option<Location> {
        if span.start > span.end {
            return None;
        }
        let start = self.position(source, span.start)?;
        let end = self.position(source, span.end)?;
        Some(Location::new(start, end))
    }

    /// Total length of the indexed text in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Returns true if the indexed text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
