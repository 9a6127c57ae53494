//! Span and position types for source locations.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A line/column position in source text.
///
/// Lines are 1-indexed. Columns are 0-indexed and counted in Unicode
/// scalar values from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed).
    pub column: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A half-open byte range `[start, end)` in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    /// Creates a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Creates a span covering `len` bytes from `start`.
    #[inline]
    pub const fn at(start: u32, len: u32) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Returns the length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns true if the two spans share at least one byte.
    ///
    /// Two empty spans at the same offset also overlap: both would insert
    /// at the same point.
    #[inline]
    pub const fn overlaps(&self, other: &Span) -> bool {
        if self.is_empty() && other.is_empty() {
            return self.start == other.start;
        }
        self.start < other.end && other.start < self.end
    }

    /// Returns the span as a `usize` range for slicing.
    #[inline]
    pub const fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Start and end positions of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
}

impl Location {
    /// Creates a new location.
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_span_basics() {
        let span = Span::new(10, 20);
        assert_eq!(span.len(), 10);
        assert!(!span.is_empty());
        assert!(span.contains(10));
        assert!(span.contains(19));
        assert!(!span.contains(20));
        assert_eq!(span.range(), 10..20);
    }

    #[test]
    fn test_span_at() {
        assert_eq!(Span::at(4, 1), Span::new(4, 5));
    }

    #[rstest]
    #[case::disjoint(Span::new(0, 5), Span::new(5, 10), false)]
    #[case::overlapping(Span::new(0, 6), Span::new(5, 10), true)]
    #[case::nested(Span::new(0, 10), Span::new(3, 4), true)]
    #[case::empty_inside(Span::new(3, 3), Span::new(0, 10), true)]
    #[case::empty_at_end(Span::new(10, 10), Span::new(0, 10), false)]
    #[case::same_insert_point(Span::new(4, 4), Span::new(4, 4), true)]
    fn test_span_overlaps(#[case] a: Span, #[case] b: Span, #[case] expected: bool) {
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[test]
    fn test_empty_span_contains_nothing() {
        let span = Span::new(5, 5);
        assert!(span.is_empty());
        assert!(!span.contains(5));
    }

    #[test]
    fn test_location_ordering() {
        let a = Location::new(Position::new(1, 0), Position::new(1, 5));
        let b = Location::new(Position::new(2, 0), Position::new(2, 1));
        assert!(a < b);
    }

    #[test]
    fn test_span_serialization() {
        let json = serde_json::to_string(&Span::new(10, 20)).unwrap();
        assert_eq!(json, r#"{"start":10,"end":20}"#);

        let span: Span = serde_json::from_str(r#"{"start": 5, "end": 15}"#).unwrap();
        assert_eq!(span, Span::new(5, 15));
    }
}
