//! A parsed document: source text plus its tree.

use crate::{LineIndex, Location, Node, Span};

/// Immutable source text and tree for one lint pass.
///
/// A `Document` is only ever read. Any number of rules may hold shared
/// references to it at once, including from different threads.
#[derive(Debug)]
pub struct Document<'a> {
    /// The full source text.
    pub text: &'a str,
    /// The root node (`root`).
    pub root: Node<'a>,
    /// Line starts for position lookups.
    pub line_index: LineIndex,
}

impl<'a> Document<'a> {
    /// Creates a document and indexes its lines.
    pub fn new(text: &'a str, root: Node<'a>) -> Self {
        Self {
            text,
            root,
            line_index: LineIndex::new(text),
        }
    }

    /// Returns the text covered by `span`, or `None` if the span falls
    /// outside the text or splits a character.
    #[inline]
    pub fn slice(&self, span: Span) -> Option<&'a str> {
        if span.start > span.end {
            return None;
        }
        self.text.get(span.range())
    }

    /// Returns the source text of a node.
    #[inline]
    pub fn node_text(&self, node: &Node<'_>) -> Option<&'a str> {
        self.slice(node.span)
    }

    /// Returns the byte at `offset`, if any.
    #[inline]
    pub fn byte_at(&self, offset: u32) -> Option<u8> {
        self.text.as_bytes().get(offset as usize).copied()
    }

    /// Maps a span to line/column coordinates.
    #[inline]
    pub fn location(&self, span: Span) -> Option<Location> {
        self.line_index.location(self.text, span)
    }

    /// Returns true if `span` lies inside the text on character boundaries.
    #[inline]
    pub fn contains_span(&self, span: Span) -> bool {
        self.slice(span).is_some()
    }

    /// Returns the line terminator used by the line containing `offset`,
    /// defaulting to `"\n"` when that line is the last one.
    pub fn line_ending_at(&self, offset: u32) -> &'static str {
        let Some(line) = self.line_index.line_of(offset) else {
            return "\n";
        };
        let Some(span) = self.line_index.line_span(line) else {
            return "\n";
        };
        let rest = &self.text.as_bytes()[span.end as usize..];
        if rest.starts_with(b"\r\n") {
            "\r\n"
        } else if rest.starts_with(b"\r") {
            "\r"
        } else {
            "\n"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeType, Position};

    fn doc(text: &str) -> Document<'_> {
        Document::new(
            text,
            Node::new_parent(NodeType::Root, Span::new(0, text.len() as u32), &[]),
        )
    }

    #[test]
    fn test_slice() {
        let d = doc("- item");
        assert_eq!(d.slice(Span::new(0, 1)), Some("-"));
        assert_eq!(d.slice(Span::new(0, 7)), None);
        assert_eq!(d.slice(Span::new(3, 2)), None);
        assert_eq!(d.node_text(&d.root), Some("- item"));
    }

    #[test]
    fn test_slice_rejects_split_character() {
        let d = doc("é");
        assert_eq!(d.slice(Span::new(0, 1)), None);
        assert!(!d.contains_span(Span::new(1, 2)));
        assert!(d.contains_span(Span::new(0, 2)));
    }

    #[test]
    fn test_location() {
        let d = doc("a\n- b");
        let loc = d.location(Span::new(2, 3)).unwrap();
        assert_eq!(loc.start, Position::new(2, 0));
        assert_eq!(loc.end, Position::new(2, 1));
    }

    #[test]
    fn test_line_ending_at() {
        assert_eq!(doc("a\r\nb").line_ending_at(0), "\r\n");
        assert_eq!(doc("a\rb").line_ending_at(0), "\r");
        assert_eq!(doc("a\nb").line_ending_at(0), "\n");
        assert_eq!(doc("a\nb").line_ending_at(2), "\n");
    }

    #[test]
    fn test_byte_at() {
        let d = doc("*a*");
        assert_eq!(d.byte_at(0), Some(b'*'));
        assert_eq!(d.byte_at(3), None);
    }
}
