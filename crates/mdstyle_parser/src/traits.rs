//! Parser trait definition.

use mdstyle_ast::{AstArena, Node};

use crate::ParseError;

/// Converts source text into a tree allocated in an arena.
pub trait Parser: Send + Sync {
    /// Returns the name of this parser.
    fn name(&self) -> &str;

    /// Returns the file extensions this parser handles, without the dot.
    fn extensions(&self) -> &[&str];

    /// Parses `source` into a tree whose root spans the whole text.
    ///
    /// Node spans are byte offsets into `source`.
    fn parse<'a>(&self, arena: &'a AstArena, source: &str) -> Result<Node<'a>, ParseError>;

    /// Returns true if this parser handles the given file extension.
    fn can_parse(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}
