//! # mdstyle_parser
//!
//! Turns markdown source into an `mdstyle_ast` tree.
//!
//! - [`Parser`] - the parser abstraction the linter is written against
//! - [`MarkdownParser`] - CommonMark + GFM via `markdown-rs`
//!
//! ## Example
//!
//! ```rust
//! use mdstyle_ast::{AstArena, NodeType};
//! use mdstyle_parser::{MarkdownParser, Parser};
//!
//! let arena = AstArena::new();
//! let root = MarkdownParser::new().parse(&arena, "- a\n- b").unwrap();
//!
//! assert_eq!(root.node_type, NodeType::Root);
//! assert_eq!(root.children[0].node_type, NodeType::List);
//! ```

mod error;
mod markdown;
mod traits;

pub use error::ParseError;
pub use markdown::MarkdownParser;
pub use traits::Parser;
