//! # mdstyle_ast
//!
//! Syntax tree definitions for mdstyle.
//!
//! This crate provides the tree that every lint rule reads:
//!
//! - [`Node`] - an mdast-shaped node with a half-open byte [`Span`]
//! - [`NodeType`] / [`NodeData`] - the type tag and typed attributes
//! - [`LineIndex`] - the position model mapping offsets to line/column
//! - [`Document`] - source text plus root node, shared read-only by rules
//! - [`visitor`] - the enter/exit walk used by the traversal engine
//!
//! Nodes are allocated in an [`AstArena`] (backed by `bumpalo`) and freed
//! together when the lint pass is over.
//!
//! ## Example
//!
//! ```rust
//! use mdstyle_ast::{AstArena, Document, Node, NodeType, Span};
//!
//! let arena = AstArena::new();
//! let text = arena.alloc(Node::new_text(NodeType::Text, Span::new(0, 5), "Hello"));
//! let children = arena.alloc_slice_copy(&[*text]);
//! let root = Node::new_parent(NodeType::Root, Span::new(0, 5), children);
//!
//! let doc = Document::new("Hello", root);
//! assert_eq!(doc.node_text(&doc.root), Some("Hello"));
//! ```

mod arena;
mod document;
mod line_index;
mod node;
mod node_type;
mod span;
pub mod visitor;

pub use arena::AstArena;
pub use document::Document;
pub use line_index::LineIndex;
pub use node::{AttrValue, Node, NodeData};
pub use node_type::{AttrKind, NodeType, UnknownNodeType};
pub use span::{Location, Position, Span};

pub use visitor::{VisitResult, Visitor, walk_node};
