//! Enter/exit traversal of the syntax tree.
//!
//! - [`Visitor`] - hooks fired before and after a node's children
//! - [`walk_node`] - depth-first walk: enter, children in order, exit
//! - [`walk_children`] - walk only the children of a node
//!
//! # Example
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use mdstyle_ast::{AstArena, Node, NodeType, Span};
//! use mdstyle_ast::visitor::{VisitResult, Visitor, walk_node};
//!
//! #[derive(Default)]
//! struct Events(Vec<String>);
//!
//! impl<'n> Visitor<'n> for Events {
//!     type Break = ();
//!
//!     fn enter_node(&mut self, node: &'n Node<'n>) -> VisitResult<()> {
//!         self.0.push(format!("{}", node.node_type));
//!         ControlFlow::Continue(())
//!     }
//!
//!     fn exit_node(&mut self, node: &'n Node<'n>) -> VisitResult<()> {
//!         self.0.push(format!("{}:exit", node.node_type));
//!         ControlFlow::Continue(())
//!     }
//! }
//!
//! let arena = AstArena::new();
//! let children = arena.alloc_slice_copy(&[Node::new_text(NodeType::Text, Span::new(0, 1), "a")]);
//! let root = arena.alloc(Node::new_parent(NodeType::Root, Span::new(0, 1), children));
//!
//! let mut events = Events::default();
//! let _ = walk_node(&mut events, root);
//! assert_eq!(events.0, ["root", "text", "text:exit", "root:exit"]);
//! ```

mod walk;

pub use walk::{VisitResult, Visitor, walk_children, walk_node};
