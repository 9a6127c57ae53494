//! The walk itself.

use std::ops::ControlFlow;

use crate::Node;

/// Result of a visitor hook. `Break` stops the walk immediately.
pub type VisitResult<B = ()> = ControlFlow<B>;

/// Hooks invoked by [`walk_node`].
///
/// `'n` is the lifetime of the tree being walked, so implementations may
/// keep references to visited nodes (for example an ancestor stack).
pub trait Visitor<'n> {
    /// Value carried out of the walk when a hook breaks.
    type Break;

    /// Called before any child of `node` is visited.
    fn enter_node(&mut self, _node: &'n Node<'n>) -> VisitResult<Self::Break> {
        ControlFlow::Continue(())
    }

    /// Called after every child of `node` has been fully visited.
    fn exit_node(&mut self, _node: &'n Node<'n>) -> VisitResult<Self::Break> {
        ControlFlow::Continue(())
    }
}

/// Walks `node` depth-first: enter, each child in stored order, exit.
///
/// Every node is entered exactly once and exited exactly once, unless a
/// hook breaks, in which case no further hooks run.
pub fn walk_node<'n, V>(visitor: &mut V, node: &'n Node<'n>) -> VisitResult<V::Break>
where
    V: Visitor<'n> + ?Sized,
{
    visitor.enter_node(node)?;
    walk_children(visitor, node)?;
    visitor.exit_node(node)
}

/// Walks each child of `node` in order.
#[inline]
pub fn walk_children<'n, V>(visitor: &mut V, node: &'n Node<'n>) -> VisitResult<V::Break>
where
    V: Visitor<'n> + ?Sized,
{
    for child in node.children {
        walk_node(visitor, child)?;
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AstArena, NodeType, Span};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        events: Vec<(bool, NodeType, u32)>,
        depth: i32,
        max_depth: i32,
    }

    impl<'n> Visitor<'n> for Recorder {
        type Break = ();

        fn enter_node(&mut self, node: &'n Node<'n>) -> VisitResult {
            self.events.push((true, node.node_type, node.span.start));
            self.depth += 1;
            self.max_depth = self.max_depth.max(self.depth);
            ControlFlow::Continue(())
        }

        fn exit_node(&mut self, node: &'n Node<'n>) -> VisitResult {
            self.events.push((false, node.node_type, node.span.start));
            self.depth -= 1;
            ControlFlow::Continue(())
        }
    }

    struct StopAt(NodeType, usize);

    impl<'n> Visitor<'n> for StopAt {
        type Break = u32;

        fn enter_node(&mut self, node: &'n Node<'n>) -> VisitResult<u32> {
            self.1 += 1;
            if node.node_type == self.0 {
                ControlFlow::Break(node.span.start)
            } else {
                ControlFlow::Continue(())
            }
        }
    }

    fn sample<'a>(arena: &'a AstArena) -> &'a Node<'a> {
        // root
        //   paragraph [0]
        //     text [0]
        //     emphasis [2]
        //       text [3]
        //   paragraph [6]
        let em_text = Node::new_text(NodeType::Text, Span::new(3, 4), "b");
        let em = Node::new_parent(
            NodeType::Emphasis,
            Span::new(2, 5),
            arena.alloc_slice_copy(&[em_text]),
        );
        let text = Node::new_text(NodeType::Text, Span::new(0, 2), "a ");
        let p1 = Node::new_parent(
            NodeType::Paragraph,
            Span::new(0, 5),
            arena.alloc_slice_copy(&[text, em]),
        );
        let p2 = Node::new_parent(NodeType::Paragraph, Span::new(6, 7), &[]);
        arena.alloc(Node::new_parent(
            NodeType::Root,
            Span::new(0, 7),
            arena.alloc_slice_copy(&[p1, p2]),
        ))
    }

    #[test]
    fn test_enter_children_exit_order() {
        let arena = AstArena::new();
        let root = sample(&arena);
        let mut recorder = Recorder::default();

        assert_eq!(walk_node(&mut recorder, root), ControlFlow::Continue(()));
        assert_eq!(
            recorder.events,
            vec![
                (true, NodeType::Root, 0),
                (true, NodeType::Paragraph, 0),
                (true, NodeType::Text, 0),
                (false, NodeType::Text, 0),
                (true, NodeType::Emphasis, 2),
                (true, NodeType::Text, 3),
                (false, NodeType::Text, 3),
                (false, NodeType::Emphasis, 2),
                (false, NodeType::Paragraph, 0),
                (true, NodeType::Paragraph, 6),
                (false, NodeType::Paragraph, 6),
                (false, NodeType::Root, 0),
            ]
        );
        assert_eq!(recorder.depth, 0);
        assert_eq!(recorder.max_depth, 4);
    }

    #[test]
    fn test_break_stops_walk() {
        let arena = AstArena::new();
        let root = sample(&arena);
        let mut stop = StopAt(NodeType::Emphasis, 0);

        assert_eq!(walk_node(&mut stop, root), ControlFlow::Break(2));
        assert_eq!(stop.1, 4);
    }

    #[test]
    fn test_walk_children_skips_parent_hooks() {
        let arena = AstArena::new();
        let root = sample(&arena);
        let mut recorder = Recorder::default();

        let _ = walk_children(&mut recorder, root);
        assert!(recorder.events.iter().all(|(_, ty, _)| *ty != NodeType::Root));
    }
}
