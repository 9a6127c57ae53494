//! Selector-driven traversal.
//!
//! A rule registers its listeners once, then [`ListenerTable::run`] walks a
//! document depth-first and calls every listener whose selector matches the
//! node being entered or exited. Rule state is an explicit value handed to
//! each callback by `&mut`, so one table can serve any number of passes.
//!
//! ```rust
//! use mdstyle_ast::{AstArena, Document, Node};
//! use mdstyle_core::{ListenerTable, RuleContext, RuleError, RuleMeta, Severity};
//! use mdstyle_parser::{MarkdownParser, Parser};
//!
//! fn count(items: &mut usize, _ctx: &mut RuleContext<'_>, _node: &Node<'_>) -> Result<(), RuleError> {
//!     *items += 1;
//!     Ok(())
//! }
//!
//! static META: RuleMeta = RuleMeta { id: "count", description: "", fixable: false, messages: &[] };
//!
//! let table = ListenerTable::new()
//!     .on("list[ordered=false] > listItem", count)
//!     .unwrap();
//!
//! let arena = AstArena::new();
//! let text = "- a\n- b\n\n1. c";
//! let root = MarkdownParser::new().parse(&arena, text).unwrap();
//! let doc = Document::new(text, root);
//! let mut ctx = RuleContext::new(&META, &doc, Severity::Error);
//!
//! let mut items = 0;
//! table.run(&doc.root, &mut items, &mut ctx).unwrap();
//! assert_eq!(items, 2);
//! ```

use std::collections::HashMap;
use std::ops::ControlFlow;

use mdstyle_ast::visitor::{VisitResult, Visitor, walk_node};
use mdstyle_ast::{Node, NodeType};
use tracing::trace;

use crate::selector::{Phase, Selector};
use crate::{RuleContext, RuleError, SelectorError};

/// A listener callback: rule state, reporting context, matched node.
pub type Callback<S> = fn(&mut S, &mut RuleContext<'_>, &Node<'_>) -> Result<(), RuleError>;

struct Listener<S> {
    selector: Selector,
    callback: Callback<S>,
}

/// Listeners of one rule, indexed by subject type and phase.
pub struct ListenerTable<S> {
    buckets: HashMap<(NodeType, Phase), Vec<Listener<S>>>,
    len: usize,
}

impl<S> ListenerTable<S> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
            len: 0,
        }
    }

    /// Registers `callback` for `selector`.
    ///
    /// Listeners that share a subject type and phase fire in registration
    /// order.
    pub fn on(mut self, selector: &str, callback: Callback<S>) -> Result<Self, SelectorError> {
        let selector = Selector::parse(selector)?;
        self.buckets
            .entry((selector.subject_type(), selector.phase()))
            .or_default()
            .push(Listener { selector, callback });
        self.len += 1;
        Ok(self)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Walks the tree under `root` once, dispatching to matching listeners.
    ///
    /// The first callback error stops the walk and is returned.
    pub fn run<'n>(
        &self,
        root: &'n Node<'n>,
        state: &mut S,
        ctx: &mut RuleContext<'_>,
    ) -> Result<(), RuleError> {
        trace!(rule = ctx.meta().id, listeners = self.len, "walking document");

        let mut dispatcher = Dispatcher {
            table: self,
            state,
            ctx,
            ancestors: Vec::new(),
        };

        match walk_node(&mut dispatcher, root) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(err) => Err(err),
        }
    }
}

impl<S> Default for ListenerTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

struct Dispatcher<'t, 'r, 'c, 'n, S> {
    table: &'t ListenerTable<S>,
    state: &'r mut S,
    ctx: &'r mut RuleContext<'c>,
    /// Nodes entered but not yet exited, root first.
    ancestors: Vec<&'n Node<'n>>,
}

impl<'n, S> Dispatcher<'_, '_, '_, 'n, S> {
    fn fire(&mut self, node: &'n Node<'n>, phase: Phase) -> VisitResult<RuleError> {
        let Some(listeners) = self.table.buckets.get(&(node.node_type, phase)) else {
            return ControlFlow::Continue(());
        };

        for listener in listeners {
            if !listener.selector.matches(node, &self.ancestors) {
                continue;
            }
            if let Err(err) = (listener.callback)(self.state, self.ctx, node) {
                return ControlFlow::Break(err);
            }
        }
        ControlFlow::Continue(())
    }
}

impl<'n, S> Visitor<'n> for Dispatcher<'_, '_, '_, 'n, S> {
    type Break = RuleError;

    fn enter_node(&mut self, node: &'n Node<'n>) -> VisitResult<RuleError> {
        self.fire(node, Phase::Enter)?;
        self.ancestors.push(node);
        ControlFlow::Continue(())
    }

    fn exit_node(&mut self, node: &'n Node<'n>) -> VisitResult<RuleError> {
        self.ancestors.pop();
        self.fire(node, Phase::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RuleMeta, Severity};
    use mdstyle_ast::{AstArena, Document};
    use mdstyle_parser::{MarkdownParser, Parser};
    use pretty_assertions::assert_eq;

    static META: RuleMeta = RuleMeta {
        id: "engine-test",
        description: "",
        fixable: false,
        messages: &[],
    };

    #[derive(Default)]
    struct Events(Vec<String>);

    fn record(tag: &str, events: &mut Events, node: &Node<'_>) {
        events.0.push(format!("{tag}:{}@{}", node.node_type, node.span.start));
    }

    fn on_list(s: &mut Events, _: &mut RuleContext<'_>, n: &Node<'_>) -> Result<(), RuleError> {
        record("list", s, n);
        Ok(())
    }

    fn on_list_exit(s: &mut Events, _: &mut RuleContext<'_>, n: &Node<'_>) -> Result<(), RuleError> {
        record("list:exit", s, n);
        Ok(())
    }

    fn on_item(s: &mut Events, _: &mut RuleContext<'_>, n: &Node<'_>) -> Result<(), RuleError> {
        record("item", s, n);
        Ok(())
    }

    fn on_item_again(s: &mut Events, _: &mut RuleContext<'_>, n: &Node<'_>) -> Result<(), RuleError> {
        record("item2", s, n);
        Ok(())
    }

    fn on_root_exit(s: &mut Events, _: &mut RuleContext<'_>, n: &Node<'_>) -> Result<(), RuleError> {
        record("root:exit", s, n);
        Ok(())
    }

    fn fail(_: &mut Events, _: &mut RuleContext<'_>, _: &Node<'_>) -> Result<(), RuleError> {
        Err(RuleError::internal("boom"))
    }

    fn run(table: &ListenerTable<Events>, text: &str) -> (Events, Result<(), RuleError>) {
        let arena = AstArena::new();
        let root = MarkdownParser::new().parse(&arena, text).unwrap();
        let doc = Document::new(text, root);
        let mut ctx = RuleContext::new(&META, &doc, Severity::Error);
        let mut events = Events::default();
        let result = table.run(&doc.root, &mut events, &mut ctx);
        (events, result)
    }

    #[test]
    fn test_enter_exit_order_and_registration_order() {
        let table = ListenerTable::new()
            .on("root:exit", on_root_exit)
            .unwrap()
            .on("list:exit", on_list_exit)
            .unwrap()
            .on("list", on_list)
            .unwrap()
            .on("listItem", on_item)
            .unwrap()
            .on("list > listItem", on_item_again)
            .unwrap();
        assert_eq!(table.len(), 5);

        let (events, result) = run(&table, "- a\n  - b");
        result.unwrap();

        assert_eq!(
            events.0,
            vec![
                "list:list@0",
                "item:listItem@0",
                "item2:listItem@0",
                "list:list@6",
                "item:listItem@6",
                "item2:listItem@6",
                "list:exit:list@6",
                "list:exit:list@0",
                "root:exit:root@0",
            ]
        );
    }

    #[test]
    fn test_unmatched_listener_is_never_called() {
        let table = ListenerTable::new().on("heading", fail).unwrap();
        let (events, result) = run(&table, "- a\n- b");

        assert!(result.is_ok());
        assert!(events.0.is_empty());
    }

    #[test]
    fn test_callback_error_stops_walk() {
        let table = ListenerTable::new()
            .on("listItem", fail)
            .unwrap()
            .on("root:exit", on_root_exit)
            .unwrap();

        let (events, result) = run(&table, "- a\n- b");

        assert_eq!(result, Err(RuleError::internal("boom")));
        assert!(events.0.is_empty());
    }

    #[test]
    fn test_invalid_selector_fails_registration() {
        let err = ListenerTable::<Events>::new()
            .on("list[ordered=maybe]", on_list)
            .err();
        assert!(matches!(err, Some(SelectorError::LiteralKind { .. })));
    }

    #[test]
    fn test_ancestor_chain_excludes_the_node_itself() {
        // `listItem listItem` must not match an item against itself.
        let table = ListenerTable::new()
            .on("listItem listItem", on_item)
            .unwrap();

        let (events, _) = run(&table, "- a\n- b");
        assert!(events.0.is_empty());

        let (events, _) = run(&table, "- a\n  - b");
        assert_eq!(events.0, vec!["item:listItem@6"]);
    }
}
