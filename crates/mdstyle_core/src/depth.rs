//! Depth-scoped state tracking.

use mdstyle_ast::{Node, NodeType};

use crate::RuleError;

/// Which nodes open a nesting scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScopeKind {
    /// Only unordered lists count toward depth.
    #[default]
    UnorderedList,
    /// Ordered and unordered lists both count (visual nesting level).
    AnyList,
}

/// Nesting depth counter, driven by a rule's scope enter/exit listeners.
///
/// The counter starts at `-1`, before any scope. Entering the outermost
/// scope makes it `0`.
#[derive(Debug, Clone)]
pub struct DepthTracker {
    kind: ScopeKind,
    depth: i32,
}

impl DepthTracker {
    const INITIAL: i32 = -1;

    /// Creates a tracker counting scopes of `kind`.
    pub fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            depth: Self::INITIAL,
        }
    }

    /// The scope kind this tracker counts.
    #[inline]
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    /// Returns true if `node` opens a scope for this tracker.
    pub fn is_scope(&self, node: &Node<'_>) -> bool {
        match self.kind {
            ScopeKind::UnorderedList => node.is_unordered_list(),
            ScopeKind::AnyList => node.node_type == NodeType::List,
        }
    }

    /// Records entering a scope node.
    #[inline]
    pub fn enter_scope(&mut self) {
        self.depth += 1;
    }

    /// Records leaving a scope node.
    ///
    /// Leaving more scopes than were entered is an invariant violation.
    pub fn exit_scope(&mut self) -> Result<(), RuleError> {
        if self.depth <= Self::INITIAL {
            return Err(RuleError::invariant("scope exit without a matching enter"));
        }
        self.depth -= 1;
        Ok(())
    }

    /// Current depth: `-1` outside any scope, `0` in the outermost one.
    #[inline]
    pub fn current_depth(&self) -> i32 {
        self.depth
    }

    /// The current depth reduced modulo `cycle`, or `None` outside any scope.
    pub fn slot(&self, cycle: usize) -> Option<usize> {
        let depth = usize::try_from(self.depth).ok()?;
        (cycle > 0).then(|| depth % cycle)
    }

    /// Returns true if every entered scope has been exited.
    #[inline]
    pub fn is_balanced(&self) -> bool {
        self.depth == Self::INITIAL
    }

    /// Fails if the tracker is not balanced; called once the walk is over.
    pub fn ensure_balanced(&self) -> Result<(), RuleError> {
        if self.is_balanced() {
            Ok(())
        } else {
            Err(RuleError::invariant(format!(
                "scope depth is {} after the walk, expected {}",
                self.depth,
                Self::INITIAL
            )))
        }
    }
}
