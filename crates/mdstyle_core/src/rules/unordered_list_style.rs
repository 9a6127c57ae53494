//! `consistent-unordered-list-style`: bullet markers by nesting depth.
//!
//! In `sublist` mode each depth (mod 3) gets its own marker. A depth whose
//! marker is still unknown takes the marker of its first item, unless the
//! next shallower depth already uses that marker, in which case it takes
//! the following marker in the `-` → `+` → `*` rotation. Depths `d` and
//! `d + 3` share a marker.

use mdstyle_ast::{Node, Span};
use serde::{Deserialize, Serialize};

use crate::depth::{DepthTracker, ScopeKind};
use crate::{
    Fix, ListenerTable, Report, Rule, RuleContext, RuleError, RuleMeta, SelectorError,
};

pub static META: RuleMeta = RuleMeta {
    id: "consistent-unordered-list-style",
    description: "Enforce consistent unordered list markers, optionally varying by depth",
    fixable: true,
    messages: &[("style", "Unordered list style should be `{{ style }}`.")],
};

/// Configured style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListStyleOption {
    /// One marker for the whole document, chosen by the first item.
    #[default]
    #[serde(rename = "consistent")]
    Consistent,
    /// One marker per depth, cycling every three levels.
    #[serde(rename = "sublist")]
    Sublist,
    #[serde(rename = "-")]
    Dash,
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "*")]
    Asterisk,
}

/// Which lists count toward depth in `sublist` mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthOption {
    #[default]
    Unordered,
    AnyList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListStyleOptions {
    pub style: ListStyleOption,
    pub depth: DepthOption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListMarker {
    Dash,
    Plus,
    Asterisk,
}

const ROTATION: [ListMarker; 3] = [ListMarker::Dash, ListMarker::Plus, ListMarker::Asterisk];

impl ListMarker {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'-' => Some(ListMarker::Dash),
            b'+' => Some(ListMarker::Plus),
            b'*' => Some(ListMarker::Asterisk),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            ListMarker::Dash => "-",
            ListMarker::Plus => "+",
            ListMarker::Asterisk => "*",
        }
    }

    /// The marker after `self` in the rotation.
    fn next(self) -> Self {
        let index = ROTATION.iter().position(|&m| m == self).unwrap_or(0);
        ROTATION[(index + 1) % ROTATION.len()]
    }
}

struct State {
    sublist: bool,
    slots: [Option<ListMarker>; 3],
    tracker: DepthTracker,
}

impl State {
    /// Resolves (if needed) and returns the marker expected in `slot`.
    ///
    /// In sublist mode every slot neighbours the other two (depth `d + 3`
    /// follows depth `d + 2`), so a new slot takes the observed marker only
    /// if no resolved slot holds it, else the next free one in the rotation.
    fn expected(&mut self, slot: usize, observed: ListMarker) -> ListMarker {
        if let Some(marker) = self.slots[slot] {
            return marker;
        }
        let marker = if self.sublist {
            let mut candidate = observed;
            for _ in 0..ROTATION.len() {
                if !self.slots.contains(&Some(candidate)) {
                    break;
                }
                candidate = candidate.next();
            }
            candidate
        } else {
            observed
        };
        self.slots[slot] = Some(marker);
        marker
    }
}

pub struct ConsistentUnorderedListStyle {
    options: ListStyleOptions,
    listeners: ListenerTable<State>,
}

impl ConsistentUnorderedListStyle {
    pub fn new(options: ListStyleOptions) -> Result<Self, SelectorError> {
        let (enter, exit) = match options.depth {
            DepthOption::Unordered => ("list[ordered=false]", "list[ordered=false]:exit"),
            DepthOption::AnyList => ("list", "list:exit"),
        };

        let listeners = ListenerTable::new()
            .on(enter, enter_list)?
            .on("list[ordered=false] > listItem", check_item)?
            .on(exit, exit_list)?
            .on("root:exit", finish)?;

        Ok(Self { options, listeners })
    }
}

impl Rule for ConsistentUnorderedListStyle {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let fixed = match self.options.style {
            ListStyleOption::Dash => Some(ListMarker::Dash),
            ListStyleOption::Plus => Some(ListMarker::Plus),
            ListStyleOption::Asterisk => Some(ListMarker::Asterisk),
            ListStyleOption::Consistent | ListStyleOption::Sublist => None,
        };
        let scope = match self.options.depth {
            DepthOption::Unordered => ScopeKind::UnorderedList,
            DepthOption::AnyList => ScopeKind::AnyList,
        };

        let mut state = State {
            sublist: self.options.style == ListStyleOption::Sublist,
            slots: [fixed, None, None],
            tracker: DepthTracker::new(scope),
        };
        self.listeners.run(&ctx.document().root, &mut state, ctx)
    }
}

fn enter_list(state: &mut State, _: &mut RuleContext<'_>, node: &Node<'_>) -> Result<(), RuleError> {
    if state.tracker.is_scope(node) {
        state.tracker.enter_scope();
    }
    Ok(())
}

fn exit_list(state: &mut State, _: &mut RuleContext<'_>, node: &Node<'_>) -> Result<(), RuleError> {
    if state.tracker.is_scope(node) {
        state.tracker.exit_scope()?;
    }
    Ok(())
}

fn finish(state: &mut State, _: &mut RuleContext<'_>, _: &Node<'_>) -> Result<(), RuleError> {
    state.tracker.ensure_balanced()
}

fn check_item(state: &mut State, ctx: &mut RuleContext<'_>, node: &Node<'_>) -> Result<(), RuleError> {
    let text = ctx.text().as_bytes();

    // The item starts at its marker; tolerate leading indentation anyway.
    let start = node.span.start as usize;
    let Some(offset) = text
        .get(start..node.span.end as usize)
        .and_then(|item| item.iter().position(|&b| b != b' ' && b != b'\t'))
        .map(|skip| start + skip)
    else {
        return Ok(());
    };
    let Some(observed) = ListMarker::from_byte(text[offset]) else {
        return Ok(());
    };

    let slot = if state.sublist {
        state.tracker.slot(ROTATION.len()).ok_or_else(|| {
            RuleError::invariant(format!("list item at {offset} outside any list scope"))
        })?
    } else {
        0
    };

    let expected = state.expected(slot, observed);
    if observed == expected {
        return Ok(());
    }

    let marker = Span::at(offset as u32, 1);
    ctx.report(
        Report::new("style", marker)
            .data("style", expected.as_str())
            .fix(Fix::new(marker, expected.as_str())),
    )
}
