//! `no-git-conflict-marker`: report leftover merge conflict markers.

use mdstyle_ast::{Node, Span};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::skip::{SkipCode, SkippedSpans};
use crate::{LinterError, ListenerTable, Report, Rule, RuleContext, RuleError, RuleMeta};

pub static META: RuleMeta = RuleMeta {
    id: "no-git-conflict-marker",
    description: "Disallow Git conflict markers",
    fixable: false,
    messages: &[(
        "noGitConflictMarker",
        "Unexpected Git conflict marker `{{ gitConflictMarker }}`.",
    )],
};

/// Markers are seven characters at the very start of a line, followed by
/// whitespace or the end of the line.
const MARKER_PATTERN: &str = r"^(<{7}|={7}|>{7})(?:\s|$)";
const MARKER_LEN: u32 = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct NoGitConflictMarkerOptions {
    pub skip_code: SkipCode,
}

struct State {
    skip_code: SkipCode,
    pattern: Regex,
    skipped: SkippedSpans,
}

pub struct NoGitConflictMarker {
    options: NoGitConflictMarkerOptions,
    pattern: Regex,
    listeners: ListenerTable<State>,
}

impl NoGitConflictMarker {
    pub fn new(options: NoGitConflictMarkerOptions) -> Result<Self, LinterError> {
        let pattern =
            Regex::new(MARKER_PATTERN).map_err(|e| LinterError::Internal(e.to_string()))?;
        let listeners = ListenerTable::new()
            .on("code", skip_code)?
            .on("root:exit", scan_lines)?;

        Ok(Self {
            options,
            pattern,
            listeners,
        })
    }
}

impl Rule for NoGitConflictMarker {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let mut state = State {
            skip_code: self.options.skip_code.clone(),
            pattern: self.pattern.clone(),
            skipped: SkippedSpans::default(),
        };
        self.listeners.run(&ctx.document().root, &mut state, ctx)
    }
}

fn skip_code(state: &mut State, _: &mut RuleContext<'_>, node: &Node<'_>) -> Result<(), RuleError> {
    if state.skip_code.skips(node.lang()) {
        state.skipped.push(node.span);
    }
    Ok(())
}

fn scan_lines(state: &mut State, ctx: &mut RuleContext<'_>, _: &Node<'_>) -> Result<(), RuleError> {
    let doc = ctx.document();

    for (_, line) in doc.line_index.lines() {
        let Some(content) = doc.slice(line) else {
            continue;
        };
        let Some(marker) = state.pattern.captures(content).and_then(|caps| caps.get(1)) else {
            continue;
        };
        if state.skipped.contains(line.start) {
            continue;
        }

        ctx.report(
            Report::new("noGitConflictMarker", Span::at(line.start, MARKER_LEN))
                .data("gitConflictMarker", marker.as_str()),
        )?;
    }
    Ok(())
}
