//! `consistent-emphasis-style` and `consistent-strong-style`.
//!
//! Both rules check the opening and closing boundary of every span on its
//! own, so a span can produce two diagnostics. They differ only in the node
//! type they listen to and in the boundary width (`*` vs `**`).

use mdstyle_ast::{Node, Span};
use serde::{Deserialize, Serialize};

use crate::{
    Fix, ListenerTable, Report, Rule, RuleContext, RuleError, RuleMeta, SelectorError,
};

pub static EMPHASIS_META: RuleMeta = RuleMeta {
    id: "consistent-emphasis-style",
    description: "Enforce a consistent emphasis marker (`*` or `_`)",
    fixable: true,
    messages: &[("style", "Emphasis style should be `{{ style }}`.")],
};

pub static STRONG_META: RuleMeta = RuleMeta {
    id: "consistent-strong-style",
    description: "Enforce a consistent strong marker (`**` or `__`)",
    fixable: true,
    messages: &[("style", "Strong style should be `{{ style }}`.")],
};

/// Configured marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerOption {
    /// The first span decides.
    #[default]
    #[serde(rename = "consistent")]
    Consistent,
    #[serde(rename = "*")]
    Asterisk,
    #[serde(rename = "_")]
    Underscore,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerStyleOptions {
    pub style: MarkerOption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Asterisk,
    Underscore,
}

impl Marker {
    fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'*' => Some(Marker::Asterisk),
            b'_' => Some(Marker::Underscore),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Marker::Asterisk => "*",
            Marker::Underscore => "_",
        }
    }

    fn as_char(&self) -> char {
        match self {
            Marker::Asterisk => '*',
            Marker::Underscore => '_',
        }
    }
}

impl MarkerOption {
    fn fixed(self) -> Option<Marker> {
        match self {
            MarkerOption::Consistent => None,
            MarkerOption::Asterisk => Some(Marker::Asterisk),
            MarkerOption::Underscore => Some(Marker::Underscore),
        }
    }
}

/// Which span kind a [`MarkerStyle`] rule checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Emphasis,
    Strong,
}

impl MarkerKind {
    fn meta(&self) -> &'static RuleMeta {
        match self {
            MarkerKind::Emphasis => &EMPHASIS_META,
            MarkerKind::Strong => &STRONG_META,
        }
    }

    fn width(&self) -> u32 {
        match self {
            MarkerKind::Emphasis => 1,
            MarkerKind::Strong => 2,
        }
    }
}

struct State {
    expected: Option<Marker>,
    width: u32,
}

/// Paired-boundary consistency rule for emphasis or strong spans.
pub struct MarkerStyle {
    kind: MarkerKind,
    options: MarkerStyleOptions,
    listeners: ListenerTable<State>,
}

impl MarkerStyle {
    pub fn new(kind: MarkerKind, options: MarkerStyleOptions) -> Result<Self, SelectorError> {
        let selector = match kind {
            MarkerKind::Emphasis => "emphasis",
            MarkerKind::Strong => "strong",
        };
        let listeners = ListenerTable::new().on(selector, check_boundaries)?;
        Ok(Self {
            kind,
            options,
            listeners,
        })
    }

    pub fn emphasis(options: MarkerStyleOptions) -> Result<Self, SelectorError> {
        Self::new(MarkerKind::Emphasis, options)
    }

    pub fn strong(options: MarkerStyleOptions) -> Result<Self, SelectorError> {
        Self::new(MarkerKind::Strong, options)
    }
}

impl Rule for MarkerStyle {
    fn meta(&self) -> &'static RuleMeta {
        self.kind.meta()
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let mut state = State {
            expected: self.options.style.fixed(),
            width: self.kind.width(),
        };
        self.listeners.run(&ctx.document().root, &mut state, ctx)
    }
}

fn check_boundaries(
    state: &mut State,
    ctx: &mut RuleContext<'_>,
    node: &Node<'_>,
) -> Result<(), RuleError> {
    let text = ctx.text();
    let width = state.width;
    if node.span.len() < 2 * width {
        return Ok(());
    }

    let open = Span::at(node.span.start, width);
    let close = Span::new(node.span.end - width, node.span.end);
    let (Some(opening), Some(closing)) = (marker_at(text, open), marker_at(text, close)) else {
        return Ok(());
    };

    let expected = *state.expected.get_or_insert(opening);
    let outside_open = text.get(..open.start as usize).and_then(|s| s.chars().next_back());
    let outside_close = text.get(close.end as usize..).and_then(|s| s.chars().next());

    let boundaries = [
        (open, opening, outside_open),
        (close, closing, outside_close),
    ];

    // Rewriting only one side of a span would unpair it, so either every
    // mismatched boundary gets a fix or none does.
    let fixable = boundaries
        .iter()
        .filter(|(_, observed, _)| *observed != expected)
        .all(|(_, _, outside)| can_rewrite(expected, *outside));

    for (boundary, observed, _) in boundaries {
        if observed == expected {
            continue;
        }

        let fix = fixable.then(|| Fix::new(boundary, expected.as_str().repeat(width as usize)));
        ctx.report(
            Report::new("style", boundary)
                .data("style", expected.as_str())
                .fix(fix),
        )?;
    }
    Ok(())
}

/// Whether a boundary can become `to` given the character just outside it.
fn can_rewrite(to: Marker, outside: Option<char>) -> bool {
    match outside {
        // The new run would merge with an adjacent run of the same marker.
        Some(c) if c == to.as_char() => false,
        // `_` neither opens nor closes inside a word.
        Some(c) if to == Marker::Underscore => !c.is_alphanumeric(),
        _ => true,
    }
}

/// The marker a boundary is made of, if every byte is the same marker.
fn marker_at(text: &str, span: Span) -> Option<Marker> {
    let bytes = text.as_bytes().get(span.range())?;
    let marker = Marker::from_byte(*bytes.first()?)?;
    bytes.iter().all(|&b| b == bytes[0]).then_some(marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply_fixes, run_rule};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn emphasis(style: MarkerOption) -> MarkerStyle {
        MarkerStyle::emphasis(MarkerStyleOptions { style }).unwrap()
    }

    fn strong(style: MarkerOption) -> MarkerStyle {
        MarkerStyle::strong(MarkerStyleOptions { style }).unwrap()
    }

    #[rstest]
    #[case("*a* and *b*", MarkerOption::Consistent)]
    #[case("_a_ and _b_", MarkerOption::Consistent)]
    #[case("_a_ and _b_", MarkerOption::Underscore)]
    #[case("**strong** is not emphasis", MarkerOption::Underscore)]
    #[case("no emphasis here", MarkerOption::Asterisk)]
    fn test_uniform_emphasis_is_clean(#[case] text: &str, #[case] style: MarkerOption) {
        assert!(run_rule(&emphasis(style), text).is_empty());
    }

    #[test]
    fn test_each_boundary_is_reported() {
        let text = "*a* _b_";
        let diagnostics = run_rule(&emphasis(MarkerOption::Consistent), text);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].span, Span::new(4, 5));
        assert_eq!(diagnostics[1].span, Span::new(6, 7));
        assert_eq!(diagnostics[0].message, "Emphasis style should be `*`.");

        let fixed = apply_fixes(text, &diagnostics);
        assert_eq!(fixed, "*a* *b*");
        assert!(run_rule(&emphasis(MarkerOption::Consistent), &fixed).is_empty());
    }

    #[test]
    fn test_first_span_decides() {
        let text = "_a_ *b* *c*";
        let diagnostics = run_rule(&emphasis(MarkerOption::Consistent), text);

        assert_eq!(diagnostics.len(), 4);
        assert_eq!(apply_fixes(text, &diagnostics), "_a_ _b_ _c_");
    }

    #[test]
    fn test_fixed_style_overrides_first_span() {
        let text = "*a*";
        let diagnostics = run_rule(&emphasis(MarkerOption::Underscore), text);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(apply_fixes(text, &diagnostics), "_a_");
    }

    #[test]
    fn test_intraword_underscore_is_report_only() {
        let text = "_a_ foo*bar*baz";
        let diagnostics = run_rule(&emphasis(MarkerOption::Consistent), text);

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.fix.is_none()));
    }

    #[rstest]
    #[case::adjacent_underscore_run("_a_*b*", MarkerOption::Consistent)]
    #[case::adjacent_asterisk_run("*a*_b_", MarkerOption::Underscore)]
    #[case::one_side_intraword("_a_ foo*bar* baz", MarkerOption::Consistent)]
    fn test_unsafe_boundary_leaves_span_report_only(
        #[case] text: &str,
        #[case] style: MarkerOption,
    ) {
        let diagnostics = run_rule(&emphasis(style), text);

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().all(|d| d.fix.is_none()));
        assert_eq!(apply_fixes(text, &diagnostics), text);
    }

    #[test]
    fn test_strong_uses_two_character_boundaries() {
        let text = "**a** __b__";
        let diagnostics = run_rule(&strong(MarkerOption::Consistent), text);

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].span, Span::new(6, 8));
        assert_eq!(diagnostics[1].span, Span::new(9, 11));
        assert_eq!(diagnostics[0].message, "Strong style should be `*`.");

        let fixed = apply_fixes(text, &diagnostics);
        insta::assert_snapshot!(fixed, @"**a** **b**");
    }

    #[test]
    fn test_emphasis_ignores_strong() {
        let text = "__a__ *b*";
        assert!(run_rule(&emphasis(MarkerOption::Consistent), text).is_empty());
    }
}
