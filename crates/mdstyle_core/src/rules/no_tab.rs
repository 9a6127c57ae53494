//! `no-tab`: report tab characters outside code.

use mdstyle_ast::{Node, Span};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::skip::{SkipCode, SkippedSpans};
use crate::{Fix, LinterError, ListenerTable, Report, Rule, RuleContext, RuleError, RuleMeta};

pub static META: RuleMeta = RuleMeta {
    id: "no-tab",
    description: "Disallow tab characters",
    fixable: true,
    messages: &[("noTab", "Unexpected tab.")],
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct NoTabOptions {
    pub skip_code: SkipCode,
    pub skip_inline_code: bool,
    /// Spaces each tab is replaced with.
    pub tab_width: u32,
}

impl Default for NoTabOptions {
    fn default() -> Self {
        Self {
            skip_code: SkipCode::default(),
            skip_inline_code: true,
            tab_width: 4,
        }
    }
}

struct State {
    options: NoTabOptions,
    pattern: Regex,
    skipped: SkippedSpans,
}

pub struct NoTab {
    options: NoTabOptions,
    pattern: Regex,
    listeners: ListenerTable<State>,
}

impl NoTab {
    pub fn new(options: NoTabOptions) -> Result<Self, LinterError> {
        let pattern = Regex::new(r"\t").map_err(|e| LinterError::Internal(e.to_string()))?;
        let listeners = ListenerTable::new()
            .on("code", skip_code)?
            .on("inlineCode", skip_inline_code)?
            .on("root:exit", scan)?;

        Ok(Self {
            options,
            pattern,
            listeners,
        })
    }
}

impl Rule for NoTab {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let mut state = State {
            options: self.options.clone(),
            pattern: self.pattern.clone(),
            skipped: SkippedSpans::default(),
        };
        self.listeners.run(&ctx.document().root, &mut state, ctx)
    }
}

fn skip_code(state: &mut State, _: &mut RuleContext<'_>, node: &Node<'_>) -> Result<(), RuleError> {
    if state.options.skip_code.skips(node.lang()) {
        state.skipped.push(node.span);
    }
    Ok(())
}

fn skip_inline_code(state: &mut State, _: &mut RuleContext<'_>, node: &Node<'_>) -> Result<(), RuleError> {
    if state.options.skip_inline_code {
        state.skipped.push(node.span);
    }
    Ok(())
}

fn scan(state: &mut State, ctx: &mut RuleContext<'_>, _: &Node<'_>) -> Result<(), RuleError> {
    let replacement = " ".repeat(state.options.tab_width as usize);

    for found in state.pattern.find_iter(ctx.text()) {
        let offset = found.start() as u32;
        if state.skipped.contains(offset) {
            continue;
        }
        let span = Span::at(offset, 1);
        ctx.report(Report::new("noTab", span).fix(Fix::new(span, replacement.as_str())))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply_fixes, run_rule};
    use mdstyle_ast::Position;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn rule(options: NoTabOptions) -> NoTab {
        NoTab::new(options).unwrap()
    }

    fn langs(list: &[&str]) -> SkipCode {
        SkipCode::Languages(list.iter().map(|s| s.to_string()).collect())
    }

    #[rstest]
    #[case::empty("", NoTabOptions::default())]
    #[case::spaces("  ", NoTabOptions::default())]
    #[case::code_block("\n```js\n\t\n```", NoTabOptions::default())]
    #[case::info_string("\n```js\t\nconsole.log(\t'Hello World');\n```", NoTabOptions::default())]
    #[case::inline_code("`console.log(\t'a')`\n\n`console.log(\t'b')`", NoTabOptions::default())]
    #[case::listed_lang(
        "```md\nHello\tWorld\n```",
        NoTabOptions { skip_code: langs(&["md"]), ..Default::default() }
    )]
    #[case::listed_langs(
        "```md\nHello\tWorld\n```\n\n```txt\nHello\tWorld\n```",
        NoTabOptions { skip_code: langs(&["md", "txt"]), ..Default::default() }
    )]
    fn test_valid(#[case] text: &str, #[case] options: NoTabOptions) {
        assert!(run_rule(&rule(options), text).is_empty());
    }

    #[rstest]
    #[case::only_tab("\t", "    ")]
    #[case::after_text("1\t", "1    ")]
    #[case::outside_inline_code("`\t`\t", "`\t`    ")]
    fn test_invalid_default(#[case] text: &str, #[case] expected: &str) {
        let diagnostics = run_rule(&rule(NoTabOptions::default()), text);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Unexpected tab.");
        assert_eq!(diagnostics[0].span.len(), 1);
        assert_eq!(apply_fixes(text, &diagnostics), expected);
    }

    #[test]
    fn test_skip_code_false_reports_code_tabs() {
        let text = "\n```js\nconsole.log(\t'Hello World');\n```";
        let options = NoTabOptions {
            skip_code: SkipCode::All(false),
            ..Default::default()
        };
        let diagnostics = run_rule(&rule(options), text);

        assert_eq!(diagnostics.len(), 1);
        let loc = diagnostics[0].loc.unwrap();
        assert_eq!(loc.start, Position::new(3, 12));
        assert_eq!(loc.end, Position::new(3, 13));
        assert_eq!(
            apply_fixes(text, &diagnostics),
            "\n```js\nconsole.log(    'Hello World');\n```"
        );
    }

    #[test]
    fn test_unlisted_lang_is_checked() {
        let text = "```md\nHello\tWorld\n```";
        let options = NoTabOptions {
            skip_code: langs(&["js", "ts"]),
            ..Default::default()
        };
        assert_eq!(run_rule(&rule(options), text).len(), 1);
    }

    #[rstest]
    #[case(1, "`a b`")]
    #[case(2, "`a  b`")]
    #[case(0, "`ab`")]
    fn test_tab_width(#[case] tab_width: u32, #[case] expected: &str) {
        let text = "`a\tb`";
        let options = NoTabOptions {
            skip_inline_code: false,
            tab_width,
            ..Default::default()
        };
        let diagnostics = run_rule(&rule(options), text);
        assert_eq!(apply_fixes(text, &diagnostics), expected);
    }

    #[test]
    fn test_options_deserialize_camel_case() {
        let options: NoTabOptions =
            serde_json::from_str(r#"{ "skipCode": ["md"], "tabWidth": 2 }"#).unwrap();
        assert_eq!(options.skip_code, langs(&["md"]));
        assert!(options.skip_inline_code);
        assert_eq!(options.tab_width, 2);

        assert!(serde_json::from_str::<NoTabOptions>(r#"{ "tab_width": 2 }"#).is_err());
    }
}
