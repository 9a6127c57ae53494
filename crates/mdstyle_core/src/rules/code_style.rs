//! `consistent-code-style`: every code block in a document uses one style.

use std::ops::Range;

use mdstyle_ast::{Node, Span};
use serde::{Deserialize, Serialize};

use crate::{
    Fix, ListenerTable, Report, Rule, RuleContext, RuleError, RuleMeta, SelectorError,
};

pub static META: RuleMeta = RuleMeta {
    id: "consistent-code-style",
    description: "Enforce a consistent code block style (indented or fenced)",
    fixable: true,
    messages: &[("style", "Code style should be `{{ style }}`.")],
};

/// Configured style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeStyleOption {
    /// The first code block decides.
    #[default]
    Consistent,
    Indent,
    FenceBacktick,
    FenceTilde,
}

impl CodeStyleOption {
    fn fixed(self) -> Option<CodeStyle> {
        match self {
            CodeStyleOption::Consistent => None,
            CodeStyleOption::Indent => Some(CodeStyle::Indent),
            CodeStyleOption::FenceBacktick => Some(CodeStyle::FenceBacktick),
            CodeStyleOption::FenceTilde => Some(CodeStyle::FenceTilde),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodeStyleOptions {
    pub style: CodeStyleOption,
}

/// Style of a code block as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeStyle {
    Indent,
    FenceBacktick,
    FenceTilde,
}

impl CodeStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CodeStyle::Indent => "indent",
            CodeStyle::FenceBacktick => "fence-backtick",
            CodeStyle::FenceTilde => "fence-tilde",
        }
    }

    const fn fence_char(&self) -> Option<u8> {
        match self {
            CodeStyle::Indent => None,
            CodeStyle::FenceBacktick => Some(b'`'),
            CodeStyle::FenceTilde => Some(b'~'),
        }
    }
}

struct State {
    expected: Option<CodeStyle>,
    /// Open blockquotes, list items and footnote definitions.
    containers: u32,
}

pub struct ConsistentCodeStyle {
    options: CodeStyleOptions,
    listeners: ListenerTable<State>,
}

impl ConsistentCodeStyle {
    pub fn new(options: CodeStyleOptions) -> Result<Self, SelectorError> {
        let listeners = ListenerTable::new()
            .on("blockquote", enter_container)?
            .on("blockquote:exit", exit_container)?
            .on("listItem", enter_container)?
            .on("listItem:exit", exit_container)?
            .on("footnoteDefinition", enter_container)?
            .on("footnoteDefinition:exit", exit_container)?
            .on("code", check_code)?;

        Ok(Self { options, listeners })
    }
}

impl Rule for ConsistentCodeStyle {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        let mut state = State {
            expected: self.options.style.fixed(),
            containers: 0,
        };
        self.listeners.run(&ctx.document().root, &mut state, ctx)
    }
}

fn enter_container(state: &mut State, _: &mut RuleContext<'_>, _: &Node<'_>) -> Result<(), RuleError> {
    state.containers += 1;
    Ok(())
}

fn exit_container(state: &mut State, _: &mut RuleContext<'_>, _: &Node<'_>) -> Result<(), RuleError> {
    state.containers = state
        .containers
        .checked_sub(1)
        .ok_or_else(|| RuleError::invariant("container exit without a matching enter"))?;
    Ok(())
}

fn check_code(state: &mut State, ctx: &mut RuleContext<'_>, node: &Node<'_>) -> Result<(), RuleError> {
    let doc = ctx.document();
    let text = doc.node_text(node).ok_or_else(|| {
        RuleError::invariant(format!(
            "code span {}..{} does not address the document",
            node.span.start, node.span.end
        ))
    })?;

    let block = Block::parse(text);
    let observed = block.style();
    let expected = *state.expected.get_or_insert(observed);
    if observed == expected {
        return Ok(());
    }

    let fix = match (&block, expected.fence_char()) {
        (Block::Fenced(fence), Some(to)) => fence.refence(text, to).map(|(range, replacement)| {
            let start = node.span.start + range.start as u32;
            Fix::new(Span::new(start, start + range.len() as u32), replacement)
        }),
        (Block::Indented, Some(to)) => {
            let at_line_start = node.span.start == 0
                || matches!(doc.byte_at(node.span.start - 1), Some(b'\n' | b'\r'));
            if state.containers == 0 && at_line_start {
                fence_indented(text, to, doc.line_ending_at(node.span.start))
                    .map(|replacement| Fix::new(node.span, replacement))
            } else {
                None
            }
        }
        // Fence info strings have no indented equivalent.
        (_, None) => None,
    };

    ctx.report(
        Report::new("style", node.span)
            .data("style", expected.as_str())
            .fix(fix),
    )
}

enum Block {
    Indented,
    Fenced(Fence),
}

/// Fence runs as byte ranges into the code node's text.
struct Fence {
    ch: u8,
    open: Range<usize>,
    info: Range<usize>,
    close: Option<Range<usize>>,
    /// Lines between the fences, as ranges into the node text.
    content: Vec<Range<usize>>,
}

impl Block {
    fn parse(text: &str) -> Self {
        let lines = line_ranges(text);
        let Some(first) = lines.first() else {
            return Block::Indented;
        };
        let first_line = &text[first.clone()];

        let (columns, indent) = leading_columns(first_line);
        let bytes = first_line.as_bytes();
        let ch = match bytes.get(indent) {
            Some(&ch) if ch == b'`' || ch == b'~' => ch,
            _ => return Block::Indented,
        };
        let run = run_length(&bytes[indent..], ch);
        if columns >= 4 || run < 3 {
            return Block::Indented;
        }

        let open = indent..indent + run;
        let info = open.end..first_line.len();

        let mut close = None;
        let mut content_end = lines.len();
        if lines.len() > 1
            && let Some(last) = lines.last()
        {
            let line = text[last.clone()].trim_end_matches([' ', '\t']);
            let trailing = line.bytes().rev().take_while(|&b| b == ch).count();
            let prefix = &line[..line.len() - trailing];
            if trailing >= run && prefix.bytes().all(|b| matches!(b, b' ' | b'\t' | b'>')) {
                close = Some(last.start + prefix.len()..last.start + line.len());
                content_end -= 1;
            }
        }

        Block::Fenced(Fence {
            ch,
            open,
            info,
            close,
            content: lines[1..content_end].to_vec(),
        })
    }

    fn style(&self) -> CodeStyle {
        match self {
            Block::Indented => CodeStyle::Indent,
            Block::Fenced(fence) if fence.ch == b'~' => CodeStyle::FenceTilde,
            Block::Fenced(_) => CodeStyle::FenceBacktick,
        }
    }
}

impl Fence {
    /// Rewrites the fence runs with `to`.
    ///
    /// Returns the range from the opening run to the end of the closing run
    /// (or of the opening run, if unclosed) and its replacement.
    fn refence(&self, text: &str, to: u8) -> Option<(Range<usize>, String)> {
        // A backtick fence cannot carry a backtick in its info string.
        if to == b'`' && text[self.info.clone()].contains('`') {
            return None;
        }

        let longest = self
            .content
            .iter()
            .map(|line| {
                let line = text[line.clone()].trim_start_matches([' ', '\t', '>']);
                run_length(line.as_bytes(), to)
            })
            .max()
            .unwrap_or(0);
        let fence = fence_string(to, self.open.len().max(longest + 1));

        let Some(close) = &self.close else {
            return Some((self.open.clone(), fence));
        };

        let mut out = String::with_capacity(close.end - self.open.start + 4);
        out.push_str(&fence);
        out.push_str(&text[self.open.end..close.start]);
        out.push_str(&fence);
        Some((self.open.start..close.end, out))
    }
}

/// Wraps an unnested indented block in fences, dedenting it by four columns.
///
/// Returns `None` when some line is neither blank nor indented by four
/// columns, since such a block cannot be dedented losslessly.
fn fence_indented(text: &str, to: u8, line_ending: &str) -> Option<String> {
    let mut body = Vec::new();
    for range in line_ranges(text) {
        let line = &text[range];
        let (columns, bytes) = leading_columns_upto(line, 4);
        let blank = line.trim_matches([' ', '\t']).is_empty();
        if columns < 4 && !blank {
            return None;
        }
        body.push(&line[bytes..]);
    }

    let longest = body
        .iter()
        .map(|line| run_length(line.trim_start_matches([' ', '\t']).as_bytes(), to))
        .max()
        .unwrap_or(0);
    let fence = fence_string(to, 3.max(longest + 1));

    let mut out = String::with_capacity(text.len() + 2 * (fence.len() + line_ending.len()));
    out.push_str(&fence);
    out.push_str(line_ending);
    for line in body {
        out.push_str(line);
        out.push_str(line_ending);
    }
    out.push_str(&fence);
    Some(out)
}

fn fence_string(ch: u8, len: usize) -> String {
    char::from(ch).to_string().repeat(len)
}

fn run_length(bytes: &[u8], ch: u8) -> usize {
    bytes.iter().take_while(|&&b| b == ch).count()
}

/// Indentation width in columns (tabs stop every 4) and its length in bytes.
fn leading_columns(line: &str) -> (usize, usize) {
    leading_columns_upto(line, usize::MAX)
}

/// Like [`leading_columns`], but stops once `limit` columns are reached.
fn leading_columns_upto(line: &str, limit: usize) -> (usize, usize) {
    let mut columns = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        if columns >= limit {
            break;
        }
        match b {
            b' ' => columns += 1,
            b'\t' => columns += 4 - columns % 4,
            _ => break,
        }
        bytes += 1;
    }
    (columns, bytes)
}

/// Content ranges of each line; LF, CR and CRLF terminate lines.
fn line_ranges(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                ranges.push(start..i);
                start = i + 1;
            }
            b'\r' => {
                ranges.push(start..i);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    ranges.push(start..bytes.len());
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{apply_fixes, run_rule};
    use mdstyle_ast::{Position, Span};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn rule(style: CodeStyleOption) -> ConsistentCodeStyle {
        ConsistentCodeStyle::new(CodeStyleOptions { style }).unwrap()
    }

    #[test]
    fn test_indented_then_fenced_reports_fenced_block() {
        let text = "    indented\n\n```\nfenced\n```";
        let diagnostics = run_rule(&rule(CodeStyleOption::Consistent), text);

        assert_eq!(diagnostics.len(), 1);
        let diag = &diagnostics[0];
        assert_eq!(diag.message, "Code style should be `indent`.");
        assert_eq!(diag.span, Span::new(14, 28));
        assert_eq!(diag.loc.unwrap().start, Position::new(3, 0));
        assert_eq!(diag.loc.unwrap().end, Position::new(5, 3));
        // Fence to indent is report-only.
        assert!(diag.fix.is_none());
    }

    #[rstest]
    #[case::backtick("```js\nconsole.log(1);\n```\n\n```\nplain\n```", CodeStyleOption::Consistent)]
    #[case::tilde("~~~\na\n~~~\n\n~~~md\nb\n~~~", CodeStyleOption::FenceTilde)]
    #[case::indent("    a\n\n# h\n\n    b", CodeStyleOption::Indent)]
    #[case::no_code("# Title\n\nText with `inline` code.", CodeStyleOption::FenceBacktick)]
    fn test_uniform_documents_are_clean(#[case] text: &str, #[case] style: CodeStyleOption) {
        assert!(run_rule(&rule(style), text).is_empty());
    }

    #[test]
    fn test_first_block_decides() {
        let text = "~~~\na\n~~~\n\n```\nb\n```\n\n```\nc\n```";
        let diagnostics = run_rule(&rule(CodeStyleOption::Consistent), text);

        assert_eq!(diagnostics.len(), 2);
        assert!(
            diagnostics
                .iter()
                .all(|d| d.data.get("style").map(String::as_str) == Some("fence-tilde"))
        );
    }

    #[rstest]
    #[case::tilde_to_backtick("~~~js\nx\n~~~", CodeStyleOption::FenceBacktick, "```js\nx\n```")]
    #[case::backtick_to_tilde("```js title=\"a\"\nx\n```", CodeStyleOption::FenceTilde, "~~~js title=\"a\"\nx\n~~~")]
    #[case::long_fences("`````\nx\n``````", CodeStyleOption::FenceTilde, "~~~~~\nx\n~~~~~")]
    #[case::unclosed("~~~\nx", CodeStyleOption::FenceBacktick, "```\nx")]
    #[case::lengthened_past_content("~~~\n```\n~~~", CodeStyleOption::FenceBacktick, "````\n```\n````")]
    #[case::indent_to_backtick("    a\n    b", CodeStyleOption::FenceBacktick, "```\na\nb\n```")]
    #[case::indent_to_tilde_keeps_blank_lines("    a\n\n    b", CodeStyleOption::FenceTilde, "~~~\na\n\nb\n~~~")]
    #[case::indent_keeps_extra_indent("    a\n      b", CodeStyleOption::FenceBacktick, "```\na\n  b\n```")]
    #[case::indent_with_tab("\ta", CodeStyleOption::FenceBacktick, "```\na\n```")]
    #[case::indent_crlf("    a\r\n    b", CodeStyleOption::FenceBacktick, "```\r\na\r\nb\r\n```")]
    fn test_fixes(#[case] text: &str, #[case] style: CodeStyleOption, #[case] expected: &str) {
        let rule = rule(style);
        let diagnostics = run_rule(&rule, text);
        assert_eq!(diagnostics.len(), 1);

        let fixed = apply_fixes(text, &diagnostics);
        assert_eq!(fixed, expected);
        assert!(run_rule(&rule, &fixed).is_empty(), "fix should be stable: {fixed:?}");
    }

    #[test]
    fn test_refence_fix_covers_only_the_fence_runs() {
        let text = "  ~~~\n  x\n  ~~~";
        let diagnostics = run_rule(&rule(CodeStyleOption::FenceBacktick), text);
        assert_eq!(diagnostics.len(), 1);

        let fix = diagnostics[0].fix.as_ref().unwrap();
        assert_eq!(fix.span, Span::new(2, 15));
        assert_eq!(fix.text, "```\n  x\n  ```");
        assert_eq!(apply_fixes(text, &diagnostics), "  ```\n  x\n  ```");
    }

    #[test]
    fn test_unclosed_refence_fix_covers_the_opening_run() {
        let text = "para\n\n~~~js\nx\n";
        let diagnostics = run_rule(&rule(CodeStyleOption::FenceBacktick), text);
        assert_eq!(diagnostics.len(), 1);

        let fix = diagnostics[0].fix.as_ref().unwrap();
        assert_eq!(fix.span, Span::new(6, 9));
        assert_eq!(fix.text, "```");
    }

    #[test]
    fn test_tilde_with_backtick_info_is_report_only() {
        let diagnostics = run_rule(&rule(CodeStyleOption::FenceBacktick), "~~~ a`b\nx\n~~~");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].fix.is_none());
    }

    #[test]
    fn test_nested_indented_block_is_report_only() {
        let text = "- item\n\n      code";
        let diagnostics = run_rule(&rule(CodeStyleOption::FenceBacktick), text);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].fix.is_none());
    }

    #[test]
    fn test_fence_in_blockquote_is_refenced() {
        let text = "> ~~~\n> x\n> ~~~";
        let rule = rule(CodeStyleOption::FenceBacktick);
        let fixed = apply_fixes(text, &run_rule(&rule, text));

        insta::assert_snapshot!(format!("{fixed:?}"), @r#""> ```\n> x\n> ```""#);
    }

    #[test]
    fn test_mixed_document_stabilizes() {
        let text = "```\na\n```\n\n~~~\nb\n~~~\n\n    c\n";
        let rule = rule(CodeStyleOption::Consistent);
        let diagnostics = run_rule(&rule, text);
        assert_eq!(diagnostics.len(), 2);

        let fixed = apply_fixes(text, &diagnostics);
        insta::assert_snapshot!(format!("{fixed:?}"), @r#""```\na\n```\n\n```\nb\n```\n\n```\nc\n```\n""#);
        assert!(run_rule(&rule, &fixed).is_empty());
    }

    #[rstest]
    #[case("", vec![0..0])]
    #[case("a\nb", vec![0..1, 2..3])]
    #[case("a\r\nb\r", vec![0..1, 3..4, 5..5])]
    fn test_line_ranges(#[case] text: &str, #[case] expected: Vec<Range<usize>>) {
        assert_eq!(line_ranges(text), expected);
    }

    #[rstest]
    #[case("    x", (4, 4))]
    #[case("\tx", (4, 1))]
    #[case("  \tx", (4, 3))]
    #[case("x", (0, 0))]
    fn test_leading_columns(#[case] line: &str, #[case] expected: (usize, usize)) {
        assert_eq!(leading_columns(line), expected);
    }
}
