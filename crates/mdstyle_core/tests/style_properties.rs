//! End-to-end checks of the built-in rules through the public API.

use mdstyle_ast::{AstArena, Document, Position, Span};
use mdstyle_core::registry::find_rule;
use mdstyle_core::{
    Diagnostic, FixCoordinator, FixOutcome, Linter, LinterConfig, Report, Rule, RuleContext,
    RuleError, RuleMeta, Severity, apply_fixes_to_content,
};
use mdstyle_parser::{MarkdownParser, Parser};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn check(id: &str, options: Value, text: &str) -> Vec<Diagnostic> {
    let rule = find_rule(id).unwrap().build(&options).unwrap();
    let arena = AstArena::new();
    let root = MarkdownParser::new().parse(&arena, text).unwrap();
    let document = Document::new(text, root);

    let mut ctx = RuleContext::new(rule.meta(), &document, Severity::Error);
    rule.check(&mut ctx).unwrap();
    ctx.into_diagnostics()
}

fn fix_once(text: &str, diagnostics: &[Diagnostic]) -> String {
    apply_fixes_to_content(text, diagnostics).fixed_content
}

#[test]
fn indented_then_fenced_recommends_indent() {
    let text = "    indented\n\n```\nfenced\n```\n";
    let diagnostics = check("consistent-code-style", Value::Null, text);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].span, Span::new(14, 28));
    assert_eq!(diagnostics[0].data["style"], "indent");
    assert_eq!(diagnostics[0].fix, None);
}

#[test]
fn mixed_bullets_are_unified_to_the_first() {
    let text = "- a\n* b\n+ c\n";
    let diagnostics = check("consistent-unordered-list-style", Value::Null, text);

    let lines: Vec<_> = diagnostics.iter().map(|d| d.loc.unwrap().start).collect();
    assert_eq!(lines, vec![Position::new(2, 0), Position::new(3, 0)]);
    assert!(diagnostics.iter().all(|d| d.data["style"] == "-"));
    assert_eq!(fix_once(text, &diagnostics), "- a\n- b\n- c\n");
}

#[test]
fn sublist_depth_three_reuses_depth_zero() {
    let text = "* a\n  + b\n    - c\n      * d\n";
    let diagnostics = check(
        "consistent-unordered-list-style",
        json!({ "style": "sublist" }),
        text,
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn sublist_child_gets_next_marker() {
    let text = "* a\n  * b\n";
    let diagnostics = check(
        "consistent-unordered-list-style",
        json!({ "style": "sublist" }),
        text,
    );

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].data["style"], "-");
    assert_eq!(diagnostics[0].loc.unwrap().start, Position::new(2, 2));
}

#[rstest]
#[case::code("consistent-code-style", json!({}), "```js\na\n```\n\n```\nb\n```\n")]
#[case::code_indent("consistent-code-style", json!({ "style": "indent" }), "    a\n\n    b\n")]
#[case::emphasis("consistent-emphasis-style", json!({ "style": "_" }), "_a_ and _b_\n")]
#[case::strong("consistent-strong-style", json!({}), "**a** and **b**\n")]
#[case::list("consistent-unordered-list-style", json!({}), "- a\n- b\n  - c\n")]
#[case::sublist("consistent-unordered-list-style", json!({ "style": "sublist" }), "- a\n  + b\n    * c\n")]
#[case::no_tab("no-tab", json!({}), "a  b\n\n```\n\tcode\n```\n")]
#[case::no_marker("no-git-conflict-marker", json!({}), "======== long rule\n")]
fn uniform_input_is_a_fixed_point(#[case] id: &str, #[case] options: Value, #[case] text: &str) {
    assert_eq!(check(id, options, text), Vec::<Diagnostic>::new());
}

#[rstest]
#[case::code_tilde("consistent-code-style", json!({}), "```js\na\n```\n\n~~~\nb\n~~~\n")]
#[case::code_to_tilde("consistent-code-style", json!({ "style": "fence-tilde" }), "```\n~~~\n```\n")]
#[case::code_indent_to_fence("consistent-code-style", json!({ "style": "fence-backtick" }), "    a\n\n    b\n")]
#[case::emphasis("consistent-emphasis-style", json!({}), "*a* _b_ *c*\n")]
#[case::strong("consistent-strong-style", json!({ "style": "_" }), "**a** __b__ **c**\n")]
#[case::list("consistent-unordered-list-style", json!({}), "+ a\n  - b\n* c\n")]
#[case::sublist("consistent-unordered-list-style", json!({ "style": "sublist" }), "- a\n  - b\n    - c\n")]
#[case::no_tab("no-tab", json!({ "tabWidth": 2 }), "a\tb\n\n- c\td\n")]
fn fixes_stabilize_in_one_pass(#[case] id: &str, #[case] options: Value, #[case] text: &str) {
    let diagnostics = check(id, options.clone(), text);
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().all(Diagnostic::is_fixable));

    let fixed = fix_once(text, &diagnostics);
    assert_eq!(check(id, options, &fixed), Vec::<Diagnostic>::new(), "after fixing:\n{}", fixed);
}

#[rstest]
#[case("> - a\n>   - b\n>\n> 1. c\n>    - d\n")]
#[case("- a\n\n  > - b\n  >   * c\n\n- d\n")]
#[case("1. a\n   1. b\n      - c\n         - d\n")]
#[case("")]
fn depth_tracker_stays_balanced(#[case] text: &str) {
    for depth in ["unordered", "any-list"] {
        for style in ["consistent", "sublist"] {
            // A rule whose tracker ends unbalanced faults in `check`.
            check(
                "consistent-unordered-list-style",
                json!({ "style": style, "depth": depth }),
                text,
            );
        }
    }
}

/// One item per depth, each nested two columns deeper than its parent.
fn nested_list(markers: &str) -> String {
    markers
        .chars()
        .enumerate()
        .map(|(depth, marker)| format!("{}{} item\n", "  ".repeat(depth), marker))
        .collect()
}

#[rstest]
#[case::dashes("------")]
#[case::asterisks("*******")]
#[case::pluses("++++")]
#[case::alternating("*-*-*-*")]
#[case::two_cycle("-+-+-+")]
#[case::mixed("*+-+*-")]
#[case::pairs("--++--")]
#[case::already_cyclic("+*-+*-+")]
fn sublist_adjacent_depths_never_share_a_marker(#[case] markers: &str) {
    let options = json!({ "style": "sublist" });
    let text = nested_list(markers);
    let fixed = fix_once(&text, &check("consistent-unordered-list-style", options.clone(), &text));
    assert_eq!(
        check("consistent-unordered-list-style", options, &fixed),
        Vec::<Diagnostic>::new()
    );

    let used: Vec<char> = fixed
        .lines()
        .filter_map(|line| line.trim_start().chars().next())
        .collect();
    assert_eq!(used.len(), markers.len());
    for d in 1..used.len() {
        assert_ne!(used[d], used[d - 1], "depth {} repeats its parent in\n{}", d, fixed);
    }
    for d in 3..used.len() {
        assert_eq!(used[d], used[d - 3], "depth {} differs from depth {} in\n{}", d, d - 3, fixed);
    }
}

static FAULTY_META: RuleMeta = RuleMeta {
    id: "faulty",
    description: "Reports with a message id it does not declare",
    fixable: false,
    messages: &[],
};

struct Faulty;

impl Rule for Faulty {
    fn meta(&self) -> &'static RuleMeta {
        &FAULTY_META
    }

    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError> {
        ctx.report(Report::new("missing", Span::new(0, 1)))
    }
}

#[test]
fn faulting_rule_does_not_affect_others() {
    let mut linter = Linter::new(LinterConfig::new()).unwrap();
    linter.add_rule(Box::new(Faulty), Severity::Error);

    let diagnostics = linter.lint_source("- a\n* b\n").unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].rule_id, "consistent-unordered-list-style");
}

#[test]
fn fix_coordinator_converges_across_rules() {
    let linter = Linter::new(LinterConfig::new()).unwrap();
    let mut content = "- a\n* b\n\n*x* _y_\tz\n\n~~~\nq\n~~~\n\n```\nr\n```\n".to_string();

    let outcome = FixCoordinator::new()
        .fix_until_stable(&mut content, |text| linter.lint_source(text))
        .unwrap();

    assert!(matches!(outcome, FixOutcome::Converged { .. }));
    insta::assert_snapshot!(content, @r"
    - a
    - b

    *x* *y*    z

    ~~~
    q
    ~~~

    ~~~
    r
    ~~~
    ");
    assert!(linter.lint_source(&content).unwrap().is_empty());
}
