//! Helpers for driving rules over real parser output in tests.

use mdstyle_ast::{AstArena, Document};
use mdstyle_parser::{MarkdownParser, Parser};

use crate::{Diagnostic, Rule, RuleContext, Severity, apply_fixes_to_content};

/// Parses `text` and runs one rule over it.
pub fn run_rule(rule: &dyn Rule, text: &str) -> Vec<Diagnostic> {
    let arena = AstArena::for_source(text.len());
    let root = MarkdownParser::new()
        .parse(&arena, text)
        .expect("test input should parse");
    let document = Document::new(text, root);

    let mut ctx = RuleContext::new(rule.meta(), &document, Severity::Error);
    rule.check(&mut ctx).expect("rule should not fault");
    ctx.into_diagnostics()
}

/// Applies every fix carried by `diagnostics` to `text`.
pub fn apply_fixes(text: &str, diagnostics: &[Diagnostic]) -> String {
    apply_fixes_to_content(text, diagnostics).fixed_content
}
