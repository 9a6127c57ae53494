//! Code ranges that text scans leave alone.

use mdstyle_ast::Span;
use serde::{Deserialize, Serialize};

/// `skipCode` option: skip every code block, none, or those in the listed
/// languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkipCode {
    All(bool),
    Languages(Vec<String>),
}

impl Default for SkipCode {
    fn default() -> Self {
        SkipCode::All(true)
    }
}

impl SkipCode {
    /// Returns true if a code block with `lang` should be skipped.
    pub fn skips(&self, lang: Option<&str>) -> bool {
        match self {
            SkipCode::All(skip) => *skip,
            SkipCode::Languages(langs) => lang.is_some_and(|lang| langs.iter().any(|l| l == lang)),
        }
    }
}

/// Skipped spans, collected in document order.
#[derive(Debug, Default)]
pub struct SkippedSpans {
    spans: Vec<Span>,
}

impl SkippedSpans {
    /// Adds a span. Spans must arrive sorted by start and must not overlap,
    /// which holds for code nodes collected during a walk.
    pub fn push(&mut self, span: Span) {
        debug_assert!(self.spans.last().is_none_or(|last| last.end <= span.start));
        self.spans.push(span);
    }

    /// Returns true if `offset` lies inside a skipped span.
    pub fn contains(&self, offset: u32) -> bool {
        let idx = self.spans.partition_point(|span| span.start <= offset);
        idx > 0 && self.spans[idx - 1].contains(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SkipCode::All(true), None, true)]
    #[case(SkipCode::All(true), Some("js"), true)]
    #[case(SkipCode::All(false), Some("js"), false)]
    #[case(SkipCode::Languages(vec!["md".into()]), Some("md"), true)]
    #[case(SkipCode::Languages(vec!["md".into()]), Some("js"), false)]
    #[case(SkipCode::Languages(vec!["md".into()]), None, false)]
    fn test_skips(#[case] option: SkipCode, #[case] lang: Option<&str>, #[case] expected: bool) {
        assert_eq!(option.skips(lang), expected);
    }

    #[test]
    fn test_deserialize() {
        let all: SkipCode = serde_json::from_str("false").unwrap();
        assert_eq!(all, SkipCode::All(false));
        let langs: SkipCode = serde_json::from_str(r#"["js", "ts"]"#).unwrap();
        assert_eq!(langs, SkipCode::Languages(vec!["js".into(), "ts".into()]));
    }

    #[test]
    fn test_contains() {
        let mut spans = SkippedSpans::default();
        spans.push(Span::new(2, 5));
        spans.push(Span::new(8, 9));

        assert!(!spans.contains(1));
        assert!(spans.contains(2));
        assert!(spans.contains(4));
        assert!(!spans.contains(5));
        assert!(spans.contains(8));
        assert!(!spans.contains(9));
    }
}
