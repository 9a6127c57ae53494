//! Reporting: turning rule findings into diagnostics.

use std::collections::BTreeMap;

use mdstyle_ast::{Document, Span};

use crate::{Diagnostic, Fix, RuleError, RuleMeta, Severity};

/// A finding a rule wants to report.
///
/// ```rust
/// use mdstyle_ast::Span;
/// use mdstyle_core::{Fix, Report};
///
/// let report = Report::new("style", Span::new(4, 5))
///     .data("style", "-")
///     .fix(Fix::new(Span::new(4, 5), "-"));
/// # let _ = report;
/// ```
#[derive(Debug, Clone)]
pub struct Report {
    message_id: &'static str,
    span: Span,
    data: BTreeMap<String, String>,
    fix: Option<Fix>,
}

impl Report {
    /// Creates a report for `message_id` over `span`.
    pub fn new(message_id: &'static str, span: Span) -> Self {
        Self {
            message_id,
            span,
            data: BTreeMap::new(),
            fix: None,
        }
    }

    /// Adds a value for the message template.
    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Attaches a fix. Passing `None` leaves the report without one.
    pub fn fix(mut self, fix: impl Into<Option<Fix>>) -> Self {
        self.fix = fix.into();
        self
    }
}

/// Per-rule, per-document reporting context.
pub struct RuleContext<'a> {
    meta: &'a RuleMeta,
    document: &'a Document<'a>,
    severity: Severity,
    diagnostics: Vec<Diagnostic>,
    /// Fix spans emitted so far, keyed by start offset.
    fix_spans: BTreeMap<u32, Span>,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for one rule pass over `document`.
    pub fn new(meta: &'a RuleMeta, document: &'a Document<'a>, severity: Severity) -> Self {
        Self {
            meta,
            document,
            severity,
            diagnostics: Vec::new(),
            fix_spans: BTreeMap::new(),
        }
    }

    /// The document being checked.
    #[inline]
    pub fn document(&self) -> &'a Document<'a> {
        self.document
    }

    /// The document's source text.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.document.text
    }

    /// The rule this context reports for.
    #[inline]
    pub fn meta(&self) -> &'a RuleMeta {
        self.meta
    }

    /// Records a diagnostic.
    ///
    /// Fails without recording anything if the span or fix span does not
    /// address the document, the message id is unknown to the rule, or the
    /// fix overlaps a fix reported earlier in this pass.
    pub fn report(&mut self, report: Report) -> Result<(), RuleError> {
        let template = self.meta.message(report.message_id).ok_or_else(|| {
            RuleError::invariant(format!(
                "rule `{}` has no message `{}`",
                self.meta.id, report.message_id
            ))
        })?;

        let loc = self.document.location(report.span).ok_or_else(|| {
            RuleError::invariant(format!(
                "span {}..{} does not address the document ({} bytes)",
                report.span.start,
                report.span.end,
                self.document.text.len()
            ))
        })?;

        if let Some(fix) = &report.fix {
            self.check_fix(fix)?;
            self.fix_spans.insert(fix.span.start, fix.span);
        }

        let message = interpolate(template, &report.data);
        let mut diagnostic = Diagnostic::new(self.meta.id, report.message_id, message, report.span)
            .with_location(loc)
            .with_severity(self.severity)
            .with_data(report.data);
        if let Some(fix) = report.fix {
            diagnostic = diagnostic.with_fix(fix);
        }

        self.diagnostics.push(diagnostic);
        Ok(())
    }

    fn check_fix(&self, fix: &Fix) -> Result<(), RuleError> {
        if !self.document.contains_span(fix.span) {
            return Err(RuleError::invariant(format!(
                "fix span {}..{} does not address the document",
                fix.span.start, fix.span.end
            )));
        }

        // Accepted spans are disjoint, so only the closest neighbour on
        // each side can overlap.
        let before = self.fix_spans.range(..=fix.span.start).next_back();
        let after = self.fix_spans.range(fix.span.start..).next();
        for (_, existing) in before.into_iter().chain(after) {
            if existing.overlaps(&fix.span) {
                return Err(RuleError::invariant(format!(
                    "fix span {}..{} overlaps earlier fix {}..{}",
                    fix.span.start, fix.span.end, existing.start, existing.end
                )));
            }
        }
        Ok(())
    }

    /// Diagnostics reported so far, in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consumes the context, returning its diagnostics in report order.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// Fills `{{ key }}` placeholders from `data`. Unknown keys are left as is.
pub fn interpolate(template: &str, data: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let close = open + 2 + close;
        let key = rest[open + 2..close].trim();

        out.push_str(&rest[..open]);
        match data.get(key) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[open..close + 2]),
        }
        rest = &rest[close + 2..];
    }

    out.push_str(rest);
    out
}
