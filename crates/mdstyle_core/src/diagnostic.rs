//! Diagnostic types for lint results.

use std::collections::BTreeMap;

use mdstyle_ast::{Location, Span};
use serde::{Deserialize, Serialize};

/// Severity level for diagnostics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    #[default]
    Error,
    /// Warning - should be reviewed.
    Warning,
    /// Info - informational message.
    Info,
}

impl Severity {
    /// Returns the lowercase name used in config files and output.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A style finding produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The rule that generated this diagnostic.
    pub rule_id: String,

    /// Identifier of the message template within the rule.
    pub message_id: String,

    /// The interpolated message.
    pub message: String,

    /// Values substituted into the message template.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,

    /// Byte span in the source.
    pub span: Span,

    /// Line/column location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,

    /// Severity level.
    #[serde(default)]
    pub severity: Severity,

    /// Optional fix for this diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    pub fn new(
        rule_id: impl Into<String>,
        message_id: impl Into<String>,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            message_id: message_id.into(),
            message: message.into(),
            data: BTreeMap::new(),
            span,
            loc: None,
            severity: Severity::Error,
            fix: None,
        }
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, loc: Location) -> Self {
        self.loc = Some(loc);
        self
    }

    /// Sets the interpolation data.
    pub fn with_data(mut self, data: BTreeMap<String, String>) -> Self {
        self.data = data;
        self
    }

    /// Sets an auto-fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Returns true if the diagnostic carries a fix.
    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }
}

/// An auto-fix for a diagnostic: replace `span` with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fix {
    /// The byte span to replace.
    pub span: Span,

    /// The replacement text.
    pub text: String,
}

impl Fix {
    /// Creates a new fix.
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    /// Creates a fix that inserts text at a position.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self {
            span: Span::new(offset, offset),
            text: text.into(),
        }
    }
}
