//! Lint result types.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::{Diagnostic, Severity};

/// Result of linting a single file.
#[derive(Debug, Clone)]
pub struct LintResult {
    /// Path to the linted file.
    pub path: PathBuf,

    /// Diagnostics found in the file, ordered by span start.
    pub diagnostics: Vec<Diagnostic>,

    /// Time spent per rule, when timings are enabled.
    pub timings: BTreeMap<String, Duration>,
}

impl LintResult {
    pub fn new(path: PathBuf, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            path,
            diagnostics,
            timings: BTreeMap::new(),
        }
    }

    /// Returns true if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Number of diagnostics that carry a fix.
    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_fixable()).count()
    }
}

/// Totals over several lint results.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LintSummary {
    pub files_checked: usize,
    pub files_with_diagnostics: usize,
    pub total_diagnostics: usize,
    pub errors: usize,
    pub fixable: usize,
}

impl LintSummary {
    pub fn from_results(results: &[LintResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.files_checked += 1;
            if !result.diagnostics.is_empty() {
                summary.files_with_diagnostics += 1;
            }
            summary.total_diagnostics += result.diagnostics.len();
            summary.errors += result.error_count();
            summary.fixable += result.fixable_count();
        }
        summary
    }
}
