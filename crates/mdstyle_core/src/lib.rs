//! # mdstyle_core
//!
//! Rule engine and linter for mdstyle.
//!
//! This crate provides:
//! - [`selector`] - the selector grammar rules register listeners with
//! - [`engine`] - the traversal engine dispatching enter/exit events
//! - [`depth`] - depth-scoped state for nested lists
//! - [`RuleContext`] - reporting with invariant checks
//! - [`rules`] - the built-in style rules
//! - [`Linter`], the fixer and [`FixCoordinator`]
//!
//! ## Example
//!
//! ```rust
//! use mdstyle_core::{Linter, LinterConfig, apply_fixes_to_content};
//!
//! let linter = Linter::new(LinterConfig::new()).unwrap();
//! let text = "- a\n* b\n";
//! let diagnostics = linter.lint_source(text).unwrap();
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].message, "Unordered list style should be `-`.");
//! assert_eq!(apply_fixes_to_content(text, &diagnostics).fixed_content, "- a\n- b\n");
//! ```

mod config;
mod context;
pub mod depth;
mod diagnostic;
pub mod engine;
mod error;
mod fix;
mod fixer;
mod linter;
pub mod registry;
mod result;
mod rule;
pub mod rules;
pub mod selector;

#[cfg(test)]
mod test_utils;

pub use config::{CONFIG_FILES, EnabledRule, LinterConfig, RuleOption};
pub use context::{Report, RuleContext, interpolate};
pub use depth::{DepthTracker, ScopeKind};
pub use diagnostic::{Diagnostic, Fix, Severity};
pub use engine::{Callback, ListenerTable};
pub use error::{LinterError, RuleError, SelectorError};
pub use fix::{FixCoordinator, FixOutcome};
pub use fixer::{FixerResult, apply_fixes_to_content, apply_fixes_to_file};
pub use linter::{LintFilesResult, Linter};
pub use result::{LintResult, LintSummary};
pub use rule::{Rule, RuleMeta};
pub use selector::{Phase, Selector};
