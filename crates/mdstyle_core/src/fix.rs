//! Re-lint and fix until the text stops changing.

use blake3::Hash;
use tracing::{debug, warn};

use crate::{Diagnostic, LinterError, apply_fixes_to_content};

const DEFAULT_MAX_PASSES: usize = 10;

/// How a fix loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// A pass produced no change.
    Converged { passes: usize, fixes_applied: usize },
    /// The pass limit was hit while fixes were still changing the text.
    MaxPassesReached { passes: usize, fixes_applied: usize },
    /// The text returned to an earlier state.
    CycleDetected {
        passes: usize,
        cycle_length: usize,
        fixes_applied: usize,
    },
}

impl FixOutcome {
    /// Total fixes applied across all passes.
    pub fn fixes_applied(&self) -> usize {
        match *self {
            FixOutcome::Converged { fixes_applied, .. }
            | FixOutcome::MaxPassesReached { fixes_applied, .. }
            | FixOutcome::CycleDetected { fixes_applied, .. } => fixes_applied,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, FixOutcome::Converged { .. })
    }
}

/// Drives lint/apply passes over one text.
///
/// Each pass lints the current text and applies every non-overlapping fix.
/// Fixes skipped for overlapping are picked up by the next pass.
#[derive(Debug, Clone)]
pub struct FixCoordinator {
    max_passes: usize,
}

impl FixCoordinator {
    pub fn new() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    pub fn with_max_passes(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// Lints and fixes `content` in place until a pass changes nothing.
    pub fn fix_until_stable<F>(
        &self,
        content: &mut String,
        mut lint: F,
    ) -> Result<FixOutcome, LinterError>
    where
        F: FnMut(&str) -> Result<Vec<Diagnostic>, LinterError>,
    {
        let mut history: Vec<Hash> = vec![hash_content(content)];
        let mut fixes_applied = 0;
        let mut passes = 0;

        while passes < self.max_passes {
            passes += 1;

            let diagnostics = lint(content)?;
            let result = apply_fixes_to_content(content, &diagnostics);
            if !result.modified {
                debug!("Fixes converged after {} passes", passes);
                return Ok(FixOutcome::Converged {
                    passes,
                    fixes_applied,
                });
            }

            fixes_applied += result.fixes_applied;
            *content = result.fixed_content;

            let current = hash_content(content);
            if let Some(prev) = history.iter().position(|h| *h == current) {
                let cycle_length = history.len() - prev;
                warn!("Fixes cycle with period {}; stopping", cycle_length);
                return Ok(FixOutcome::CycleDetected {
                    passes,
                    cycle_length,
                    fixes_applied,
                });
            }
            history.push(current);
        }

        warn!("Fixes did not converge within {} passes", self.max_passes);
        Ok(FixOutcome::MaxPassesReached {
            passes,
            fixes_applied,
        })
    }
}

impl Default for FixCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

fn hash_content(content: &str) -> Hash {
    blake3::hash(content.as_bytes())
}
