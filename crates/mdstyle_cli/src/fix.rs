//! Fix application logic

use std::fs;
use std::path::PathBuf;

use tracing::{error, warn};
use mdstyle_core::{FixCoordinator, FixOutcome, LintResult, Linter};

/// Summary of applied fixes.
#[derive(Debug, Default)]
pub struct FixSummary {
    pub total_fixes: usize,
    pub files_fixed: usize,
    pub fixes_by_file: Vec<(PathBuf, usize)>,
    pub errors: Vec<(PathBuf, String)>,
}

/// Fixes every file with fixable diagnostics.
///
/// Each file is re-linted and fixed until it stops changing. Unless
/// `dry_run` is set, the file is rewritten and its diagnostics are replaced
/// with whatever is left.
pub fn apply_fixes(linter: &Linter, results: &mut [LintResult], dry_run: bool) -> FixSummary {
    let coordinator = FixCoordinator::new();
    let mut summary = FixSummary::default();

    for result in results.iter_mut() {
        if result.fixable_count() == 0 {
            continue;
        }

        let path = result.path.clone();
        let mut content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                summary.errors.push((path, e.to_string()));
                continue;
            }
        };

        let outcome =
            match coordinator.fix_until_stable(&mut content, |text| linter.lint_source(text)) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Failed to fix {}: {}", path.display(), e);
                    summary.errors.push((path, e.to_string()));
                    continue;
                }
            };

        match outcome {
            FixOutcome::Converged { .. } => {}
            FixOutcome::CycleDetected { cycle_length, .. } => warn!(
                "{}: fixes cycle with period {}",
                path.display(),
                cycle_length
            ),
            FixOutcome::MaxPassesReached { passes, .. } => warn!(
                "{}: fixes did not settle after {} passes",
                path.display(),
                passes
            ),
        }

        let fixes = outcome.fixes_applied();
        if fixes == 0 {
            continue;
        }

        if !dry_run {
            if let Err(e) = fs::write(&path, &content) {
                error!("Failed to write {}: {}", path.display(), e);
                summary.errors.push((path, e.to_string()));
                continue;
            }
            match linter.lint_source(&content) {
                Ok(remaining) => result.diagnostics = remaining,
                Err(e) => {
                    summary.errors.push((path, e.to_string()));
                    continue;
                }
            }
        }

        summary.total_fixes += fixes;
        summary.files_fixed += 1;
        summary.fixes_by_file.push((path, fixes));
    }

    summary
}

/// Outputs the fix summary.
pub fn output_fix_summary(summary: &FixSummary, dry_run: bool) {
    if summary.total_fixes == 0 && summary.errors.is_empty() {
        println!("No fixable issues found.");
        return;
    }

    if summary.total_fixes > 0 {
        let action = if dry_run { "Would fix" } else { "Fixed" };
        println!(
            "\n{} {} issues in {} files:",
            action, summary.total_fixes, summary.files_fixed
        );
        for (path, count) in &summary.fixes_by_file {
            println!("  {}: {} fixes", path.display(), count);
        }

        if dry_run {
            println!("\nRun without --dry-run to apply fixes.");
        }
    }

    if !summary.errors.is_empty() {
        eprintln!("\nFailed to fix {} file(s):", summary.errors.len());
        for (path, err) in &summary.errors {
            eprintln!("  {}: {}", path.display(), err);
        }
    }
}
