//! JSON output formatter

use miette::{IntoDiagnostic, Result};
use mdstyle_core::{LintResult, LintSummary};
use serde_json::json;

/// Prints `{ "files": [...], "summary": {...} }`.
///
/// Every checked file is listed, clean ones with an empty `diagnostics`
/// array, so the output also records what was checked.
pub fn output_json(results: &[LintResult]) -> Result<()> {
    let files: Vec<_> = results
        .iter()
        .map(|r| {
            json!({
                "path": r.path.display().to_string(),
                "errorCount": r.error_count(),
                "fixableCount": r.fixable_count(),
                "diagnostics": r.diagnostics,
            })
        })
        .collect();
    let output = json!({
        "files": files,
        "summary": LintSummary::from_results(results),
    });

    println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    Ok(())
}
