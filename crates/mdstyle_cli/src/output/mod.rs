//! Output formatting module

mod json;
mod text;

use miette::Result;
use mdstyle_core::LintResult;

use crate::cli::OutputFormat;

/// Prints results and returns true if any error-severity diagnostic remains.
pub fn output_results(results: &[LintResult], format: OutputFormat, timings: bool) -> Result<bool> {
    let has_errors = results.iter().any(|r| r.has_errors());

    match format {
        OutputFormat::Json => json::output_json(results)?,
        OutputFormat::Text => text::output_text(results, timings),
    }

    Ok(has_errors)
}
