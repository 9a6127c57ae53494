//! Lint command implementation

use miette::{IntoDiagnostic, Result};
use tracing::info;
use mdstyle_core::{Linter, LinterConfig};

use crate::cli::{Cli, OutputFormat};
use crate::fix::{apply_fixes, output_fix_summary};
use crate::output::output_results;

pub fn run_lint(
    cli: &Cli,
    patterns: &[String],
    format: OutputFormat,
    fix: bool,
    dry_run: bool,
    timings: bool,
) -> Result<bool> {
    let mut config = load_config(cli)?;
    if timings {
        config.timings = true;
    }
    let timings_enabled = config.timings;

    let linter = Linter::new(config).into_diagnostic()?;
    let (mut results, failures) = linter.lint_patterns(patterns).into_diagnostic()?;

    if !failures.is_empty() {
        eprintln!("\n{} file(s) failed to lint:", failures.len());
        for (path, error) in &failures {
            eprintln!("  {}: {}", path.display(), error);
        }
    }

    if fix {
        let summary = apply_fixes(&linter, &mut results, dry_run);
        output_fix_summary(&summary, dry_run);
        if !summary.errors.is_empty() {
            return Ok(true);
        }
    }

    let has_errors = output_results(&results, format, timings_enabled)?;
    Ok(has_errors || !failures.is_empty())
}

/// Loads `--config`, or the nearest config file above the working
/// directory, or the defaults.
pub fn load_config(cli: &Cli) -> Result<LinterConfig> {
    if let Some(path) = &cli.config {
        return LinterConfig::from_file(path).into_diagnostic();
    }

    let cwd = std::env::current_dir().into_diagnostic()?;
    if let Some(path) = LinterConfig::discover(&cwd) {
        info!("Using config: {}", path.display());
        return LinterConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(LinterConfig::new())
}
