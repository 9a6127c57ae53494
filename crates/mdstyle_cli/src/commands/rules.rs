//! Rules command implementation

use miette::{IntoDiagnostic, Result};
use mdstyle_core::registry::builtin_rules;

use crate::cli::OutputFormat;

pub fn run_rules(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let width = builtin_rules()
                .iter()
                .map(|entry| entry.meta.id.len())
                .max()
                .unwrap_or(0);
            for entry in builtin_rules() {
                let fixable = if entry.meta.fixable { "fixable" } else { "" };
                println!(
                    "{:<width$}  {:<7}  {}",
                    entry.meta.id, fixable, entry.meta.description
                );
            }
        }
        OutputFormat::Json => {
            let rules: Vec<_> = builtin_rules()
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "id": entry.meta.id,
                        "description": entry.meta.description,
                        "fixable": entry.meta.fixable,
                        "defaultOptions": entry.default_options(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rules).into_diagnostic()?);
        }
    }
    Ok(())
}
