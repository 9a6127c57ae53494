//! Text output formatter

use std::collections::BTreeMap;
use std::time::Duration;

use mdstyle_core::{LintResult, LintSummary};

pub fn output_text(results: &[LintResult], timings: bool) {
    for result in results {
        if result.diagnostics.is_empty() {
            continue;
        }

        println!("\n{}:", result.path.display());
        for diag in &result.diagnostics {
            // Columns are shown 1-based.
            let position = match diag.loc {
                Some(loc) => format!("{}:{}", loc.start.line, loc.start.column + 1),
                None => format!("{}:{}", diag.span.start, diag.span.end),
            };
            let fixable = if diag.is_fixable() { " (fixable)" } else { "" };
            println!(
                "  {} {} [{}]: {}{}",
                position,
                diag.severity.as_str(),
                diag.rule_id,
                diag.message,
                fixable
            );
        }
    }

    let summary = LintSummary::from_results(results);
    println!();
    println!(
        "Checked {} files, found {} issues ({} fixable)",
        summary.files_checked, summary.total_diagnostics, summary.fixable
    );

    if timings {
        output_timings(results);
    }
}

fn output_timings(results: &[LintResult]) {
    let mut total_duration = Duration::ZERO;
    let mut rule_timings: BTreeMap<&str, Duration> = BTreeMap::new();

    for result in results {
        for (rule, duration) in &result.timings {
            *rule_timings.entry(rule.as_str()).or_default() += *duration;
            total_duration += *duration;
        }
    }

    if rule_timings.is_empty() {
        return;
    }

    println!("\nPerformance Timings:");
    println!("{:<30} | {:<15} | {:<10}", "Rule", "Duration", "%");
    println!("{:-<30}-+-{:-<15}-+-{:-<10}", "", "", "");

    let mut sorted: Vec<_> = rule_timings.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    for (rule, duration) in sorted {
        let percentage = if total_duration.as_secs_f64() > 0.0 {
            (duration.as_secs_f64() / total_duration.as_secs_f64()) * 100.0
        } else {
            0.0
        };
        println!("{:<30} | {:<15?} | {:<10.1}%", rule, duration, percentage);
    }
    println!("{:-<30}-+-{:-<15}-+-{:-<10}", "", "", "");
    println!("{:<30} | {:<15?}", "Total", total_duration);
}
