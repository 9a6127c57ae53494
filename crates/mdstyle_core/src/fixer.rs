//! Applying diagnostic fixes to text.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::{Diagnostic, Fix, LinterError};

/// Result of applying fixes to one text.
#[derive(Debug)]
pub struct FixerResult {
    /// Number of fixes applied.
    pub fixes_applied: usize,
    /// The fixed content.
    pub fixed_content: String,
    /// Whether the content was modified.
    pub modified: bool,
}

impl FixerResult {
    pub fn new(fixes_applied: usize, fixed_content: String, modified: bool) -> Self {
        Self {
            fixes_applied,
            fixed_content,
            modified,
        }
    }

    /// A result that leaves `content` as it was.
    pub fn unchanged(content: String) -> Self {
        Self::new(0, content, false)
    }
}

/// Applies the fixes carried by `diagnostics` to `content`.
///
/// Fixes are applied from the end of the text to the start so earlier
/// offsets stay valid. When fixes from different rules overlap, the one
/// starting later wins and the others are skipped with a warning; a
/// re-lint picks them up if they still apply.
pub fn apply_fixes_to_content(content: &str, diagnostics: &[Diagnostic]) -> FixerResult {
    let mut fixes: Vec<&Fix> = diagnostics.iter().filter_map(|d| d.fix.as_ref()).collect();
    if fixes.is_empty() {
        return FixerResult::unchanged(content.to_string());
    }

    fixes.sort_by(|a, b| b.span.start.cmp(&a.span.start));
    let fixes = filter_overlapping_fixes(fixes);

    let mut result = content.to_string();
    let mut applied = 0;

    for fix in fixes {
        let range = fix.span.range();
        if range.start > range.end || result.get(range.clone()).is_none() {
            warn!(
                "Invalid fix span: start={}, end={}, content_len={}",
                fix.span.start,
                fix.span.end,
                result.len()
            );
            continue;
        }

        debug!(
            "Applying fix: replace [{}..{}] with {:?}",
            fix.span.start, fix.span.end, fix.text
        );
        result.replace_range(range, &fix.text);
        applied += 1;
    }

    let modified = result != content;
    FixerResult::new(applied, result, modified)
}

/// Drops fixes that overlap an already accepted one.
///
/// `fixes` must be sorted by start offset, descending. Accepted fixes are
/// then disjoint and sorted the same way, so only the last accepted fix
/// can overlap the next candidate.
pub(crate) fn filter_overlapping_fixes(fixes: Vec<&Fix>) -> Vec<&Fix> {
    debug_assert!(
        fixes.windows(2).all(|w| w[0].span.start >= w[1].span.start),
        "Fixes must be sorted by start descending"
    );

    let mut accepted: Vec<&Fix> = Vec::with_capacity(fixes.len());
    for fix in fixes {
        if let Some(last) = accepted.last()
            && last.span.overlaps(&fix.span)
        {
            warn!(
                "Skipping overlapping fix at [{}, {}]",
                fix.span.start, fix.span.end
            );
            continue;
        }
        accepted.push(fix);
    }
    accepted
}

/// Applies fixes to a file in place.
pub fn apply_fixes_to_file(
    path: &Path,
    diagnostics: &[Diagnostic],
) -> Result<FixerResult, LinterError> {
    let content = fs::read_to_string(path)
        .map_err(|e| LinterError::file(format!("Failed to read {}: {}", path.display(), e)))?;

    let result = apply_fixes_to_content(&content, diagnostics);
    if result.modified {
        fs::write(path, &result.fixed_content)
            .map_err(|e| LinterError::file(format!("Failed to write {}: {}", path.display(), e)))?;
    }

    Ok(result)
}
