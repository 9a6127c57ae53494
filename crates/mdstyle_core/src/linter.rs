//! Core linter engine.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use globset::{Glob, GlobSet, GlobSetBuilder};
use mdstyle_ast::{AstArena, Document};
use mdstyle_parser::{MarkdownParser, Parser};
use rayon::prelude::*;
use tracing::{debug, error, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{Diagnostic, LintResult, LinterConfig, LinterError, Rule, RuleContext, Severity};

/// Result type for `lint_files` and `lint_patterns`.
///
/// Contains a tuple of:
/// - Successful lint results
/// - Failed files with their errors (path and error)
pub type LintFilesResult = Result<(Vec<LintResult>, Vec<(PathBuf, LinterError)>), LinterError>;

struct ConfiguredRule {
    rule: Box<dyn Rule>,
    severity: Severity,
}

/// The core linter engine.
///
/// Builds every enabled rule once, then checks any number of documents.
pub struct Linter {
    config: LinterConfig,
    rules: Vec<ConfiguredRule>,
    parser: MarkdownParser,
    include_globs: Option<GlobSet>,
    exclude_globs: Option<GlobSet>,
}

impl Linter {
    /// Creates a linter, building and validating every enabled rule.
    pub fn new(config: LinterConfig) -> Result<Self, LinterError> {
        let rules = config
            .enabled_rules()?
            .into_iter()
            .map(|enabled| {
                let rule = enabled.entry.build(&enabled.options)?;
                debug!(
                    "Enabled rule `{}` ({})",
                    enabled.entry.meta.id,
                    enabled.severity.as_str()
                );
                Ok(ConfiguredRule {
                    rule,
                    severity: enabled.severity,
                })
            })
            .collect::<Result<Vec<_>, LinterError>>()?;

        let include_globs = Self::build_globset(&config.include)?;
        let exclude_globs = Self::build_globset(&config.exclude)?;

        Ok(Self {
            config,
            rules,
            parser: MarkdownParser::new(),
            include_globs,
            exclude_globs,
        })
    }

    /// Adds a rule built outside the registry.
    ///
    /// The rule runs after the configured rules on every later lint call.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>, severity: Severity) {
        debug!("Added rule `{}`", rule.meta().id);
        self.rules.push(ConfiguredRule { rule, severity });
    }

    /// The configuration this linter was built from.
    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    /// Ids of the enabled rules.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.rule.meta().id).collect()
    }

    fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, LinterError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|e| LinterError::config(format!("Invalid glob pattern: {}", e)))?;
            builder.add(glob);
        }

        let globset = builder
            .build()
            .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))?;

        Ok(Some(globset))
    }

    /// Lints markdown text.
    ///
    /// Diagnostics from all rules are merged in span-start order; ties keep
    /// rule order and each rule's report order.
    pub fn lint_source(&self, text: &str) -> Result<Vec<Diagnostic>, LinterError> {
        self.check_source(text).map(|(diagnostics, _)| diagnostics)
    }

    fn check_source(
        &self,
        text: &str,
    ) -> Result<(Vec<Diagnostic>, BTreeMap<String, Duration>), LinterError> {
        let arena = AstArena::for_source(text.len());
        let root = self.parser.parse(&arena, text)?;
        let document = Document::new(text, root);

        // Rules share the document read-only; each keeps its own state.
        let outcomes: Vec<_> = self
            .rules
            .par_iter()
            .map(|configured| {
                let meta = configured.rule.meta();
                let start = Instant::now();
                let mut ctx = RuleContext::new(meta, &document, configured.severity);
                let outcome = configured
                    .rule
                    .check(&mut ctx)
                    .map(|()| ctx.into_diagnostics());
                (meta.id, outcome, start.elapsed())
            })
            .collect();

        let mut diagnostics = Vec::new();
        let mut timings = BTreeMap::new();
        for (id, outcome, elapsed) in outcomes {
            match outcome {
                Ok(found) => {
                    debug!("Rule `{}` reported {} diagnostics", id, found.len());
                    diagnostics.extend(found);
                }
                Err(e) => error!("{}", LinterError::rule(id, e)),
            }
            if self.config.timings {
                timings.insert(id.to_string(), elapsed);
            }
        }

        diagnostics.sort_by_key(|d| d.span.start);
        Ok((diagnostics, timings))
    }

    /// Lints a single file.
    pub fn lint_file(&self, path: &Path) -> Result<LintResult, LinterError> {
        debug!("Linting {}", path.display());

        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::file(format!("Failed to read {}: {}", path.display(), e)))?;

        let (diagnostics, timings) = self.check_source(&content)?;
        let mut result = LintResult::new(path.to_path_buf(), diagnostics);
        result.timings = timings;
        Ok(result)
    }

    /// Lints files matching the given patterns.
    ///
    /// Returns a tuple of (successful results, failed files with errors).
    pub fn lint_patterns(&self, patterns: &[String]) -> LintFilesResult {
        let files = self.discover_files(patterns)?;
        self.lint_files(&files)
    }

    /// Resolves patterns to files.
    ///
    /// A pattern naming an existing file is taken as is. A directory is
    /// searched for markdown files. Anything else is a glob matched against
    /// paths under the working directory. `include`/`exclude` apply to
    /// every candidate.
    pub fn discover_files(&self, patterns: &[String]) -> Result<Vec<PathBuf>, LinterError> {
        let mut files = Vec::new();

        for pattern in patterns {
            let path = Path::new(pattern);
            if path.is_file() {
                if self.is_selected(path) {
                    files.push(path.to_path_buf());
                }
                continue;
            }

            let (root, matcher) = if path.is_dir() {
                (path, None)
            } else {
                let glob = Glob::new(pattern).map_err(|e| {
                    LinterError::config(format!("Invalid pattern '{}': {}", pattern, e))
                })?;
                (Path::new("."), Some(glob.compile_matcher()))
            };

            let walker = WalkDir::new(root)
                .into_iter()
                .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
                .filter_map(|entry| entry.ok());

            for entry in walker {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = normalize(entry.path());
                let matched = match &matcher {
                    Some(matcher) => matcher.is_match(path),
                    None => self.is_markdown(path),
                };
                if matched && self.is_selected(path) {
                    files.push(path.to_path_buf());
                }
            }
        }

        files.sort();
        files.dedup();

        info!("Discovered {} files to lint", files.len());
        Ok(files)
    }

    fn is_selected(&self, path: &Path) -> bool {
        let path = normalize(path);
        if let Some(excludes) = &self.exclude_globs
            && excludes.is_match(path)
        {
            return false;
        }
        if let Some(includes) = &self.include_globs
            && !includes.is_match(path)
        {
            return false;
        }
        true
    }

    fn is_markdown(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.parser.can_parse(ext))
    }

    /// Lints a list of files in parallel.
    ///
    /// Returns a tuple of (successful results, failed files with errors).
    pub fn lint_files(&self, paths: &[PathBuf]) -> LintFilesResult {
        let results: Vec<Result<LintResult, (PathBuf, LinterError)>> = paths
            .par_iter()
            .map(|path| self.lint_file(path).map_err(|e| (path.clone(), e)))
            .collect();

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(lint_result) => successes.push(lint_result),
                Err((path, error)) => {
                    warn!("Failed to lint {}: {}", path.display(), error);
                    failures.push((path, error));
                }
            }
        }

        Ok((successes, failures))
    }
}

/// Strips a leading `./` so globs like `docs/*.md` match walked paths.
fn normalize(path: &Path) -> &Path {
    path.strip_prefix(".").unwrap_or(path)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
