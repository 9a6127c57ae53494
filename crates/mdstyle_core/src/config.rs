//! Linter configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::registry::{self, RuleEntry};
use crate::{LinterError, Severity};

/// Config file names, in lookup order.
pub const CONFIG_FILES: [&str; 2] = [".mdstyle.jsonc", ".mdstyle.json"];

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Configuration for the linter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinterConfig {
    /// Rule settings by id. `None` runs every built-in rule with defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<BTreeMap<String, RuleOption>>,

    /// File patterns to include.
    #[serde(default)]
    pub include: Vec<String>,

    /// File patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to record per-rule timings.
    #[serde(default)]
    pub timings: bool,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Setting for a single rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RuleOption {
    /// Rule is enabled/disabled.
    Enabled(bool),
    /// Rule is enabled with a severity ("error", "warning", "info"), or
    /// disabled with "off".
    Severity(String),
    /// Rule is enabled with an options object.
    Options(Value),
}

impl RuleOption {
    /// Returns whether the rule is enabled.
    pub fn is_enabled(&self) -> bool {
        match self {
            RuleOption::Enabled(enabled) => *enabled,
            RuleOption::Severity(s) => s != "off",
            RuleOption::Options(_) => true,
        }
    }

    /// The severity diagnostics of this rule are reported with.
    pub fn severity(&self) -> Result<Severity, LinterError> {
        let name = match self {
            RuleOption::Enabled(_) => return Ok(Severity::Error),
            RuleOption::Severity(s) => Some(s.as_str()),
            RuleOption::Options(v) => v.get("severity").and_then(Value::as_str),
        };
        match name {
            None | Some("error") => Ok(Severity::Error),
            Some("warning") => Ok(Severity::Warning),
            Some("info") => Ok(Severity::Info),
            Some(other) => Err(LinterError::config(format!("Unknown severity `{}`", other))),
        }
    }

    /// The rule's options, without the `severity` key.
    pub fn options(&self) -> Value {
        match self {
            RuleOption::Options(Value::Object(map)) => {
                let mut map = map.clone();
                map.remove("severity");
                Value::Object(map)
            }
            RuleOption::Options(v) => v.clone(),
            RuleOption::Enabled(_) | RuleOption::Severity(_) => Value::Null,
        }
    }
}

/// A rule selected by the configuration, ready to be built.
#[derive(Debug)]
pub struct EnabledRule {
    pub entry: &'static RuleEntry,
    pub severity: Severity,
    pub options: Value,
}

impl LinterConfig {
    /// Creates a configuration that runs every built-in rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a `.jsonc` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LinterError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_jsonc(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses configuration text. Comments and trailing commas are allowed.
    pub fn from_jsonc(content: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| Value::Object(Default::default()));

        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema: Value = serde_json::from_str(SCHEMA_JSON)
                    .map_err(|e| format!("Invalid embedded config schema: {}", e))?;
                Validator::new(&schema).map_err(|e| format!("Invalid config schema: {}", e))
            })
            .as_ref()
            .map_err(|e| LinterError::Internal(e.clone()))?;

        if let Err(e) = schema.validate(&value) {
            return Err(LinterError::config(format!(
                "Config validation failed: {} at {}",
                e,
                e.instance_path()
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Finds the nearest config file in `start` or one of its ancestors.
    pub fn discover(start: impl AsRef<Path>) -> Option<PathBuf> {
        start.as_ref().ancestors().find_map(|dir| {
            CONFIG_FILES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
        })
    }

    /// Resolves the rules to run, in registry order.
    ///
    /// Unknown rule ids and malformed severities are errors.
    pub fn enabled_rules(&self) -> Result<Vec<EnabledRule>, LinterError> {
        let Some(rules) = &self.rules else {
            return Ok(registry::builtin_rules()
                .iter()
                .map(|entry| EnabledRule {
                    entry,
                    severity: Severity::Error,
                    options: Value::Null,
                })
                .collect());
        };

        if let Some(unknown) = rules.keys().find(|id| registry::find_rule(id).is_none()) {
            return Err(LinterError::config(format!("Unknown rule `{}`", unknown)));
        }

        let mut enabled = Vec::new();
        for entry in registry::builtin_rules() {
            let Some(setting) = rules.get(entry.meta.id) else {
                continue;
            };
            if !setting.is_enabled() {
                continue;
            }
            enabled.push(EnabledRule {
                entry,
                severity: setting.severity()?,
                options: setting.options(),
            });
        }
        Ok(enabled)
    }

    /// Renders a config file enabling every built-in rule at its defaults.
    pub fn default_file_contents() -> Result<String, LinterError> {
        let rules: serde_json::Map<String, Value> = registry::builtin_rules()
            .iter()
            .map(|entry| (entry.meta.id.to_string(), entry.default_options()))
            .collect();
        let value = serde_json::json!({
            "rules": rules,
            "include": ["**/*.md", "**/*.markdown"],
            "exclude": [],
        });
        let mut out = serde_json::to_string_pretty(&value)
            .map_err(|e| LinterError::Internal(e.to_string()))?;
        out.push('\n');
        Ok(out)
    }
}
