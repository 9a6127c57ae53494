//! The table of built-in rules and how to build them from JSON options.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::rules::{
    ConsistentCodeStyle, ConsistentUnorderedListStyle, MarkerStyle, NoGitConflictMarker, NoTab,
    code_style, emphasis_style, no_git_conflict_marker, no_tab, unordered_list_style,
};
use crate::{LinterError, Rule, RuleMeta};

type BuildFn = fn(&Value) -> Result<Box<dyn Rule>, LinterError>;

/// A built-in rule: its description plus a constructor.
pub struct RuleEntry {
    pub meta: &'static RuleMeta,
    build: BuildFn,
    defaults: fn() -> Value,
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEntry").field("id", &self.meta.id).finish()
    }
}

impl RuleEntry {
    /// Builds the rule. `null` options mean the rule's defaults.
    pub fn build(&self, options: &Value) -> Result<Box<dyn Rule>, LinterError> {
        (self.build)(options)
    }

    /// The rule's default options as JSON.
    pub fn default_options(&self) -> Value {
        (self.defaults)()
    }
}

static BUILTIN_RULES: [RuleEntry; 6] = [
    RuleEntry {
        meta: &code_style::META,
        build: build_code_style,
        defaults: defaults::<code_style::CodeStyleOptions>,
    },
    RuleEntry {
        meta: &emphasis_style::EMPHASIS_META,
        build: build_emphasis_style,
        defaults: defaults::<emphasis_style::MarkerStyleOptions>,
    },
    RuleEntry {
        meta: &emphasis_style::STRONG_META,
        build: build_strong_style,
        defaults: defaults::<emphasis_style::MarkerStyleOptions>,
    },
    RuleEntry {
        meta: &unordered_list_style::META,
        build: build_unordered_list_style,
        defaults: defaults::<unordered_list_style::ListStyleOptions>,
    },
    RuleEntry {
        meta: &no_tab::META,
        build: build_no_tab,
        defaults: defaults::<no_tab::NoTabOptions>,
    },
    RuleEntry {
        meta: &no_git_conflict_marker::META,
        build: build_no_git_conflict_marker,
        defaults: defaults::<no_git_conflict_marker::NoGitConflictMarkerOptions>,
    },
];

fn build_code_style(value: &Value) -> Result<Box<dyn Rule>, LinterError> {
    let options = options(&code_style::META, value)?;
    Ok(Box::new(ConsistentCodeStyle::new(options)?))
}

fn build_emphasis_style(value: &Value) -> Result<Box<dyn Rule>, LinterError> {
    let options = options(&emphasis_style::EMPHASIS_META, value)?;
    Ok(Box::new(MarkerStyle::emphasis(options)?))
}

fn build_strong_style(value: &Value) -> Result<Box<dyn Rule>, LinterError> {
    let options = options(&emphasis_style::STRONG_META, value)?;
    Ok(Box::new(MarkerStyle::strong(options)?))
}

fn build_unordered_list_style(value: &Value) -> Result<Box<dyn Rule>, LinterError> {
    let options = options(&unordered_list_style::META, value)?;
    Ok(Box::new(ConsistentUnorderedListStyle::new(options)?))
}

fn build_no_tab(value: &Value) -> Result<Box<dyn Rule>, LinterError> {
    Ok(Box::new(NoTab::new(options(&no_tab::META, value)?)?))
}

fn build_no_git_conflict_marker(value: &Value) -> Result<Box<dyn Rule>, LinterError> {
    let options = options(&no_git_conflict_marker::META, value)?;
    Ok(Box::new(NoGitConflictMarker::new(options)?))
}

/// All built-in rules, in registration order.
pub fn builtin_rules() -> &'static [RuleEntry] {
    &BUILTIN_RULES
}

/// Looks up a built-in rule by id.
pub fn find_rule(id: &str) -> Option<&'static RuleEntry> {
    BUILTIN_RULES.iter().find(|entry| entry.meta.id == id)
}

fn options<T: DeserializeOwned + Default>(meta: &RuleMeta, value: &Value) -> Result<T, LinterError> {
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value.clone())
        .map_err(|e| LinterError::config(format!("Invalid options for rule `{}`: {}", meta.id, e)))
}

fn defaults<T: Serialize + Default>() -> Value {
    serde_json::to_value(T::default()).unwrap_or(Value::Null)
}
