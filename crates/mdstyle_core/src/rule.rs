//! The rule abstraction.

use crate::{RuleContext, RuleError};

/// Static description of a rule.
#[derive(Debug)]
pub struct RuleMeta {
    /// Rule identifier used in configuration and output.
    pub id: &'static str,
    /// One-line description for `mdstyle rules`.
    pub description: &'static str,
    /// Whether the rule can emit fixes.
    pub fixable: bool,
    /// Message templates keyed by message id.
    pub messages: &'static [(&'static str, &'static str)],
}

impl RuleMeta {
    /// Returns the template for `message_id`.
    pub fn message(&self, message_id: &str) -> Option<&'static str> {
        self.messages
            .iter()
            .find(|(id, _)| *id == message_id)
            .map(|(_, template)| *template)
    }
}

/// A configured lint rule.
///
/// A rule value is built once from its options and can then check any
/// number of documents, possibly from several threads at once. All
/// per-document state lives inside `check`.
pub trait Rule: Send + Sync {
    /// Returns the rule's static description.
    fn meta(&self) -> &'static RuleMeta;

    /// Checks the context's document, reporting findings through `ctx`.
    fn check(&self, ctx: &mut RuleContext<'_>) -> Result<(), RuleError>;
}
