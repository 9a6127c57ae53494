//! Error types for the rule engine and linter.

use mdstyle_ast::{AttrKind, NodeType, UnknownNodeType};
use thiserror::Error;

/// Errors raised while parsing a selector.
///
/// Selectors are parsed when listeners are registered, so these surface
/// before any document is walked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector contains nothing but whitespace.
    #[error("Empty selector")]
    Empty,

    /// A character that does not fit the grammar at this point.
    #[error("Unexpected `{found}` at offset {offset} in selector `{selector}`")]
    UnexpectedChar {
        selector: String,
        offset: usize,
        found: char,
    },

    /// The selector ended in the middle of a construct.
    #[error("Unexpected end of selector `{0}`")]
    UnexpectedEnd(String),

    /// The type name is not a known node type.
    #[error(transparent)]
    UnknownType(#[from] UnknownNodeType),

    /// The attribute is never present on nodes of the compound's type.
    #[error("Node type `{node_type}` has no attribute `{attribute}`")]
    UnknownAttribute {
        node_type: NodeType,
        attribute: String,
    },

    /// The literal cannot be compared with the attribute's value kind.
    #[error("Attribute `{node_type}.{attribute}` expects a {expected} literal, found `{literal}`")]
    LiteralKind {
        node_type: NodeType,
        attribute: String,
        expected: AttrKind,
        literal: String,
    },

    /// A pseudo-class other than `:exit`.
    #[error("Unknown pseudo-class `:{0}`")]
    UnknownPseudo(String),
}

/// Errors raised by a rule while it runs over a document.
///
/// These are contract failures in a rule, not findings about the document.
/// Style mismatches are always reported as diagnostics instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A core invariant was broken (bad span, unbalanced scope, overlapping fix).
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// Any other internal failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RuleError {
    /// Creates an invariant violation.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Errors that can occur during linting.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error.
    #[error("File error: {0}")]
    File(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A rule faulted while checking a document.
    #[error("Rule `{rule}` failed: {source}")]
    Rule {
        rule: String,
        #[source]
        source: RuleError,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Wraps a rule fault.
    pub fn rule(rule: impl Into<String>, source: RuleError) -> Self {
        Self::Rule {
            rule: rule.into(),
            source,
        }
    }
}

impl From<mdstyle_parser::ParseError> for LinterError {
    fn from(err: mdstyle_parser::ParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<SelectorError> for LinterError {
    fn from(err: SelectorError) -> Self {
        Self::Config(format!("Invalid selector: {err}"))
    }
}
