//! Parse error types.

use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text could not be parsed.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// The source is too large to address with 32-bit offsets.
    #[error("Source of {0} bytes exceeds the 4 GiB offset limit")]
    TooLarge(usize),
}

impl ParseError {
    /// Creates a new invalid source error.
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource(message.into())
    }
}
