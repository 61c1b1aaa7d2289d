//! Error types for telemetry parsing.

use thiserror::Error;

/// Errors that can occur while parsing ingested lines or query instants.
///
/// Line errors come in two flavours. A wrong field count is *structural* and
/// rejects the whole batch. A non-numeric timestamp or value only drops the
/// offending line; see [`ParseError::is_structural`].
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A line did not split into exactly three space-separated fields.
    #[error("line {line}: expected 3 space-separated fields, found {found}")]
    FieldCount { line: usize, found: usize },

    /// The timestamp field is not an integer number of Unix seconds.
    #[error("line {line}: invalid timestamp '{token}'")]
    InvalidTimestamp { line: usize, token: String },

    /// The value field is not a finite number.
    #[error("line {line}: invalid value '{token}'")]
    InvalidValue { line: usize, token: String },

    /// A query bound could not be interpreted as a date or instant.
    #[error("invalid instant '{0}': expected an RFC 3339 date-time or a YYYY-MM-DD date")]
    InvalidInstant(String),
}

impl ParseError {
    /// Whether this error invalidates the whole batch rather than a single line.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, ParseError::FieldCount { .. })
    }

    /// The 1-based line number this error refers to, if any.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::FieldCount { line, .. }
            | ParseError::InvalidTimestamp { line, .. }
            | ParseError::InvalidValue { line, .. } => Some(*line),
            ParseError::InvalidInstant(_) => None,
        }
    }
}

/// Result type alias using telemetry-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
