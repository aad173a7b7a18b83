//! Error types for event handling.

use thiserror::Error;

/// Why an interaction event was rejected. The session recovers from all of
/// these by keeping the previous state and dropping the event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The event names a column that is not in the table (or was deleted).
    #[error("unknown column '{column}'")]
    InvalidColumn { column: String },

    /// The operand cannot be read as a value of the column's kind.
    #[error("value {value} is not valid for column '{column}': {reason}")]
    InvalidValue {
        column: String,
        value: String,
        reason: String,
    },

    /// The native filter expression could not be parsed.
    #[error("invalid filter query '{query}': {reason}")]
    InvalidFilterQuery { query: String, reason: String },
}

/// Failures of the session gate itself.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session state lock poisoned")]
    Poisoned,
}
