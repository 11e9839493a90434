//! Error types for the scheduling board.
//!
//! Gesture problems (a zero-length selection, a vetoed move) are not errors
//! and never show up here; they are reported as engine effects instead.

use thiserror::Error;

/// Malformed clock text or an interval that violates its ordering invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Text is not of the form `HH:MM`.
    #[error("malformed clock time: {0:?}")]
    Malformed(String),

    /// Hours or minutes are outside the wall clock.
    #[error("clock time out of range: {0:?}")]
    OutOfRange(String),

    /// Time interval whose end does not come after its start.
    #[error("empty time interval: {start} must come before {end}")]
    EmptyInterval { start: String, end: String },

    /// Date interval whose end comes before its start.
    #[error("inverted date interval: {start} is after {end}")]
    InvertedDates { start: String, end: String },
}

/// Failure loading or saving [`crate::config::SchedulerSettings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

impl From<FormatError> for ConfigError {
    fn from(err: FormatError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

/// Failure reading or writing a board snapshot.
#[derive(Error, Debug)]
pub enum BoardFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
