use thiserror::Error;

/// Caller-facing failures raised before entries reach the statistics engine.
#[derive(Debug, Error, PartialEq)]
pub enum EntryError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} cannot be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("Invalid date: '{0}'")]
    InvalidDate(String),

    #[error("Invalid full-tank flag: '{0}' (expected yes/no)")]
    InvalidFlag(String),

    #[error("Entry with ID {0} not found")]
    NotFound(String),

    #[error("Ambiguous ID '{0}' matches {1} entries")]
    AmbiguousId(String, usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
