//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool arguments for {tool}: {reason}")]
    InvalidToolArguments { tool: String, reason: String },

    #[error("Row {row} has {found} cells but the table has {expected} columns")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Session ended by the limiter but no limit reason was recorded")]
    MissingLimitReason,
}
