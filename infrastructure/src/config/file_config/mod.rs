//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod logging;
mod output;
mod participants;
mod session;
mod store;

pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use participants::FileParticipantsConfig;
pub use session::FileSessionConfig;
pub use store::FileStoreConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("{0} cannot be 0")]
    ZeroLimit(&'static str),

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("store table name cannot be empty")]
    EmptyTableName,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Round ceiling, retry caps, row cap, timeouts
    pub session: FileSessionConfig,
    /// Tabular store location
    pub store: FileStoreConfig,
    /// Participant model endpoint
    pub participants: FileParticipantsConfig,
    /// Transcript log
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let session = &self.session;
        if session.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        let limits = [
            ("session.max_rounds", session.max_rounds),
            ("session.author_query_limit", session.author_query_limit),
            ("session.critic_turn_limit", session.critic_turn_limit),
            ("session.row_cap", session.row_cap),
            ("session.candidate_limit", session.candidate_limit),
        ];
        if let Some(&(name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigValidationError::ZeroLimit(name));
        }

        if self.participants.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName);
        }

        if self.store.table.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTableName);
        }

        Ok(())
    }
}
