//! Infrastructure layer for tabular-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod openai;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileOutputConfig,
    FileOutputFormat, FileParticipantsConfig, FileSessionConfig, FileStoreConfig,
};
pub use logging::JsonlConversationLogger;
pub use openai::gateway::OpenAiParticipantGateway;
pub use store::{SqliteTableStore, quote_identifier};
