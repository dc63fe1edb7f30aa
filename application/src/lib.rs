//! Application layer for tabular-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::SessionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    participant_gateway::{GatewayError, ParticipantGateway, ParticipantReply},
    progress::{NoSessionProgress, SessionProgressNotifier},
    tabular_store::{StoreError, TabularStore},
};
pub use use_cases::execute_query::ExecuteQueryUseCase;
pub use use_cases::resolve_values::{ResolveValuesError, ResolveValuesUseCase};
pub use use_cases::run_session::{
    RunSessionError, RunSessionInput, RunSessionOutput, RunSessionUseCase,
};
