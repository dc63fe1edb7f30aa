//! Participant gateway port
//!
//! Defines how the application layer asks a reasoning participant for its
//! next message.

use async_trait::async_trait;
use council_domain::{Participant, ToolRequest, Transcript};
use thiserror::Error;

/// Errors that can occur while calling a participant
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// What a participant produced for its turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantReply {
    /// An ordinary message
    Text(String),
    /// A tool invocation; only participants allowed tools may return this
    Tool(ToolRequest),
}

/// Gateway to the reasoning participants
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ParticipantGateway: Send + Sync {
    /// Produce one reply for `participant` given the full transcript
    async fn respond(
        &self,
        participant: &Participant,
        transcript: &Transcript,
    ) -> Result<ParticipantReply, GatewayError>;
}
