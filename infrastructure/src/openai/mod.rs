//! OpenAI-compatible chat-completions adapter
//!
//! Implements ParticipantGateway over HTTP.

pub mod gateway;
pub mod protocol;
