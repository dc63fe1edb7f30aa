//! Port for structured transcript logging.
//!
//! Defines the [`ConversationLogger`] trait for recording session events
//! (appended messages, routing decisions, tool calls, the final outcome)
//! to a machine-readable log, separate from `tracing` diagnostics.

use council_domain::{Message, Route, SessionOutcome, ToolRequest};
use serde_json::{Value, json};

/// A structured session event.
///
/// Each event has a type string and a JSON payload; the logger adds the
/// timestamp when it writes the record.
#[derive(Debug, Clone)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "message_appended", "route_decided").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn message_appended(message: &Message) -> Self {
        Self::new(
            "message_appended",
            serde_json::to_value(message).unwrap_or(Value::Null),
        )
    }

    pub fn route_decided(round: usize, route: &Route) -> Self {
        Self::new(
            "route_decided",
            json!({ "round": round, "route": route }),
        )
    }

    pub fn tool_invoked(request: &ToolRequest, output: &str) -> Self {
        Self::new(
            "tool_invoked",
            json!({ "request": request, "output": output }),
        )
    }

    pub fn session_finished(outcome: &SessionOutcome) -> Self {
        Self::new(
            "session_finished",
            serde_json::to_value(outcome).unwrap_or(Value::Null),
        )
    }
}

/// Port for logging session events to a structured log.
///
/// `log` is synchronous and non-fallible; logging failures never disrupt
/// the session.
pub trait ConversationLogger: Send + Sync {
    /// Record a session event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
