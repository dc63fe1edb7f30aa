//! Messages exchanged during a session

use super::participant::Participant;
use super::role::Role;
use super::tool::{ToolKind, ToolRequest};
use crate::result::draft::QueryDraft;
use crate::result::execution::QueryExecution;
use crate::routing::route::LimitReason;
use serde::Serialize;

/// What a participant did with a message, distinct from merely speaking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "tool", rename_all = "snake_case")]
pub enum Activity {
    /// Ordinary text turn
    Utterance,
    /// The participant requested a tool
    ToolCall(ToolKind),
    /// Output of a tool the participant requested
    ToolResult(ToolKind),
}

/// Structured payload attached at the participant boundary.
///
/// Routing reads these instead of re-scanning message text.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Attachment {
    /// The author's parsed {question, query, checklist} record
    Draft(QueryDraft),
    /// The executor's classified result
    QueryResult(QueryExecution),
    /// Why the limiter ended the session
    Limit(LimitReason),
}

/// A message in the transcript (Entity).
///
/// Immutable once appended; the position is assigned by the transcript.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    position: usize,
    speaker: String,
    role: Role,
    activity: Activity,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<Attachment>,
}

impl Message {
    fn new(participant: &Participant, activity: Activity, content: String) -> Self {
        Self {
            position: 0,
            speaker: participant.name.clone(),
            role: participant.role,
            activity,
            content,
            attachment: None,
        }
    }

    pub fn utterance(participant: &Participant, content: impl Into<String>) -> Self {
        Self::new(participant, Activity::Utterance, content.into())
    }

    pub fn tool_call(participant: &Participant, request: &ToolRequest) -> Self {
        Self::new(
            participant,
            Activity::ToolCall(request.kind()),
            request.describe(),
        )
    }

    pub fn tool_result(participant: &Participant, tool: ToolKind, output: impl Into<String>) -> Self {
        Self::new(participant, Activity::ToolResult(tool), output.into())
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    pub(crate) fn at_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    /// Zero-based sequence position in the transcript
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    pub fn is_utterance(&self) -> bool {
        self.activity == Activity::Utterance
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self.activity, Activity::ToolResult(_))
    }

    pub fn draft(&self) -> Option<&QueryDraft> {
        match &self.attachment {
            Some(Attachment::Draft(draft)) => Some(draft),
            _ => None,
        }
    }

    pub fn query_result(&self) -> Option<&QueryExecution> {
        match &self.attachment {
            Some(Attachment::QueryResult(execution)) => Some(execution),
            _ => None,
        }
    }

    pub fn limit_reason(&self) -> Option<&LimitReason> {
        match &self.attachment {
            Some(Attachment::Limit(reason)) => Some(reason),
            _ => None,
        }
    }
}
