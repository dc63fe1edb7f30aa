//! Chat-completions wire types.
//!
//! The transcript is replayed to the endpoint from the point of view of the
//! participant whose turn it is:
//!
//! - **system**: the role's prompt, built from the table profile
//! - **assistant**: the participant's own earlier messages
//! - **user**: every other message, tagged with its speaker

use council_domain::{Activity, Message, Participant, PromptBook, ToolKind, Transcript};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// One entry of the `messages` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            name: None,
        }
    }

    fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

/// Body of a `POST /chat/completions` request
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
}

/// Response body; only the fields the gateway reads
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

/// `arguments` arrives as a JSON document encoded in a string
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

/// Replay `transcript` for `participant`.
pub fn build_messages(
    prompts: &PromptBook,
    participant: &Participant,
    transcript: &Transcript,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    if let Some(system) = prompts.system_prompt(participant.role) {
        messages.push(ChatMessage::new("system", system));
    }
    messages.extend(
        transcript
            .messages()
            .iter()
            .map(|message| replay(participant, message)),
    );
    messages
}

fn replay(participant: &Participant, message: &Message) -> ChatMessage {
    let content = match message.activity() {
        Activity::Utterance => message.content().to_string(),
        Activity::ToolCall(_) => format!("[tool call] {}", message.content()),
        Activity::ToolResult(tool) => format!("[tool result: {}]\n{}", tool, message.content()),
    };
    let own = message.speaker() == participant.name && !message.is_tool_result();

    if own {
        ChatMessage::new("assistant", content)
    } else {
        ChatMessage::new("user", content).named(message.speaker())
    }
}

/// Function schemas advertised to tool-capable participants
pub fn tool_schemas() -> Vec<Value> {
    vec![
        json!({
            "type": "function",
            "function": {
                "name": ToolKind::RunQuery.name(),
                "description": "Run a read-only SQL query against the table and return up to the row cap as JSON records, or the database error.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "The SQL query to run"}
                    },
                    "required": ["query"]
                }
            }
        }),
        json!({
            "type": "function",
            "function": {
                "name": ToolKind::FetchDistinctValues.name(),
                "description": "Find the stored values of a column closest to a free-text lookup.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "lookup": {"type": "string", "description": "The value as the user wrote it"},
                        "table": {"type": "string", "description": "Table name"},
                        "column": {"type": "string", "description": "Column name"}
                    },
                    "required": ["lookup", "table", "column"]
                }
            }
        }),
    ]
}
