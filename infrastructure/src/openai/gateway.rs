//! OpenAI-compatible participant gateway

use super::protocol::{ChatRequest, ChatResponse, build_messages, tool_schemas};
use crate::config::FileParticipantsConfig;
use async_trait::async_trait;
use council_application::ports::participant_gateway::{
    GatewayError, ParticipantGateway, ParticipantReply,
};
use council_domain::{Participant, PromptBook, ToolRequest, Transcript};
use reqwest::StatusCode;
use tracing::{debug, warn};

/// Participant gateway backed by a `/chat/completions` endpoint.
///
/// Every reasoning participant shares one model; only the system prompt
/// and the advertised tools differ per role.
pub struct OpenAiParticipantGateway {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    temperature: f32,
    prompts: PromptBook,
}

impl OpenAiParticipantGateway {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        prompts: PromptBook,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: 0.05,
            prompts,
        }
    }

    /// Build from the `[participants]` section, reading the key from the
    /// environment variable it names.
    pub fn from_config(
        config: &FileParticipantsConfig,
        prompts: PromptBook,
    ) -> Result<Self, GatewayError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GatewayError::MissingApiKey(config.api_key_env.clone()))?;

        Ok(Self::new(&config.base_url, &config.model, api_key, prompts)
            .with_temperature(config.temperature))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, participant: &Participant, transcript: &Transcript) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: build_messages(&self.prompts, participant, transcript),
            temperature: self.temperature,
            tools: participant.may_request_tools.then(tool_schemas),
        }
    }
}

/// Turn the first choice into a reply. A tool call wins over text.
pub fn parse_reply(response: ChatResponse) -> Result<ParticipantReply, GatewayError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| GatewayError::InvalidResponse("no choices in response".to_string()))?;

    if let Some(call) = message.tool_calls.into_iter().next() {
        let arguments: serde_json::Value = if call.function.arguments.trim().is_empty() {
            serde_json::Value::Object(Default::default())
        } else {
            serde_json::from_str(&call.function.arguments).map_err(|e| {
                GatewayError::InvalidResponse(format!("tool arguments are not JSON: {}", e))
            })?
        };
        let request = ToolRequest::from_call(&call.function.name, &arguments)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        return Ok(ParticipantReply::Tool(request));
    }

    message
        .content
        .map(ParticipantReply::Text)
        .ok_or_else(|| GatewayError::InvalidResponse("message has no content".to_string()))
}

fn status_error(status: StatusCode, body: &str) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GatewayError::RequestFailed(format!("authentication failed ({})", status))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            GatewayError::RequestFailed("rate limit exceeded".to_string())
        }
        _ => GatewayError::RequestFailed(format!("{}: {}", status, body)),
    }
}

#[async_trait]
impl ParticipantGateway for OpenAiParticipantGateway {
    async fn respond(
        &self,
        participant: &Participant,
        transcript: &Transcript,
    ) -> Result<ParticipantReply, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = self.request(participant, transcript);
        debug!(
            participant = %participant.name,
            messages = request.messages.len(),
            "Sending chat completion"
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(participant = %participant.name, %status, "Chat completion failed");
            return Err(status_error(status, &body));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        parse_reply(body)
    }
}
