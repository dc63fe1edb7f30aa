//! Participant model configuration from TOML (`[participants]` section)

use serde::{Deserialize, Serialize};

/// Raw configuration of the chat-completions endpoint all participants share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantsConfig {
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for FileParticipantsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: 0.05,
        }
    }
}
