use crate::config::{env, env_optional};

/// Language-model completion endpoint configuration
///
/// Points at any OpenAI-compatible chat completions API. The API key is
/// optional at startup so the rest of the app works without one; the
/// analyzer reports `ModelUnavailable` when it is missing.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key (`OPENAI_API_KEY`)
    pub api_key: Option<String>,
    /// Base URL of the completions API
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Output-length cap
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout: u64,
}

impl LlmConfig {
    /// Build config from environment variables
    pub fn from_env() -> Self {
        Self {
            api_key: env_optional("OPENAI_API_KEY"),
            base_url: env("OPENAI_BASE_URL", "https://api.openai.com/v1".to_string()),
            model: env("OPENAI_MODEL", "gpt-4o-mini".to_string()),
            temperature: env("OPENAI_TEMPERATURE", 0.7),
            max_tokens: env("OPENAI_MAX_TOKENS", 500),
            timeout: env("OPENAI_TIMEOUT", 30),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
