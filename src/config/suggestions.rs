// src/config/suggestions.rs
// Configuration for the third-party habit-suggestion API

use serde::{Deserialize, Serialize};

/// Suggestion service configuration.
///
/// The client receives this at construction; nothing in the suggestion path
/// reads the environment after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: usize,
    pub timeout_secs: u64,
}

impl SuggestionConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: super::helpers::env_or("SUGGESTION_API_KEY", ""),
            api_url: super::helpers::env_or(
                "SUGGESTION_API_URL",
                "https://api.perplexity.ai/chat/completions",
            ),
            model: super::helpers::env_or("SUGGESTION_MODEL", "sonar"),
            max_tokens: super::helpers::env_parsed("SUGGESTION_MAX_TOKENS", 100),
            timeout_secs: super::helpers::env_parsed("SUGGESTION_TIMEOUT_SECS", 30),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
