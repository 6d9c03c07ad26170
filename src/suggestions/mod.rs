// src/suggestions/mod.rs
// Habit suggestion proxy to a chat-completion API

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::suggestions::SuggestionConfig;

/// Seam for the suggestion backend so handlers and tests don't depend on
/// the concrete HTTP client.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, habits: &[String]) -> Result<String>;
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for a Perplexity-style chat-completion endpoint.
///
/// Credentials and endpoint are injected at construction; nothing here
/// reads the environment.
pub struct PerplexityClient {
    client: Client,
    config: SuggestionConfig,
}

impl PerplexityClient {
    pub fn new(config: SuggestionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }
}

/// Prompt asking for three playful habit suggestions that complement the
/// user's existing ones.
fn build_prompt(habits: &[String]) -> String {
    format!(
        "Given the following existing habits: {}, \
         suggest 3 fun and quirky new habits that go well with them. \
         Present each habit with a catchy name and a short, playful description. \
         The response should sound friendly and casual, like you're chatting with a buddy. \
         Format it like: Hey, your today's suggestions include [list of suggested habits and descriptions]. \
         No bold words or formal tone.",
        habits.join(", ")
    )
}

#[async_trait]
impl SuggestionProvider for PerplexityClient {
    async fn suggest(&self, habits: &[String]) -> Result<String> {
        if !self.config.is_configured() {
            return Err(anyhow!("Suggestion API key is not configured"));
        }

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(habits),
            }],
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Suggestion API error {}: {}", status, body));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| anyhow!("Suggestion API returned no choices"))?;

        debug!("Suggestion API returned {} chars", content.len());
        Ok(content)
    }
}
