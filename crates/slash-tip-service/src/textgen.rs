//! Text generation for poem easter eggs.
//!
//! Poems are decorative: every caller treats a missing poem as fine, so the
//! generator returns `Option` rather than an error, and the service runs
//! happily with the [`NoopTextGenerator`] when no API is configured.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use slash_tip_core::PoemStyle;

/// Generates short texts from a system prompt and a user prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion, or `None` if generation is unavailable.
    async fn generate(&self, system: &str, prompt: &str) -> Option<String>;
}

/// A generator that never generates. Used when no API is configured.
pub struct NoopTextGenerator;

#[async_trait]
impl TextGenerator for NoopTextGenerator {
    async fn generate(&self, _system: &str, _prompt: &str) -> Option<String> {
        None
    }
}

/// Chat-completions API client (OpenAI-compatible).
pub struct ChatTextGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl ChatTextGenerator {
    /// Create a generator against an OpenAI-compatible API.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with default settings).
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for ChatTextGenerator {
    async fn generate(&self, system: &str, prompt: &str) -> Option<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "text generation failed");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "text generation request failed");
                return None;
            }
        };

        let parsed: ChatResponse = response.json().await.ok()?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

/// A haiku scolding a would-be tip thief.
pub async fn stealing_poem(generator: &dyn TextGenerator) -> Option<String> {
    generator
        .generate(
            "You are a thoughtful poet",
            "write me a haiku about how stealing is bad",
        )
        .await
}

/// A haiku about tipping yourself.
pub async fn self_love_poem(generator: &dyn TextGenerator) -> Option<String> {
    generator
        .generate(
            "You are a thoughtful poet",
            "write me a haiku about tipping yourself",
        )
        .await
}

/// A short poem celebrating one tip.
pub async fn tip_poem(
    generator: &dyn TextGenerator,
    style: Option<PoemStyle>,
    from: &str,
    to: &str,
    message: Option<&str>,
) -> Option<String> {
    let style = match style {
        Some(PoemStyle::Limerick) => "limerick",
        Some(PoemStyle::Sonnet) => "sonnet",
        Some(PoemStyle::Free) => "short free-verse poem",
        Some(PoemStyle::Haiku) | None => "haiku",
    };
    let prompt = match message {
        Some(message) => format!(
            "write me a {style} celebrating a coworker tip from {from} to {to} for: {message}"
        ),
        None => format!("write me a {style} celebrating a coworker tip from {from} to {to}"),
    };
    generator
        .generate("You are a thoughtful poet", &prompt)
        .await
}
