use anyhow::Result;
use async_trait::async_trait;

/// Trait for hosted LLM providers.
///
/// One provider handles one call; callers never race providers in parallel —
/// each user interaction maps to a single in-flight request.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "groq", "openai", "mock").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

/// Requested shape of the completion body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Text,
    /// Ask the provider for JSON-constrained generation so the reply can be
    /// validated with serde instead of substring heuristics.
    JsonObject,
}

/// An inline image sent alongside the prompt, for vision-capable models.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub mime_type: &'static str,
    pub base64_data: String,
}

/// Request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub response_format: ResponseFormat,
    pub image: Option<ImageAttachment>,
}

impl LlmRequest {
    /// A plain-text request with the default sampling settings.
    pub fn text(model: impl Into<String>, system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            max_tokens: 1024,
            temperature: 0.7,
            response_format: ResponseFormat::Text,
            image: None,
        }
    }

    pub fn with_json_output(mut self) -> Self {
        self.response_format = ResponseFormat::JsonObject;
        self
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}
