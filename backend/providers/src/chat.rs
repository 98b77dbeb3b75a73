//! OpenAI-compatible chat-completions wire types, shared by the hosted
//! provider clients (Groq speaks the same shape as OpenAI).

use serde::{Deserialize, Serialize};

use restock_core::{LlmRequest, ResponseFormat};

#[derive(Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormatBody>,
}

#[derive(Serialize)]
pub(crate) struct ResponseFormatBody {
    #[serde(rename = "type")]
    pub format_type: &'static str,
}

#[derive(Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

/// Either a plain string or a multimodal part list.
#[derive(Serialize)]
#[serde(untagged)]
pub(crate) enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
pub(crate) struct ImageUrl {
    pub url: String,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Deserialize)]
pub(crate) struct Choice {
    pub message: AssistantMessage,
}

#[derive(Deserialize)]
pub(crate) struct AssistantMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct Usage {
    pub total_tokens: Option<u64>,
}

/// Assemble the request body from an [`LlmRequest`]. An attached image turns
/// the user message into a multimodal part list with a `data:` URL.
pub(crate) fn build_request_body(request: &LlmRequest) -> ChatRequest {
    let mut messages = Vec::new();
    if !request.system_prompt.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: MessageContent::Text(request.system_prompt.clone()),
        });
    }

    let user_content = match &request.image {
        Some(image) => MessageContent::Parts(vec![
            ContentPart::Text {
                text: request.user_prompt.clone(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:{};base64,{}", image.mime_type, image.base64_data),
                },
            },
        ]),
        None => MessageContent::Text(request.user_prompt.clone()),
    };
    messages.push(ChatMessage {
        role: "user",
        content: user_content,
    });

    ChatRequest {
        model: request.model.clone(),
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        response_format: match request.response_format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonObject => Some(ResponseFormatBody {
                format_type: "json_object",
            }),
        },
    }
}
