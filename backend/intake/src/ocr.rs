//! OCR over uploaded shelf photos.
//!
//! Text extraction is delegated to a vision-capable chat model: the image is
//! base64-encoded into a `data:` URL content part and the reply is split
//! into lines. There is no local OCR engine.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::info;

use restock_core::{ImageAttachment, LlmProvider, LlmRequest, RestockError};

const TRANSCRIBE_PROMPT: &str = "This is a photo of a convenience store shelf. Transcribe every \
    piece of visible text, one item per line. Output only the transcribed lines, nothing else.";

/// Dispatches images to a vision model and returns the raw text lines.
pub struct OcrService {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl OcrService {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Read all discernible text off the image, one trimmed line per entry.
    pub async fn extract_lines(
        &self,
        bytes: &[u8],
        mime_type: &'static str,
    ) -> Result<Vec<String>, RestockError> {
        info!(
            provider = self.provider.name(),
            bytes = bytes.len(),
            "Running OCR over uploaded image"
        );

        let request = LlmRequest::text(&self.model, "", TRANSCRIBE_PROMPT).with_image(
            ImageAttachment {
                mime_type,
                base64_data: STANDARD.encode(bytes),
            },
        );

        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| RestockError::remote(self.provider.name(), e))?;

        let lines = response
            .content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_providers::MockProvider;

    #[tokio::test]
    async fn splits_reply_into_trimmed_lines() {
        let provider = Arc::new(
            MockProvider::new("mock").with_response("  Croissants x4\n\nRed Bull 8-pack  \n"),
        );
        let service = OcrService::new(provider, "vision-model");
        let lines = service
            .extract_lines(&[0xFF, 0xD8, 0xFF], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(lines, vec!["Croissants x4", "Red Bull 8-pack"]);
    }

    #[tokio::test]
    async fn provider_failure_maps_to_remote_error() {
        let provider = Arc::new(MockProvider::new("mock").with_failure("timeout"));
        let service = OcrService::new(provider, "vision-model");
        let err = service
            .extract_lines(&[0xFF, 0xD8, 0xFF], "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, RestockError::Remote { .. }));
    }
}
