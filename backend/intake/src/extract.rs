//! Stock extraction: OCR lines → structured quantities.
//!
//! The reasoning model is asked for JSON-constrained output and the reply is
//! validated with serde. A reply that fails validation drops to the fixed
//! demo snapshot (marked as such); a remote failure propagates so the caller
//! can leave session state untouched.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use restock_core::{LlmProvider, LlmRequest, RestockError, StockSnapshot};

const EXTRACT_SYSTEM_PROMPT: &str = "You extract inventory data from shelf-photo OCR output. \
    Reply with a JSON object of the form {\"items\": [{\"name\": \"...\", \"qty\": 0}]} and \
    nothing else. Only include products with a visible quantity.";

/// Where the snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Model,
    DemoFallback,
}

/// Result of one analyze run.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub snapshot: StockSnapshot,
    pub source: ExtractionSource,
    /// Raw model reply, kept for display alongside the snapshot.
    pub reasoning: String,
}

#[derive(Deserialize)]
struct ExtractedItems {
    items: Vec<ExtractedItem>,
}

#[derive(Deserialize)]
struct ExtractedItem {
    name: String,
    qty: u32,
}

/// Sends OCR text to the reasoning model and validates the reply into a
/// [`StockSnapshot`].
pub struct StockExtractor {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl StockExtractor {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub async fn analyze(&self, ocr_lines: &[String]) -> Result<Extraction, RestockError> {
        let user_prompt = format!(
            "OCR detected the following text on a convenience store shelf:\n{}\n\
             Extract product names and visible quantities.",
            ocr_lines.join("\n")
        );

        let request = LlmRequest::text(&self.model, EXTRACT_SYSTEM_PROMPT, user_prompt)
            .with_json_output();

        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| RestockError::remote(self.provider.name(), e))?;

        let snapshot = match parse_items(&response.content) {
            Ok(snapshot) => {
                info!(items = snapshot.len(), "Extraction validated model output");
                return Ok(Extraction {
                    snapshot,
                    source: ExtractionSource::Model,
                    reasoning: response.content,
                });
            }
            Err(reason) => {
                warn!(%reason, "Extraction reply failed validation, using demo snapshot");
                StockSnapshot::demo()
            }
        };

        Ok(Extraction {
            snapshot,
            source: ExtractionSource::DemoFallback,
            reasoning: response.content,
        })
    }
}

fn parse_items(content: &str) -> Result<StockSnapshot, String> {
    let parsed: ExtractedItems =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;
    if parsed.items.is_empty() {
        return Err("no items in reply".to_string());
    }
    let mut snapshot = StockSnapshot::new();
    for item in parsed.items {
        if item.name.trim().is_empty() {
            return Err("item with empty name".to_string());
        }
        snapshot.set(item.name, item.qty);
    }
    Ok(snapshot)
}
