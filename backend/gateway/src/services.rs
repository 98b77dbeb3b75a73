//! Wiring of the workflow services over the configured providers.

use std::sync::Arc;

use tracing::warn;

use restock_config::Config;
use restock_core::{LlmProvider, ParLevels};
use restock_drafts::DraftPolicy;
use restock_intake::{OcrService, StockExtractor};
use restock_providers::{GroqProvider, MockProvider, OpenAiProvider, ProviderRegistry};

/// The shared, session-independent workflow services. Session state stays in
/// [`crate::sessions::Session`]; everything here is stateless between calls.
pub struct Services {
    pub ocr: OcrService,
    pub extractor: StockExtractor,
    pub drafts: DraftPolicy,
    pub qna_provider: Arc<dyn LlmProvider>,
    pub qna_model: String,
}

impl Services {
    /// Wire services directly from providers. Tests inject mocks here.
    pub fn new(
        vision: Arc<dyn LlmProvider>,
        reasoning: Arc<dyn LlmProvider>,
        vision_model: impl Into<String>,
        reasoning_model: impl Into<String>,
    ) -> Self {
        let vision_model = vision_model.into();
        let reasoning_model = reasoning_model.into();
        Self {
            ocr: OcrService::new(vision, vision_model),
            extractor: StockExtractor::new(reasoning.clone(), reasoning_model.clone()),
            drafts: DraftPolicy::new(reasoning.clone(), reasoning_model.clone(), ParLevels::demo()),
            qna_provider: reasoning,
            qna_model: reasoning_model,
        }
    }

    /// Build services from the runtime configuration. Missing API keys fall
    /// back to the mock provider so the demo flow stays usable offline.
    pub fn from_config(config: &Config) -> Self {
        let registry = registry_from_config(config);
        let mock = || -> Arc<dyn LlmProvider> { Arc::new(MockProvider::new("mock")) };

        let reasoning = registry.get("groq").unwrap_or_else(|| {
            warn!("GROQ_API_KEY not set: reasoning calls will use the mock provider");
            mock()
        });
        let vision = registry.get("openai").unwrap_or_else(|| {
            warn!("OPENAI_API_KEY not set: OCR calls will use the mock provider");
            mock()
        });

        Self::new(
            vision,
            reasoning,
            config.vision_model.clone(),
            config.reasoning_model.clone(),
        )
    }
}

/// Register every provider the configuration has credentials for, plus the
/// mock.
pub fn registry_from_config(config: &Config) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    if let Some(key) = config.groq_api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        registry.register("groq", Arc::new(GroqProvider::new(key)));
    }
    if let Some(key) = config
        .openai_api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
    {
        registry.register("openai", Arc::new(OpenAiProvider::new(key)));
    }
    registry.register("mock", Arc::new(MockProvider::new("mock")));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyless_config_registers_only_the_mock() {
        let registry = registry_from_config(&Config::default());
        assert_eq!(registry.list(), vec!["mock"]);
    }

    #[test]
    fn keys_enable_their_providers() {
        let config = Config {
            groq_api_key: Some("gsk_test".to_string()),
            openai_api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        let registry = registry_from_config(&config);
        assert!(registry.get("groq").is_some());
        assert!(registry.get("openai").is_some());
        assert!(registry.get("mock").is_some());
    }
}
