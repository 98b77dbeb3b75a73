mod chat;

pub mod groq;
pub mod mock;
pub mod openai;

use std::collections::HashMap;
use std::sync::Arc;

use restock_core::LlmProvider;

pub use groq::GroqProvider;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;

/// Registry of LLM providers, looked up by name.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn LlmProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider by name.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn LlmProvider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Look up a single provider. Callers hold exactly one in-flight call
    /// against it at a time; there is no racing.
    pub fn get(&self, name: &str) -> Option<Arc<dyn LlmProvider>> {
        self.providers.get(name).cloned()
    }

    /// Get all registered provider names.
    pub fn list(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lookup_by_name() {
        let mut registry = ProviderRegistry::new();
        registry.register("mock", Arc::new(MockProvider::new("mock")));
        assert!(registry.get("mock").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn registry_lists_names() {
        let mut registry = ProviderRegistry::new();
        registry.register("a", Arc::new(MockProvider::new("a")));
        registry.register("b", Arc::new(MockProvider::new("b")));
        let mut names = registry.list();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }
}
