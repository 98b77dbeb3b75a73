//! Runtime configuration, read from the process environment.
//!
//! API keys are deliberately optional: a missing key does not fail startup,
//! it surfaces as a remote-call failure when the corresponding provider is
//! first used. `missing_keys` exists so the CLI can warn up front.

use serde::Deserialize;

/// Restock runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Log level when RUST_LOG is unset
    pub log_level: String,
    /// Directory for rolling log files
    pub log_dir: String,
    /// Groq API key (reasoning provider)
    pub groq_api_key: Option<String>,
    /// OpenAI API key (vision / OCR provider)
    pub openai_api_key: Option<String>,
    /// Model used for extraction, drafts, and table Q&A
    pub reasoning_model: String,
    /// Vision-capable model used for OCR
    pub vision_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
            groq_api_key: None,
            openai_api_key: None,
            reasoning_model: "llama-3.1-70b-versatile".to_string(),
            vision_model: "gpt-4o-mini".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: std::env::var("RESTOCK_BIND").unwrap_or(defaults.bind_address),
            port: std::env::var("RESTOCK_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_dir: std::env::var("RESTOCK_LOG_DIR").unwrap_or(defaults.log_dir),
            groq_api_key: std::env::var("GROQ_API_KEY").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            reasoning_model: std::env::var("RESTOCK_REASONING_MODEL")
                .unwrap_or(defaults.reasoning_model),
            vision_model: std::env::var("RESTOCK_VISION_MODEL").unwrap_or(defaults.vision_model),
        }
    }

    /// Names of API-key variables that are unset or blank.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self
            .groq_api_key
            .as_deref()
            .map(|k| k.trim().is_empty())
            .unwrap_or(true)
        {
            missing.push("GROQ_API_KEY");
        }
        if self
            .openai_api_key
            .as_deref()
            .map(|k| k.trim().is_empty())
            .unwrap_or(true)
        {
            missing.push("OPENAI_API_KEY");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert!(!config.reasoning_model.is_empty());
    }

    #[test]
    fn missing_keys_reports_both_when_unset() {
        let config = Config::default();
        assert_eq!(config.missing_keys(), vec!["GROQ_API_KEY", "OPENAI_API_KEY"]);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = Config {
            groq_api_key: Some("  ".to_string()),
            openai_api_key: Some("sk-test".to_string()),
            ..Config::default()
        };
        assert_eq!(config.missing_keys(), vec!["GROQ_API_KEY"]);
    }
}
