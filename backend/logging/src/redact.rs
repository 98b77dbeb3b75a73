//! Log Redaction Layer
//!
//! Scrubs API keys and bearer tokens from strings prior to logging. Draft
//! payloads pass through error messages, so anything that might echo a
//! credential back gets scrubbed here first.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((sk|gsk)[-_][a-zA-Z0-9]{20,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_api_keys_and_bearer_tokens() {
        let raw = "auth failed for sk-abcdefghijklmnopqrstuv1234 with Bearer eyJhbGciOiJIUzI1NiJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("sk-abcdefghijklmnopqrstuv1234"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiJ9"));
        assert!(clean.contains("[REDACTED_TOKEN]"));
    }

    #[test]
    fn redacts_groq_style_keys() {
        let raw = "key gsk_0123456789abcdefghijklmn in use";
        assert!(!redact_sensitive_data(raw).contains("gsk_0123456789abcdefghijklmn"));
    }

    #[test]
    fn leaves_ordinary_text_alone() {
        let raw = "Red Bull 8-pack x 36 units";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
