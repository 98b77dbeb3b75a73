use thiserror::Error;

/// Top-level error type for the Restock workflow.
#[derive(Debug, Error)]
pub enum RestockError {
    /// Network, auth, or rate-limit failure from a hosted model.
    #[error("remote call failed ({provider}): {message}")]
    Remote { provider: String, message: String },

    #[error("draft output failed validation: {0}")]
    DraftParse(String),

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    /// User action attempted before its prerequisite step. The message is
    /// shown verbatim as the inline banner.
    #[error("{0}")]
    Precondition(String),

    #[error("PDF export failed: {0}")]
    Export(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RestockError {
    /// Wrap a provider failure, tagging which provider produced it.
    pub fn remote(provider: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Remote {
            provider: provider.into(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_message_is_verbatim() {
        let err = RestockError::Precondition("Please upload a CSV file first.".into());
        assert_eq!(err.to_string(), "Please upload a CSV file first.");
    }

    #[test]
    fn remote_error_names_the_provider() {
        let err = RestockError::remote("groq", "401 unauthorized");
        assert!(err.to_string().contains("groq"));
        assert!(err.to_string().contains("401"));
    }
}
