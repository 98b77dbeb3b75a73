//! One-off promotional blurb for the slowest-selling item.

use tracing::info;

use restock_core::{LlmRequest, RestockError};

use crate::delegate::QnaSession;

impl QnaSession {
    /// Draft a short promotional blurb for the slowest seller in the bound
    /// table. Requires an upload, like every other question; requires a
    /// numeric column to rank by.
    pub async fn draft_promo(&self) -> Result<String, RestockError> {
        let delegate = self.require_delegate()?;

        let slowest = delegate.table().slowest_seller().ok_or_else(|| {
            RestockError::Precondition(
                "the uploaded CSV has no numeric column to rank sellers by".to_string(),
            )
        })?;

        info!(item = %slowest.item, value = slowest.value, "Drafting promo for slowest seller");

        let user_prompt = format!(
            "Our slowest seller is \"{}\" ({} = {}). Write a short, upbeat promotional \
             blurb (2-3 sentences) to move it off the shelf.",
            slowest.item, slowest.column, slowest.value
        );

        let request = LlmRequest::text(delegate.model(), "", user_prompt);
        let response = delegate
            .provider()
            .complete(&request)
            .await
            .map_err(|e| RestockError::remote(delegate.provider().name(), e))?;

        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use restock_providers::MockProvider;

    use crate::delegate::QnaSession;
    use crate::table::Table;

    #[tokio::test]
    async fn promo_before_upload_short_circuits() {
        let session = QnaSession::new();
        let err = session.draft_promo().await.unwrap_err();
        assert_eq!(err.to_string(), "Please upload a CSV file first.");
    }

    #[tokio::test]
    async fn promo_targets_the_slowest_seller() {
        let provider = Arc::new(MockProvider::new("mock").with_response("Croissants! Half off."));
        let mut session = QnaSession::new();
        session.bind(
            provider,
            "model",
            Table::from_csv(b"item,sold\nCroissants,3\nDoritos,11\n").unwrap(),
        );
        let blurb = session.draft_promo().await.unwrap();
        assert_eq!(blurb, "Croissants! Half off.");
        // The blurb is a one-off, not part of the chat transcript.
        assert!(session.history.is_empty());
    }

    #[tokio::test]
    async fn promo_needs_a_numeric_column() {
        let provider = Arc::new(MockProvider::new("mock"));
        let mut session = QnaSession::new();
        session.bind(
            provider.clone(),
            "model",
            Table::from_csv(b"item,color\nCroissants,gold\n").unwrap(),
        );
        assert!(session.draft_promo().await.is_err());
        assert_eq!(provider.calls(), 0);
    }
}
