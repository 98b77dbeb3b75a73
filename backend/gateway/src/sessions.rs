//! Per-session workflow state and the registry that owns it.
//!
//! One `Session` per browser session, behind its own mutex: interactions
//! within a session are serialized (one in-flight request at a time), while
//! separate sessions never contend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use restock_core::{Channel, DraftSource, RestockError, SessionState, UploadedImage};
use restock_drafts::pdf;
use restock_intake::{ExtractionSource, ImageFormat};
use restock_tabular::{BindOutcome, QnaSession, Table};

use crate::services::Services;

/// What an export action hands back to the caller.
#[derive(Debug)]
pub enum ExportPayload {
    /// The exact draft text, for the copy-to-clipboard channels.
    Text(String),
    /// Lazily rendered document bytes.
    Pdf(Vec<u8>),
}

/// Everything one browser session owns.
pub struct Session {
    pub inventory: SessionState,
    pub qna: QnaSession,
}

impl Session {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            inventory: SessionState::new(session_id),
            qna: QnaSession::new(),
        }
    }

    /// Store uploaded image bytes after sniffing the format. Replacing the
    /// image is allowed any number of times; only analyze consumes it.
    pub fn attach_image(&mut self, bytes: Vec<u8>) -> Result<&'static str, RestockError> {
        let format = ImageFormat::sniff(&bytes)?;
        let mime_type = format.mime_type();
        self.inventory.image = Some(UploadedImage { bytes, mime_type });
        Ok(mime_type)
    }

    /// Run OCR plus stock extraction over the attached image. Session state
    /// is only touched once both remote steps have succeeded.
    pub async fn analyze(&mut self, services: &Services) -> Result<ExtractionSource, RestockError> {
        let image = self.inventory.image.as_ref().ok_or_else(|| {
            RestockError::Precondition("upload a shelf photo before analyzing".to_string())
        })?;

        let lines = services
            .ocr
            .extract_lines(&image.bytes, image.mime_type)
            .await?;
        let extraction = services.extractor.analyze(&lines).await?;

        self.inventory.raw_ocr = lines;
        self.inventory.reasoning = extraction.reasoning;
        self.inventory.stock = extraction.snapshot;
        Ok(extraction.source)
    }

    /// Generate a fresh draft set. On success the previous set is replaced
    /// and every channel's approval resets; on failure nothing changes.
    pub async fn generate_drafts(
        &mut self,
        services: &Services,
    ) -> Result<DraftSource, RestockError> {
        let record = services.drafts.generate(&self.inventory.stock).await?;
        let source = record.source;
        self.inventory.drafts = Some(record);
        self.inventory.approvals.mark_generated();
        Ok(source)
    }

    /// The per-channel approval action: returns the payload and marks the
    /// channel approved. PDF bytes are rendered here, at click time.
    pub fn export(&mut self, channel: Channel) -> Result<ExportPayload, RestockError> {
        let record = self.inventory.drafts.as_ref().ok_or_else(|| {
            RestockError::Precondition("generate drafts before exporting".to_string())
        })?;

        let payload = match channel {
            Channel::Whatsapp | Channel::Json => {
                ExportPayload::Text(record.set.get(channel).to_string())
            }
            Channel::Pdf => ExportPayload::Pdf(pdf::render(record.set.get(Channel::Pdf))?),
        };

        self.inventory.approvals.approve(channel)?;
        Ok(payload)
    }

    /// Parse CSV bytes and bind the query delegate (first upload wins).
    pub fn bind_csv(
        &mut self,
        services: &Services,
        bytes: &[u8],
    ) -> Result<(BindOutcome, usize, usize), RestockError> {
        let table = Table::from_csv(bytes)?;
        let rows = table.row_count();
        let columns = table.column_count();
        let outcome = self
            .qna
            .bind(services.qna_provider.clone(), services.qna_model.clone(), table);
        Ok((outcome, rows, columns))
    }
}

/// Owns every live session. Cloning is cheap; all clones share the map.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<Session>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh, empty session and return its id.
    pub async fn create(&self) -> Uuid {
        let session_id = Uuid::new_v4();
        let mut sessions = self.sessions.write().await;
        sessions.insert(session_id, Arc::new(Mutex::new(Session::new(session_id))));
        info!(%session_id, "Session created");
        session_id
    }

    pub async fn get(&self, session_id: Uuid) -> Option<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read().await;
        sessions.get(&session_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_core::{DraftSource, DraftStatus, StockSnapshot};
    use restock_providers::MockProvider;

    const DRAFT_JSON: &str =
        r#"{"whatsapp": "hey Mike", "json": "{\"qty\": 36}", "pdf": "REORDER\nRed Bull x36"}"#;

    fn services_with(reasoning: Arc<MockProvider>) -> Services {
        Services::new(
            Arc::new(MockProvider::new("vision")),
            reasoning,
            "vision-model",
            "reasoning-model",
        )
    }

    fn session_with_stock() -> Session {
        let mut session = Session::new(Uuid::new_v4());
        session.inventory.stock = StockSnapshot::demo();
        session
    }

    #[tokio::test]
    async fn fresh_session_has_no_drafts_and_empty_stock() {
        let registry = SessionRegistry::new();
        let id = registry.create().await;
        let session = registry.get(id).await.unwrap();
        let session = session.lock().await;
        assert!(session.inventory.stock.is_empty());
        assert!(session.inventory.drafts.is_none());
        assert!(!session.qna.is_bound());
    }

    #[tokio::test]
    async fn unknown_session_is_absent() {
        let registry = SessionRegistry::new();
        assert!(registry.get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn analyze_without_image_is_a_precondition_error() {
        let services = services_with(Arc::new(MockProvider::new("mock")));
        let mut session = Session::new(Uuid::new_v4());
        assert!(matches!(
            session.analyze(&services).await.unwrap_err(),
            RestockError::Precondition(_)
        ));
    }

    #[tokio::test]
    async fn generate_failure_preserves_previous_drafts() {
        let ok = Arc::new(MockProvider::new("mock").with_response(DRAFT_JSON));
        let mut session = session_with_stock();
        session.generate_drafts(&services_with(ok)).await.unwrap();
        let before = session.inventory.drafts.clone().unwrap();

        let failing = Arc::new(MockProvider::new("mock").with_failure("503"));
        let err = session
            .generate_drafts(&services_with(failing))
            .await
            .unwrap_err();
        assert!(matches!(err, RestockError::Remote { .. }));
        assert_eq!(session.inventory.drafts.as_ref().unwrap(), &before);
    }

    #[tokio::test]
    async fn export_before_generation_is_rejected() {
        let mut session = session_with_stock();
        assert!(matches!(
            session.export(Channel::Whatsapp).unwrap_err(),
            RestockError::Precondition(_)
        ));
    }

    #[tokio::test]
    async fn export_returns_payload_and_approves_only_that_channel() {
        let ok = Arc::new(MockProvider::new("mock").with_response(DRAFT_JSON));
        let mut session = session_with_stock();
        let source = session.generate_drafts(&services_with(ok)).await.unwrap();
        assert_eq!(source, DraftSource::Model);

        let ExportPayload::Text(payload) = session.export(Channel::Whatsapp).unwrap() else {
            panic!("whatsapp export should be text");
        };
        assert_eq!(payload, "hey Mike");
        assert!(session.inventory.approvals.is_approved(Channel::Whatsapp));
        assert_eq!(
            session.inventory.approvals.status(Channel::Pdf),
            DraftStatus::Unapproved
        );
    }

    #[tokio::test]
    async fn pdf_export_is_byte_identical_across_clicks() {
        let ok = Arc::new(MockProvider::new("mock").with_response(DRAFT_JSON));
        let mut session = session_with_stock();
        session.generate_drafts(&services_with(ok)).await.unwrap();

        let ExportPayload::Pdf(first) = session.export(Channel::Pdf).unwrap() else {
            panic!("pdf export should be bytes");
        };
        let ExportPayload::Pdf(second) = session.export(Channel::Pdf).unwrap() else {
            panic!("pdf export should be bytes");
        };
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn csv_binding_reports_first_upload_wins() {
        let services = services_with(Arc::new(MockProvider::new("mock")));
        let mut session = Session::new(Uuid::new_v4());

        let (outcome, rows, columns) = session
            .bind_csv(&services, b"item,sold\nCroissants,3\n")
            .unwrap();
        assert_eq!(outcome, BindOutcome::Bound);
        assert_eq!((rows, columns), (1, 2));

        let (outcome, _, _) = session
            .bind_csv(&services, b"sku,count\nA,1\nB,2\n")
            .unwrap();
        assert_eq!(outcome, BindOutcome::AlreadyBound);
    }
}
