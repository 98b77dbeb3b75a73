//! Per-session state for the image → stock → drafts workflow.
//!
//! One instance per browser session, owned by the gateway's session map and
//! passed by reference through the request-handling context. No process-wide
//! singletons; everything here dies with the process.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::approval::ApprovalBoard;
use crate::types::{DraftRecord, StockSnapshot};

/// Raw uploaded image bytes plus their sniffed MIME type.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Active state of one reorder session.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub image: Option<UploadedImage>,
    /// Raw OCR line output from the last analyze run.
    pub raw_ocr: Vec<String>,
    /// Free-text reasoning returned by the extraction model, kept for display.
    pub reasoning: String,
    pub stock: StockSnapshot,
    pub drafts: Option<DraftRecord>,
    pub approvals: ApprovalBoard,
}

impl SessionState {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            created_at: Utc::now(),
            image: None,
            raw_ocr: Vec::new(),
            reasoning: String::new(),
            stock: StockSnapshot::new(),
            drafts: None,
            approvals: ApprovalBoard::new(),
        }
    }

    /// Drafts are only exposed once a stock snapshot exists.
    pub fn has_stock(&self) -> bool {
        !self.stock.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::DraftStatus;
    use crate::types::Channel;

    #[test]
    fn fresh_session_is_empty() {
        let state = SessionState::new(Uuid::new_v4());
        assert!(state.stock.is_empty());
        assert!(state.drafts.is_none());
        assert!(state.raw_ocr.is_empty());
        for channel in Channel::ALL {
            assert_eq!(state.approvals.status(channel), DraftStatus::NotGenerated);
        }
    }
}
