//! Route handlers: one endpoint per former UI button.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use logging::redact_sensitive_data;
use restock_core::{Channel, ChatTurn, DraftSource, DraftStatus, RestockError, StockSnapshot};
use restock_intake::ExtractionSource;
use restock_tabular::BindOutcome;

use crate::server::AppState;
use crate::sessions::{ExportPayload, Session};

/// Error envelope: every failure renders as an inline `{error}` banner with
/// the prior session state untouched.
pub enum ApiError {
    UnknownSession,
    UnknownChannel(String),
    Workflow(RestockError),
}

impl From<RestockError> for ApiError {
    fn from(err: RestockError) -> Self {
        ApiError::Workflow(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UnknownSession => (StatusCode::NOT_FOUND, "unknown session".to_string()),
            ApiError::UnknownChannel(name) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("unknown channel: {name}"),
            ),
            ApiError::Workflow(err) => {
                let status = match &err {
                    RestockError::Remote { .. } => StatusCode::BAD_GATEWAY,
                    RestockError::DraftParse(_) | RestockError::CsvParse(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    RestockError::Precondition(_) => StatusCode::CONFLICT,
                    RestockError::Export(_)
                    | RestockError::Config(_)
                    | RestockError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                error!(error = %err, "Request failed");
                (status, redact_sensitive_data(&err.to_string()))
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Serialize)]
pub struct SessionView {
    session_id: Uuid,
    created_at: DateTime<Utc>,
    stock: StockSnapshot,
    reasoning: String,
    raw_ocr: Vec<String>,
    /// Absent until a stock snapshot exists, even if drafts linger from an
    /// earlier state — nothing renders ahead of the analyze step.
    drafts: Option<DraftsView>,
    chat: Vec<ChatTurn>,
    csv_bound: bool,
}

#[derive(Serialize)]
struct DraftsView {
    source: DraftSource,
    channels: Vec<ChannelView>,
}

#[derive(Serialize)]
struct ChannelView {
    channel: Channel,
    payload: String,
    status: DraftStatus,
}

fn session_view(session: &Session) -> SessionView {
    let inventory = &session.inventory;
    let drafts = if inventory.has_stock() {
        inventory.drafts.as_ref().map(|record| DraftsView {
            source: record.source,
            channels: Channel::ALL
                .iter()
                .map(|&channel| ChannelView {
                    channel,
                    payload: record.set.get(channel).to_string(),
                    status: inventory.approvals.status(channel),
                })
                .collect(),
        })
    } else {
        None
    };

    SessionView {
        session_id: inventory.session_id,
        created_at: inventory.created_at,
        stock: inventory.stock.clone(),
        reasoning: inventory.reasoning.clone(),
        raw_ocr: inventory.raw_ocr.clone(),
        drafts,
        chat: session.qna.history.turns().to_vec(),
        csv_bound: session.qna.is_bound(),
    }
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn create_session(State(state): State<AppState>) -> Json<serde_json::Value> {
    let session_id = state.registry.create().await;
    Json(json!({ "session_id": session_id }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state
        .registry
        .get(session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let session = session.lock().await;
    Ok(Json(session_view(&session)))
}

pub async fn upload_image(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state
        .registry
        .get(session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let mut session = session.lock().await;
    let mime_type = session.attach_image(body.to_vec())?;
    Ok(Json(json!({ "mime_type": mime_type })))
}

pub async fn analyze(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state
        .registry
        .get(session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let mut session = session.lock().await;
    let source = session.analyze(&state.services).await?;
    Ok(Json(json!({
        "source": match source {
            ExtractionSource::Model => "model",
            ExtractionSource::DemoFallback => "demo_fallback",
        },
        "lines": session.inventory.raw_ocr.len(),
        "stock": session.inventory.stock.clone(),
    })))
}

pub async fn generate_drafts(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state
        .registry
        .get(session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let mut session = session.lock().await;
    let source = session.generate_drafts(&state.services).await?;
    Ok(Json(json!({
        "source": source,
        "session": session_view(&session),
    })))
}

pub async fn export_channel(
    State(state): State<AppState>,
    Path((session_id, channel)): Path<(Uuid, String)>,
) -> Result<Response, ApiError> {
    let channel = Channel::parse(&channel).ok_or(ApiError::UnknownChannel(channel))?;
    let session = state
        .registry
        .get(session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let mut session = session.lock().await;

    match session.export(channel)? {
        ExportPayload::Text(payload) => {
            Ok(Json(json!({ "channel": channel, "payload": payload })).into_response())
        }
        ExportPayload::Pdf(bytes) => Ok((
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"reorder.pdf\"",
                ),
            ],
            bytes,
        )
            .into_response()),
    }
}

pub async fn upload_csv(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state
        .registry
        .get(session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let mut session = session.lock().await;
    let (outcome, rows, columns) = session.bind_csv(&state.services, &body)?;
    Ok(Json(json!({
        "bound": outcome == BindOutcome::Bound,
        "rows": rows,
        "columns": columns,
    })))
}

#[derive(Deserialize)]
pub struct AskRequest {
    pub question: String,
}

pub async fn ask(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state
        .registry
        .get(session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let mut session = session.lock().await;
    let answer = session.qna.ask(&request.question).await?;
    Ok(Json(json!({ "answer": answer })))
}

pub async fn promo(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state
        .registry
        .get(session_id)
        .await
        .ok_or(ApiError::UnknownSession)?;
    let session = session.lock().await;
    let blurb = session.qna.draft_promo().await?;
    Ok(Json(json!({ "blurb": blurb })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use restock_core::{DraftRecord, DraftSet};

    #[test]
    fn view_hides_drafts_until_stock_exists() {
        let mut session = Session::new(Uuid::new_v4());
        // A record with no snapshot cannot arise through the normal flow;
        // the view still must not render it.
        session.inventory.drafts = Some(DraftRecord {
            set: DraftSet::fallback(),
            source: DraftSource::Fallback,
        });
        assert!(session_view(&session).drafts.is_none());

        session.inventory.stock = StockSnapshot::demo();
        session.inventory.approvals.mark_generated();
        let view = session_view(&session);
        let drafts = view.drafts.expect("drafts visible once stock exists");
        assert_eq!(drafts.channels.len(), 3);
        assert!(drafts
            .channels
            .iter()
            .all(|c| !c.payload.is_empty() && c.status == DraftStatus::Unapproved));
    }

    #[test]
    fn error_statuses_follow_the_taxonomy() {
        let cases = [
            (
                ApiError::Workflow(RestockError::remote("groq", "503")),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::Workflow(RestockError::CsvParse("bad row".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::Workflow(RestockError::Precondition("not yet".into())),
                StatusCode::CONFLICT,
            ),
            (ApiError::UnknownSession, StatusCode::NOT_FOUND),
            (
                ApiError::UnknownChannel("email".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
