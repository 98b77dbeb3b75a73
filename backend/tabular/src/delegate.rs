//! Natural-language Q&A over an uploaded table.
//!
//! The delegate is bound to a table exactly once per session: the first
//! upload wins, and later uploads are ignored rather than rebound. Callers
//! are told which happened so the staleness is at least visible.

use std::sync::Arc;

use tracing::{info, warn};

use restock_core::{ChatHistory, LlmProvider, LlmRequest, RestockError};

use crate::table::Table;

pub(crate) const NO_CSV_MESSAGE: &str = "Please upload a CSV file first.";

const QA_SYSTEM_PROMPT: &str = "You answer questions about a CSV table of store data. Base \
    every answer only on the supplied columns and rows. Answer in plain prose; if the table \
    cannot answer the question, say so.";

/// Number of data rows quoted back to the model with each question.
const SAMPLE_ROWS: usize = 20;

/// An LLM-backed query agent bound to one parsed table.
pub struct QueryDelegate {
    provider: Arc<dyn LlmProvider>,
    model: String,
    table: Table,
}

impl QueryDelegate {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>, table: Table) -> Self {
        Self {
            provider,
            model: model.into(),
            table,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub(crate) fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }

    /// Route one free-text question through the model, grounded on the
    /// table schema and a sample of rows.
    pub async fn ask(&self, question: &str) -> Result<String, RestockError> {
        let user_prompt = format!(
            "Columns: {}\n\nRows:\n{}\n\nQuestion: {}",
            self.table.schema_summary(),
            self.table.sample(SAMPLE_ROWS),
            question
        );

        let request = LlmRequest::text(&self.model, QA_SYSTEM_PROMPT, user_prompt);
        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| RestockError::remote(self.provider.name(), e))?;

        Ok(response.content)
    }
}

/// Whether an upload bound the delegate or hit the first-upload-wins rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Bound,
    AlreadyBound,
}

/// Per-session Q&A state: the optionally-bound delegate plus the transcript.
#[derive(Default)]
pub struct QnaSession {
    delegate: Option<QueryDelegate>,
    pub history: ChatHistory,
}

impl QnaSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.delegate.is_some()
    }

    /// Bind the delegate to a table. First upload wins; a second upload is
    /// ignored and reported as such.
    pub fn bind(
        &mut self,
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        table: Table,
    ) -> BindOutcome {
        if self.delegate.is_some() {
            warn!("CSV re-upload ignored: delegate already bound to the first table");
            return BindOutcome::AlreadyBound;
        }
        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            "Binding query delegate to uploaded table"
        );
        self.delegate = Some(QueryDelegate::new(provider, model, table));
        BindOutcome::Bound
    }

    pub(crate) fn require_delegate(&self) -> Result<&QueryDelegate, RestockError> {
        self.delegate
            .as_ref()
            .ok_or_else(|| RestockError::Precondition(NO_CSV_MESSAGE.to_string()))
    }

    /// Ask a question. A successful answer appends a (user, assistant) pair
    /// to the transcript; any failure leaves the transcript unchanged.
    pub async fn ask(&mut self, question: &str) -> Result<String, RestockError> {
        let delegate = self.require_delegate()?;
        let answer = delegate.ask(question).await?;
        self.history.push_user(question);
        self.history.push_assistant(answer.clone());
        Ok(answer)
    }
}
