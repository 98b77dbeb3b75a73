//! Draft generation policy.
//!
//! Given current stock and par levels, builds one instruction asking the
//! reasoning model for a JSON object with exactly three draft fields, and
//! validates the reply with serde. A reply that fails validation drops to
//! the fixed demo drafts; a remote failure propagates so the caller can
//! leave its previous draft set untouched. Whatever happens, a returned
//! record always carries all three channels non-empty.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use restock_core::{
    DraftRecord, DraftSet, DraftSource, LlmProvider, LlmRequest, ParLevels, RestockError,
    StockSnapshot,
};

const DRAFT_SYSTEM_PROMPT: &str = "You are a reordering strategist for a convenience store. \
    Reply with a JSON object of the form {\"whatsapp\": \"...\", \"json\": \"...\", \
    \"pdf\": \"...\"} and nothing else. The whatsapp field is a casual vendor message, the \
    json field is a stringified order payload for a web form, and the pdf field is printable \
    order text with one line per item.";

/// Decides what to send to the reordering model and what shape of output to
/// accept.
pub struct DraftPolicy {
    provider: Arc<dyn LlmProvider>,
    model: String,
    par_levels: ParLevels,
}

#[derive(Deserialize)]
struct DraftReply {
    whatsapp: String,
    json: String,
    pdf: String,
}

impl DraftPolicy {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        par_levels: ParLevels,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            par_levels,
        }
    }

    /// Generate a fresh draft set for the given snapshot.
    pub async fn generate(&self, stock: &StockSnapshot) -> Result<DraftRecord, RestockError> {
        if stock.is_empty() {
            return Err(RestockError::Precondition(
                "no stock snapshot to reorder from — analyze a shelf photo first".to_string(),
            ));
        }

        let request = LlmRequest::text(
            &self.model,
            DRAFT_SYSTEM_PROMPT,
            build_prompt(stock, &self.par_levels),
        )
        .with_json_output();

        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| RestockError::remote(self.provider.name(), e))?;

        match parse_drafts(&response.content) {
            Ok(set) => {
                info!(provider = %response.provider, "Draft reply validated");
                Ok(DraftRecord {
                    set,
                    source: DraftSource::Model,
                })
            }
            Err(reason) => {
                warn!(%reason, "Draft reply failed validation, using fixed drafts");
                Ok(DraftRecord {
                    set: DraftSet::fallback(),
                    source: DraftSource::Fallback,
                })
            }
        }
    }
}

fn build_prompt(stock: &StockSnapshot, par_levels: &ParLevels) -> String {
    let stock_lines: Vec<String> = stock
        .iter()
        .map(|(name, qty)| format!("- {name}: {qty}"))
        .collect();
    let par_lines: Vec<String> = par_levels
        .iter()
        .map(|(name, target)| format!("- {name}: {target}"))
        .collect();

    format!(
        "Current stock:\n{}\n\nPar levels:\n{}\n\nDraft the three reorder outputs for \
         whatever is below par.",
        stock_lines.join("\n"),
        par_lines.join("\n")
    )
}

fn parse_drafts(content: &str) -> Result<DraftSet, String> {
    let reply: DraftReply =
        serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;
    let set = DraftSet {
        whatsapp: reply.whatsapp,
        json: reply.json,
        pdf: reply.pdf,
    };
    if !set.is_complete() {
        return Err("one or more draft fields is empty".to_string());
    }
    Ok(set)
}
