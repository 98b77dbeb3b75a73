//! Restock Gateway HTTP API Server
//!
//! Exposes the reorder workflow as per-session REST routes. Each route is
//! the equivalent of one former UI button: upload, analyze, generate,
//! export, upload CSV, ask, promo.

pub mod routes;
pub mod server;
pub mod services;
pub mod sessions;

pub use server::{router, start_server, AppState};
pub use services::Services;
pub use sessions::{ExportPayload, Session, SessionRegistry};
