//! API request handlers
use std::sync::Arc;

use axum::Json;

use crate::api::types::HealthResponse;
use crate::api::types::PingResponse;
use crate::triage::TriageService;

pub mod ticket;

pub use ticket::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub triage: Arc<TriageService>,
}

impl AppState {
    pub fn new(triage: TriageService) -> Self {
        Self {
            triage: Arc::new(triage),
        }
    }
}

/// Liveness probe used by the chat UI
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse::pong())
}

/// Health check handler
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
