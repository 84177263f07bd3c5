//! Ticket handlers
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::error;
use tracing::info;

use super::AppState;
use crate::api::error::ApiError;
use crate::api::error::ApiResult;
use crate::api::types::TicketRequest;
use crate::errors::TriageError;
use crate::models::TicketReply;

/// Process a support ticket (POST /api/ticket)
pub async fn process_ticket(
    State(state): State<AppState>,
    payload: Result<Json<TicketRequest>, JsonRejection>,
) -> ApiResult<Json<TicketReply>> {
    let Json(req) = payload?;

    let text = match req.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ApiError::BadRequest("Missing ticket text".to_string())),
    };
    info!("POST /api/ticket ({} chars)", text.len());

    state.triage.process(&text).await.map(Json).map_err(|e| {
        if !matches!(e, TriageError::InvalidInput(_)) {
            error!("Error processing ticket: {}", e);
        }
        ApiError::from(e)
    })
}
