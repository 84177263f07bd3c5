//! API request and response types

use serde::Deserialize;
use serde::Serialize;

/// Body of `POST /api/ticket`
#[derive(Debug, Deserialize)]
pub struct TicketRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// `GET /ping` response
#[derive(Debug, Serialize, Deserialize)]
pub struct PingResponse {
    pub message: String,
}

impl PingResponse {
    pub fn pong() -> Self {
        Self {
            message: "pong".to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error body returned for every non-2xx response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
