//! HTTP server implementation

use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::triage::TriageService;
use crate::Result;

/// Start the API server
pub async fn serve_api(config: &AppConfig, host: String, port: u16, enable_cors: bool) -> Result<()> {
    info!("🚀 Starting ticket triage API server...");

    // Collaborators are contacted lazily, per request
    let triage = TriageService::new(config)?;
    let state = AppState::new(triage);

    let app = routes::app(state, enable_cors);
    if enable_cors {
        info!("✅ CORS enabled");
    }

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /ping        - Liveness check");
    info!("  GET  /health      - Health check");
    info!("  POST /api/ticket  - Triage a support ticket");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
