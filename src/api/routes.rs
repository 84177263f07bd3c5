//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create the `/api` router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/ticket", post(handlers::process_ticket))
        .with_state(state)
}

/// Full application router with middleware
pub fn app(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/ping", get(handlers::ping))
        .route("/health", get(handlers::health))
        .nest("/api", api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}
