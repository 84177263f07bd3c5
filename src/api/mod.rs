//! HTTP API consumed by the chat UI

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use routes::app;
pub use server::serve_api;
