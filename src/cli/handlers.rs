//! CLI command handlers

use crate::api::serve_api;
use crate::cli::output::*;
use crate::triage::TriageService;
use crate::AppConfig;
use crate::Result;

pub async fn handle_serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    no_cors: bool,
) -> Result<()> {
    // CLI arguments take priority over config
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let cors = config.server.enable_cors && !no_cors;

    println!("🚀 Starting Ticket Triage API Server");
    println!("====================================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!("🌐 CORS: {}", if cors { "Enabled" } else { "Disabled" });
    println!("🗄️  Vector store: {}", config.vector_store.url);
    println!("🤖 Model: {}", config.llm_model());
    println!();

    serve_api(config, host, port, cors).await
}

pub async fn handle_ask(config: &AppConfig, text: &str, as_json: bool) -> Result<()> {
    let service = TriageService::new(config)?;
    let reply = service.process(text).await?;
    print_reply(&reply, as_json)
}

pub fn handle_config(config: &AppConfig) -> Result<()> {
    print_config(config)
}
