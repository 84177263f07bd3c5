//! Logging configuration for the triage service

use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{
    self,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::LoggingConfig;
use crate::Result;

const LOG_FILE_PREFIX: &str = "ticket-triage.log";

/// Build the filter directive for a level, scoped to this crate as well
pub fn filter_directive(level: &str) -> String {
    format!("{level},ticket_triage={level},tower_http={level}")
}

/// Initialize logging with console and daily-rolling file output
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    init_logging_with_level(&config.level, &config.directory)
}

/// Initialize logging with a custom log level
pub fn init_logging_with_level(level: &str, directory: &str) -> Result<()> {
    let logs_dir = Path::new(directory);
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    // RUST_LOG takes priority over the configured level
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking)
        .with_ansi(false); // No colors in file

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::TriageError::Custom(format!("Failed to initialize logging: {e}")))?;

    tracing::info!("Logging initialized with level: {}", level);
    tracing::info!(
        "Log files will be saved to: {}/{}.YYYY-MM-DD",
        logs_dir.display(),
        LOG_FILE_PREFIX
    );

    // The writer must outlive every span; the process owns it until exit
    std::mem::forget(guard);

    Ok(())
}
