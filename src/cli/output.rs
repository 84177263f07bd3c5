//! CLI output formatting utilities

use crate::models::TicketReply;
use crate::AppConfig;
use crate::Result;

/// Human-readable rendering of a ticket reply
#[must_use]
pub fn format_reply(reply: &TicketReply) -> String {
    let source = if reply.matched {
        "stored answer"
    } else {
        "LLM"
    };
    let action = reply
        .action
        .map_or_else(String::new, |a| format!(" | Action: {a}"));

    format!(
        "📂 Category: {} | Confidence: {}{} | Source: {}\n\n{}",
        reply.category, reply.confidence, action, source, reply.response
    )
}

/// Print a ticket reply
pub fn print_reply(reply: &TicketReply, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(reply)?);
    } else {
        println!("{}", format_reply(reply));
    }
    Ok(())
}

/// Print configuration with secrets masked
pub fn print_config(config: &AppConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(&config.redacted())
        .map_err(|e| crate::TriageError::Custom(format!("Failed to render config: {e}")))?;
    println!("📋 Current configuration:\n");
    println!("{rendered}");
    Ok(())
}
