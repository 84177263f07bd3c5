//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "ticket-triage")]
#[command(about = "Support ticket triage service with a semantic answer cache")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a TOML config file (default: config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Disable CORS headers
        #[arg(long)]
        no_cors: bool,
    },
    /// Triage a single ticket and print the reply
    Ask {
        /// Ticket text
        text: String,
        /// Print the reply as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show current configuration
    Config,
}
