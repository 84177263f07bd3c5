use clap::Parser;
use ticket_triage::cli::Cli;
use ticket_triage::cli::Commands;
use ticket_triage::cli;
use ticket_triage::config::AppConfig;
use ticket_triage::logging;
use ticket_triage::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging: --verbose wins over the configured level
    if args.verbose {
        logging::init_logging_with_level("debug", &config.logging.directory)?;
    } else {
        logging::init_logging_with_config(&config.logging)?;
    }
    info!("ticket-triage v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Commands::Serve {
            host,
            port,
            no_cors,
        } => cli::handle_serve(&config, host, port, no_cors).await?,
        Commands::Ask { text, json } => cli::handle_ask(&config, &text, json).await?,
        Commands::Config => cli::handle_config(&config)?,
    }

    Ok(())
}
