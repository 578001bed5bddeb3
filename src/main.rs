use anyhow::Result;
use replicate_relay::{config, logging, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Without an API key the relay cannot do anything useful, so refuse to start.
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let directive = match logging::init(&config.server.logs) {
        Ok(directive) => directive,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Replicate relay starting (model: {}, log filter: {})",
        config.replicate.model, directive
    );

    server::run(config).await?;

    Ok(())
}
