//! Gatehouse - authenticated web gateway for the workshop door controller

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatehouse::{config::Args, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gatehouse={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration - missing credentials fail closed
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  Gatehouse - Door Controller Gateway");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Controller: {}", args.controller_url);
    info!(
        "Command timeout: {}ms, retries: {}, retry delay: {}ms",
        args.command_timeout_ms, args.command_retries, args.retry_delay_ms
    );
    info!("Mode: {}", if args.dev_mode { "DEVELOPMENT" } else { "PRODUCTION" });
    info!("======================================");

    if args.dev_mode {
        warn!("Dev mode: insecure default credentials in use, cookies not marked Secure");
    }

    let state = match server::AppState::new(args) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Startup error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server::run(state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
