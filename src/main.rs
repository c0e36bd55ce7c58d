use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use proofy_forensics::{
    config::{Config, LogFormat},
    gemini::GeminiClient,
    server::{router, AppState},
};

/// Proofy media-forensics HTTP server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Bind address, overriding SERVER_ADDR
    #[arg(long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(addr) = cli.addr {
        config.server.addr = addr;
    }

    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Proofy forensics server starting..."
    );

    let client = match GeminiClient::new(&config.gemini, config.request.clone()) {
        Ok(c) => {
            info!(base_url = %c.base_url(), "Gemini client initialized");
            c
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize Gemini client");
            return Err(e.into());
        }
    };

    let addr = config.server.addr.clone();
    let state = Arc::new(AppState::new(config, Arc::new(client)));
    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(addr = %addr, error = %e, "Failed to bind");
            return Err(e.into());
        }
    };

    info!(addr = %addr, "Server ready, listening for requests");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
