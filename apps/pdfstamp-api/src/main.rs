//! PDF billing-code stamping server
//!
//! Accepts a PDF (uploaded directly or fetched from a URL) together with a
//! billing code, draws "Billing Code: <code>" centered near the top of the
//! first page (or every page) and returns the modified document.
//!
//! ## Configuration
//!
//! Every flag can also be set through the environment (a `.env` file is
//! loaded when present). Setting `API_KEY` requires callers to send a
//! matching `x-api-key` header.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod fetch;
mod models;
mod state;

use state::{AppState, Config};

/// Command-line arguments for the stamping server
#[derive(Parser, Debug)]
#[command(name = "pdfstamp-api")]
#[command(about = "Stamp billing codes onto PDF documents")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Shared secret expected in the x-api-key header (unset disables auth)
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Timeout for downloading file_url, in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value = "60")]
    fetch_timeout_secs: u64,

    /// Largest accepted document, in megabytes
    #[arg(long, env = "MAX_UPLOAD_MB", default_value = "25")]
    max_upload_mb: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            // An empty API_KEY counts as unset
            api_key: self.api_key.clone().filter(|key| !key.is_empty()),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            max_upload_bytes: self.max_upload_mb * 1024 * 1024,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::from_default_env()
                .add_directive(log_level.into())
                .add_directive("tower_http=debug".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.config();
    let auth_enabled = config.api_key.is_some();
    let fetch_timeout = config.fetch_timeout;
    let state = AppState::new(config)?;
    let app = api::router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!(
        "API key check: {}",
        if auth_enabled { "enabled" } else { "disabled" }
    );
    info!("Fetch timeout: {}s", fetch_timeout.as_secs());

    axum::serve(listener, app).await?;

    Ok(())
}
