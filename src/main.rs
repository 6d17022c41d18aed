//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, and starts the Spotify MCP
//! server with the configured transport.

use anyhow::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use spotify_mcp_server::core::config::{LoggingConfig, SpotifyConfig};
use spotify_mcp_server::core::{Config, McpServer, TransportService};
use spotify_mcp_server::spotify::auth::authorization_url;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Keep the guard alive so buffered file logs are flushed on exit
    let _guard = init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);
    report_credentials(&config.spotify);

    let server = McpServer::new(config.clone())?;
    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the logging subsystem.
///
/// Human-readable output always goes to stderr. With a log path, a JSON layer
/// also writes to a daily rotated file.
fn init_logging(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let stderr = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(filter(&logging.level));

    let (file, guard) = match &logging.log_path {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "spotify-mcp.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(filter(&logging.level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(stderr).with(file).init();
    guard
}

/// Warn about missing credentials and point at the authorization URL.
fn report_credentials(spotify: &SpotifyConfig) {
    if spotify.has_credentials() {
        info!("Spotify credentials loaded");
        return;
    }

    warn!(
        "No Spotify credentials configured. Set SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET \
         and SPOTIFY_REFRESH_TOKEN (or SPOTIFY_ACCESS_TOKEN)"
    );
    if let (Some(client_id), Some(redirect_uri)) = (&spotify.client_id, &spotify.redirect_uri) {
        info!(
            "Authorize this app to obtain a refresh token: {}",
            authorization_url(&spotify.accounts_url, client_id, redirect_uri)
        );
    }
}
