//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (and a `.env` file when present) on top of defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::spotify::auth::normalize_redirect_uri;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Spotify credentials and endpoints.
    pub spotify: SpotifyConfig,

    /// Playback change notifications.
    pub notifications: NotificationsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Directory for daily-rotated JSON log files. Stderr only when unset.
    pub log_path: Option<PathBuf>,
}

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Spotify application credentials and API endpoints.
#[derive(Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    /// Redirect URI registered with the Spotify application.
    pub redirect_uri: Option<String>,

    /// Long-lived token exchanged for access tokens.
    pub refresh_token: Option<String>,

    /// Static bearer token, used as-is when no refresh token is configured.
    pub access_token: Option<String>,

    pub api_base_url: String,
    pub accounts_url: String,

    /// Retry attempts for rate-limited and 5xx responses.
    pub max_retries: u32,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("redirect_uri", &self.redirect_uri)
            .field("refresh_token", &redact(&self.refresh_token))
            .field("access_token", &redact(&self.access_token))
            .field("api_base_url", &self.api_base_url)
            .field("accounts_url", &self.accounts_url)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            refresh_token: None,
            access_token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            max_retries: 3,
        }
    }
}

impl SpotifyConfig {
    /// Whether any way of authenticating is configured.
    pub fn has_credentials(&self) -> bool {
        self.access_token.is_some()
            || (self.client_id.is_some()
                && self.client_secret.is_some()
                && self.refresh_token.is_some())
    }
}

/// Configuration for playback change notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub enabled: bool,

    /// Seconds between playback polls.
    pub poll_interval_secs: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_secs: 5,
        }
    }
}

impl NotificationsConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "spotify-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                log_path: None,
            },
            transport: TransportConfig::default(),
            spotify: SpotifyConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

/// Non-empty value of an environment variable.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an environment variable, keeping `current` when unset or invalid.
fn env_parse<T: std::str::FromStr>(key: &str, current: T) -> T {
    match env_var(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            current
        }),
        None => current,
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix; credentials and endpoints use
    /// the `SPOTIFY_` prefix.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(name) = env_var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = env_var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }
        config.logging.log_path = env_var("MCP_LOG_PATH").map(PathBuf::from);

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        let spotify = &mut config.spotify;
        spotify.client_id = env_var("SPOTIFY_CLIENT_ID");
        spotify.client_secret = env_var("SPOTIFY_CLIENT_SECRET");
        spotify.redirect_uri = env_var("SPOTIFY_REDIRECT_URI").map(|uri| normalize_redirect_uri(&uri));
        spotify.refresh_token = env_var("SPOTIFY_REFRESH_TOKEN");
        spotify.access_token = env_var("SPOTIFY_ACCESS_TOKEN");
        if let Some(url) = env_var("SPOTIFY_API_BASE_URL") {
            spotify.api_base_url = url;
        }
        if let Some(url) = env_var("SPOTIFY_ACCOUNTS_URL") {
            spotify.accounts_url = url;
        }
        spotify.max_retries = env_parse("SPOTIFY_MAX_RETRIES", spotify.max_retries);

        let notifications = &mut config.notifications;
        notifications.enabled = env_parse("MCP_PLAYBACK_NOTIFICATIONS", notifications.enabled);
        notifications.poll_interval_secs =
            env_parse("MCP_PLAYBACK_POLL_SECS", notifications.poll_interval_secs);

        config
    }
}
