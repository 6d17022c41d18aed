//! Typed failures for Spotify API calls.
//!
//! HTTP responses are converted into [`SpotifyError`] as soon as they are
//! received, so callers never inspect raw status codes.

use serde::Deserialize;
use thiserror::Error;

/// Result type for Spotify API operations.
pub type SpotifyResult<T> = std::result::Result<T, SpotifyError>;

/// Why Spotify refused an otherwise valid request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForbiddenReason {
    /// The operation needs a Premium subscription.
    PremiumRequired,
    /// The token lacks a required OAuth scope.
    InsufficientScope,
    /// The content or action is restricted.
    Restricted,
}

/// Errors returned by the Spotify API client.
#[derive(Debug, Clone, Error)]
pub enum SpotifyError {
    /// The access token is missing, invalid or expired.
    #[error("Authentication with Spotify failed: {message}")]
    Auth { message: String, token_expired: bool },

    /// Too many requests; `retry_after` is in seconds when Spotify sent it.
    #[error("Spotify API rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },

    /// The requested item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Spotify rejected the request parameters.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Spotify refused the operation.
    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
        reason: ForbiddenReason,
    },

    /// No device is available for playback commands.
    #[error("No active Spotify device found")]
    NoActiveDevice,

    /// 5xx responses, timeouts and connection failures.
    #[error("Spotify API is temporarily unavailable: {0}")]
    Unavailable(String),

    /// The response body could not be decoded.
    #[error("Unexpected response from Spotify: {0}")]
    Decode(String),

    /// Missing credentials or an unusable client setup.
    #[error("Spotify client is not configured: {0}")]
    Config(String),

    /// Any other status code.
    #[error("Spotify API error ({status}): {message}")]
    Api { status: u16, message: String },
}

/// Regular API error body: `{"error": {"status": 404, "message": "..."}}`.
/// The accounts service uses `{"error": "invalid_grant", "error_description": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Api { error: ApiErrorDetail },
    Accounts {
        error: String,
        #[serde(default)]
        error_description: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::Api { error }) => error.message,
        Ok(ErrorBody::Accounts {
            error,
            error_description,
        }) => error_description.unwrap_or(error),
        Err(_) => body.trim().to_string(),
    }
}

impl SpotifyError {
    /// Build an error from a non-success HTTP response.
    pub fn from_status(status: u16, body: &str, retry_after: Option<u64>) -> Self {
        let message = extract_message(body);
        let lower = message.to_lowercase();

        if lower.contains("no active device") || lower.contains("device not found") {
            return Self::NoActiveDevice;
        }

        match status {
            400 => Self::Validation(message),
            401 => Self::Auth {
                token_expired: lower.contains("expired"),
                message,
            },
            403 => {
                let reason = if lower.contains("premium") {
                    ForbiddenReason::PremiumRequired
                } else if lower.contains("scope") {
                    ForbiddenReason::InsufficientScope
                } else {
                    ForbiddenReason::Restricted
                };
                Self::Forbidden { message, reason }
            }
            404 => Self::NotFound(message),
            429 => Self::RateLimited { retry_after },
            s if s >= 500 => Self::Unavailable(format!("status {}: {}", s, message)),
            s => Self::Api { status: s, message },
        }
    }

    /// Convert a transport-level reqwest failure.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Unavailable("request timed out".to_string())
        } else if err.is_connect() {
            Self::Unavailable(format!("connection failed: {}", err))
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Unavailable(err.to_string())
        }
    }

    /// Whether the client may retry the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Unavailable(_))
    }

    /// A hint for the user on how to resolve the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Auth {
                token_expired: true,
                ..
            } => Some("Please re-authenticate with Spotify"),
            Self::Auth { .. } => Some("Check your Spotify API credentials"),
            Self::RateLimited { .. } => Some("Wait a moment before making more requests"),
            Self::NotFound(_) => Some("Check the ID and try again"),
            Self::Validation(_) => Some("Check the input parameters and try again"),
            Self::Forbidden {
                reason: ForbiddenReason::PremiumRequired,
                ..
            } => Some("Upgrade to Spotify Premium to use playback features"),
            Self::Forbidden {
                reason: ForbiddenReason::InsufficientScope,
                ..
            } => Some("Re-authenticate with required scopes"),
            Self::NoActiveDevice => Some("Open Spotify on a device to start playback"),
            Self::Unavailable(_) => Some("Try again in a few minutes"),
            Self::Config(_) => {
                Some("Set SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET and SPOTIFY_REFRESH_TOKEN")
            }
            _ => None,
        }
    }
}
