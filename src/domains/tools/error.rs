//! Tool-specific error types.

use serde::Serialize;
use thiserror::Error;

use crate::spotify::{ForbiddenReason, IdError, SpotifyError};

/// Serialized error kind reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ValidationError,
    RemoteAuthError,
    RemoteRateLimitError,
    RemoteNotFoundError,
    RemoteForbiddenError,
    NoActiveDevice,
    RemoteUnavailableError,
    PartialBatchFailure,
    UnknownError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "ValidationError",
            Self::RemoteAuthError => "RemoteAuthError",
            Self::RemoteRateLimitError => "RemoteRateLimitError",
            Self::RemoteNotFoundError => "RemoteNotFoundError",
            Self::RemoteForbiddenError => "RemoteForbiddenError",
            Self::NoActiveDevice => "NoActiveDevice",
            Self::RemoteUnavailableError => "RemoteUnavailableError",
            Self::PartialBatchFailure => "PartialBatchFailure",
            Self::UnknownError => "UnknownError",
        }
    }
}

impl From<&SpotifyError> for ErrorKind {
    fn from(err: &SpotifyError) -> Self {
        match err {
            SpotifyError::Auth { .. } | SpotifyError::Config(_) => Self::RemoteAuthError,
            SpotifyError::RateLimited { .. } => Self::RemoteRateLimitError,
            SpotifyError::NotFound(_) => Self::RemoteNotFoundError,
            SpotifyError::Validation(_) => Self::ValidationError,
            SpotifyError::Forbidden { .. } => Self::RemoteForbiddenError,
            SpotifyError::NoActiveDevice => Self::NoActiveDevice,
            SpotifyError::Unavailable(_) => Self::RemoteUnavailableError,
            SpotifyError::Decode(_) | SpotifyError::Api { .. } => Self::UnknownError,
        }
    }
}

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Arguments were well-formed JSON but semantically invalid.
    #[error("{0}")]
    Validation(String),

    /// The Spotify API call failed.
    #[error(transparent)]
    Remote(#[from] SpotifyError),

    /// A batch stopped after some chunks had already been applied.
    #[error("Batch stopped at chunk {failed_chunk} after {succeeded} item(s) succeeded: {source}")]
    PartialBatch {
        succeeded: usize,
        failed_chunk: usize,
        chunks_planned: usize,
        #[source]
        source: SpotifyError,
    },

    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "validation" error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Kind tag reported to clients.
    ///
    /// A partial batch reports the kind of the error that stopped it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidArguments(_) => ErrorKind::ValidationError,
            Self::Remote(err) => err.into(),
            Self::PartialBatch { source, .. } => source.into(),
            Self::NotFound(_) | Self::Internal(_) => ErrorKind::UnknownError,
        }
    }

    /// Hint for resolving the error, if any.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Validation(_) | Self::InvalidArguments(_) => {
                Some("Check the input parameters and try again")
            }
            Self::Remote(err) | Self::PartialBatch { source: err, .. } => err.suggestion(),
            Self::NotFound(_) | Self::Internal(_) => None,
        }
    }

    /// Structured details attached to the error payload.
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::Remote(SpotifyError::RateLimited {
                retry_after: Some(secs),
            }) => serde_json::json!({ "retry_after": secs }),
            Self::Remote(SpotifyError::Forbidden { reason, .. }) => {
                serde_json::json!({ "reason": forbidden_reason(*reason) })
            }
            Self::Remote(SpotifyError::Api { status, .. }) => {
                serde_json::json!({ "status": status })
            }
            Self::PartialBatch {
                succeeded,
                failed_chunk,
                chunks_planned,
                source,
            } => serde_json::json!({
                "partial": {
                    "kind": ErrorKind::PartialBatchFailure,
                    "succeeded": succeeded,
                    "failed_chunk": failed_chunk,
                    "chunks_planned": chunks_planned,
                    "cause_kind": ErrorKind::from(source),
                }
            }),
            _ => serde_json::json!({}),
        }
    }
}

fn forbidden_reason(reason: ForbiddenReason) -> &'static str {
    match reason {
        ForbiddenReason::PremiumRequired => "premium_required",
        ForbiddenReason::InsufficientScope => "insufficient_scope",
        ForbiddenReason::Restricted => "restricted",
    }
}

impl From<IdError> for ToolError {
    fn from(err: IdError) -> Self {
        Self::Validation(err.to_string())
    }
}
