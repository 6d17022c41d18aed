//! Resource-specific error types.

use rmcp::ErrorData as McpError;
use thiserror::Error;

use crate::domains::tools::ErrorKind;
use crate::spotify::SpotifyError;

/// Errors that can occur during resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The resource URI is invalid.
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// Fetching the resource from Spotify failed.
    #[error(transparent)]
    Remote(#[from] SpotifyError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResourceError {
    /// Create a new "not found" error.
    pub fn not_found(uri: impl Into<String>) -> Self {
        Self::NotFound(uri.into())
    }

    /// Create a new "invalid URI" error.
    pub fn invalid_uri(uri: impl Into<String>) -> Self {
        Self::InvalidUri(uri.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<serde_json::Error> for ResourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ResourceError> for McpError {
    fn from(err: ResourceError) -> Self {
        match &err {
            ResourceError::NotFound(_) | ResourceError::InvalidUri(_) => {
                McpError::resource_not_found(err.to_string(), None)
            }
            ResourceError::Remote(remote) => McpError::internal_error(
                err.to_string(),
                Some(serde_json::json!({ "kind": ErrorKind::from(remote) })),
            ),
            ResourceError::Internal(_) => McpError::internal_error(err.to_string(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::ErrorCode;

    #[test]
    fn test_not_found_maps_to_resource_not_found() {
        let err: McpError = ResourceError::not_found("spotify://nope").into();
        assert_eq!(err.code, ErrorCode::RESOURCE_NOT_FOUND);
        assert!(err.message.contains("spotify://nope"));
    }

    #[test]
    fn test_remote_error_carries_kind() {
        let err: McpError = ResourceError::from(SpotifyError::RateLimited {
            retry_after: Some(3),
        })
        .into();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(err.data.unwrap()["kind"], "RemoteRateLimitError");
    }
}
