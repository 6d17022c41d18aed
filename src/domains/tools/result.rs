//! Tool result shaping.
//!
//! Every tool answers with a one-line text summary plus a JSON object in
//! `structured_content`. Failures use the same envelope with `is_error` set
//! and an `error` object carrying the kind tag.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use tracing::warn;

use super::error::ToolError;

/// Successful result: summary text plus structured payload.
pub fn structured_result<T: Serialize>(summary: impl Into<String>, data: T) -> CallToolResult {
    match serde_json::to_value(data) {
        Ok(value) => CallToolResult {
            content: vec![Content::text(summary.into())],
            structured_content: Some(value),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => error_result(&ToolError::internal(format!(
            "failed to serialize result: {}",
            e
        ))),
    }
}

/// Error result with a kind-tagged `error` object.
pub fn error_result(err: &ToolError) -> CallToolResult {
    warn!(kind = err.kind().as_str(), "{}", err);
    error_payload(err, None)
}

/// Error result that also carries the partial outcome produced before failing.
pub fn error_result_with<T: Serialize>(err: &ToolError, partial: T) -> CallToolResult {
    warn!(kind = err.kind().as_str(), "{}", err);
    error_payload(err, serde_json::to_value(partial).ok())
}

fn error_payload(err: &ToolError, outcome: Option<serde_json::Value>) -> CallToolResult {
    let message = err.to_string();
    let mut body = serde_json::json!({
        "error": {
            "kind": err.kind(),
            "message": message,
            "details": err.details(),
            "suggestion": err.suggestion(),
        }
    });
    if let Some(outcome) = outcome {
        body["outcome"] = outcome;
    }

    CallToolResult {
        content: vec![Content::text(format!("Error: {}", message))],
        structured_content: Some(body),
        is_error: Some(true),
        meta: None,
    }
}

/// Collapse a handler outcome into a result.
pub fn into_call_result(result: Result<CallToolResult, ToolError>) -> CallToolResult {
    result.unwrap_or_else(|err| error_result(&err))
}
