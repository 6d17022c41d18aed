//! Spotify playback queue tool.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::{TrackSummary, resolve_device, tool_route, track_label};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::result::{into_call_result, structured_result};
use crate::spotify::{SpotifyApi, TrackRef};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum QueueAction {
    Add,
    Get,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct QueueParams {
    #[schemars(description = "Action: 'add' (queue track_id) or 'get' (show the queue)")]
    pub action: QueueAction,

    #[schemars(description = "Track or episode to queue with 'add' (URI, URL or ID)")]
    #[serde(default)]
    pub track_id: Option<String>,
}

// ============================================================================
// Structured Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct QueueResult {
    pub action: QueueAction,
    pub status: String,
    pub currently_playing: Option<TrackSummary>,
    pub queue: Vec<TrackSummary>,
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct QueueTool;

impl QueueTool {
    pub const NAME: &'static str = "spotify_queue";

    pub const DESCRIPTION: &'static str = "Manage the Spotify playback queue. 'add' appends a track to the queue of the active device (or the first available one). 'get' lists the currently playing track and the upcoming queue.";

    #[instrument(skip_all, fields(action = ?params.action))]
    pub async fn execute(api: &dyn SpotifyApi, params: QueueParams) -> CallToolResult {
        into_call_result(Self::run(api, params).await)
    }

    async fn run(api: &dyn SpotifyApi, params: QueueParams) -> Result<CallToolResult, ToolError> {
        let status = match params.action {
            QueueAction::Add => {
                let track = params
                    .track_id
                    .as_deref()
                    .ok_or_else(|| ToolError::validation("track_id is required for 'add'"))?;
                let uri = TrackRef::parse(track)?.uri();

                let device = resolve_device(api).await?;
                info!("Adding {} to queue", uri);
                api.add_to_queue(&uri, device.as_deref()).await?;
                format!("Added {} to the queue", uri)
            }
            QueueAction::Get => "ok".to_string(),
        };

        let queue = api.queue().await?;
        let currently_playing = queue.currently_playing.as_ref().map(TrackSummary::from);
        let upcoming: Vec<TrackSummary> = queue.queue.iter().map(TrackSummary::from).collect();

        let summary = match params.action {
            QueueAction::Add => status.clone(),
            QueueAction::Get => match &queue.currently_playing {
                Some(track) => format!(
                    "Now playing: {}, {} track(s) queued",
                    track_label(track),
                    upcoming.len()
                ),
                None => format!("{} track(s) queued", upcoming.len()),
            },
        };

        Ok(structured_result(
            summary,
            QueueResult {
                action: params.action,
                status,
                currently_playing,
                queue: upcoming,
            },
        ))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<QueueParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(api: Arc<dyn SpotifyApi>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        tool_route(Self::to_tool(), api, |api, params| async move {
            Self::execute(api.as_ref(), params).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::fake::{FakeSpotify, test_device, test_track, test_uri};
    use crate::spotify::models::Queue;

    fn params(json: serde_json::Value) -> QueueParams {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn test_get_queue() {
        let mut api = FakeSpotify::new();
        api.queue = Queue {
            currently_playing: Some(test_track(1)),
            queue: vec![test_track(2), test_track(3)],
        };

        let result = QueueTool::execute(&api, params(serde_json::json!({ "action": "get" }))).await;
        assert_eq!(result.is_error, Some(false));

        let body = result.structured_content.unwrap();
        assert_eq!(body["action"], "get");
        assert_eq!(body["currently_playing"]["name"], "Track 1");
        assert_eq!(body["queue"].as_array().unwrap().len(), 2);
        assert_eq!(api.calls(), vec!["queue".to_string()]);
    }

    #[tokio::test]
    async fn test_add_to_queue_active_device() {
        let api = FakeSpotify::new().with_devices(vec![test_device("Laptop", true)]);
        let result = QueueTool::execute(
            &api,
            params(serde_json::json!({ "action": "add", "track_id": test_uri(5) })),
        )
        .await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            api.calls(),
            vec![
                "devices".to_string(),
                format!("add_to_queue:{}:-", test_uri(5)),
                "queue".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_add_requires_track() {
        let api = FakeSpotify::new();
        let result = QueueTool::execute(&api, params(serde_json::json!({ "action": "add" }))).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.structured_content.unwrap()["error"]["kind"],
            "ValidationError"
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_add_without_devices() {
        let api = FakeSpotify::new();
        let result = QueueTool::execute(
            &api,
            params(serde_json::json!({ "action": "add", "track_id": test_uri(1) })),
        )
        .await;
        assert_eq!(
            result.structured_content.unwrap()["error"]["kind"],
            "NoActiveDevice"
        );
    }
}
