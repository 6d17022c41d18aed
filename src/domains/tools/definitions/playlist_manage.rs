//! Playlist creation and details tool.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::{PlaylistSummary, tool_route};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::result::{into_call_result, structured_result};
use crate::spotify::SpotifyApi;
use crate::spotify::ids::parse_playlist_id;
use crate::spotify::models::PlaylistDetails;

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistManageAction {
    Create,
    UpdateDetails,
    Get,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlaylistManageParams {
    #[schemars(description = "Action: 'create', 'update_details' or 'get'")]
    pub action: PlaylistManageAction,

    #[schemars(description = "Playlist URI, URL or ID (required for 'update_details' and 'get')")]
    #[serde(default)]
    pub playlist_id: Option<String>,

    #[schemars(description = "Playlist name (required for 'create')")]
    #[serde(default)]
    pub name: Option<String>,

    #[schemars(description = "Playlist description")]
    #[serde(default)]
    pub description: Option<String>,

    #[schemars(description = "Whether the playlist is public")]
    #[serde(default)]
    pub public: Option<bool>,
}

// ============================================================================
// Structured Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlaylistManageResult {
    pub action: PlaylistManageAction,
    pub playlist: PlaylistSummary,
    pub snapshot_id: Option<String>,
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlaylistManageTool;

impl PlaylistManageTool {
    pub const NAME: &'static str = "spotify_playlist_manage";

    pub const DESCRIPTION: &'static str = "Create a playlist for the current user, change a playlist's name, description or visibility, or get a playlist's details. Use spotify_playlist_items to change the tracks of a playlist.";

    #[instrument(skip_all, fields(action = ?params.action))]
    pub async fn execute(api: &dyn SpotifyApi, params: PlaylistManageParams) -> CallToolResult {
        into_call_result(Self::run(api, params).await)
    }

    async fn run(
        api: &dyn SpotifyApi,
        params: PlaylistManageParams,
    ) -> Result<CallToolResult, ToolError> {
        let action = params.action;
        let details = PlaylistDetails {
            name: params.name.map(|n| n.trim().to_string()),
            description: params.description,
            public: params.public,
        };

        let (summary, playlist, snapshot_id) = match action {
            PlaylistManageAction::Create => {
                if details.name.as_deref().is_none_or(str::is_empty) {
                    return Err(ToolError::validation("name is required for 'create'"));
                }
                let user = api.current_user().await?;
                info!("Creating playlist for user {}", user.id);
                let playlist = api.create_playlist(&user.id, &details).await?;
                (
                    format!("Created playlist '{}'", playlist.name),
                    PlaylistSummary::from(&playlist),
                    playlist.snapshot_id,
                )
            }
            PlaylistManageAction::UpdateDetails => {
                let id = Self::playlist_id(params.playlist_id.as_deref(), "update_details")?;
                if details.name.is_none() && details.description.is_none() && details.public.is_none()
                {
                    return Err(ToolError::validation(
                        "Provide at least one of name, description or public",
                    ));
                }
                if details.name.as_deref() == Some("") {
                    return Err(ToolError::validation("name must not be empty"));
                }
                api.change_playlist_details(&id, &details).await?;
                let playlist = api.playlist(&id).await?;
                (
                    format!("Updated playlist '{}'", playlist.name),
                    PlaylistSummary::from(&playlist),
                    playlist.snapshot_id,
                )
            }
            PlaylistManageAction::Get => {
                let id = Self::playlist_id(params.playlist_id.as_deref(), "get")?;
                let playlist = api.playlist(&id).await?;
                let summary = PlaylistSummary::from(&playlist);
                (
                    format!(
                        "Playlist '{}' with {} track(s)",
                        summary.name,
                        summary.track_count.unwrap_or(0)
                    ),
                    summary,
                    playlist.snapshot_id,
                )
            }
        };

        Ok(structured_result(
            summary,
            PlaylistManageResult {
                action,
                playlist,
                snapshot_id,
            },
        ))
    }

    fn playlist_id(input: Option<&str>, action: &str) -> Result<String, ToolError> {
        let input = input.ok_or_else(|| {
            ToolError::validation(format!("playlist_id is required for '{}'", action))
        })?;
        Ok(parse_playlist_id(input)?)
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PlaylistManageParams>(),
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
    use crate::spotify::fake::{FakeSpotify, test_id};

    fn params(json: serde_json::Value) -> PlaylistManageParams {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn test_create_uses_current_user() {
        let api = FakeSpotify::new();
        let result = PlaylistManageTool::execute(
            &api,
            params(serde_json::json!({
                "action": "create",
                "name": "Road Trip",
                "description": "Songs for the drive",
                "public": false
            })),
        )
        .await;

        assert_eq!(result.is_error, Some(false));
        let body = result.structured_content.unwrap();
        assert_eq!(body["action"], "create");
        assert_eq!(body["playlist"]["name"], "Road Trip");
        assert_eq!(body["playlist"]["public"], false);
        assert_eq!(
            api.calls(),
            vec!["current_user".to_string(), "create_playlist:test_user".to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let api = FakeSpotify::new();
        let result =
            PlaylistManageTool::execute(&api, params(serde_json::json!({ "action": "create", "name": "  " })))
                .await;
        assert_eq!(
            result.structured_content.unwrap()["error"]["kind"],
            "ValidationError"
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_details() {
        let api = FakeSpotify::new();
        let result = PlaylistManageTool::execute(
            &api,
            params(serde_json::json!({
                "action": "update_details",
                "playlist_id": format!("spotify:playlist:{}", test_id(8)),
                "description": "New description"
            })),
        )
        .await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            api.calls(),
            vec![
                format!("change_playlist_details:{}", test_id(8)),
                format!("playlist:{}", test_id(8)),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_requires_a_change() {
        let api = FakeSpotify::new();
        let result = PlaylistManageTool::execute(
            &api,
            params(serde_json::json!({ "action": "update_details", "playlist_id": test_id(8) })),
        )
        .await;
        assert_eq!(result.is_error, Some(true));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_playlist() {
        let api = FakeSpotify::new().with_tracks(4);
        let result = PlaylistManageTool::execute(
            &api,
            params(serde_json::json!({ "action": "get", "playlist_id": test_id(2) })),
        )
        .await;

        let body = result.structured_content.unwrap();
        assert_eq!(body["playlist"]["track_count"], 4);
        assert_eq!(body["snapshot_id"], "snapshot-0");
    }

    #[tokio::test]
    async fn test_get_requires_playlist_id() {
        let api = FakeSpotify::new();
        let result =
            PlaylistManageTool::execute(&api, params(serde_json::json!({ "action": "get" }))).await;
        assert_eq!(
            result.structured_content.unwrap()["error"]["kind"],
            "ValidationError"
        );
    }
}
