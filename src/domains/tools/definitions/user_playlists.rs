//! User playlists listing tool.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::common::{ListingResult, PlaylistSummary, tool_route};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::pagination::{LIBRARY_PAGE_MAX, page_limit, paginate};
use crate::domains::tools::result::{into_call_result, structured_result};
use crate::spotify::{PageCursor, SpotifyApi};

const DEFAULT_MAX_ITEMS: usize = 20;

// ============================================================================
// Tool Parameters
// ============================================================================

fn default_max_items() -> Option<usize> {
    Some(DEFAULT_MAX_ITEMS)
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UserPlaylistsParams {
    #[schemars(description = "User whose public playlists to list (default: current user)")]
    #[serde(default)]
    pub user_id: Option<String>,

    #[schemars(description = "Items per request (default: 50, max: 50)")]
    #[serde(default)]
    pub page_size: Option<u32>,

    #[schemars(description = "Stop after at least this many playlists (default: 20, null for all)")]
    #[serde(default = "default_max_items")]
    pub max_items: Option<usize>,

    #[schemars(description = "Position of the first playlist to list (default: 0)")]
    #[serde(default)]
    pub offset: u32,
}

// ============================================================================
// Structured Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct UserPlaylistsResult {
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub listing: ListingResult<PlaylistSummary>,
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct UserPlaylistsTool;

impl UserPlaylistsTool {
    pub const NAME: &'static str = "spotify_user_playlists";

    pub const DESCRIPTION: &'static str = "List the playlists of the current user, or the public playlists of another user. Returns up to max_items playlists (default 20) with names, IDs, owners and track counts.";

    #[instrument(skip_all, fields(user_id = ?params.user_id))]
    pub async fn execute(api: &dyn SpotifyApi, params: UserPlaylistsParams) -> CallToolResult {
        into_call_result(Self::run(api, params).await)
    }

    async fn run(
        api: &dyn SpotifyApi,
        params: UserPlaylistsParams,
    ) -> Result<CallToolResult, ToolError> {
        let user_id = params
            .user_id
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let limit = page_limit(params.page_size, LIBRARY_PAGE_MAX);
        let start = PageCursor::new(params.offset, limit);

        let result = match paginate("user_playlists", start, params.max_items, |cursor| {
            api.user_playlists(user_id.as_deref(), cursor)
        })
        .await
        {
            Ok(result) => result,
            Err(failure) => return Ok(failure.to_error_result()),
        };

        let listing = ListingResult::from(result.map(|p| PlaylistSummary::from(&p)));
        let summary = format!("Retrieved {} playlist(s)", listing.count);

        Ok(structured_result(summary, UserPlaylistsResult { user_id, listing }))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<UserPlaylistsParams>(),
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
    use crate::spotify::fake::FakeSpotify;

    fn params(json: serde_json::Value) -> UserPlaylistsParams {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_default_max_items() {
        let p = params(serde_json::json!({}));
        assert_eq!(p.max_items, Some(20));

        let p = params(serde_json::json!({ "max_items": null }));
        assert_eq!(p.max_items, None);
    }

    #[tokio::test]
    async fn test_default_listing_stops_after_first_page() {
        let api = FakeSpotify::new().with_playlists(120);
        let result = UserPlaylistsTool::execute(&api, params(serde_json::json!({}))).await;

        assert_eq!(result.is_error, Some(false));
        let body = result.structured_content.unwrap();
        assert_eq!(body["count"], 50);
        assert_eq!(body["truncated"], true);
        assert_eq!(body["items"][0]["name"], "Playlist 0");
        assert_eq!(body["items"][0]["owner"], "Test User");
        assert_eq!(api.calls(), vec!["user_playlists:me:0:50".to_string()]);
    }

    #[tokio::test]
    async fn test_all_playlists_of_other_user() {
        let api = FakeSpotify::new().with_playlists(120);
        let result = UserPlaylistsTool::execute(
            &api,
            params(serde_json::json!({ "user_id": "someone", "max_items": null })),
        )
        .await;

        let body = result.structured_content.unwrap();
        assert_eq!(body["user_id"], "someone");
        assert_eq!(body["count"], 120);
        assert_eq!(body["truncated"], false);
        assert_eq!(api.calls()[2], "user_playlists:someone:100:50");
    }
}
