//! Saved tracks ("Liked Songs") listing tool.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::common::{ListingResult, TrackSummary, tool_route};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::pagination::{LIBRARY_PAGE_MAX, page_limit, paginate};
use crate::domains::tools::result::{into_call_result, structured_result};
use crate::spotify::{PageCursor, SpotifyApi};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct LikedSongsParams {
    #[schemars(description = "Items per request (default: 50, max: 50)")]
    #[serde(default)]
    pub page_size: Option<u32>,

    #[schemars(description = "Stop after at least this many items (default: all)")]
    #[serde(default)]
    pub max_items: Option<usize>,

    #[schemars(description = "Position of the first item to list (default: 0)")]
    #[serde(default)]
    pub offset: u32,
}

// ============================================================================
// Structured Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct LikedSong {
    pub added_at: Option<String>,
    pub track: TrackSummary,
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct LikedSongsTool;

impl LikedSongsTool {
    pub const NAME: &'static str = "spotify_liked_songs";

    pub const DESCRIPTION: &'static str = "List the current user's Liked Songs, most recently saved first. Pages through the library automatically; set max_items to stop early and offset to resume from next_offset.";

    #[instrument(skip_all, fields(max_items = ?params.max_items))]
    pub async fn execute(api: &dyn SpotifyApi, params: LikedSongsParams) -> CallToolResult {
        into_call_result(Self::run(api, params).await)
    }

    async fn run(api: &dyn SpotifyApi, params: LikedSongsParams) -> Result<CallToolResult, ToolError> {
        let limit = page_limit(params.page_size, LIBRARY_PAGE_MAX);
        let start = PageCursor::new(params.offset, limit);

        let result = match paginate("saved_tracks", start, params.max_items, |cursor| {
            api.saved_tracks(cursor)
        })
        .await
        {
            Ok(result) => result,
            Err(failure) => return Ok(failure.to_error_result()),
        };

        let listing = ListingResult::from(result.map(|saved| LikedSong {
            added_at: saved.added_at,
            track: TrackSummary::from(&saved.track),
        }));

        let summary = match listing.total {
            Some(total) => format!("Retrieved {} of {} liked song(s)", listing.count, total),
            None => format!("Retrieved {} liked song(s)", listing.count),
        };
        Ok(structured_result(summary, listing))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<LikedSongsParams>(),
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

    #[tokio::test]
    async fn test_lists_all_liked_songs() {
        let api = FakeSpotify::new().with_tracks(120);
        let result = LikedSongsTool::execute(&api, LikedSongsParams::default()).await;

        assert_eq!(result.is_error, Some(false));
        let body = result.structured_content.unwrap();
        assert_eq!(body["count"], 120);
        assert_eq!(body["total"], 120);
        assert_eq!(body["truncated"], false);
        assert_eq!(body["items"][0]["track"]["name"], "Track 0");
        assert_eq!(
            api.page_requests(),
            vec![
                PageCursor::new(0, 50),
                PageCursor::new(50, 50),
                PageCursor::new(100, 50)
            ]
        );
    }

    #[tokio::test]
    async fn test_max_items_truncates() {
        let api = FakeSpotify::new().with_tracks(500);
        let params = LikedSongsParams {
            page_size: Some(20),
            max_items: Some(30),
            offset: 0,
        };
        let result = LikedSongsTool::execute(&api, params).await;

        let body = result.structured_content.unwrap();
        assert_eq!(body["count"], 40);
        assert_eq!(body["truncated"], true);
        assert_eq!(body["has_more"], true);
        assert_eq!(body["next_offset"], 40);
    }

    #[tokio::test]
    async fn test_empty_library() {
        let api = FakeSpotify::new();
        let result = LikedSongsTool::execute(&api, LikedSongsParams::default()).await;
        let body = result.structured_content.unwrap();
        assert_eq!(body["count"], 0);
        assert_eq!(body["pages_fetched"], 1);
    }
}
