//! Full playlist listing tool.

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
use crate::domains::tools::pagination::{PLAYLIST_ITEMS_PAGE_MAX, page_limit, paginate};
use crate::domains::tools::result::{into_call_result, structured_result};
use crate::spotify::ids::parse_playlist_id;
use crate::spotify::{PageCursor, SpotifyApi};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlaylistTracksParams {
    #[schemars(description = "Playlist URI, URL or ID")]
    pub playlist_id: String,

    #[schemars(description = "Items per request (default: 100, max: 100)")]
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
pub struct PlaylistTrackEntry {
    /// Zero-based position in the playlist.
    pub position: u32,
    pub added_at: Option<String>,
    /// `None` for items no longer available in the catalog.
    pub track: Option<TrackSummary>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlaylistTracksResult {
    pub playlist_id: String,
    #[serde(flatten)]
    pub listing: ListingResult<PlaylistTrackEntry>,
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlaylistTracksTool;

impl PlaylistTracksTool {
    pub const NAME: &'static str = "spotify_playlist_tracks";

    pub const DESCRIPTION: &'static str = "List the tracks of a playlist of any size. Pages through the playlist automatically; set max_items to stop early and offset to resume from next_offset.";

    #[instrument(skip_all, fields(playlist_id = %params.playlist_id))]
    pub async fn execute(api: &dyn SpotifyApi, params: PlaylistTracksParams) -> CallToolResult {
        into_call_result(Self::run(api, params).await)
    }

    async fn run(
        api: &dyn SpotifyApi,
        params: PlaylistTracksParams,
    ) -> Result<CallToolResult, ToolError> {
        let playlist_id = parse_playlist_id(&params.playlist_id)?;
        let limit = page_limit(params.page_size, PLAYLIST_ITEMS_PAGE_MAX);
        let start = PageCursor::new(params.offset, limit);

        let result = match paginate("playlist_items", start, params.max_items, |cursor| {
            api.playlist_items(&playlist_id, cursor)
        })
        .await
        {
            Ok(result) => result,
            Err(failure) => return Ok(failure.to_error_result()),
        };

        let mut position = params.offset;
        let listing = ListingResult::from(result.map(|item| {
            let entry = PlaylistTrackEntry {
                position,
                added_at: item.added_at,
                track: item.track.as_ref().map(TrackSummary::from),
            };
            position += 1;
            entry
        }));

        let summary = if listing.truncated {
            format!(
                "Retrieved {} playlist item(s), more available from offset {}",
                listing.count,
                listing.next_offset.unwrap_or_default()
            )
        } else {
            format!("Retrieved {} playlist item(s)", listing.count)
        };

        Ok(structured_result(
            summary,
            PlaylistTracksResult {
                playlist_id,
                listing,
            },
        ))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PlaylistTracksParams>(),
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
