//! Playlist item mutation tool.
//!
//! `add`, `remove` and `replace` accept any number of items and go through the
//! batch planner; `reorder` moves a contiguous range in a single call. When a
//! batch stops partway, the error payload carries the batch outcome so the
//! caller knows how many items were applied.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::tool_route;
use crate::domains::tools::batch::{BatchOperation, BatchRequest, run_batch};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::result::{error_result_with, into_call_result, structured_result};
use crate::spotify::SpotifyApi;
use crate::spotify::ids::{parse_playlist_id, parse_track_refs};
use crate::spotify::models::Reorder;

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistItemsAction {
    Add,
    Remove,
    Replace,
    Reorder,
}

impl PlaylistItemsAction {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
            Self::Reorder => "reorder",
        }
    }
}

fn default_range_length() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlaylistItemsParams {
    #[schemars(description = "Action: 'add', 'remove', 'replace' or 'reorder'")]
    pub action: PlaylistItemsAction,

    #[schemars(description = "Playlist URI, URL or ID")]
    pub playlist_id: String,

    #[schemars(
        description = "Track or episode URIs, URLs or IDs for 'add', 'remove' and 'replace'. Any number of items; large lists are sent in chunks of 100."
    )]
    #[serde(default)]
    pub uris: Vec<String>,

    #[schemars(description = "Zero-based insert position for 'add' (default: append)")]
    #[serde(default)]
    pub position: Option<u32>,

    #[schemars(description = "Playlist snapshot to apply 'remove' or 'reorder' against")]
    #[serde(default)]
    pub snapshot_id: Option<String>,

    #[schemars(description = "Position of the first item to move with 'reorder'")]
    #[serde(default)]
    pub range_start: Option<u32>,

    #[schemars(description = "Position to move the items before with 'reorder'")]
    #[serde(default)]
    pub insert_before: Option<u32>,

    #[schemars(description = "Number of items to move with 'reorder' (default: 1)")]
    #[serde(default = "default_range_length")]
    pub range_length: u32,
}

// ============================================================================
// Structured Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlaylistItemsResult {
    pub action: PlaylistItemsAction,
    pub playlist_id: String,
    pub items_processed: usize,
    pub chunks_issued: usize,
    pub snapshot_id: Option<String>,
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlaylistItemsTool;

impl PlaylistItemsTool {
    pub const NAME: &'static str = "spotify_playlist_items";

    pub const DESCRIPTION: &'static str = "Add, remove, replace or reorder the tracks of a playlist. Accepts any number of tracks: large lists are sent in chunks of 100 and, if a chunk fails, the result reports how many tracks were applied before the failure. 'replace' overwrites the whole playlist. 'reorder' moves range_length items starting at range_start before insert_before.";

    #[instrument(skip_all, fields(action = params.action.as_str(), playlist_id = %params.playlist_id, items = params.uris.len()))]
    pub async fn execute(api: &dyn SpotifyApi, params: PlaylistItemsParams) -> CallToolResult {
        into_call_result(Self::run(api, params).await)
    }

    async fn run(
        api: &dyn SpotifyApi,
        params: PlaylistItemsParams,
    ) -> Result<CallToolResult, ToolError> {
        let action = params.action;
        let playlist_id = parse_playlist_id(&params.playlist_id)?;

        let operation = match action {
            PlaylistItemsAction::Add => BatchOperation::Add,
            PlaylistItemsAction::Remove => BatchOperation::Remove,
            PlaylistItemsAction::Replace => BatchOperation::Replace,
            PlaylistItemsAction::Reorder => return Self::reorder(api, playlist_id, &params).await,
        };

        if operation == BatchOperation::Replace && params.uris.is_empty() {
            return Err(ToolError::validation("uris must be a non-empty list for 'replace'"));
        }
        let items = parse_track_refs(&params.uris)?;

        let request = BatchRequest::new(playlist_id, operation, items)
            .with_position(params.position)
            .with_snapshot(params.snapshot_id);
        request
            .check_position()
            .map_err(|e| ToolError::validation(e.to_string()))?;
        let outcome = run_batch(api, &request).await;

        if let Some(err) = outcome.error() {
            return Ok(error_result_with(&err, &outcome));
        }

        let summary = match action {
            PlaylistItemsAction::Add => format!("Added {} item(s) to the playlist", outcome.items_processed),
            PlaylistItemsAction::Remove => {
                format!("Removed {} item(s) from the playlist", outcome.items_processed)
            }
            _ => format!("Replaced playlist contents with {} item(s)", outcome.items_processed),
        };

        Ok(structured_result(
            summary,
            PlaylistItemsResult {
                action,
                playlist_id: outcome.playlist_id,
                items_processed: outcome.items_processed,
                chunks_issued: outcome.chunks_issued,
                snapshot_id: outcome.snapshot_id,
            },
        ))
    }

    async fn reorder(
        api: &dyn SpotifyApi,
        playlist_id: String,
        params: &PlaylistItemsParams,
    ) -> Result<CallToolResult, ToolError> {
        let (Some(range_start), Some(insert_before)) = (params.range_start, params.insert_before)
        else {
            return Err(ToolError::validation(
                "range_start and insert_before are required for 'reorder'",
            ));
        };
        if params.range_length == 0 {
            return Err(ToolError::validation("range_length must be at least 1"));
        }

        let reorder = Reorder {
            range_start,
            insert_before,
            range_length: params.range_length,
            snapshot_id: params.snapshot_id.clone(),
        };
        info!(
            "Moving {} item(s) from {} before {}",
            reorder.range_length, reorder.range_start, reorder.insert_before
        );
        let snapshot = api.reorder_playlist_items(&playlist_id, &reorder).await?;

        Ok(structured_result(
            format!("Moved {} item(s) in the playlist", reorder.range_length),
            PlaylistItemsResult {
                action: PlaylistItemsAction::Reorder,
                playlist_id,
                items_processed: reorder.range_length as usize,
                chunks_issued: 1,
                snapshot_id: Some(snapshot),
            },
        ))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PlaylistItemsParams>(),
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
