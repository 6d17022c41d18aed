//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - `ToolCall`, the typed variant over every known tool
//! - Dispatch by name for the HTTP transport
//! - Tool metadata for listing

use std::sync::Arc;
use tracing::warn;

use rmcp::model::{CallToolResult, JsonObject, Tool};

use super::definitions::common::parse_arguments;
use super::definitions::{
    GetInfoParams, GetInfoTool, LikedSongsParams, LikedSongsTool, PlaybackParams, PlaybackTool,
    PlaylistCoverParams, PlaylistCoverTool, PlaylistItemsParams, PlaylistItemsTool,
    PlaylistManageParams, PlaylistManageTool, PlaylistTracksParams, PlaylistTracksTool,
    QueueParams, QueueTool, SearchParams, SearchTool, UserPlaylistsParams, UserPlaylistsTool,
};
use super::error::ToolError;
use crate::spotify::SpotifyApi;

// ============================================================================
// Tool Call
// ============================================================================

/// A parsed call to one of the known tools.
#[derive(Debug, Clone)]
pub enum ToolCall {
    Playback(PlaybackParams),
    Search(SearchParams),
    Queue(QueueParams),
    GetInfo(GetInfoParams),
    PlaylistManage(PlaylistManageParams),
    PlaylistItems(PlaylistItemsParams),
    PlaylistTracks(PlaylistTracksParams),
    LikedSongs(LikedSongsParams),
    UserPlaylists(UserPlaylistsParams),
    PlaylistCover(PlaylistCoverParams),
}

impl ToolCall {
    /// Resolve a tool name and decode its arguments.
    pub fn parse(name: &str, arguments: JsonObject) -> Result<Self, ToolError> {
        let call = match name {
            PlaybackTool::NAME => Self::Playback(parse_arguments(arguments)?),
            SearchTool::NAME => Self::Search(parse_arguments(arguments)?),
            QueueTool::NAME => Self::Queue(parse_arguments(arguments)?),
            GetInfoTool::NAME => Self::GetInfo(parse_arguments(arguments)?),
            PlaylistManageTool::NAME => Self::PlaylistManage(parse_arguments(arguments)?),
            PlaylistItemsTool::NAME => Self::PlaylistItems(parse_arguments(arguments)?),
            PlaylistTracksTool::NAME => Self::PlaylistTracks(parse_arguments(arguments)?),
            LikedSongsTool::NAME => Self::LikedSongs(parse_arguments(arguments)?),
            UserPlaylistsTool::NAME => Self::UserPlaylists(parse_arguments(arguments)?),
            PlaylistCoverTool::NAME => Self::PlaylistCover(parse_arguments(arguments)?),
            _ => {
                warn!("Unknown tool requested: {}", name);
                return Err(ToolError::not_found(name));
            }
        };
        Ok(call)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Playback(_) => PlaybackTool::NAME,
            Self::Search(_) => SearchTool::NAME,
            Self::Queue(_) => QueueTool::NAME,
            Self::GetInfo(_) => GetInfoTool::NAME,
            Self::PlaylistManage(_) => PlaylistManageTool::NAME,
            Self::PlaylistItems(_) => PlaylistItemsTool::NAME,
            Self::PlaylistTracks(_) => PlaylistTracksTool::NAME,
            Self::LikedSongs(_) => LikedSongsTool::NAME,
            Self::UserPlaylists(_) => UserPlaylistsTool::NAME,
            Self::PlaylistCover(_) => PlaylistCoverTool::NAME,
        }
    }

    /// Run the call. Failures are reported inside the result.
    pub async fn dispatch(self, api: &dyn SpotifyApi) -> CallToolResult {
        match self {
            Self::Playback(p) => PlaybackTool::execute(api, p).await,
            Self::Search(p) => SearchTool::execute(api, p).await,
            Self::Queue(p) => QueueTool::execute(api, p).await,
            Self::GetInfo(p) => GetInfoTool::execute(api, p).await,
            Self::PlaylistManage(p) => PlaylistManageTool::execute(api, p).await,
            Self::PlaylistItems(p) => PlaylistItemsTool::execute(api, p).await,
            Self::PlaylistTracks(p) => PlaylistTracksTool::execute(api, p).await,
            Self::LikedSongs(p) => LikedSongsTool::execute(api, p).await,
            Self::UserPlaylists(p) => UserPlaylistsTool::execute(api, p).await,
            Self::PlaylistCover(p) => PlaylistCoverTool::execute(api, p).await,
        }
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching tool calls outside the rmcp router (HTTP transport)
pub struct ToolRegistry {
    api: Arc<dyn SpotifyApi>,
}

impl ToolRegistry {
    /// Create a new tool registry backed by `api`.
    pub fn new(api: Arc<dyn SpotifyApi>) -> Self {
        Self { api }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            PlaybackTool::NAME,
            SearchTool::NAME,
            QueueTool::NAME,
            GetInfoTool::NAME,
            PlaylistManageTool::NAME,
            PlaylistItemsTool::NAME,
            PlaylistTracksTool::NAME,
            LikedSongsTool::NAME,
            UserPlaylistsTool::NAME,
            PlaylistCoverTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            PlaybackTool::to_tool(),
            SearchTool::to_tool(),
            QueueTool::to_tool(),
            GetInfoTool::to_tool(),
            PlaylistManageTool::to_tool(),
            PlaylistItemsTool::to_tool(),
            PlaylistTracksTool::to_tool(),
            LikedSongsTool::to_tool(),
            UserPlaylistsTool::to_tool(),
            PlaylistCoverTool::to_tool(),
        ]
    }

    /// Dispatch a tool call by name.
    ///
    /// Unknown tools and malformed arguments are errors; failures inside a
    /// tool come back as an error result.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<CallToolResult, ToolError> {
        let call = ToolCall::parse(name, arguments)?;
        Ok(call.dispatch(self.api.as_ref()).await)
    }
}
