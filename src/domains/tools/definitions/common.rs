//! Common utilities shared across Spotify tools.
//!
//! This module provides the summary types every tool reports, device
//! selection for player commands, argument parsing and the route builder.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domains::tools::error::ToolError;
use crate::domains::tools::pagination::PaginationResult;
use crate::spotify::models::{
    Artist, Device, PlaybackState, Playlist, SimplifiedAlbum, SimplifiedPlaylist, Track,
};
use crate::spotify::{SpotifyApi, SpotifyError, SpotifyResult};

// ============================================================================
// Structured Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TrackSummary {
    pub name: String,
    pub id: Option<String>,
    pub uri: Option<String>,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub duration: String,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub explicit: bool,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            name: track.name.clone(),
            id: track.id.clone(),
            uri: track.uri.clone(),
            artists: track.artists.iter().map(|a| a.name.clone()).collect(),
            album: track.album.as_ref().map(|a| a.name.clone()),
            duration: format_duration(track.duration_ms),
            duration_ms: track.duration_ms,
            explicit: track.explicit,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AlbumSummary {
    pub name: String,
    pub id: Option<String>,
    pub artists: Vec<String>,
    pub release_date: Option<String>,
    pub total_tracks: Option<u32>,
}

impl From<&SimplifiedAlbum> for AlbumSummary {
    fn from(album: &SimplifiedAlbum) -> Self {
        Self {
            name: album.name.clone(),
            id: album.id.clone(),
            artists: album.artists.iter().map(|a| a.name.clone()).collect(),
            release_date: album.release_date.clone(),
            total_tracks: album.total_tracks,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ArtistSummary {
    pub name: String,
    pub id: String,
    pub genres: Vec<String>,
    pub popularity: Option<u32>,
    pub followers: Option<u64>,
}

impl From<&Artist> for ArtistSummary {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            id: artist.id.clone(),
            genres: artist.genres.clone(),
            popularity: artist.popularity,
            followers: artist.followers.as_ref().map(|f| f.total),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlaylistSummary {
    pub name: String,
    pub id: String,
    pub uri: String,
    pub owner: Option<String>,
    pub description: Option<String>,
    pub public: Option<bool>,
    pub track_count: Option<u32>,
}

impl From<&SimplifiedPlaylist> for PlaylistSummary {
    fn from(playlist: &SimplifiedPlaylist) -> Self {
        Self {
            name: playlist.name.clone(),
            id: playlist.id.clone(),
            uri: playlist.uri.clone(),
            owner: playlist
                .owner
                .display_name
                .clone()
                .or_else(|| Some(playlist.owner.id.clone()).filter(|id| !id.is_empty())),
            description: playlist.description.clone().filter(|d| !d.is_empty()),
            public: playlist.public,
            track_count: playlist.tracks.as_ref().map(|t| t.total),
        }
    }
}

impl From<&Playlist> for PlaylistSummary {
    fn from(playlist: &Playlist) -> Self {
        Self {
            name: playlist.name.clone(),
            id: playlist.id.clone(),
            uri: playlist.uri.clone(),
            owner: playlist
                .owner
                .display_name
                .clone()
                .or_else(|| Some(playlist.owner.id.clone()).filter(|id| !id.is_empty())),
            description: playlist.description.clone().filter(|d| !d.is_empty()),
            public: playlist.public,
            track_count: playlist.tracks.total,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DeviceSummary {
    pub id: Option<String>,
    pub name: String,
    pub device_type: String,
    pub is_active: bool,
    pub volume_percent: Option<u32>,
}

impl From<&Device> for DeviceSummary {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            device_type: device.device_type.clone(),
            is_active: device.is_active,
            volume_percent: device.volume_percent,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlaybackSummary {
    pub is_playing: bool,
    pub track: Option<TrackSummary>,
    pub device: Option<DeviceSummary>,
    pub progress: Option<String>,
    pub progress_ms: Option<u64>,
    pub shuffle: bool,
    pub repeat: String,
}

impl From<&PlaybackState> for PlaybackSummary {
    fn from(state: &PlaybackState) -> Self {
        Self {
            is_playing: state.is_playing,
            track: state.item.as_ref().map(TrackSummary::from),
            device: state.device.as_ref().map(DeviceSummary::from),
            progress: state.progress_ms.map(format_duration),
            progress_ms: state.progress_ms,
            shuffle: state.shuffle_state,
            repeat: state.repeat_state.clone(),
        }
    }
}

/// Items gathered by a paginated listing.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListingResult<T> {
    pub items: Vec<T>,
    pub count: usize,
    /// The item cap stopped the listing before the end of the collection.
    pub truncated: bool,
    pub has_more: bool,
    /// Offset to resume from when `has_more` is set.
    pub next_offset: Option<u32>,
    pub total: Option<u32>,
    pub pages_fetched: usize,
}

impl<T> From<PaginationResult<T>> for ListingResult<T> {
    fn from(result: PaginationResult<T>) -> Self {
        Self {
            count: result.items.len(),
            items: result.items,
            truncated: result.truncated,
            has_more: result.has_more,
            next_offset: result.next_cursor.map(|c| c.offset),
            total: result.total,
            pages_fetched: result.pages_fetched,
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Format a duration in milliseconds to M:SS format.
pub fn format_duration(length_ms: u64) -> String {
    let duration_secs = length_ms / 1000;
    let minutes = duration_secs / 60;
    let seconds = duration_secs % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Short "Name by Artist" label.
pub fn track_label(track: &Track) -> String {
    if track.artists.is_empty() {
        track.name.clone()
    } else {
        format!("{} by {}", track.name, track.artist_names())
    }
}

/// Device that player commands should target.
///
/// Returns `None` when a device is already active (Spotify targets it
/// implicitly), the first available device otherwise.
pub async fn resolve_device(api: &dyn SpotifyApi) -> SpotifyResult<Option<String>> {
    let devices = api.devices().await?;
    if devices.iter().any(|d| d.is_active) {
        return Ok(None);
    }

    match devices.iter().find(|d| !d.is_restricted).or(devices.first()) {
        Some(device) => {
            debug!("No active device, using {}", device.name);
            Ok(device.id.clone())
        }
        None => Err(SpotifyError::NoActiveDevice),
    }
}

/// Deserialize tool arguments into typed parameters.
pub fn parse_arguments<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, ToolError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Build a `ToolRoute` that parses parameters and runs `handler`.
pub fn tool_route<S, P, F, Fut>(tool: Tool, api: Arc<dyn SpotifyApi>, handler: F) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
    P: DeserializeOwned + Send + 'static,
    F: Fn(Arc<dyn SpotifyApi>, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CallToolResult> + Send + 'static,
{
    ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
        let args = ctx.arguments.clone().unwrap_or_default();
        let parsed: Result<P, McpError> =
            serde_json::from_value(serde_json::Value::Object(args))
                .map_err(|e| McpError::invalid_params(e.to_string(), None));
        let future = parsed.map(|params| handler(api.clone(), params));
        async move {
            match future {
                Ok(future) => Ok(future.await),
                Err(e) => Err(e),
            }
        }
        .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::fake::{FakeSpotify, test_device, test_track};

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(180000), "3:00");
        assert_eq!(format_duration(245000), "4:05");
        assert_eq!(format_duration(61000), "1:01");
        assert_eq!(format_duration(59000), "0:59");
    }

    #[test]
    fn test_track_summary() {
        let track = test_track(7);
        let summary = TrackSummary::from(&track);
        assert_eq!(summary.name, "Track 7");
        assert_eq!(summary.artists, vec!["Artist 7"]);
        assert_eq!(summary.album.as_deref(), Some("Album 7"));
        assert_eq!(summary.duration, "3:07");

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("explicit").is_none());
    }

    #[test]
    fn test_track_label() {
        assert_eq!(track_label(&test_track(1)), "Track 1 by Artist 1");
    }

    #[tokio::test]
    async fn test_resolve_device_active() {
        let api = FakeSpotify::new().with_devices(vec![
            test_device("Phone", false),
            test_device("Laptop", true),
        ]);
        assert_eq!(resolve_device(&api).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_device_falls_back_to_first() {
        let api = FakeSpotify::new().with_devices(vec![
            test_device("Phone", false),
            test_device("Laptop", false),
        ]);
        assert_eq!(
            resolve_device(&api).await.unwrap(),
            Some("phone-id".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_device_none_available() {
        let api = FakeSpotify::new();
        let err = resolve_device(&api).await.unwrap_err();
        assert!(matches!(err, SpotifyError::NoActiveDevice));
    }

    #[test]
    fn test_parse_arguments_error() {
        #[derive(serde::Deserialize)]
        #[allow(dead_code)]
        struct P {
            action: String,
        }
        let err = parse_arguments::<P>(JsonObject::new()).err().unwrap();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
