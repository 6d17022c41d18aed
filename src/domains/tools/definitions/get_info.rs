//! Catalog item details tool.
//!
//! Looks up a single track, album, artist or playlist. Artist lookups also
//! fetch top tracks and albums; playlist lookups include the first page of
//! items.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::{
    AlbumSummary, ArtistSummary, PlaylistSummary, TrackSummary, format_duration, tool_route,
};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::result::{into_call_result, structured_result};
use crate::spotify::ids::parse_id;
use crate::spotify::models::Album;
use crate::spotify::{PageCursor, SpotifyApi};

const ARTIST_ALBUM_LIMIT: u32 = 20;

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum InfoType {
    Track,
    Album,
    Artist,
    Playlist,
}

impl InfoType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Album => "album",
            Self::Artist => "artist",
            Self::Playlist => "playlist",
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetInfoParams {
    #[schemars(description = "Spotify URI, URL or ID of the item")]
    pub item_id: String,

    #[schemars(description = "Item type: 'track', 'album', 'artist' or 'playlist'")]
    pub qtype: InfoType,
}

// ============================================================================
// Structured Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AlbumTrack {
    pub number: Option<u32>,
    pub name: String,
    pub id: Option<String>,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct AlbumInfo {
    pub name: String,
    pub id: String,
    pub artists: Vec<String>,
    pub release_date: Option<String>,
    pub total_tracks: Option<u32>,
    pub label: Option<String>,
    pub genres: Vec<String>,
    pub tracks: Vec<AlbumTrack>,
}

impl From<&Album> for AlbumInfo {
    fn from(album: &Album) -> Self {
        Self {
            name: album.name.clone(),
            id: album.id.clone(),
            artists: album.artists.iter().map(|a| a.name.clone()).collect(),
            release_date: album.release_date.clone(),
            total_tracks: album.total_tracks,
            label: album.label.clone(),
            genres: album.genres.clone(),
            tracks: album
                .tracks
                .items
                .iter()
                .map(|t| AlbumTrack {
                    number: t.track_number,
                    name: t.name.clone(),
                    id: t.id.clone(),
                    duration: format_duration(t.duration_ms),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ArtistInfo {
    pub artist: ArtistSummary,
    pub top_tracks: Vec<TrackSummary>,
    pub albums: Vec<AlbumSummary>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlaylistInfo {
    pub playlist: PlaylistSummary,
    pub snapshot_id: Option<String>,
    pub tracks: Vec<TrackSummary>,
    /// More items exist beyond the first page.
    pub has_more: bool,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(tag = "item_type", rename_all = "lowercase")]
pub enum ItemInfo {
    Track(TrackSummary),
    Album(AlbumInfo),
    Artist(ArtistInfo),
    Playlist(PlaylistInfo),
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct GetInfoTool;

impl GetInfoTool {
    pub const NAME: &'static str = "spotify_get_info";

    pub const DESCRIPTION: &'static str = "Get detailed information about a Spotify track, album, artist or playlist. Artist details include top tracks and albums. Playlist details include the first page of tracks; use spotify_playlist_tracks for the full listing.";

    #[instrument(skip_all, fields(item_id = %params.item_id, qtype = params.qtype.as_str()))]
    pub async fn execute(api: &dyn SpotifyApi, params: GetInfoParams) -> CallToolResult {
        into_call_result(Self::run(api, params).await)
    }

    async fn run(api: &dyn SpotifyApi, params: GetInfoParams) -> Result<CallToolResult, ToolError> {
        let id = parse_id(&params.item_id, params.qtype.as_str())?;
        info!("Fetching {} {}", params.qtype.as_str(), id);

        let (summary, info) = match params.qtype {
            InfoType::Track => {
                let track = api.track(&id).await?;
                let summary = TrackSummary::from(&track);
                (
                    format!("Track: {} ({})", summary.name, summary.artists.join(", ")),
                    ItemInfo::Track(summary),
                )
            }
            InfoType::Album => {
                let album = api.album(&id).await?;
                let info = AlbumInfo::from(&album);
                (
                    format!("Album: {} ({} tracks)", info.name, info.tracks.len()),
                    ItemInfo::Album(info),
                )
            }
            InfoType::Artist => {
                let artist = api.artist(&id).await?;
                let top_tracks = api.artist_top_tracks(&id).await?;
                let albums = api
                    .artist_albums(&id, PageCursor::new(0, ARTIST_ALBUM_LIMIT))
                    .await?;
                let info = ArtistInfo {
                    artist: ArtistSummary::from(&artist),
                    top_tracks: top_tracks.iter().map(TrackSummary::from).collect(),
                    albums: albums.items.iter().map(AlbumSummary::from).collect(),
                };
                (
                    format!(
                        "Artist: {} ({} top tracks, {} albums)",
                        info.artist.name,
                        info.top_tracks.len(),
                        info.albums.len()
                    ),
                    ItemInfo::Artist(info),
                )
            }
            InfoType::Playlist => {
                let playlist = api.playlist(&id).await?;
                let page = &playlist.tracks;
                let tracks: Vec<TrackSummary> = page
                    .items
                    .iter()
                    .filter_map(|item| item.track.as_ref())
                    .map(TrackSummary::from)
                    .collect();
                let has_more = page.next.is_some()
                    || page
                        .total
                        .is_some_and(|t| page.offset + (page.items.len() as u32) < t);
                let info = PlaylistInfo {
                    playlist: PlaylistSummary::from(&playlist),
                    snapshot_id: playlist.snapshot_id.clone(),
                    tracks,
                    has_more,
                };
                (
                    format!(
                        "Playlist: {} ({} tracks)",
                        info.playlist.name,
                        info.playlist.track_count.unwrap_or(info.tracks.len() as u32)
                    ),
                    ItemInfo::Playlist(info),
                )
            }
        };

        Ok(structured_result(summary, info))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetInfoParams>(),
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
