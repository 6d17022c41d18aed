//! Playlist resource template: `spotify://playlist/{playlist_id}`.

use crate::domains::resources::error::ResourceError;
use crate::domains::tools::definitions::common::{PlaylistSummary, TrackSummary};
use crate::spotify::SpotifyApi;
use crate::spotify::ids::parse_playlist_id;

pub struct PlaylistResource;

impl PlaylistResource {
    pub const URI_PREFIX: &'static str = "spotify://playlist/";
    pub const URI_TEMPLATE: &'static str = "spotify://playlist/{playlist_id}";
    pub const NAME: &'static str = "Playlist";
    pub const DESCRIPTION: &'static str =
        "A playlist's details and first page of tracks, addressed by playlist ID";
    pub const MIME_TYPE: &'static str = "application/json";

    /// Extract the playlist id from a resource URI.
    pub fn playlist_id(uri: &str) -> Option<Result<String, ResourceError>> {
        let id = uri.strip_prefix(Self::URI_PREFIX)?;
        Some(parse_playlist_id(id).map_err(|_| ResourceError::invalid_uri(uri)))
    }

    pub async fn read(
        api: &dyn SpotifyApi,
        playlist_id: &str,
    ) -> Result<serde_json::Value, ResourceError> {
        let playlist = api.playlist(playlist_id).await?;
        let tracks: Vec<TrackSummary> = playlist
            .tracks
            .items
            .iter()
            .filter_map(|item| item.track.as_ref())
            .map(TrackSummary::from)
            .collect();

        Ok(serde_json::json!({
            "playlist": PlaylistSummary::from(&playlist),
            "snapshot_id": playlist.snapshot_id,
            "tracks": tracks,
        }))
    }
}
