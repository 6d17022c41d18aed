//! The `SpotifyApi` capability trait.
//!
//! Tools, resources and the playback monitor only ever see
//! `Arc<dyn SpotifyApi>`. Each method is one remote call; chunking and paging
//! loops live above this layer.

use async_trait::async_trait;

use super::error::SpotifyResult;
use super::models::{
    Album, Artist, Device, Image, Page, PageCursor, PlaybackState, Playlist, PlaylistDetails,
    PlaylistItem, Queue, Reorder, SavedTrack, SearchResponse, SearchType, SimplifiedAlbum,
    SimplifiedPlaylist, Track, User,
};

#[async_trait]
pub trait SpotifyApi: Send + Sync {
    // ---- user & player -----------------------------------------------------

    async fn current_user(&self) -> SpotifyResult<User>;

    /// `None` when nothing is playing on any device.
    async fn current_playback(&self) -> SpotifyResult<Option<PlaybackState>>;

    async fn devices(&self) -> SpotifyResult<Vec<Device>>;

    /// Resume playback, or play `uris` when given.
    async fn start_playback(
        &self,
        device_id: Option<&str>,
        uris: Option<&[String]>,
    ) -> SpotifyResult<()>;

    async fn pause_playback(&self, device_id: Option<&str>) -> SpotifyResult<()>;

    async fn next_track(&self, device_id: Option<&str>) -> SpotifyResult<()>;

    async fn previous_track(&self, device_id: Option<&str>) -> SpotifyResult<()>;

    async fn seek(&self, position_ms: u64, device_id: Option<&str>) -> SpotifyResult<()>;

    async fn set_volume(&self, volume_percent: u8, device_id: Option<&str>) -> SpotifyResult<()>;

    async fn queue(&self) -> SpotifyResult<Queue>;

    async fn add_to_queue(&self, uri: &str, device_id: Option<&str>) -> SpotifyResult<()>;

    // ---- catalog -----------------------------------------------------------

    async fn search(
        &self,
        query: &str,
        types: &[SearchType],
        limit: u32,
    ) -> SpotifyResult<SearchResponse>;

    async fn track(&self, id: &str) -> SpotifyResult<Track>;

    async fn album(&self, id: &str) -> SpotifyResult<Album>;

    async fn artist(&self, id: &str) -> SpotifyResult<Artist>;

    async fn artist_top_tracks(&self, id: &str) -> SpotifyResult<Vec<Track>>;

    async fn artist_albums(
        &self,
        id: &str,
        cursor: PageCursor,
    ) -> SpotifyResult<Page<SimplifiedAlbum>>;

    // ---- playlists & library -----------------------------------------------

    async fn playlist(&self, id: &str) -> SpotifyResult<Playlist>;

    async fn playlist_items(
        &self,
        id: &str,
        cursor: PageCursor,
    ) -> SpotifyResult<Page<PlaylistItem>>;

    async fn saved_tracks(&self, cursor: PageCursor) -> SpotifyResult<Page<SavedTrack>>;

    /// Playlists of `user_id`, or of the current user when `None`.
    async fn user_playlists(
        &self,
        user_id: Option<&str>,
        cursor: PageCursor,
    ) -> SpotifyResult<Page<SimplifiedPlaylist>>;

    async fn create_playlist(
        &self,
        user_id: &str,
        details: &PlaylistDetails,
    ) -> SpotifyResult<Playlist>;

    async fn change_playlist_details(
        &self,
        id: &str,
        details: &PlaylistDetails,
    ) -> SpotifyResult<()>;

    /// Add at most 100 items. Returns the new snapshot id.
    async fn add_playlist_items(
        &self,
        id: &str,
        uris: &[String],
        position: Option<u32>,
    ) -> SpotifyResult<String>;

    /// Remove every occurrence of at most 100 items. Returns the new snapshot id.
    async fn remove_playlist_items(
        &self,
        id: &str,
        uris: &[String],
        snapshot_id: Option<&str>,
    ) -> SpotifyResult<String>;

    /// Replace the whole playlist with at most 100 items. Returns the new snapshot id.
    async fn replace_playlist_items(&self, id: &str, uris: &[String]) -> SpotifyResult<String>;

    async fn reorder_playlist_items(&self, id: &str, reorder: &Reorder) -> SpotifyResult<String>;

    async fn playlist_cover_image(&self, id: &str) -> SpotifyResult<Vec<Image>>;

    /// Upload a base64 encoded JPEG as the playlist cover.
    async fn upload_playlist_cover_image(&self, id: &str, jpeg_base64: &str) -> SpotifyResult<()>;
}
