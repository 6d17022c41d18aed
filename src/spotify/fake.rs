//! In-memory [`SpotifyApi`] used by unit tests.
//!
//! Records every call, serves listings from in-memory collections and can be
//! told to fail a specific mutation or page fetch.

use std::sync::Mutex;

use async_trait::async_trait;

use super::client::SpotifyApi;
use super::error::{SpotifyError, SpotifyResult};
use super::models::{
    Album, Artist, Device, Image, Page, PageCursor, PlaybackState, Playlist, PlaylistDetails,
    PlaylistItem, PublicUser, Queue, Reorder, SavedTrack, SearchResponse, SearchType,
    SimplifiedAlbum, SimplifiedArtist, SimplifiedPlaylist, Track, User,
};

/// One recorded playlist mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub op: &'static str,
    pub playlist_id: String,
    pub uris: Vec<String>,
    pub position: Option<u32>,
    pub snapshot_id: Option<String>,
}

#[derive(Default)]
struct State {
    calls: Vec<String>,
    mutations: Vec<Mutation>,
    page_requests: Vec<PageCursor>,
    mutation_count: usize,
    page_count: usize,
    fail_mutation: Option<(usize, SpotifyError)>,
    fail_page: Option<(usize, SpotifyError)>,
    fail_all: Option<SpotifyError>,
}

/// Recording fake of the Spotify API.
pub struct FakeSpotify {
    pub user: User,
    pub devices: Vec<Device>,
    pub playback: Option<PlaybackState>,
    pub queue: Queue,
    pub tracks: Vec<Track>,
    pub playlists: Vec<SimplifiedPlaylist>,
    pub search: SearchResponse,
    pub covers: Vec<Image>,
    /// Whether pages report `total`.
    pub report_total: bool,
    state: Mutex<State>,
}

impl Default for FakeSpotify {
    fn default() -> Self {
        Self {
            user: User {
                id: "test_user".into(),
                display_name: Some("Test User".into()),
                country: Some("US".into()),
                product: Some("premium".into()),
                ..Default::default()
            },
            devices: Vec::new(),
            playback: None,
            queue: Queue::default(),
            tracks: Vec::new(),
            playlists: Vec::new(),
            search: SearchResponse::default(),
            covers: Vec::new(),
            report_total: true,
            state: Mutex::new(State::default()),
        }
    }
}

/// A 22 character base-62 id derived from `n`.
pub fn test_id(n: usize) -> String {
    format!("{:0>22}", n)
}

pub fn test_uri(n: usize) -> String {
    format!("spotify:track:{}", test_id(n))
}

pub fn test_track(n: usize) -> Track {
    Track {
        id: Some(test_id(n)),
        name: format!("Track {}", n),
        uri: Some(test_uri(n)),
        item_type: Some("track".into()),
        duration_ms: 180_000 + n as u64 * 1000,
        artists: vec![SimplifiedArtist {
            id: Some(test_id(10_000 + n)),
            name: format!("Artist {}", n),
            uri: None,
        }],
        album: Some(SimplifiedAlbum {
            name: format!("Album {}", n),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn test_playlist(n: usize) -> SimplifiedPlaylist {
    SimplifiedPlaylist {
        id: test_id(50_000 + n),
        name: format!("Playlist {}", n),
        uri: format!("spotify:playlist:{}", test_id(50_000 + n)),
        owner: PublicUser {
            id: "test_user".into(),
            display_name: Some("Test User".into()),
        },
        ..Default::default()
    }
}

pub fn test_device(name: &str, active: bool) -> Device {
    Device {
        id: Some(format!("{}-id", name.to_lowercase())),
        name: name.to_string(),
        device_type: "Computer".into(),
        is_active: active,
        volume_percent: Some(50),
        ..Default::default()
    }
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection of `n` tracks served by playlist and library listings.
    pub fn with_tracks(mut self, n: usize) -> Self {
        self.tracks = (0..n).map(test_track).collect();
        self
    }

    pub fn with_playlists(mut self, n: usize) -> Self {
        self.playlists = (0..n).map(test_playlist).collect();
        self
    }

    pub fn with_devices(mut self, devices: Vec<Device>) -> Self {
        self.devices = devices;
        self
    }

    pub fn with_playback(mut self, playback: PlaybackState) -> Self {
        self.playback = Some(playback);
        self
    }

    pub fn without_totals(mut self) -> Self {
        self.report_total = false;
        self
    }

    /// Fail the `n`th (1-based) playlist mutation.
    pub fn fail_mutation(self, n: usize, err: SpotifyError) -> Self {
        self.lock().fail_mutation = Some((n, err));
        self
    }

    /// Fail the `n`th (1-based) page fetch.
    pub fn fail_page(self, n: usize, err: SpotifyError) -> Self {
        self.lock().fail_page = Some((n, err));
        self
    }

    /// Fail every call.
    pub fn fail_all(self, err: SpotifyError) -> Self {
        self.lock().fail_all = Some(err);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.lock().mutations.clone()
    }

    pub fn page_requests(&self) -> Vec<PageCursor> {
        self.lock().page_requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn record(&self, call: impl Into<String>) -> SpotifyResult<()> {
        let mut state = self.lock();
        state.calls.push(call.into());
        match &state.fail_all {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn record_mutation(&self, mutation: Mutation) -> SpotifyResult<String> {
        self.record(mutation.op)?;
        let mut state = self.lock();
        state.mutation_count += 1;
        let n = state.mutation_count;
        if let Some((fail_at, err)) = &state.fail_mutation {
            if *fail_at == n {
                return Err(err.clone());
            }
        }
        state.mutations.push(mutation);
        Ok(format!("snapshot-{}", n))
    }

    fn page_of<T: Clone>(&self, items: &[T], cursor: PageCursor) -> SpotifyResult<Page<T>> {
        let mut state = self.lock();
        state.page_count += 1;
        state.page_requests.push(cursor);
        let n = state.page_count;
        if let Some((fail_at, err)) = &state.fail_page {
            if *fail_at == n {
                return Err(err.clone());
            }
        }

        let start = (cursor.offset as usize).min(items.len());
        let end = (start + cursor.limit as usize).min(items.len());
        Ok(Page {
            items: items[start..end].to_vec(),
            total: self.report_total.then_some(items.len() as u32),
            limit: cursor.limit,
            offset: cursor.offset,
            next: None,
        })
    }

    fn playlist_items_vec(&self) -> Vec<PlaylistItem> {
        self.tracks
            .iter()
            .map(|t| PlaylistItem {
                added_at: Some("2024-01-01T00:00:00Z".into()),
                track: Some(t.clone()),
            })
            .collect()
    }
}

#[async_trait]
impl SpotifyApi for FakeSpotify {
    async fn current_user(&self) -> SpotifyResult<User> {
        self.record("current_user")?;
        Ok(self.user.clone())
    }

    async fn current_playback(&self) -> SpotifyResult<Option<PlaybackState>> {
        self.record("current_playback")?;
        Ok(self.playback.clone())
    }

    async fn devices(&self) -> SpotifyResult<Vec<Device>> {
        self.record("devices")?;
        Ok(self.devices.clone())
    }

    async fn start_playback(
        &self,
        device_id: Option<&str>,
        uris: Option<&[String]>,
    ) -> SpotifyResult<()> {
        self.record(format!(
            "start_playback:{}:{}",
            device_id.unwrap_or("-"),
            uris.map(|u| u.join(",")).unwrap_or_default()
        ))
    }

    async fn pause_playback(&self, device_id: Option<&str>) -> SpotifyResult<()> {
        self.record(format!("pause_playback:{}", device_id.unwrap_or("-")))
    }

    async fn next_track(&self, device_id: Option<&str>) -> SpotifyResult<()> {
        self.record(format!("next_track:{}", device_id.unwrap_or("-")))
    }

    async fn previous_track(&self, device_id: Option<&str>) -> SpotifyResult<()> {
        self.record(format!("previous_track:{}", device_id.unwrap_or("-")))
    }

    async fn seek(&self, position_ms: u64, device_id: Option<&str>) -> SpotifyResult<()> {
        self.record(format!("seek:{}:{}", position_ms, device_id.unwrap_or("-")))
    }

    async fn set_volume(&self, volume_percent: u8, device_id: Option<&str>) -> SpotifyResult<()> {
        self.record(format!("set_volume:{}:{}", volume_percent, device_id.unwrap_or("-")))
    }

    async fn queue(&self) -> SpotifyResult<Queue> {
        self.record("queue")?;
        Ok(self.queue.clone())
    }

    async fn add_to_queue(&self, uri: &str, device_id: Option<&str>) -> SpotifyResult<()> {
        self.record(format!("add_to_queue:{}:{}", uri, device_id.unwrap_or("-")))
    }

    async fn search(
        &self,
        query: &str,
        types: &[SearchType],
        limit: u32,
    ) -> SpotifyResult<SearchResponse> {
        let types: Vec<_> = types.iter().map(|t| t.as_str()).collect();
        self.record(format!("search:{}:{}:{}", query, types.join(","), limit))?;
        Ok(self.search.clone())
    }

    async fn track(&self, id: &str) -> SpotifyResult<Track> {
        self.record(format!("track:{}", id))?;
        self.tracks
            .iter()
            .find(|t| t.id.as_deref() == Some(id))
            .cloned()
            .ok_or_else(|| SpotifyError::NotFound(format!("track {}", id)))
    }

    async fn album(&self, id: &str) -> SpotifyResult<Album> {
        self.record(format!("album:{}", id))?;
        Ok(Album {
            id: id.to_string(),
            name: "Test Album".into(),
            release_date: Some("2020-05-01".into()),
            total_tracks: Some(2),
            ..Default::default()
        })
    }

    async fn artist(&self, id: &str) -> SpotifyResult<Artist> {
        self.record(format!("artist:{}", id))?;
        Ok(Artist {
            id: id.to_string(),
            name: "Test Artist".into(),
            genres: vec!["indie".into()],
            ..Default::default()
        })
    }

    async fn artist_top_tracks(&self, id: &str) -> SpotifyResult<Vec<Track>> {
        self.record(format!("artist_top_tracks:{}", id))?;
        Ok(self.tracks.iter().take(10).cloned().collect())
    }

    async fn artist_albums(
        &self,
        id: &str,
        cursor: PageCursor,
    ) -> SpotifyResult<Page<SimplifiedAlbum>> {
        self.record(format!("artist_albums:{}", id))?;
        Ok(Page {
            items: vec![SimplifiedAlbum {
                name: "Test Album".into(),
                ..Default::default()
            }],
            total: Some(1),
            limit: cursor.limit,
            offset: cursor.offset,
            next: None,
        })
    }

    async fn playlist(&self, id: &str) -> SpotifyResult<Playlist> {
        self.record(format!("playlist:{}", id))?;
        let first_page = self.page_of(&self.playlist_items_vec(), PageCursor::new(0, 100))?;
        Ok(Playlist {
            id: id.to_string(),
            name: "Test Playlist".into(),
            uri: format!("spotify:playlist:{}", id),
            owner: PublicUser {
                id: self.user.id.clone(),
                display_name: self.user.display_name.clone(),
            },
            snapshot_id: Some("snapshot-0".into()),
            tracks: first_page,
            ..Default::default()
        })
    }

    async fn playlist_items(
        &self,
        id: &str,
        cursor: PageCursor,
    ) -> SpotifyResult<Page<PlaylistItem>> {
        self.record(format!("playlist_items:{}:{}:{}", id, cursor.offset, cursor.limit))?;
        self.page_of(&self.playlist_items_vec(), cursor)
    }

    async fn saved_tracks(&self, cursor: PageCursor) -> SpotifyResult<Page<SavedTrack>> {
        self.record(format!("saved_tracks:{}:{}", cursor.offset, cursor.limit))?;
        let saved: Vec<SavedTrack> = self
            .tracks
            .iter()
            .map(|t| SavedTrack {
                added_at: Some("2024-01-01T00:00:00Z".into()),
                track: t.clone(),
            })
            .collect();
        self.page_of(&saved, cursor)
    }

    async fn user_playlists(
        &self,
        user_id: Option<&str>,
        cursor: PageCursor,
    ) -> SpotifyResult<Page<SimplifiedPlaylist>> {
        self.record(format!(
            "user_playlists:{}:{}:{}",
            user_id.unwrap_or("me"),
            cursor.offset,
            cursor.limit
        ))?;
        self.page_of(&self.playlists, cursor)
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        details: &PlaylistDetails,
    ) -> SpotifyResult<Playlist> {
        self.record(format!("create_playlist:{}", user_id))?;
        Ok(Playlist {
            id: test_id(99_999),
            name: details.name.clone().unwrap_or_default(),
            uri: format!("spotify:playlist:{}", test_id(99_999)),
            description: details.description.clone(),
            public: details.public,
            owner: PublicUser {
                id: user_id.to_string(),
                display_name: None,
            },
            ..Default::default()
        })
    }

    async fn change_playlist_details(
        &self,
        id: &str,
        _details: &PlaylistDetails,
    ) -> SpotifyResult<()> {
        self.record(format!("change_playlist_details:{}", id))
    }

    async fn add_playlist_items(
        &self,
        id: &str,
        uris: &[String],
        position: Option<u32>,
    ) -> SpotifyResult<String> {
        self.record_mutation(Mutation {
            op: "add",
            playlist_id: id.to_string(),
            uris: uris.to_vec(),
            position,
            snapshot_id: None,
        })
    }

    async fn remove_playlist_items(
        &self,
        id: &str,
        uris: &[String],
        snapshot_id: Option<&str>,
    ) -> SpotifyResult<String> {
        self.record_mutation(Mutation {
            op: "remove",
            playlist_id: id.to_string(),
            uris: uris.to_vec(),
            position: None,
            snapshot_id: snapshot_id.map(str::to_string),
        })
    }

    async fn replace_playlist_items(&self, id: &str, uris: &[String]) -> SpotifyResult<String> {
        self.record_mutation(Mutation {
            op: "replace",
            playlist_id: id.to_string(),
            uris: uris.to_vec(),
            position: None,
            snapshot_id: None,
        })
    }

    async fn reorder_playlist_items(&self, id: &str, reorder: &Reorder) -> SpotifyResult<String> {
        self.record_mutation(Mutation {
            op: "reorder",
            playlist_id: id.to_string(),
            uris: Vec::new(),
            position: Some(reorder.insert_before),
            snapshot_id: reorder.snapshot_id.clone(),
        })
    }

    async fn playlist_cover_image(&self, id: &str) -> SpotifyResult<Vec<Image>> {
        self.record(format!("playlist_cover_image:{}", id))?;
        Ok(self.covers.clone())
    }

    async fn upload_playlist_cover_image(&self, id: &str, jpeg_base64: &str) -> SpotifyResult<()> {
        self.record(format!("upload_playlist_cover_image:{}:{}", id, jpeg_base64.len()))
    }
}
