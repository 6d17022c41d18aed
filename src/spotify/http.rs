//! reqwest implementation of [`SpotifyApi`].
//!
//! Every request goes through [`HttpSpotifyClient::send`], which:
//! - attaches the bearer token and refreshes it once on a 401
//! - honors `Retry-After` on 429 responses
//! - retries 5xx and network failures with exponential backoff

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};

use super::auth::TokenManager;
use super::client::SpotifyApi;
use super::error::{SpotifyError, SpotifyResult};
use super::models::{
    Album, Artist, Device, Devices, Image, Page, PageCursor, PlaybackState, Playlist,
    PlaylistDetails, PlaylistItem, Queue, Reorder, SavedTrack, SearchResponse, SearchType,
    SimplifiedAlbum, SimplifiedPlaylist, SnapshotResponse, TopTracks, Track, User,
};
use crate::core::config::SpotifyConfig;

const BASE_DELAY_MS: u64 = 500;
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Longer server-requested waits are surfaced to the caller instead of slept through.
const MAX_RETRY_AFTER_SECS: u64 = 30;
/// Market used for artist top tracks.
const DEFAULT_MARKET: &str = "US";

/// Request payload variants.
enum Body<'a> {
    Empty,
    Json(Value),
    Jpeg(&'a str),
}

/// Authenticated Spotify Web API client.
pub struct HttpSpotifyClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenManager,
    max_retries: u32,
    base_delay_ms: u64,
}

impl HttpSpotifyClient {
    /// Build a client from configuration.
    pub fn new(config: &SpotifyConfig) -> SpotifyResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("spotify-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SpotifyError::Config(format!("failed to create HTTP client: {}", e)))?;

        let tokens = TokenManager::new(http.clone(), config);

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
            max_retries: config.max_retries,
            base_delay_ms: BASE_DELAY_MS,
        })
    }

    /// Override the backoff base delay.
    pub fn with_base_delay(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    /// Send a request with auth refresh and retry. Returns the raw body, empty on 204.
    #[instrument(skip(self, query, body))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Body<'_>,
    ) -> SpotifyResult<String> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;
        let mut token_refreshed = false;

        loop {
            let token = self.tokens.bearer().await?;
            let mut request = self
                .http
                .request(method.clone(), &url)
                .bearer_auth(token)
                .query(query);
            request = match &body {
                Body::Empty => request.header(header::CONTENT_LENGTH, 0),
                Body::Json(value) => request.json(value),
                Body::Jpeg(data) => request
                    .header(header::CONTENT_TYPE, "image/jpeg")
                    .body(data.to_string()),
            };

            debug!("Spotify API request");
            let result = match request.send().await {
                Ok(response) => Self::read_response(response).await,
                Err(e) => Err(SpotifyError::from_reqwest(e)),
            };

            match result {
                Ok(text) => return Ok(text),
                Err(SpotifyError::Auth { .. }) if !token_refreshed && self.tokens.can_refresh() => {
                    warn!("Access token rejected, refreshing");
                    token_refreshed = true;
                    self.tokens.invalidate().await;
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay_ms = match e {
                        SpotifyError::RateLimited {
                            retry_after: Some(secs),
                        } => {
                            if secs > MAX_RETRY_AFTER_SECS {
                                return Err(e);
                            }
                            secs * 1000
                        }
                        _ => self.base_delay_ms * 2u64.pow(attempt - 1),
                    };
                    warn!(
                        "Spotify request failed ({}), retrying (attempt {}/{}) after {}ms",
                        e, attempt, self.max_retries, delay_ms
                    );
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn read_response(response: Response) -> SpotifyResult<String> {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let text = response.text().await.map_err(SpotifyError::from_reqwest)?;

        if status.is_success() {
            if status == StatusCode::NO_CONTENT {
                return Ok(String::new());
            }
            return Ok(text);
        }

        Err(SpotifyError::from_status(status.as_u16(), &text, retry_after))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> SpotifyResult<T> {
        let text = self.send(Method::GET, path, query, Body::Empty).await?;
        decode(&text)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        cursor: PageCursor,
    ) -> SpotifyResult<Page<T>> {
        self.get(path, &cursor_query(cursor)).await
    }

    async fn snapshot(&self, method: Method, path: &str, body: Value) -> SpotifyResult<String> {
        let text = self.send(method, path, &[], Body::Json(body)).await?;
        let response: SnapshotResponse = decode(&text)?;
        Ok(response.snapshot_id)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> SpotifyResult<T> {
    serde_json::from_str(text).map_err(|e| SpotifyError::Decode(e.to_string()))
}

fn cursor_query(cursor: PageCursor) -> Vec<(&'static str, String)> {
    vec![
        ("limit", cursor.limit.to_string()),
        ("offset", cursor.offset.to_string()),
    ]
}

fn device_query(device_id: Option<&str>) -> Vec<(&'static str, String)> {
    device_id
        .map(|id| vec![("device_id", id.to_string())])
        .unwrap_or_default()
}

#[async_trait]
impl SpotifyApi for HttpSpotifyClient {
    async fn current_user(&self) -> SpotifyResult<User> {
        self.get("/me", &[]).await
    }

    async fn current_playback(&self) -> SpotifyResult<Option<PlaybackState>> {
        let text = self.send(Method::GET, "/me/player", &[], Body::Empty).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        decode(&text).map(Some)
    }

    async fn devices(&self) -> SpotifyResult<Vec<Device>> {
        let devices: Devices = self.get("/me/player/devices", &[]).await?;
        Ok(devices.devices)
    }

    async fn start_playback(
        &self,
        device_id: Option<&str>,
        uris: Option<&[String]>,
    ) -> SpotifyResult<()> {
        let body = match uris {
            Some(uris) => Body::Json(json!({ "uris": uris })),
            None => Body::Empty,
        };
        self.send(Method::PUT, "/me/player/play", &device_query(device_id), body)
            .await
            .map(|_| ())
    }

    async fn pause_playback(&self, device_id: Option<&str>) -> SpotifyResult<()> {
        self.send(Method::PUT, "/me/player/pause", &device_query(device_id), Body::Empty)
            .await
            .map(|_| ())
    }

    async fn next_track(&self, device_id: Option<&str>) -> SpotifyResult<()> {
        self.send(Method::POST, "/me/player/next", &device_query(device_id), Body::Empty)
            .await
            .map(|_| ())
    }

    async fn previous_track(&self, device_id: Option<&str>) -> SpotifyResult<()> {
        self.send(Method::POST, "/me/player/previous", &device_query(device_id), Body::Empty)
            .await
            .map(|_| ())
    }

    async fn seek(&self, position_ms: u64, device_id: Option<&str>) -> SpotifyResult<()> {
        let mut query = vec![("position_ms", position_ms.to_string())];
        query.extend(device_query(device_id));
        self.send(Method::PUT, "/me/player/seek", &query, Body::Empty)
            .await
            .map(|_| ())
    }

    async fn set_volume(&self, volume_percent: u8, device_id: Option<&str>) -> SpotifyResult<()> {
        let mut query = vec![("volume_percent", volume_percent.to_string())];
        query.extend(device_query(device_id));
        self.send(Method::PUT, "/me/player/volume", &query, Body::Empty)
            .await
            .map(|_| ())
    }

    async fn queue(&self) -> SpotifyResult<Queue> {
        self.get("/me/player/queue", &[]).await
    }

    async fn add_to_queue(&self, uri: &str, device_id: Option<&str>) -> SpotifyResult<()> {
        let mut query = vec![("uri", uri.to_string())];
        query.extend(device_query(device_id));
        self.send(Method::POST, "/me/player/queue", &query, Body::Empty)
            .await
            .map(|_| ())
    }

    async fn search(
        &self,
        query: &str,
        types: &[SearchType],
        limit: u32,
    ) -> SpotifyResult<SearchResponse> {
        let types = types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self.get(
            "/search",
            &[
                ("q", query.to_string()),
                ("type", types),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn track(&self, id: &str) -> SpotifyResult<Track> {
        self.get(&format!("/tracks/{}", id), &[]).await
    }

    async fn album(&self, id: &str) -> SpotifyResult<Album> {
        self.get(&format!("/albums/{}", id), &[]).await
    }

    async fn artist(&self, id: &str) -> SpotifyResult<Artist> {
        self.get(&format!("/artists/{}", id), &[]).await
    }

    async fn artist_top_tracks(&self, id: &str) -> SpotifyResult<Vec<Track>> {
        let top: TopTracks = self
            .get(
                &format!("/artists/{}/top-tracks", id),
                &[("market", DEFAULT_MARKET.to_string())],
            )
            .await?;
        Ok(top.tracks)
    }

    async fn artist_albums(
        &self,
        id: &str,
        cursor: PageCursor,
    ) -> SpotifyResult<Page<SimplifiedAlbum>> {
        self.get_page(&format!("/artists/{}/albums", id), cursor).await
    }

    async fn playlist(&self, id: &str) -> SpotifyResult<Playlist> {
        self.get(&format!("/playlists/{}", id), &[]).await
    }

    async fn playlist_items(
        &self,
        id: &str,
        cursor: PageCursor,
    ) -> SpotifyResult<Page<PlaylistItem>> {
        self.get_page(&format!("/playlists/{}/tracks", id), cursor).await
    }

    async fn saved_tracks(&self, cursor: PageCursor) -> SpotifyResult<Page<SavedTrack>> {
        self.get_page("/me/tracks", cursor).await
    }

    async fn user_playlists(
        &self,
        user_id: Option<&str>,
        cursor: PageCursor,
    ) -> SpotifyResult<Page<SimplifiedPlaylist>> {
        let path = match user_id {
            Some(user) => format!("/users/{}/playlists", user),
            None => "/me/playlists".to_string(),
        };
        self.get_page(&path, cursor).await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        details: &PlaylistDetails,
    ) -> SpotifyResult<Playlist> {
        let body = serde_json::to_value(details).map_err(|e| SpotifyError::Decode(e.to_string()))?;
        let text = self
            .send(
                Method::POST,
                &format!("/users/{}/playlists", user_id),
                &[],
                Body::Json(body),
            )
            .await?;
        decode(&text)
    }

    async fn change_playlist_details(
        &self,
        id: &str,
        details: &PlaylistDetails,
    ) -> SpotifyResult<()> {
        let body = serde_json::to_value(details).map_err(|e| SpotifyError::Decode(e.to_string()))?;
        self.send(Method::PUT, &format!("/playlists/{}", id), &[], Body::Json(body))
            .await
            .map(|_| ())
    }

    async fn add_playlist_items(
        &self,
        id: &str,
        uris: &[String],
        position: Option<u32>,
    ) -> SpotifyResult<String> {
        let mut body = json!({ "uris": uris });
        if let Some(position) = position {
            body["position"] = json!(position);
        }
        self.snapshot(Method::POST, &format!("/playlists/{}/tracks", id), body)
            .await
    }

    async fn remove_playlist_items(
        &self,
        id: &str,
        uris: &[String],
        snapshot_id: Option<&str>,
    ) -> SpotifyResult<String> {
        let tracks: Vec<Value> = uris.iter().map(|uri| json!({ "uri": uri })).collect();
        let mut body = json!({ "tracks": tracks });
        if let Some(snapshot_id) = snapshot_id {
            body["snapshot_id"] = json!(snapshot_id);
        }
        self.snapshot(Method::DELETE, &format!("/playlists/{}/tracks", id), body)
            .await
    }

    async fn replace_playlist_items(&self, id: &str, uris: &[String]) -> SpotifyResult<String> {
        self.snapshot(
            Method::PUT,
            &format!("/playlists/{}/tracks", id),
            json!({ "uris": uris }),
        )
        .await
    }

    async fn reorder_playlist_items(&self, id: &str, reorder: &Reorder) -> SpotifyResult<String> {
        let body = serde_json::to_value(reorder).map_err(|e| SpotifyError::Decode(e.to_string()))?;
        self.snapshot(Method::PUT, &format!("/playlists/{}/tracks", id), body)
            .await
    }

    async fn playlist_cover_image(&self, id: &str) -> SpotifyResult<Vec<Image>> {
        let text = self
            .send(Method::GET, &format!("/playlists/{}/images", id), &[], Body::Empty)
            .await?;
        if text.trim().is_empty() || text.trim() == "null" {
            return Ok(Vec::new());
        }
        decode(&text)
    }

    async fn upload_playlist_cover_image(&self, id: &str, jpeg_base64: &str) -> SpotifyResult<()> {
        self.send(
            Method::PUT,
            &format!("/playlists/{}/images", id),
            &[],
            Body::Jpeg(jpeg_base64),
        )
        .await
        .map(|_| ())
    }
}
