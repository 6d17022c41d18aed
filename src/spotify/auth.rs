//! Access token management.
//!
//! Two modes are supported:
//! - refresh-token grant: `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and
//!   `SPOTIFY_REFRESH_TOKEN` are set; tokens are fetched from the accounts
//!   service and cached until shortly before they expire
//! - static token: only `SPOTIFY_ACCESS_TOKEN` is set; it is used as-is
//!
//! Obtaining the refresh token in the first place (the browser consent step)
//! happens outside the server. [`authorization_url`] builds the link for it.

use std::time::{Duration, Instant};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::{SpotifyError, SpotifyResult};
use crate::core::config::SpotifyConfig;

/// Scopes requested when authorizing the application.
pub const SCOPES: &[&str] = &[
    // Playback
    "user-read-currently-playing",
    "user-read-playback-state",
    "user-modify-playback-state",
    "app-remote-control",
    "streaming",
    // Playlists
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-private",
    "playlist-modify-public",
    "ugc-image-upload",
    // Library
    "user-library-read",
    "user-library-modify",
    // History
    "user-read-playback-position",
    "user-top-read",
    "user-read-recently-played",
];

/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Spotify rejects `localhost` redirect URIs; the loopback address is accepted.
///
/// Only an exact `localhost` host is rewritten. Unparseable input is returned as-is.
pub fn normalize_redirect_uri(uri: &str) -> String {
    let Ok(mut url) = Url::parse(uri) else {
        return uri.to_string();
    };
    if url.host_str() != Some("localhost") || url.set_host(Some("127.0.0.1")).is_err() {
        return uri.to_string();
    }
    url.to_string()
}

#[derive(Serialize)]
struct AuthorizeQuery<'a> {
    client_id: &'a str,
    response_type: &'a str,
    redirect_uri: &'a str,
    scope: String,
}

/// URL the user opens once to grant access and obtain a refresh token.
pub fn authorization_url(accounts_url: &str, client_id: &str, redirect_uri: &str) -> String {
    let query = AuthorizeQuery {
        client_id,
        response_type: "code",
        redirect_uri,
        scope: SCOPES.join(" "),
    };
    // Serializing a flat struct of strings cannot fail.
    let encoded = serde_urlencoded::to_string(&query).unwrap_or_default();
    format!("{}/authorize?{}", accounts_url.trim_end_matches('/'), encoded)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    /// Present when Spotify rotates the refresh token.
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: Option<Instant>,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        match self.expires_at {
            Some(at) => Instant::now() + EXPIRY_MARGIN < at,
            None => true,
        }
    }
}

struct TokenState {
    access: Option<AccessToken>,
    refresh_token: Option<String>,
}

/// Provides bearer tokens to the HTTP client.
pub struct TokenManager {
    http: reqwest::Client,
    accounts_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    can_refresh: bool,
    state: Mutex<TokenState>,
}

impl TokenManager {
    pub fn new(http: reqwest::Client, config: &SpotifyConfig) -> Self {
        let access = config.access_token.as_ref().map(|value| AccessToken {
            value: value.clone(),
            expires_at: None,
        });
        let can_refresh = config.client_id.is_some()
            && config.client_secret.is_some()
            && config.refresh_token.is_some();

        Self {
            http,
            accounts_url: config.accounts_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            can_refresh,
            state: Mutex::new(TokenState {
                access,
                refresh_token: config.refresh_token.clone(),
            }),
        }
    }

    /// Whether new tokens can be obtained after the current one is rejected.
    pub fn can_refresh(&self) -> bool {
        self.can_refresh
    }

    /// Current bearer token, refreshing it when stale.
    pub async fn bearer(&self) -> SpotifyResult<String> {
        let mut state = self.state.lock().await;

        if let Some(token) = state.access.as_ref() {
            if token.is_fresh() || !self.can_refresh() {
                return Ok(token.value.clone());
            }
        }

        if !self.can_refresh() {
            return Err(SpotifyError::Config(
                "no access token or refresh token configured".to_string(),
            ));
        }

        let token = self.refresh(&mut state).await?;
        let value = token.value.clone();
        state.access = Some(token);
        Ok(value)
    }

    /// Drop the cached token after Spotify rejected it.
    pub async fn invalidate(&self) {
        if self.can_refresh() {
            debug!("Invalidating cached Spotify access token");
            self.state.lock().await.access = None;
        }
    }

    async fn refresh(&self, state: &mut TokenState) -> SpotifyResult<AccessToken> {
        let (Some(client_id), Some(refresh_token)) = (&self.client_id, &state.refresh_token) else {
            return Err(SpotifyError::Config("refresh credentials missing".to_string()));
        };

        info!("Refreshing Spotify access token");
        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(client_id, self.client_secret.as_deref())
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(SpotifyError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Token refresh failed with status {}", status);
            // A rejected refresh token is an authentication problem, whatever the status.
            return Err(match SpotifyError::from_status(status.as_u16(), &body, None) {
                SpotifyError::Validation(message) => SpotifyError::Auth {
                    message,
                    token_expired: false,
                },
                other => other,
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::Decode(e.to_string()))?;

        if let Some(rotated) = token.refresh_token.filter(|t| !t.is_empty()) {
            debug!("Spotify rotated the refresh token");
            state.refresh_token = Some(rotated);
        }

        Ok(AccessToken {
            value: token.access_token,
            expires_at: token
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        })
    }
}
