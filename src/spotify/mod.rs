//! Spotify Web API boundary.
//!
//! Everything that talks to Spotify goes through the [`SpotifyApi`] trait so
//! that tools, resources and the playback monitor can be exercised against a
//! fake in tests. The production implementation is [`HttpSpotifyClient`].
//!
//! - `client`: the `SpotifyApi` capability trait
//! - `http`: reqwest-based implementation with retry and token refresh
//! - `auth`: access token management (refresh-token grant)
//! - `error`: typed failures returned by every call
//! - `ids`: identifier parsing, applied before any network call
//! - `models`: response payloads and paging types

pub mod auth;
pub mod client;
pub mod error;
pub mod http;
pub mod ids;
pub mod models;

#[cfg(test)]
pub mod fake;

pub use client::SpotifyApi;
pub use error::{ForbiddenReason, SpotifyError, SpotifyResult};
pub use http::HttpSpotifyClient;
pub use ids::{IdError, ItemKind, TrackRef};
pub use models::{Page, PageCursor};
