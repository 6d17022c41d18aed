//! Spotify identifier parsing.
//!
//! Accepted forms for an item:
//! - URI: `spotify:track:4uLU6hMCjMI75M1A2tKUQC`
//! - URL: `https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=...`
//! - bare base-62 id (22 characters)
//!
//! Parsing happens before any request is made, so a malformed reference never
//! reaches the network.

use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::Serialize;
use thiserror::Error;

/// Length of a Spotify base-62 id.
pub const ID_LENGTH: usize = 22;

const OPEN_SPOTIFY_HOST: &str = "open.spotify.com";

/// Identifier parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("'{input}' is not a valid Spotify {expected} reference")]
    Invalid { expected: &'static str, input: String },

    #[error("Item {position} is invalid: {source}")]
    AtPosition {
        position: usize,
        #[source]
        source: Box<IdError>,
    },
}

impl IdError {
    fn invalid(expected: &'static str, input: &str) -> Self {
        Self::Invalid {
            expected,
            input: input.to_string(),
        }
    }
}

/// Check if a string is a bare Spotify id.
pub fn is_base62_id(s: &str) -> bool {
    s.len() == ID_LENGTH && s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Kind of playable item a [`TrackRef`] points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Track,
    Episode,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Episode => "episode",
        }
    }

    fn from_segment(s: &str) -> Option<Self> {
        match s {
            "track" => Some(Self::Track),
            "episode" => Some(Self::Episode),
            _ => None,
        }
    }
}

/// A validated reference to a playable item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackRef {
    kind: ItemKind,
    id: String,
}

impl TrackRef {
    /// Parse a URI, open.spotify.com URL or bare id (treated as a track).
    pub fn parse(input: &str) -> Result<Self, IdError> {
        let input = input.trim();
        let invalid = || IdError::invalid("track or episode", input);

        if is_base62_id(input) {
            return Ok(Self {
                kind: ItemKind::Track,
                id: input.to_string(),
            });
        }

        let (segment, id) = split_reference(input).ok_or_else(invalid)?;
        let kind = ItemKind::from_segment(&segment).ok_or_else(invalid)?;
        if !is_base62_id(&id) {
            return Err(invalid());
        }

        Ok(Self { kind, id })
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Canonical `spotify:{kind}:{id}` form sent to the API.
    pub fn uri(&self) -> String {
        format!("spotify:{}:{}", self.kind.as_str(), self.id)
    }
}

impl FromStr for TrackRef {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spotify:{}:{}", self.kind.as_str(), self.id)
    }
}

impl Serialize for TrackRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.uri())
    }
}

/// Parse a list of references, reporting the 1-based position of the first bad one.
pub fn parse_track_refs<I, S>(inputs: I) -> Result<Vec<TrackRef>, IdError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            TrackRef::parse(s.as_ref()).map_err(|e| IdError::AtPosition {
                position: i + 1,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Normalize any accepted form of an id of the given kind to the bare id.
///
/// `kind` is the URI segment: `"playlist"`, `"album"`, `"artist"`, `"track"`...
pub fn parse_id(input: &str, kind: &'static str) -> Result<String, IdError> {
    let input = input.trim();
    if is_base62_id(input) {
        return Ok(input.to_string());
    }

    match split_reference(input) {
        Some((segment, id)) if segment == kind && is_base62_id(&id) => Ok(id),
        _ => Err(IdError::invalid(kind, input)),
    }
}

/// Normalize a playlist reference to the bare id.
pub fn parse_playlist_id(input: &str) -> Result<String, IdError> {
    parse_id(input, "playlist")
}

/// Split a URI or URL into its `(kind, id)` segments.
fn split_reference(input: &str) -> Option<(String, String)> {
    if let Some(rest) = input.strip_prefix("spotify:") {
        let parts: Vec<&str> = rest.split(':').collect();
        return match parts.as_slice() {
            [kind, id] => Some((kind.to_string(), id.to_string())),
            _ => None,
        };
    }

    let url = Url::parse(input).ok()?;
    if url.host_str() != Some(OPEN_SPOTIFY_HOST) {
        return None;
    }

    // Localized links look like /intl-fr/track/<id>
    let segments: Vec<&str> = url
        .path()
        .split('/')
        .filter(|s| !s.is_empty() && !s.starts_with("intl-"))
        .collect();
    match segments.as_slice() {
        [kind, id] => Some((kind.to_string(), id.to_string())),
        _ => None,
    }
}
