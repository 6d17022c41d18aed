//! Spotify catalog search tool.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::{AlbumSummary, ArtistSummary, PlaylistSummary, TrackSummary, tool_route};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::result::{into_call_result, structured_result};
use crate::spotify::SpotifyApi;
use crate::spotify::models::SearchType;

const MAX_LIMIT: u32 = 50;

// ============================================================================
// Tool Parameters
// ============================================================================

fn default_qtype() -> String {
    "track".to_string()
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SearchParams {
    #[schemars(description = "Search terms")]
    pub query: String,

    #[schemars(
        description = "Comma separated item types: 'track', 'album', 'artist', 'playlist' (default: 'track')"
    )]
    #[serde(default = "default_qtype")]
    pub qtype: String,

    #[schemars(description = "Maximum results per type (default: 10, max: 50)")]
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[schemars(description = "Only match this artist")]
    #[serde(default)]
    pub artist: Option<String>,

    #[schemars(description = "Only match this track name")]
    #[serde(default)]
    pub track: Option<String>,

    #[schemars(description = "Only match this album")]
    #[serde(default)]
    pub album: Option<String>,

    #[schemars(description = "Release year, e.g. '1997'")]
    #[serde(default)]
    pub year: Option<String>,

    #[schemars(description = "Release year range, e.g. '1990-1999'")]
    #[serde(default)]
    pub year_range: Option<String>,

    #[schemars(description = "Only match this genre")]
    #[serde(default)]
    pub genre: Option<String>,

    #[schemars(description = "Only albums in the lowest 10% of popularity")]
    #[serde(default)]
    pub hipster: bool,

    #[schemars(description = "Only albums released in the past two weeks")]
    #[serde(default)]
    pub new: bool,
}

// ============================================================================
// Structured Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SearchResult {
    pub query: String,
    pub tracks: Vec<TrackSummary>,
    pub albums: Vec<AlbumSummary>,
    pub artists: Vec<ArtistSummary>,
    pub playlists: Vec<PlaylistSummary>,
    pub total_count: usize,
}

/// Append `field:value` filters to the base query.
pub fn build_search_query(params: &SearchParams) -> String {
    let mut parts = vec![params.query.trim().to_string()];

    let filters = [
        ("artist", &params.artist),
        ("track", &params.track),
        ("album", &params.album),
        ("year", &params.year),
        ("year", &params.year_range),
        ("genre", &params.genre),
    ];
    for (field, value) in filters {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            parts.push(format!("{}:{}", field, value));
        }
    }
    if params.hipster {
        parts.push("tag:hipster".to_string());
    }
    if params.new {
        parts.push("tag:new".to_string());
    }

    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

/// Parse the comma separated type list.
pub fn parse_qtype(qtype: &str) -> Result<Vec<SearchType>, ToolError> {
    let mut types = Vec::new();
    for part in qtype.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let search_type = SearchType::parse(part).ok_or_else(|| {
            ToolError::validation(format!(
                "Unknown search type '{}'. Use 'track', 'album', 'artist' or 'playlist'",
                part
            ))
        })?;
        if !types.contains(&search_type) {
            types.push(search_type);
        }
    }
    if types.is_empty() {
        return Err(ToolError::validation("qtype must name at least one type"));
    }
    Ok(types)
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct SearchTool;

impl SearchTool {
    pub const NAME: &'static str = "spotify_search";

    pub const DESCRIPTION: &'static str = "Search the Spotify catalog for tracks, albums, artists and playlists. Optional filters narrow the search by artist, track, album, year or year range, genre, and the 'hipster' and 'new' tags. Returns matching items with names, IDs and URIs for use with other tools.";

    #[instrument(skip_all, fields(query = %params.query, qtype = %params.qtype))]
    pub async fn execute(api: &dyn SpotifyApi, params: SearchParams) -> CallToolResult {
        into_call_result(Self::run(api, params).await)
    }

    async fn run(api: &dyn SpotifyApi, params: SearchParams) -> Result<CallToolResult, ToolError> {
        let query = build_search_query(&params);
        if query.is_empty() {
            return Err(ToolError::validation("query must not be empty"));
        }
        if !(1..=MAX_LIMIT).contains(&params.limit) {
            return Err(ToolError::validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }
        let types = parse_qtype(&params.qtype)?;

        info!("Searching Spotify for: {}", query);
        let response = api.search(&query, &types, params.limit).await?;

        let tracks: Vec<TrackSummary> = response
            .tracks
            .map(|p| p.items.iter().flatten().map(TrackSummary::from).collect())
            .unwrap_or_default();
        let albums: Vec<AlbumSummary> = response
            .albums
            .map(|p| p.items.iter().flatten().map(AlbumSummary::from).collect())
            .unwrap_or_default();
        let artists: Vec<ArtistSummary> = response
            .artists
            .map(|p| p.items.iter().flatten().map(ArtistSummary::from).collect())
            .unwrap_or_default();
        let playlists: Vec<PlaylistSummary> = response
            .playlists
            .map(|p| p.items.iter().flatten().map(PlaylistSummary::from).collect())
            .unwrap_or_default();

        let total_count = tracks.len() + albums.len() + artists.len() + playlists.len();
        let summary = format!("Found {} result(s) for '{}'", total_count, query);

        Ok(structured_result(
            summary,
            SearchResult {
                query,
                tracks,
                albums,
                artists,
                playlists,
                total_count,
            },
        ))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SearchParams>(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::fake::{FakeSpotify, test_track};
    use crate::spotify::models::{Page, SearchResponse};

    fn params(json: serde_json::Value) -> SearchParams {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_params_defaults() {
        let p = params(serde_json::json!({ "query": "radiohead" }));
        assert_eq!(p.qtype, "track");
        assert_eq!(p.limit, 10);
    }

    #[test]
    fn test_build_search_query() {
        let p = params(serde_json::json!({
            "query": "love",
            "artist": "The Beatles",
            "year_range": "1960-1969",
            "genre": " ",
            "new": true
        }));
        assert_eq!(
            build_search_query(&p),
            "love artist:The Beatles year:1960-1969 tag:new"
        );
    }

    #[test]
    fn test_build_search_query_filters_only() {
        let p = params(serde_json::json!({ "query": "", "album": "OK Computer" }));
        assert_eq!(build_search_query(&p), "album:OK Computer");
    }

    #[test]
    fn test_parse_qtype() {
        assert_eq!(
            parse_qtype("track, album,track").unwrap(),
            vec![SearchType::Track, SearchType::Album]
        );
        assert!(parse_qtype("podcast").is_err());
        assert!(parse_qtype(" , ").is_err());
    }

    #[tokio::test]
    async fn test_search_drops_null_entries() {
        let mut api = FakeSpotify::new();
        api.search = SearchResponse {
            tracks: Some(Page {
                items: vec![None, Some(test_track(1)), Some(test_track(2))],
                total: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };

        let result = SearchTool::execute(&api, params(serde_json::json!({ "query": "song", "limit": 5 }))).await;
        assert_eq!(result.is_error, Some(false));

        let body = result.structured_content.unwrap();
        assert_eq!(body["tracks"].as_array().unwrap().len(), 2);
        assert_eq!(body["albums"].as_array().unwrap().len(), 0);
        assert_eq!(body["total_count"], 2);
        assert_eq!(api.calls(), vec!["search:song:track:5".to_string()]);
    }

    #[tokio::test]
    async fn test_search_validation() {
        let api = FakeSpotify::new();
        let result = SearchTool::execute(&api, params(serde_json::json!({ "query": "x", "limit": 0 }))).await;
        assert_eq!(result.is_error, Some(true));

        let result = SearchTool::execute(&api, params(serde_json::json!({ "query": "x", "qtype": "show" }))).await;
        assert_eq!(
            result.structured_content.unwrap()["error"]["kind"],
            "ValidationError"
        );
        assert!(api.calls().is_empty());
    }
}
