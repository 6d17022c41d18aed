//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! Each tool knows how to create its own route; they all share one Spotify
//! client.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{
    GetInfoTool, LikedSongsTool, PlaybackTool, PlaylistCoverTool, PlaylistItemsTool,
    PlaylistManageTool, PlaylistTracksTool, QueueTool, SearchTool, UserPlaylistsTool,
};
use crate::spotify::SpotifyApi;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(api: Arc<dyn SpotifyApi>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(PlaybackTool::create_route(api.clone()))
        .with_route(SearchTool::create_route(api.clone()))
        .with_route(QueueTool::create_route(api.clone()))
        .with_route(GetInfoTool::create_route(api.clone()))
        .with_route(PlaylistManageTool::create_route(api.clone()))
        .with_route(PlaylistItemsTool::create_route(api.clone()))
        .with_route(PlaylistTracksTool::create_route(api.clone()))
        .with_route(LikedSongsTool::create_route(api.clone()))
        .with_route(UserPlaylistsTool::create_route(api.clone()))
        .with_route(PlaylistCoverTool::create_route(api))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::spotify::fake::FakeSpotify;

    struct TestServer {}

    fn test_api() -> Arc<dyn SpotifyApi> {
        Arc::new(FakeSpotify::new())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_api());
        let tools = router.list_all();
        assert_eq!(tools.len(), 10);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"spotify_playback"));
        assert!(names.contains(&"spotify_search"));
        assert!(names.contains(&"spotify_playlist_items"));
        assert!(names.contains(&"spotify_playlist_tracks"));
        assert!(names.contains(&"spotify_liked_songs"));
    }

    #[test]
    fn test_registry_matches_router() {
        let api = test_api();
        let registry = ToolRegistry::new(api.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(api);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
