//! Resource service implementation.
//!
//! The ResourceService lists the registered resources and reads them by URI.
//! Every read goes to Spotify; nothing is cached.

use std::sync::Arc;

use rmcp::model::{ReadResourceResult, Resource, ResourceContents, ResourceTemplate};
use tracing::{debug, info};

use super::definitions::{
    CurrentUserResource, DevicesResource, PlaybackResource, PlaylistResource, QueueResource,
    ResourceDefinition,
};
use super::error::ResourceError;
use super::registry::{get_all_resource_templates, get_all_resources};
use crate::spotify::SpotifyApi;

/// A resource URI resolved to the thing it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotifyResource {
    CurrentUser,
    Playback,
    Devices,
    Queue,
    Playlist(String),
}

impl SpotifyResource {
    /// Resolve a URI; `None` when no resource matches.
    pub fn parse(uri: &str) -> Option<Result<Self, ResourceError>> {
        let resource = match uri {
            CurrentUserResource::URI => Self::CurrentUser,
            PlaybackResource::URI => Self::Playback,
            DevicesResource::URI => Self::Devices,
            QueueResource::URI => Self::Queue,
            _ => return PlaylistResource::playlist_id(uri).map(|id| id.map(Self::Playlist)),
        };
        Some(Ok(resource))
    }
}

/// Service for listing and reading resources.
pub struct ResourceService {
    api: Arc<dyn SpotifyApi>,

    resources: Vec<Resource>,

    /// Resource templates for parameterized resources.
    templates: Vec<ResourceTemplate>,
}

impl ResourceService {
    /// Create a new ResourceService reading through `api`.
    pub fn new(api: Arc<dyn SpotifyApi>) -> Self {
        let resources = get_all_resources();
        let templates = get_all_resource_templates();
        info!(
            "Initializing ResourceService with {} resource(s) and {} template(s)",
            resources.len(),
            templates.len()
        );

        Self {
            api,
            resources,
            templates,
        }
    }

    /// List all available resources.
    pub async fn list_resources(&self) -> Vec<Resource> {
        self.resources.clone()
    }

    /// List all available resource templates.
    pub async fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.templates.clone()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let resource = SpotifyResource::parse(uri).ok_or_else(|| ResourceError::not_found(uri))??;
        debug!("Resolved {} to {:?}", uri, resource);

        let api = self.api.as_ref();
        let content = match resource {
            SpotifyResource::CurrentUser => CurrentUserResource::read(api).await?,
            SpotifyResource::Playback => PlaybackResource::read(api).await?,
            SpotifyResource::Devices => DevicesResource::read(api).await?,
            SpotifyResource::Queue => QueueResource::read(api).await?,
            SpotifyResource::Playlist(id) => PlaylistResource::read(api, &id).await?,
        };

        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(
                serde_json::to_string_pretty(&content)?,
                uri,
            )],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::SpotifyError;
    use crate::spotify::fake::{FakeSpotify, test_id};

    fn service(api: FakeSpotify) -> ResourceService {
        ResourceService::new(Arc::new(api))
    }

    fn text_of(result: &ReadResourceResult) -> serde_json::Value {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => {
                serde_json::from_str(text).unwrap()
            }
            _ => panic!("expected text contents"),
        }
    }

    #[test]
    fn test_parse_uris() {
        assert_eq!(
            SpotifyResource::parse("spotify://user/current").unwrap().unwrap(),
            SpotifyResource::CurrentUser
        );
        let uri = format!("spotify://playlist/{}", test_id(2));
        assert_eq!(
            SpotifyResource::parse(&uri).unwrap().unwrap(),
            SpotifyResource::Playlist(test_id(2))
        );
        assert!(SpotifyResource::parse("spotify://nothing").is_none());
    }

    #[tokio::test]
    async fn test_resource_service_lists() {
        let service = service(FakeSpotify::new());
        assert_eq!(service.list_resources().await.len(), 4);
        assert_eq!(service.list_resource_templates().await.len(), 1);
    }

    #[tokio::test]
    async fn test_read_existing_resource() {
        let service = service(FakeSpotify::new());
        let result = service.read_resource("spotify://user/current").await.unwrap();
        assert_eq!(text_of(&result)["id"], "test_user");
    }

    #[tokio::test]
    async fn test_read_playlist_template() {
        let service = service(FakeSpotify::new().with_tracks(2));
        let uri = format!("spotify://playlist/{}", test_id(5));
        let result = service.read_resource(&uri).await.unwrap();
        assert_eq!(text_of(&result)["tracks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let service = service(FakeSpotify::new());
        let err = service.read_resource("spotify://nonexistent").await.unwrap_err();
        assert!(matches!(err, ResourceError::NotFound(_)));

        let err = service.read_resource("spotify://playlist/bad").await.unwrap_err();
        assert!(matches!(err, ResourceError::InvalidUri(_)));
    }

    #[tokio::test]
    async fn test_read_remote_failure() {
        let service = service(FakeSpotify::new().fail_all(SpotifyError::Auth {
            message: "expired".into(),
            token_expired: true,
        }));
        let err = service.read_resource("spotify://devices/available").await.unwrap_err();
        assert!(matches!(err, ResourceError::Remote(SpotifyError::Auth { .. })));
    }
}
