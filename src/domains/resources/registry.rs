//! Resource Registry - central registration of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_resources()`
//! 4. Route its URI in `SpotifyResource::parse`

use rmcp::model::{AnnotateAble, RawResource, RawResourceTemplate, Resource, ResourceTemplate};

use super::definitions::{
    CurrentUserResource, DevicesResource, PlaybackResource, PlaylistResource, QueueResource,
    ResourceDefinition,
};

/// Helper function to create an annotated resource from a definition.
fn build_resource<R: ResourceDefinition>() -> Resource {
    let mut raw = RawResource::new(R::URI, R::NAME);
    raw.description = Some(R::DESCRIPTION.to_string());
    raw.mime_type = Some(R::MIME_TYPE.to_string());
    raw.no_annotation()
}

/// Get all registered resources.
pub fn get_all_resources() -> Vec<Resource> {
    vec![
        build_resource::<CurrentUserResource>(),
        build_resource::<PlaybackResource>(),
        build_resource::<DevicesResource>(),
        build_resource::<QueueResource>(),
    ]
}

/// Get all registered resource templates.
///
/// Resource templates use URI templates (RFC 6570) to describe
/// parameterized resources that clients can fill in.
pub fn get_all_resource_templates() -> Vec<ResourceTemplate> {
    vec![
        RawResourceTemplate {
            uri_template: PlaylistResource::URI_TEMPLATE.to_string(),
            name: PlaylistResource::NAME.to_string(),
            title: Some("Spotify Playlist".to_string()),
            description: Some(PlaylistResource::DESCRIPTION.to_string()),
            mime_type: Some(PlaylistResource::MIME_TYPE.to_string()),
        }
        .no_annotation(),
    ]
}

/// Get the list of all resource URIs.
pub fn resource_uris() -> Vec<&'static str> {
    vec![
        CurrentUserResource::URI,
        PlaybackResource::URI,
        DevicesResource::URI,
        QueueResource::URI,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_all_resources() {
        let resources = get_all_resources();
        assert_eq!(resources.len(), 4);

        let uris: Vec<_> = resources.iter().map(|r| r.raw.uri.as_str()).collect();
        assert!(uris.contains(&"spotify://user/current"));
        assert!(uris.contains(&"spotify://playback/current"));
        assert!(uris.contains(&"spotify://devices/available"));
        assert!(uris.contains(&"spotify://queue/current"));
        assert!(
            resources
                .iter()
                .all(|r| r.raw.mime_type.as_deref() == Some("application/json"))
        );
    }

    #[test]
    fn test_get_all_resource_templates() {
        let templates = get_all_resource_templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].raw.uri_template, "spotify://playlist/{playlist_id}");
    }

    #[test]
    fn test_resource_uris_match_resources() {
        let uris = resource_uris();
        let resources = get_all_resources();
        assert_eq!(uris.len(), resources.len());
        for resource in &resources {
            assert!(uris.contains(&resource.raw.uri.as_str()));
        }
    }
}
