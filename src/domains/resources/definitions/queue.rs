//! Playback queue resource.

use async_trait::async_trait;

use super::ResourceDefinition;
use crate::domains::resources::error::ResourceError;
use crate::domains::tools::definitions::common::TrackSummary;
use crate::spotify::SpotifyApi;

pub struct QueueResource;

#[async_trait]
impl ResourceDefinition for QueueResource {
    const URI: &'static str = "spotify://queue/current";
    const NAME: &'static str = "Playback Queue";
    const DESCRIPTION: &'static str = "Currently playing track and the upcoming queue";

    async fn read(api: &dyn SpotifyApi) -> Result<serde_json::Value, ResourceError> {
        let queue = api.queue().await?;
        let upcoming: Vec<TrackSummary> = queue.queue.iter().map(TrackSummary::from).collect();
        Ok(serde_json::json!({
            "currently_playing": queue.currently_playing.as_ref().map(TrackSummary::from),
            "queue": upcoming,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::SpotifyError;
    use crate::spotify::fake::{FakeSpotify, test_track};
    use crate::spotify::models::Queue;

    #[tokio::test]
    async fn test_read_queue() {
        let mut api = FakeSpotify::new();
        api.queue = Queue {
            currently_playing: None,
            queue: vec![test_track(1)],
        };
        let content = QueueResource::read(&api).await.unwrap();
        assert!(content["currently_playing"].is_null());
        assert_eq!(content["queue"][0]["name"], "Track 1");
    }

    #[tokio::test]
    async fn test_remote_failure() {
        let api = FakeSpotify::new().fail_all(SpotifyError::Unavailable("down".into()));
        let err = QueueResource::read(&api).await.unwrap_err();
        assert!(matches!(err, ResourceError::Remote(SpotifyError::Unavailable(_))));
    }
}
