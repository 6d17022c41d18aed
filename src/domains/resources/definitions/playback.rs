//! Current playback state resource.
//!
//! Clients that subscribe to this URI receive `resources/updated`
//! notifications when playback changes noticeably.

use async_trait::async_trait;

use super::ResourceDefinition;
use crate::domains::resources::error::ResourceError;
use crate::domains::tools::definitions::common::TrackSummary;
use crate::spotify::SpotifyApi;

pub struct PlaybackResource;

#[async_trait]
impl ResourceDefinition for PlaybackResource {
    const URI: &'static str = "spotify://playback/current";
    const NAME: &'static str = "Current Playback State";
    const DESCRIPTION: &'static str =
        "Live playback information: current track, device, progress, shuffle and repeat";

    async fn read(api: &dyn SpotifyApi) -> Result<serde_json::Value, ResourceError> {
        let Some(state) = api.current_playback().await? else {
            return Ok(serde_json::json!({ "is_playing": false, "current_track": null }));
        };

        let device = state.device.as_ref();
        Ok(serde_json::json!({
            "is_playing": state.is_playing,
            "progress_ms": state.progress_ms.unwrap_or(0),
            "volume_percent": device.and_then(|d| d.volume_percent),
            "device": device.map(|d| serde_json::json!({
                "name": d.name,
                "type": d.device_type,
                "is_active": d.is_active,
            })),
            "current_track": state.item.as_ref().map(TrackSummary::from),
            "shuffle_state": state.shuffle_state,
            "repeat_state": state.repeat_state,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::fake::{FakeSpotify, test_device, test_track};
    use crate::spotify::models::PlaybackState;

    #[tokio::test]
    async fn test_read_idle() {
        let api = FakeSpotify::new();
        let content = PlaybackResource::read(&api).await.unwrap();
        assert_eq!(content["is_playing"], false);
        assert!(content["current_track"].is_null());
    }

    #[tokio::test]
    async fn test_read_playing() {
        let api = FakeSpotify::new().with_playback(PlaybackState {
            device: Some(test_device("Kitchen", true)),
            is_playing: true,
            repeat_state: "off".into(),
            progress_ms: Some(42_000),
            item: Some(test_track(4)),
            ..Default::default()
        });
        let content = PlaybackResource::read(&api).await.unwrap();
        assert_eq!(content["is_playing"], true);
        assert_eq!(content["volume_percent"], 50);
        assert_eq!(content["device"]["name"], "Kitchen");
        assert_eq!(content["current_track"]["name"], "Track 4");
        assert_eq!(content["progress_ms"], 42_000);
    }
}
