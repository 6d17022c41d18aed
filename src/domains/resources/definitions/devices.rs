//! Available devices resource.

use async_trait::async_trait;

use super::ResourceDefinition;
use crate::domains::resources::error::ResourceError;
use crate::domains::tools::definitions::common::DeviceSummary;
use crate::spotify::SpotifyApi;

pub struct DevicesResource;

#[async_trait]
impl ResourceDefinition for DevicesResource {
    const URI: &'static str = "spotify://devices/available";
    const NAME: &'static str = "Available Devices";
    const DESCRIPTION: &'static str = "Spotify Connect devices available for playback";

    async fn read(api: &dyn SpotifyApi) -> Result<serde_json::Value, ResourceError> {
        let devices: Vec<DeviceSummary> = api.devices().await?.iter().map(DeviceSummary::from).collect();
        Ok(serde_json::json!({ "devices": devices }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::fake::{FakeSpotify, test_device};

    #[tokio::test]
    async fn test_read_devices() {
        let api = FakeSpotify::new().with_devices(vec![
            test_device("Phone", false),
            test_device("Laptop", true),
        ]);
        let content = DevicesResource::read(&api).await.unwrap();
        let devices = content["devices"].as_array().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[1]["id"], "laptop-id");
        assert_eq!(devices[1]["is_active"], true);
    }
}
