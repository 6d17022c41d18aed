//! Playlist cover image tool.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::common::tool_route;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::result::{into_call_result, structured_result};
use crate::spotify::SpotifyApi;
use crate::spotify::ids::parse_playlist_id;
use crate::spotify::models::Image;

/// Largest base64 payload Spotify accepts for a cover.
pub const MAX_COVER_PAYLOAD: usize = 256 * 1024;

const JPEG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CoverAction {
    Get,
    Upload,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlaylistCoverParams {
    #[schemars(description = "Action: 'get' or 'upload'")]
    pub action: CoverAction,

    #[schemars(description = "Playlist URI, URL or ID")]
    pub playlist_id: String,

    #[schemars(
        description = "Base64-encoded JPEG image, at most 256 KB encoded (required for 'upload')"
    )]
    #[serde(default)]
    pub image_data: Option<String>,
}

// ============================================================================
// Structured Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CoverImage {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl From<Image> for CoverImage {
    fn from(image: Image) -> Self {
        Self {
            url: image.url,
            width: image.width,
            height: image.height,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlaylistCoverResult {
    pub action: CoverAction,
    pub playlist_id: String,
    pub images: Vec<CoverImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_bytes: Option<usize>,
}

/// Validate an upload payload and return it without whitespace or data URL prefix.
pub fn validate_cover_image(image_data: &str) -> Result<(String, usize), ToolError> {
    let trimmed = image_data.trim();
    let payload = match trimmed.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => trimmed,
    };
    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if payload.is_empty() {
        return Err(ToolError::validation("image_data must not be empty"));
    }
    if payload.len() > MAX_COVER_PAYLOAD {
        return Err(ToolError::validation(format!(
            "image_data is {} bytes encoded, the limit is {} bytes",
            payload.len(),
            MAX_COVER_PAYLOAD
        )));
    }

    let bytes = STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| ToolError::validation(format!("image_data is not valid base64: {}", e)))?;
    if !bytes.starts_with(&JPEG_MAGIC) {
        return Err(ToolError::validation("image_data must be a JPEG image"));
    }

    Ok((payload, bytes.len()))
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlaylistCoverTool;

impl PlaylistCoverTool {
    pub const NAME: &'static str = "spotify_playlist_cover";

    pub const DESCRIPTION: &'static str = "Get the cover images of a playlist, or upload a custom cover. Uploads must be a base64-encoded JPEG of at most 256 KB.";

    #[instrument(skip_all, fields(action = ?params.action, playlist_id = %params.playlist_id))]
    pub async fn execute(api: &dyn SpotifyApi, params: PlaylistCoverParams) -> CallToolResult {
        into_call_result(Self::run(api, params).await)
    }

    async fn run(
        api: &dyn SpotifyApi,
        params: PlaylistCoverParams,
    ) -> Result<CallToolResult, ToolError> {
        let playlist_id = parse_playlist_id(&params.playlist_id)?;

        let uploaded_bytes = match params.action {
            CoverAction::Get => None,
            CoverAction::Upload => {
                let image_data = params
                    .image_data
                    .as_deref()
                    .ok_or_else(|| ToolError::validation("image_data is required for 'upload'"))?;
                let (payload, size) = validate_cover_image(image_data)?;
                info!("Uploading {} byte cover for playlist {}", size, playlist_id);
                api.upload_playlist_cover_image(&playlist_id, &payload).await?;
                Some(size)
            }
        };

        let images: Vec<CoverImage> = api
            .playlist_cover_image(&playlist_id)
            .await?
            .into_iter()
            .map(CoverImage::from)
            .collect();

        let summary = match uploaded_bytes {
            Some(_) => "Cover image uploaded".to_string(),
            None => format!("Playlist has {} cover image(s)", images.len()),
        };

        Ok(structured_result(
            summary,
            PlaylistCoverResult {
                action: params.action,
                playlist_id,
                images,
                uploaded_bytes,
            },
        ))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PlaylistCoverParams>(),
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
    use crate::spotify::fake::{FakeSpotify, test_id};

    fn jpeg_base64(len: usize) -> String {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.resize(len, 0x42);
        STANDARD.encode(bytes)
    }

    fn params(action: &str, image_data: Option<String>) -> PlaylistCoverParams {
        serde_json::from_value(serde_json::json!({
            "action": action,
            "playlist_id": test_id(3),
            "image_data": image_data,
        }))
        .unwrap()
    }

    #[test]
    fn test_validate_cover_image() {
        let (payload, size) = validate_cover_image(&jpeg_base64(100)).unwrap();
        assert_eq!(size, 100);
        assert_eq!(payload, jpeg_base64(100));

        let data_url = format!("data:image/jpeg;base64,{}", jpeg_base64(10));
        assert_eq!(validate_cover_image(&data_url).unwrap().1, 10);
    }

    #[test]
    fn test_validate_rejects_bad_payloads() {
        assert!(validate_cover_image("").is_err());
        assert!(validate_cover_image("not base64!!").is_err());

        let png = STANDARD.encode([0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]);
        assert!(validate_cover_image(&png).is_err());

        // 200 KB decoded is ~267 KB encoded
        assert!(validate_cover_image(&jpeg_base64(200 * 1024)).is_err());
        assert!(validate_cover_image(&jpeg_base64(150 * 1024)).is_ok());
    }

    #[tokio::test]
    async fn test_get_cover() {
        let mut api = FakeSpotify::new();
        api.covers = vec![Image {
            url: "https://i.scdn.co/image/abc".into(),
            height: Some(640),
            width: Some(640),
        }];
        let result = PlaylistCoverTool::execute(&api, params("get", None)).await;

        let body = result.structured_content.unwrap();
        assert_eq!(body["images"][0]["url"], "https://i.scdn.co/image/abc");
        assert!(body.get("uploaded_bytes").is_none());
    }

    #[tokio::test]
    async fn test_upload_cover() {
        let api = FakeSpotify::new();
        let data = jpeg_base64(300);
        let result = PlaylistCoverTool::execute(&api, params("upload", Some(data.clone()))).await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.structured_content.unwrap()["uploaded_bytes"], 300);
        assert_eq!(
            api.calls()[0],
            format!("upload_playlist_cover_image:{}:{}", test_id(3), data.len())
        );
    }

    #[tokio::test]
    async fn test_upload_rejects_invalid_image_without_calling() {
        let api = FakeSpotify::new();
        let png = STANDARD.encode([0x89, 0x50, 0x4E, 0x47]);
        let result = PlaylistCoverTool::execute(&api, params("upload", Some(png))).await;
        assert_eq!(
            result.structured_content.unwrap()["error"]["kind"],
            "ValidationError"
        );
        assert!(api.calls().is_empty());

        let result = PlaylistCoverTool::execute(&api, params("upload", None)).await;
        assert_eq!(result.is_error, Some(true));
    }
}
