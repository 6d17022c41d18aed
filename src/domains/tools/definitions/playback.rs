//! Spotify playback control tool.
//!
//! Reads the current playback state and drives the player: start/resume,
//! pause, skip, previous, seek and volume. Commands target the active device,
//! or the first available one when nothing is active.

use std::sync::Arc;

use rmcp::{
    handler::server::tool::{ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::common::{PlaybackSummary, format_duration, resolve_device, tool_route, track_label};
use crate::domains::tools::error::ToolError;
use crate::domains::tools::result::{into_call_result, structured_result};
use crate::spotify::{SpotifyApi, TrackRef};

const MAX_SKIPS: u32 = 50;

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackAction {
    Get,
    Start,
    Pause,
    Skip,
    Previous,
    Seek,
    Volume,
}

impl PlaybackAction {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Skip => "skip",
            Self::Previous => "previous",
            Self::Seek => "seek",
            Self::Volume => "volume",
        }
    }
}

fn default_num_skips() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PlaybackParams {
    #[schemars(
        description = "Action: 'get' (current state), 'start' (resume or play track_id), 'pause', 'skip', 'previous', 'seek' or 'volume'"
    )]
    pub action: PlaybackAction,

    #[schemars(description = "Track to play with 'start' (URI, URL or ID). Omit to resume.")]
    #[serde(default)]
    pub track_id: Option<String>,

    #[schemars(description = "Number of tracks to skip with 'skip' (default: 1)")]
    #[serde(default = "default_num_skips")]
    pub num_skips: u32,

    #[schemars(description = "Position in milliseconds for 'seek'")]
    #[serde(default)]
    pub position_ms: Option<u64>,

    #[schemars(description = "Volume 0-100 for 'volume'")]
    #[serde(default)]
    pub volume_percent: Option<u8>,
}

/// A validated player command.
#[derive(Debug, Clone, PartialEq)]
enum PlayerCommand {
    Play(String),
    Resume,
    Pause,
    Skip(u32),
    Previous,
    Seek(u64),
    Volume(u8),
}

impl PlayerCommand {
    /// Validate parameters for a state-changing action.
    fn from_params(params: &PlaybackParams) -> Result<Self, ToolError> {
        match params.action {
            PlaybackAction::Start => match &params.track_id {
                Some(track) => Ok(Self::Play(TrackRef::parse(track)?.uri())),
                None => Ok(Self::Resume),
            },
            PlaybackAction::Pause => Ok(Self::Pause),
            PlaybackAction::Skip => {
                if !(1..=MAX_SKIPS).contains(&params.num_skips) {
                    return Err(ToolError::validation(format!(
                        "num_skips must be between 1 and {}",
                        MAX_SKIPS
                    )));
                }
                Ok(Self::Skip(params.num_skips))
            }
            PlaybackAction::Previous => Ok(Self::Previous),
            PlaybackAction::Seek => params
                .position_ms
                .map(Self::Seek)
                .ok_or_else(|| ToolError::validation("position_ms is required for 'seek'")),
            PlaybackAction::Volume => match params.volume_percent {
                Some(volume) if volume <= 100 => Ok(Self::Volume(volume)),
                Some(_) => Err(ToolError::validation("volume_percent must be between 0 and 100")),
                None => Err(ToolError::validation("volume_percent is required for 'volume'")),
            },
            PlaybackAction::Get => Err(ToolError::internal("'get' is not a player command")),
        }
    }
}

// ============================================================================
// Structured Output Types
// ============================================================================

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PlaybackResult {
    pub action: PlaybackAction,
    pub status: String,
    pub playback: Option<PlaybackSummary>,
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct PlaybackTool;

impl PlaybackTool {
    pub const NAME: &'static str = "spotify_playback";

    pub const DESCRIPTION: &'static str = "Control Spotify playback. Get the current state, start or resume playback (optionally with a specific track), pause, skip forward, go back, seek within the track or set the volume. Uses the active device, or the first available device when none is active.";

    #[instrument(skip_all, fields(action = params.action.as_str()))]
    pub async fn execute(api: &dyn SpotifyApi, params: PlaybackParams) -> CallToolResult {
        into_call_result(Self::run(api, params).await)
    }

    async fn run(api: &dyn SpotifyApi, params: PlaybackParams) -> Result<CallToolResult, ToolError> {
        let action = params.action;

        if action == PlaybackAction::Get {
            let state = api.current_playback().await?;
            let playback = state.as_ref().map(PlaybackSummary::from);
            let summary = match state.as_ref().and_then(|s| s.item.as_ref().map(|t| (s, t))) {
                Some((s, track)) if s.is_playing => format!("Now playing: {}", track_label(track)),
                Some((_, track)) => format!("Paused: {}", track_label(track)),
                None => "No track is currently playing".to_string(),
            };
            return Ok(structured_result(
                summary,
                PlaybackResult {
                    action,
                    status: (if playback.is_some() { "ok" } else { "idle" }).to_string(),
                    playback,
                },
            ));
        }

        let command = PlayerCommand::from_params(&params)?;
        let device = resolve_device(api).await?;
        let device_id = device.as_deref();

        let status = match command {
            PlayerCommand::Play(uri) => {
                info!("Starting playback of {}", uri);
                api.start_playback(device_id, Some(std::slice::from_ref(&uri)))
                    .await?;
                format!("Playing {}", uri)
            }
            PlayerCommand::Resume => {
                info!("Resuming playback");
                api.start_playback(device_id, None).await?;
                "Playback resumed".to_string()
            }
            PlayerCommand::Pause => {
                api.pause_playback(device_id).await?;
                "Playback paused".to_string()
            }
            PlayerCommand::Skip(count) => {
                for _ in 0..count {
                    api.next_track(device_id).await?;
                }
                format!("Skipped {} track(s)", count)
            }
            PlayerCommand::Previous => {
                api.previous_track(device_id).await?;
                "Went back to the previous track".to_string()
            }
            PlayerCommand::Seek(position) => {
                api.seek(position, device_id).await?;
                format!("Seeked to {}", format_duration(position))
            }
            PlayerCommand::Volume(volume) => {
                api.set_volume(volume, device_id).await?;
                format!("Volume set to {}%", volume)
            }
        };

        // The command already succeeded; a failed state refresh only drops the snapshot.
        let playback = match api.current_playback().await {
            Ok(state) => state.as_ref().map(PlaybackSummary::from),
            Err(e) => {
                debug!("Could not refresh playback state: {}", e);
                None
            }
        };

        Ok(structured_result(
            status.clone(),
            PlaybackResult {
                action,
                status,
                playback,
            },
        ))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PlaybackParams>(),
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
    use crate::spotify::SpotifyError;
    use crate::spotify::fake::{FakeSpotify, test_device, test_track};
    use crate::spotify::models::PlaybackState;

    fn params(json: serde_json::Value) -> PlaybackParams {
        serde_json::from_value(json).unwrap()
    }

    fn playing_api() -> FakeSpotify {
        FakeSpotify::new()
            .with_devices(vec![test_device("Laptop", true)])
            .with_playback(PlaybackState {
                device: Some(test_device("Laptop", true)),
                is_playing: true,
                repeat_state: "off".into(),
                progress_ms: Some(30_000),
                item: Some(test_track(1)),
                ..Default::default()
            })
    }

    #[test]
    fn test_params_defaults() {
        let p = params(serde_json::json!({ "action": "skip" }));
        assert_eq!(p.action, PlaybackAction::Skip);
        assert_eq!(p.num_skips, 1);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: Result<PlaybackParams, _> =
            serde_json::from_value(serde_json::json!({ "action": "rewind" }));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_playback() {
        let api = playing_api();
        let result = PlaybackTool::execute(&api, params(serde_json::json!({ "action": "get" }))).await;
        assert_eq!(result.is_error, Some(false));

        let body = result.structured_content.unwrap();
        assert_eq!(body["action"], "get");
        assert_eq!(body["playback"]["is_playing"], true);
        assert_eq!(body["playback"]["track"]["name"], "Track 1");
        assert_eq!(body["playback"]["progress"], "0:30");
    }

    #[tokio::test]
    async fn test_get_idle() {
        let api = FakeSpotify::new();
        let result = PlaybackTool::execute(&api, params(serde_json::json!({ "action": "get" }))).await;
        let body = result.structured_content.unwrap();
        assert_eq!(body["status"], "idle");
        assert!(body["playback"].is_null());
    }

    #[tokio::test]
    async fn test_start_track_on_fallback_device() {
        let api = FakeSpotify::new().with_devices(vec![test_device("Phone", false)]);
        let result = PlaybackTool::execute(
            &api,
            params(serde_json::json!({ "action": "start", "track_id": "4uLU6hMCjMI75M1A2tKUQC" })),
        )
        .await;
        assert_eq!(result.is_error, Some(false));
        assert!(
            api.calls()
                .contains(&"start_playback:phone-id:spotify:track:4uLU6hMCjMI75M1A2tKUQC".to_string())
        );
    }

    #[tokio::test]
    async fn test_skip_multiple() {
        let api = playing_api();
        PlaybackTool::execute(&api, params(serde_json::json!({ "action": "skip", "num_skips": 3 }))).await;
        let skips = api.calls().iter().filter(|c| c.starts_with("next_track")).count();
        assert_eq!(skips, 3);
    }

    #[tokio::test]
    async fn test_no_device_is_structured_error() {
        let api = FakeSpotify::new();
        let result = PlaybackTool::execute(&api, params(serde_json::json!({ "action": "pause" }))).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.structured_content.unwrap()["error"]["kind"],
            "NoActiveDevice"
        );
    }

    #[tokio::test]
    async fn test_invalid_track_rejected_before_network() {
        let api = playing_api();
        let result = PlaybackTool::execute(
            &api,
            params(serde_json::json!({ "action": "start", "track_id": "not a track" })),
        )
        .await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            result.structured_content.unwrap()["error"]["kind"],
            "ValidationError"
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_seek_and_volume_validation() {
        let api = playing_api();
        let result = PlaybackTool::execute(&api, params(serde_json::json!({ "action": "seek" }))).await;
        assert_eq!(result.is_error, Some(true));

        let result = PlaybackTool::execute(
            &api,
            params(serde_json::json!({ "action": "volume", "volume_percent": 150 })),
        )
        .await;
        assert_eq!(result.is_error, Some(true));

        let result = PlaybackTool::execute(
            &api,
            params(serde_json::json!({ "action": "volume", "volume_percent": 40 })),
        )
        .await;
        assert_eq!(result.is_error, Some(false));
        assert!(api.calls().contains(&"set_volume:40:-".to_string()));
    }

    #[tokio::test]
    async fn test_premium_required_error() {
        let api = playing_api().fail_all(SpotifyError::Forbidden {
            message: "Premium required".into(),
            reason: crate::spotify::ForbiddenReason::PremiumRequired,
        });
        let result = PlaybackTool::execute(&api, params(serde_json::json!({ "action": "pause" }))).await;
        let body = result.structured_content.unwrap();
        assert_eq!(body["error"]["kind"], "RemoteForbiddenError");
        assert_eq!(body["error"]["details"]["reason"], "premium_required");
    }
}
