//! Playback change notifications.
//!
//! After a client initializes, a [`PlaybackMonitor`] polls the current
//! playback state and tells the client that `spotify://playback/current`
//! changed whenever the difference is worth re-reading. The task ends as soon
//! as a notification cannot be delivered.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rmcp::model::ResourceUpdatedNotificationParam;
use rmcp::{Peer, RoleServer};
use tracing::{debug, info, warn};

use crate::domains::resources::ResourceDefinition;
use crate::domains::resources::definitions::PlaybackResource;
use crate::spotify::models::PlaybackState;
use crate::spotify::{SpotifyApi, SpotifyResult};

/// Volume difference (percentage points) that counts as a change.
const VOLUME_THRESHOLD: u32 = 5;

/// Progress jump (ms) that counts as a seek rather than normal playback.
const PROGRESS_THRESHOLD_MS: u64 = 10_000;

/// The parts of the playback state that change detection looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub track_id: Option<String>,
    pub device_name: Option<String>,
    pub shuffle_state: bool,
    pub repeat_state: String,
    pub volume_percent: u32,
    pub progress_ms: u64,
}

impl PlaybackSnapshot {
    /// Snapshot of an optional state; nothing playing is the default snapshot.
    pub fn from_state(state: Option<&PlaybackState>) -> Self {
        state.map(Self::from).unwrap_or_default()
    }
}

impl From<&PlaybackState> for PlaybackSnapshot {
    fn from(state: &PlaybackState) -> Self {
        Self {
            is_playing: state.is_playing,
            track_id: state.item.as_ref().and_then(|t| t.id.clone()),
            device_name: state.device.as_ref().map(|d| d.name.clone()),
            shuffle_state: state.shuffle_state,
            repeat_state: state.repeat_state.clone(),
            volume_percent: state
                .device
                .as_ref()
                .and_then(|d| d.volume_percent)
                .unwrap_or(0),
            progress_ms: state.progress_ms.unwrap_or(0),
        }
    }
}

/// Whether moving from `prev` to `next` deserves a notification.
pub fn has_significant_change(prev: &PlaybackSnapshot, next: &PlaybackSnapshot) -> bool {
    prev.is_playing != next.is_playing
        || prev.track_id != next.track_id
        || prev.device_name != next.device_name
        || prev.shuffle_state != next.shuffle_state
        || prev.repeat_state != next.repeat_state
        || prev.volume_percent.abs_diff(next.volume_percent) > VOLUME_THRESHOLD
        || prev.progress_ms.abs_diff(next.progress_ms) > PROGRESS_THRESHOLD_MS
}

/// Where resource-updated notifications are delivered.
#[async_trait]
pub trait ResourceNotifier: Send + Sync {
    /// Fails once the receiving side has gone away.
    async fn resource_updated(&self, uri: &str) -> Result<(), String>;
}

#[async_trait]
impl ResourceNotifier for Peer<RoleServer> {
    async fn resource_updated(&self, uri: &str) -> Result<(), String> {
        self.notify_resource_updated(ResourceUpdatedNotificationParam {
            uri: uri.to_string(),
        })
        .await
        .map_err(|e| e.to_string())
    }
}

/// Polls playback and notifies on significant changes.
pub struct PlaybackMonitor {
    api: Arc<dyn SpotifyApi>,
    poll_interval: Duration,
    error_interval: Duration,
    last: Option<PlaybackSnapshot>,
}

impl PlaybackMonitor {
    pub fn new(api: Arc<dyn SpotifyApi>, poll_interval: Duration) -> Self {
        Self {
            api,
            poll_interval,
            error_interval: poll_interval * 2,
            last: None,
        }
    }

    /// Fetch the state once and record it; `true` when a notification is due.
    ///
    /// The first successful poll always counts as a change.
    pub async fn poll(&mut self) -> SpotifyResult<bool> {
        let state = self.api.current_playback().await?;
        let next = PlaybackSnapshot::from_state(state.as_ref());
        let changed = self
            .last
            .as_ref()
            .is_none_or(|prev| has_significant_change(prev, &next));
        if changed {
            debug!(?next, "Playback state changed");
            self.last = Some(next);
        }
        Ok(changed)
    }

    /// Run until the notifier fails.
    pub async fn run<N: ResourceNotifier + ?Sized>(mut self, notifier: &N) {
        info!(
            interval_secs = self.poll_interval.as_secs_f64(),
            "Starting playback monitor"
        );
        loop {
            let wait = match self.poll().await {
                Ok(true) => {
                    if let Err(e) = notifier.resource_updated(PlaybackResource::URI).await {
                        info!("Stopping playback monitor: {}", e);
                        return;
                    }
                    self.poll_interval
                }
                Ok(false) => self.poll_interval,
                Err(e) => {
                    warn!("Playback poll failed: {}", e);
                    self.error_interval
                }
            };
            tokio::time::sleep(wait).await;
        }
    }
}
