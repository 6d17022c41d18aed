//! Resource definitions module.
//!
//! Each resource is defined in its own file with its URI, metadata and a
//! reader that fetches live content from Spotify.
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs` and `service.rs`

pub mod current_user;
pub mod devices;
pub mod playback;
pub mod playlist;
pub mod queue;

use async_trait::async_trait;

use super::error::ResourceError;
use crate::spotify::SpotifyApi;

pub use current_user::CurrentUserResource;
pub use devices::DevicesResource;
pub use playback::PlaybackResource;
pub use playlist::PlaylistResource;
pub use queue::QueueResource;

/// Trait for resource definitions.
///
/// Each resource must implement this trait to provide its metadata and content.
#[async_trait]
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str = "application/json";

    /// Fetch the current content.
    async fn read(api: &dyn SpotifyApi) -> Result<serde_json::Value, ResourceError>;
}
