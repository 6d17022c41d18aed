//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file; `common` holds the summary types and
//! helpers they share.

pub mod common;
pub mod get_info;
pub mod liked_songs;
pub mod playback;
pub mod playlist_cover;
pub mod playlist_items;
pub mod playlist_manage;
pub mod playlist_tracks;
pub mod queue;
pub mod search;
pub mod user_playlists;

pub use get_info::{GetInfoParams, GetInfoTool};
pub use liked_songs::{LikedSongsParams, LikedSongsTool};
pub use playback::{PlaybackParams, PlaybackTool};
pub use playlist_cover::{PlaylistCoverParams, PlaylistCoverTool};
pub use playlist_items::{PlaylistItemsParams, PlaylistItemsTool};
pub use playlist_manage::{PlaylistManageParams, PlaylistManageTool};
pub use playlist_tracks::{PlaylistTracksParams, PlaylistTracksTool};
pub use queue::{QueueParams, QueueTool};
pub use search::{SearchParams, SearchTool};
pub use user_playlists::{UserPlaylistsParams, UserPlaylistsTool};
