//! Spotify MCP Server Library
//!
//! A Model Context Protocol (MCP) server that exposes the Spotify Web API to
//! AI assistants: playback control, search, playlist and library management.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: MCP tools that act on Spotify
//!   - **resources**: read-only views of the user's Spotify state
//!   - **prompts**: playlist-curation prompt templates
//!   - **notifications**: playback change notifications
//! - **spotify**: the Web API client behind the `SpotifyApi` trait
//!
//! # Example
//!
//! ```rust,no_run
//! use spotify_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;
pub mod spotify;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
