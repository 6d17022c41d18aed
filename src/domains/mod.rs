//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain represents a specific area of functionality within the MCP
//! server: tools act on Spotify, resources read from it, prompts guide an
//! assistant through the tools, and notifications push playback changes.

pub mod notifications;
pub mod prompts;
pub mod resources;
pub mod tools;
