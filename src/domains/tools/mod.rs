//! Tools domain module.
//!
//! Tools are the Spotify operations MCP clients can call: playback, search,
//! catalog lookups, playlist and library management.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `batch.rs` - Chunked playlist mutations
//! - `pagination.rs` - Offset/limit walker for listings
//! - `result.rs` - Success and error result shaping
//! - `router.rs` - Dynamic ToolRouter builder for the STDIO transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `error.rs` - Tool error kinds
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params, `execute()`, `to_tool()` and `create_route()`
//! 3. Export in `definitions/mod.rs`
//! 4. Add route in `router.rs` using `with_route()`
//! 5. Register in `registry.rs` for HTTP support

pub mod batch;
pub mod definitions;
pub mod error;
pub mod pagination;
mod registry;
pub mod result;
pub mod router;

pub use error::{ErrorKind, ToolError};
pub use registry::{ToolCall, ToolRegistry};
pub use router::build_tool_router;
