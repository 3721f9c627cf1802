// src/lib.rs
// =============================================================================
// raindrop-guardian: search, de-duplicate and link-check Raindrop.io bookmarks.
//
// Modules (leaves first):
// - config: token and settings from the environment / .env
// - raindrop: the REST client and API types
// - fetch: bulk, rate-limited fetching of every page of a collection
// - checker: batched liveness checks of bookmark URLs
// - analysis: duplicate groups, tag filtering, statistics
// - report: text / JSON / Markdown reports and saving them to disk
// - mcp: the MCP tool server
// - logging: tracing subscriber setup shared by the binaries
//
// Two binaries sit on top: `raindrop-guardian` (report CLI, src/main.rs) and
// `raindrop-mcp` (MCP over stdio, src/bin/raindrop-mcp.rs).
// =============================================================================

pub mod analysis;
pub mod checker;
pub mod config;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod mcp;
pub mod raindrop;
pub mod report;

pub use error::{Error, Result};
