// src/mcp/mod.rs
// =============================================================================
// MCP (Model Context Protocol) tools for AI assistants.
//
// Submodules:
// - args: typed, defaulted tool arguments
// - format: the text each tool returns
// - server: the rmcp handler wiring tools to crate operations
//
// Tools: list_collections, search_bookmarks, get_bookmark, list_tags,
// get_statistics, find_duplicates, find_broken_links.
// =============================================================================

pub mod args;
mod format;
mod server;

pub use server::RaindropServer;
