// src/raindrop/mod.rs
// =============================================================================
// Everything that talks to the Raindrop.io REST API.
//
// Submodules:
// - client: the authenticated HTTP client, one method per endpoint
// - types: serde models for bookmarks, collections, tags and pages
// =============================================================================

mod client;
mod types;

pub use client::{RaindropClient, SearchQuery};
pub use types::{
    Bookmark, Collection, ObjectRef, RaindropPage, Tag, ALL_COLLECTIONS, MAX_PER_PAGE, TRASH,
    UNSORTED,
};
