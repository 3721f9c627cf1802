// src/fetch/mod.rs
// =============================================================================
// Bulk fetching of paginated bookmark listings.
//
// The API returns at most 50 bookmarks per request, so "all bookmarks" means
// many requests. This module plans them, runs them in rate-limited batches,
// and gathers the results.
// =============================================================================

mod pages;

pub use pages::{
    fetch_all, pacing_delay, FetchFilters, FetchOptions, FetchReport, PageSource,
    MIN_BATCH_DELAY, REQUESTS_PER_MINUTE,
};
