// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - http: the HEAD-request probe and the classification of its outcomes
// - batch: runs probes over a bookmark list in bounded batches
// =============================================================================

mod batch;
mod http;

pub use batch::{
    check_links, check_links_with, BrokenLink, DEFAULT_LINK_CONCURRENCY, DEFAULT_LINK_TIMEOUT,
};
pub use http::{HttpProbe, LinkProbe, LinkStatus, ProbeOutcome, MAX_ERROR_LEN};
