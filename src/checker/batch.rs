// src/checker/batch.rs
// =============================================================================
// Checks every bookmark's link, a batch at a time.
//
// Items are split into consecutive batches of `concurrency`. All probes of a
// batch run together and the next batch starts only when every one of them
// has finished, so no more than `concurrency` connections are ever open.
// Total time is roughly (number of batches) x (timeout), not items x timeout.
//
// Bookmarks without a link are skipped. Live links are dropped right away;
// only failures are kept, in the same order as the input.
//
// Rust concepts:
// - Slices and chunks(): Split the input into batches without copying it
// - Generics with trait bounds: Works with any LinkProbe, real or fake
// - Iterator adapters: filter_map and zip keep bookmarks paired with outcomes
// =============================================================================

use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use super::http::{HttpProbe, LinkProbe, LinkStatus};
use crate::error::Result;
use crate::raindrop::Bookmark;

/// Default per-request timeout for link checks.
pub const DEFAULT_LINK_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of probes per batch.
pub const DEFAULT_LINK_CONCURRENCY: usize = 20;

/// A bookmark whose link failed, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokenLink {
    pub bookmark: Bookmark,
    pub status: LinkStatus,
}

/// Probes each bookmark's link with `probe` and returns the failures.
///
/// Never fails: every per-link problem becomes a [`LinkStatus`].
pub async fn check_links_with<P>(probe: &P, items: &[Bookmark], concurrency: usize) -> Vec<BrokenLink>
where
    P: LinkProbe + ?Sized,
{
    // chunks(0) panics, so a batch always holds at least one bookmark
    let concurrency = concurrency.max(1);
    let mut broken = Vec::new();

    for (index, batch) in items.chunks(concurrency).enumerate() {
        // Pair each bookmark with its URL; bookmarks without one drop out here
        let targets: Vec<(&Bookmark, &str)> = batch
            .iter()
            .filter_map(|bookmark| bookmark.url().map(|url| (bookmark, url)))
            .collect();

        // Every probe of this batch runs at once; we wait for the slowest
        let outcomes = join_all(targets.iter().map(|(_, url)| probe.probe(url))).await;

        let before = broken.len();
        for ((bookmark, _), outcome) in targets.into_iter().zip(outcomes) {
            // into_failure() returns None for a live link
            if let Some(status) = outcome.into_failure() {
                broken.push(BrokenLink {
                    bookmark: bookmark.clone(),
                    status,
                });
            }
        }

        debug!(
            batch = index + 1,
            probed = batch.len(),
            failed = broken.len() - before,
            "link batch complete"
        );
    }

    broken
}

/// Checks links over HTTP with the given per-request `timeout`.
///
/// The only possible error is failing to build the HTTP client.
pub async fn check_links(
    items: &[Bookmark],
    timeout: Duration,
    concurrency: usize,
) -> Result<Vec<BrokenLink>> {
    let probe = HttpProbe::new(timeout)?;
    info!(
        items = items.len(),
        timeout_secs = timeout.as_secs_f64(),
        concurrency,
        "checking links"
    );
    let broken = check_links_with(&probe, items, concurrency).await;
    info!(broken = broken.len(), "link check complete");
    Ok(broken)
}
