// src/fetch/pages.rs
// =============================================================================
// This module fetches every bookmark of a collection, page by page.
//
// How it works:
// 1. Fetch page 0 on its own. It tells us whether there is more to fetch and,
//    usually, the total number of matching bookmarks (the "count" hint).
// 2. If page 0 came back short, we already have everything.
// 3. With a count hint we know exactly which pages remain. They are fetched in
//    batches of `concurrency` requests, sleeping between batches to stay under
//    the API's 120 requests/minute limit. Wider batches sleep longer (see
//    `pacing_delay`).
// 4. Without a hint we scan forward window by window until a whole batch comes
//    back empty.
// Both paths stop after `max_batches` batches and flag the result truncated.
//
// Batches are strict barriers: every request of a batch settles before the
// next batch starts, so at most `concurrency` requests are ever in flight.
//
// A page that fails after page 0 is logged, counted and treated as empty.
// It is not retried.
//
// Rust concepts:
// - Traits with `impl Future` returns: PageSource lets tests swap the API out
// - join_all: Runs every future of a batch at once and waits for all of them
// - Lifetimes: FetchSession borrows the caller's filters instead of cloning
// - Saturating arithmetic: Page numbers never wrap around, whatever the input
// =============================================================================

use futures::future::join_all;  // join_all waits for a whole Vec of futures
use std::future::Future;
use std::ops::Range;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::raindrop::{Bookmark, RaindropClient, RaindropPage, SearchQuery, MAX_PER_PAGE};

/// Requests per minute we allow ourselves. The API's ceiling is 120.
pub const REQUESTS_PER_MINUTE: u64 = 100;

/// Shortest pause between exact-path batches.
pub const MIN_BATCH_DELAY: Duration = Duration::from_secs(6);

/// Anything that can return one page of a bookmark listing.
///
/// `RaindropClient` is the real implementation; tests use in-memory sources.
pub trait PageSource {
    fn fetch_page(
        &self,
        collection_id: i64,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<RaindropPage>> + Send;
}

// The real source is just the search endpoint
impl PageSource for RaindropClient {
    fn fetch_page(
        &self,
        collection_id: i64,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<RaindropPage>> + Send {
        self.search_raindrops(collection_id, query)
    }
}

/// Search filters forwarded to every page request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchFilters {
    pub search: Option<String>,
    pub tags: Vec<String>,
}

/// Tuning knobs for a bulk fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Items per page. Clamped to 1..=50.
    pub page_size: u32,
    /// Page requests issued together in one batch.
    pub concurrency: usize,
    /// Pause between batches when the total count is known.
    pub batch_delay: Duration,
    /// Upper bound on batches issued after page 0.
    pub max_batches: usize,
}

impl FetchOptions {
    /// Options for `concurrency` requests per batch, paced so that a full
    /// batch every `batch_delay` stays within [`REQUESTS_PER_MINUTE`].
    pub fn with_concurrency(concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        FetchOptions {
            concurrency,
            batch_delay: pacing_delay(concurrency),
            ..FetchOptions::default()
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        // 10 requests every 6 seconds = 100 requests/minute
        FetchOptions {
            page_size: MAX_PER_PAGE,
            concurrency: 10,
            batch_delay: MIN_BATCH_DELAY,
            max_batches: 100,
        }
    }
}

/// Pause needed after a batch of `concurrency` requests:
/// `max(6s, concurrency x 60s / REQUESTS_PER_MINUTE)`.
pub fn pacing_delay(concurrency: usize) -> Duration {
    // u64 math in milliseconds; saturating so huge values cannot overflow
    let requests = u64::try_from(concurrency).unwrap_or(u64::MAX);
    let millis = requests.saturating_mul(60_000) / REQUESTS_PER_MINUTE;
    Duration::from_millis(millis).max(MIN_BATCH_DELAY)
}

/// What a bulk fetch returned, plus enough accounting to spot missing data.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    pub items: Vec<Bookmark>,
    /// Total count reported by page 0, if any.
    pub total_hint: Option<u64>,
    /// Page requests issued, page 0 included.
    pub pages_requested: usize,
    /// Requests that failed and were counted as empty pages.
    pub failed_pages: usize,
    /// Batches issued after page 0.
    pub batches: usize,
    /// The fetch stopped at the batch limit before reaching the end.
    pub truncated: bool,
}

impl FetchReport {
    pub fn into_items(self) -> Vec<Bookmark> {
        self.items
    }
}

// State of one fetch_all call.
//
// The 'a lifetime says: this struct borrows the filters and must not
// outlive the caller's FetchFilters.
struct FetchSession<'a> {
    collection_id: i64,
    filters: &'a FetchFilters,
    page_size: u32,
    report: FetchReport,
}

impl<'a> FetchSession<'a> {
    fn query(&self, page: u32) -> SearchQuery {
        SearchQuery {
            search: self.filters.search.clone(),
            tags: self.filters.tags.clone(),
            page,
            per_page: self.page_size,
            ..Default::default()
        }
    }

    // Issues one request per page concurrently, waits for all of them, and
    // appends the items. Returns how many pages had items.
    async fn run_batch<S>(&mut self, source: &S, pages: &[u32]) -> usize
    where
        S: PageSource + ?Sized,
    {
        // Build the queries first so the futures can borrow them
        let queries: Vec<SearchQuery> = pages.iter().map(|&page| self.query(page)).collect();

        // Nothing is sent until join_all polls the futures; then all go out together
        let results = join_all(
            queries
                .iter()
                .map(|query| source.fetch_page(self.collection_id, query)),
        )
        .await;

        self.report.pages_requested += pages.len();
        self.report.batches += 1;

        // zip pairs each page number with its result, in request order
        let mut non_empty = 0;
        for (page, result) in pages.iter().zip(results) {
            match result {
                Ok(fetched) if !fetched.items.is_empty() => {
                    non_empty += 1;
                    self.report.items.extend(fetched.items);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(page, error = %e, "page fetch failed, treating it as empty");
                    self.report.failed_pages += 1;
                }
            }
        }

        debug!(
            first = pages.first().copied().unwrap_or_default(),
            last = pages.last().copied().unwrap_or_default(),
            non_empty,
            total = self.report.items.len(),
            "batch complete"
        );
        non_empty
    }

    fn mark_truncated(&mut self, max_batches: usize, next_page: u32) {
        warn!(
            max_batches,
            next_page,
            items = self.report.items.len(),
            "reached the batch limit, results may be incomplete"
        );
        self.report.truncated = true;
    }
}

/// Fetches every bookmark in `collection_id` that matches `filters`.
///
/// Only a failure of page 0 is returned as an error; later page failures are
/// absorbed and counted in [`FetchReport::failed_pages`].
pub async fn fetch_all<S>(
    source: &S,
    collection_id: i64,
    filters: &FetchFilters,
    options: &FetchOptions,
) -> Result<FetchReport>
where
    S: PageSource + ?Sized,
{
    // The API never returns more than 50 per page, and a batch holds at least one page
    let page_size = options.page_size.clamp(1, MAX_PER_PAGE);
    let concurrency = window_width(options.concurrency);

    let mut session = FetchSession {
        collection_id,
        filters,
        page_size,
        report: FetchReport::default(),
    };

    // Page 0 is the only request whose failure we propagate (the ? operator)
    let first = source
        .fetch_page(collection_id, &session.query(0))
        .await?;
    let first_len = first.items.len();
    session.report.pages_requested = 1;
    session.report.total_hint = first.count;
    session.report.items.extend(first.items);

    info!(collection_id, first_page = first_len, total_hint = ?first.count, "fetched first page");

    // A short first page means there is nothing after it
    if first_len < page_size as usize {
        return Ok(session.report);
    }

    match first.count {
        Some(total) => {
            fetch_exact(&mut session, source, total, concurrency, options).await
        }
        None => scan_open_ended(&mut session, source, concurrency, options.max_batches).await,
    }

    info!(
        collection_id,
        items = session.report.items.len(),
        pages = session.report.pages_requested,
        failed_pages = session.report.failed_pages,
        "fetch complete"
    );
    Ok(session.report)
}

// Known total: fetch exactly pages 1..ceil(total / page_size).
//
// Batches are generated one at a time, so a wild count hint costs at most
// `max_batches` batches and never a giant page list up front.
async fn fetch_exact<S>(
    session: &mut FetchSession<'_>,
    source: &S,
    total: u64,
    concurrency: u32,
    options: &FetchOptions,
) where
    S: PageSource + ?Sized,
{
    let page_size = u64::from(session.page_size);
    // Page numbers are u32 on the wire, so anything past u32::MAX is unreachable
    let last_page = total.div_ceil(page_size).min(u64::from(u32::MAX));
    let mut next: u32 = 1;

    for index in 0..options.max_batches {
        if u64::from(next) >= last_page {
            return;
        }
        // Sleep between batches, never before the first one
        if index > 0 {
            tokio::time::sleep(options.batch_delay).await;
        }
        let window = page_window(next, concurrency);
        let end = window.end.min(last_page as u32);
        let pages: Vec<u32> = (window.start..end).collect();
        session.run_batch(source, &pages).await;
        next = end;
    }

    if u64::from(next) < last_page {
        session.mark_truncated(options.max_batches, next);
    }
}

// Unknown total: advance window by window until a batch is entirely empty.
async fn scan_open_ended<S>(
    session: &mut FetchSession<'_>,
    source: &S,
    concurrency: u32,
    max_batches: usize,
) where
    S: PageSource + ?Sized,
{
    let mut start: u32 = 1;

    for _ in 0..max_batches {
        let window = page_window(start, concurrency);
        let next = window.end;
        let pages: Vec<u32> = window.collect();
        // An all-empty batch (failures count as empty) means we ran off the end
        if pages.is_empty() || session.run_batch(source, &pages).await == 0 {
            return;
        }
        start = next;
    }

    session.mark_truncated(max_batches, start);
}

// Batch width as a page count; usize values past u32::MAX are capped.
fn window_width(concurrency: usize) -> u32 {
    u32::try_from(concurrency.max(1)).unwrap_or(u32::MAX)
}

// The pages of one batch starting at `start`, stopping at u32::MAX.
fn page_window(start: u32, width: u32) -> Range<u32> {
    start..start.saturating_add(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::HashSet;
    use std::sync::Mutex;

    // In-memory collection of `total` bookmarks served `per_page` at a time.
    struct FakeSource {
        total: usize,
        with_count: bool,
        endless: bool,
        failing: HashSet<u32>,
        requests: Mutex<Vec<u32>>,
    }

    impl FakeSource {
        fn new(total: usize, with_count: bool) -> Self {
            FakeSource {
                total,
                with_count,
                endless: false,
                failing: HashSet::new(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl PageSource for FakeSource {
        fn fetch_page(
            &self,
            _collection_id: i64,
            query: &SearchQuery,
        ) -> impl Future<Output = Result<RaindropPage>> + Send {
            self.requests.lock().unwrap().push(query.page);

            let per_page = query.per_page as usize;
            let start = query.page as usize * per_page;
            let end = if self.endless {
                start + per_page
            } else {
                (start + per_page).min(self.total)
            };

            let result = if self.failing.contains(&query.page) {
                Err(Error::Api {
                    status: 500,
                    url: format!("fake://page/{}", query.page),
                })
            } else {
                let items = (start..end.max(start))
                    .map(|i| Bookmark {
                        id: Some(i as i64),
                        link: Some(format!("https://example.com/{}", i)),
                        ..Default::default()
                    })
                    .collect();
                Ok(RaindropPage {
                    items,
                    count: self.with_count.then_some(self.total as u64),
                })
            };

            async move { result }
        }
    }

    fn options(concurrency: usize) -> FetchOptions {
        FetchOptions {
            page_size: 50,
            concurrency,
            batch_delay: Duration::ZERO,
            max_batches: 100,
        }
    }

    fn ids(report: &FetchReport) -> HashSet<i64> {
        report.items.iter().filter_map(|b| b.id).collect()
    }

    #[tokio::test]
    async fn test_small_collection_single_request() {
        let source = FakeSource::new(30, true);
        let report = fetch_all(&source, 0, &FetchFilters::default(), &options(10))
            .await
            .unwrap();
        assert_eq!(source.requested(), vec![0]);
        assert_eq!(report.items.len(), 30);
        assert_eq!(report.batches, 0);
    }

    #[tokio::test]
    async fn test_exactly_one_full_page_with_count() {
        let source = FakeSource::new(50, true);
        let report = fetch_all(&source, 0, &FetchFilters::default(), &options(10))
            .await
            .unwrap();
        assert_eq!(source.requested(), vec![0]);
        assert_eq!(report.items.len(), 50);
    }

    #[tokio::test]
    async fn test_120_items_fetch_three_pages() {
        let source = FakeSource::new(120, true);
        let report = fetch_all(&source, 0, &FetchFilters::default(), &options(10))
            .await
            .unwrap();

        let mut requested = source.requested();
        requested.sort_unstable();
        assert_eq!(requested, vec![0, 1, 2]);
        assert_eq!(report.items.len(), 120);
        assert_eq!(ids(&report).len(), 120);
        assert_eq!(report.total_hint, Some(120));
    }

    #[tokio::test]
    async fn test_exact_path_batches() {
        // 1000 items -> 20 pages -> 19 after page 0 -> 4 batches of up to 5
        let source = FakeSource::new(1000, true);
        let report = fetch_all(&source, 0, &FetchFilters::default(), &options(5))
            .await
            .unwrap();

        assert_eq!(source.requested().len(), 20);
        assert_eq!(report.pages_requested, 20);
        assert_eq!(report.batches, 4);
        assert_eq!(report.items.len(), 1000);
        assert_eq!(ids(&report).len(), 1000);
    }

    #[tokio::test]
    async fn test_exact_path_sleeps_between_batches_only() {
        // 250 items -> pages 1..=4 -> two batches of 2 -> one pause
        let source = FakeSource::new(250, true);
        let opts = FetchOptions {
            batch_delay: Duration::from_millis(40),
            ..options(2)
        };

        let started = std::time::Instant::now();
        let report = fetch_all(&source, 0, &FetchFilters::default(), &opts)
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(report.batches, 2);
        assert_eq!(report.items.len(), 250);
        assert!(elapsed >= Duration::from_millis(40));
        assert!(elapsed < Duration::from_millis(80 + 500));
    }

    #[tokio::test]
    async fn test_open_ended_scan_stops_on_empty_batch() {
        let source = FakeSource::new(120, false);
        let report = fetch_all(&source, 0, &FetchFilters::default(), &options(3))
            .await
            .unwrap();

        // page 0, then [1,2,3] (50, 20, 0), then [4,5,6] all empty
        assert_eq!(source.requested().len(), 7);
        assert_eq!(report.items.len(), 120);
        assert_eq!(report.batches, 2);
        assert!(!report.truncated);
    }

    #[tokio::test]
    async fn test_open_ended_scan_single_empty_batch() {
        let source = FakeSource::new(50, false);
        let report = fetch_all(&source, 0, &FetchFilters::default(), &options(4))
            .await
            .unwrap();

        let mut requested = source.requested();
        requested.sort_unstable();
        assert_eq!(requested, vec![0, 1, 2, 3, 4]);
        assert_eq!(report.items.len(), 50);
    }

    #[tokio::test]
    async fn test_failed_page_is_counted_not_fatal() {
        let mut source = FakeSource::new(200, false);
        source.failing.insert(2);

        let report = fetch_all(&source, 0, &FetchFilters::default(), &options(2))
            .await
            .unwrap();

        // page 2's 50 items are lost
        assert_eq!(report.items.len(), 150);
        assert_eq!(report.failed_pages, 1);
        assert!(!ids(&report).contains(&100));
    }

    #[tokio::test]
    async fn test_failed_page_on_exact_path() {
        let mut source = FakeSource::new(120, true);
        source.failing.insert(1);

        let report = fetch_all(&source, 0, &FetchFilters::default(), &options(10))
            .await
            .unwrap();
        assert_eq!(report.items.len(), 70);
        assert_eq!(report.failed_pages, 1);
    }

    #[tokio::test]
    async fn test_first_page_failure_is_fatal() {
        let mut source = FakeSource::new(120, true);
        source.failing.insert(0);

        let result = fetch_all(&source, 0, &FetchFilters::default(), &options(10)).await;
        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
        assert_eq!(source.requested(), vec![0]);
    }

    #[tokio::test]
    async fn test_safety_limit_truncates() {
        let mut source = FakeSource::new(0, false);
        source.endless = true;
        let opts = FetchOptions {
            max_batches: 3,
            ..options(2)
        };

        let report = fetch_all(&source, 0, &FetchFilters::default(), &opts)
            .await
            .unwrap();

        assert!(report.truncated);
        assert_eq!(source.requested().len(), 1 + 3 * 2);
        assert_eq!(report.items.len(), 7 * 50);
    }

    #[tokio::test]
    async fn test_page_size_is_clamped() {
        let source = FakeSource::new(120, true);
        let opts = FetchOptions {
            page_size: 500,
            ..options(10)
        };
        let report = fetch_all(&source, 0, &FetchFilters::default(), &opts)
            .await
            .unwrap();
        assert_eq!(report.pages_requested, 3);
        assert_eq!(report.items.len(), 120);
    }

    #[test]
    fn test_pacing_delay_scales_with_concurrency() {
        assert_eq!(pacing_delay(1), MIN_BATCH_DELAY);
        assert_eq!(pacing_delay(10), Duration::from_secs(6));
        assert_eq!(pacing_delay(20), Duration::from_secs(12));
        assert_eq!(pacing_delay(50), Duration::from_secs(30));
        assert_eq!(FetchOptions::with_concurrency(50).batch_delay, Duration::from_secs(30));

        // A full batch per pause never exceeds the per-minute budget
        for concurrency in [1, 7, 10, 11, 33, 50, 100, 1000, 65535] {
            let delay = pacing_delay(concurrency).as_secs_f64();
            let per_minute = concurrency as f64 * 60.0 / delay;
            assert!(per_minute <= REQUESTS_PER_MINUTE as f64, "{} -> {}", concurrency, per_minute);
        }
    }

    #[test]
    fn test_pacing_delay_huge_concurrency_does_not_overflow() {
        assert!(pacing_delay(usize::MAX) > Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wide_batches_get_longer_pauses() {
        // 5000 items -> 100 pages -> page 0, then batches of 50 and 49
        let source = FakeSource::new(5000, true);
        let opts = FetchOptions::with_concurrency(50);

        let started = tokio::time::Instant::now();
        let report = fetch_all(&source, 0, &FetchFilters::default(), &opts)
            .await
            .unwrap();
        let elapsed = started.elapsed();

        assert_eq!(report.items.len(), 5000);
        assert_eq!(report.batches, 2);
        // One pause of 50 x 60s / 100 between the two batches, not the flat 6s
        assert!(elapsed >= Duration::from_secs(30));
        assert!(elapsed < Duration::from_secs(31));
    }

    #[tokio::test]
    async fn test_absurd_count_hint_stops_at_batch_limit() {
        let mut source = FakeSource::new(1_000_000_000_000, true);
        source.endless = true;
        let opts = FetchOptions {
            max_batches: 2,
            ..options(3)
        };

        let report = fetch_all(&source, 0, &FetchFilters::default(), &opts)
            .await
            .unwrap();

        assert!(report.truncated);
        assert_eq!(source.requested().len(), 1 + 2 * 3);
        assert_eq!(report.batches, 2);
    }

    #[tokio::test]
    async fn test_exact_path_within_limit_is_not_truncated() {
        let source = FakeSource::new(1000, true);
        let opts = FetchOptions {
            max_batches: 4,
            ..options(5)
        };
        let report = fetch_all(&source, 0, &FetchFilters::default(), &opts)
            .await
            .unwrap();
        assert!(!report.truncated);
        assert_eq!(report.items.len(), 1000);
    }

    #[test]
    fn test_page_window_saturates() {
        assert_eq!(page_window(1, 10), 1..11);
        assert_eq!(page_window(u32::MAX - 2, 10), u32::MAX - 2..u32::MAX);
        assert!(page_window(u32::MAX, 10).is_empty());
    }

    #[test]
    fn test_window_width_caps_large_concurrency() {
        assert_eq!(window_width(0), 1);
        assert_eq!(window_width(10), 10);
        assert_eq!(window_width(usize::MAX), u32::MAX);
    }
}
