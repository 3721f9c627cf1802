// src/main.rs
// =============================================================================
// This is the entry point of the report generator.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load configuration (RAINDROP_TOKEN etc.) and build the API client once
// 3. Run the chosen mode: search, duplicates or link checking
// 4. Save a timestamped report and print where it went
//
// Progress is narrated on stdout; diagnostics go to stderr through tracing.
// On an unrecoverable error we print it and exit with code 1, and no report
// is written.
//
// Rust concepts used:
// - async/await: Pages and link checks are network calls run concurrently
// - anyhow::Context: Adds a human-readable line on top of a library error
// - match: Pattern matching on the Mode the CLI resolved to
// - Borrowing: The client and the Cli are passed to each handler by reference (&)
// =============================================================================

// Module declarations - the library half lives in src/lib.rs
mod cli;           // src/cli.rs - command-line parsing

// anyhow::Result lets us return any error type with the ? operator
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cli::{Cli, Mode};
use raindrop_guardian::analysis::{find_duplicates, redundant_count};
use raindrop_guardian::checker::check_links;
use raindrop_guardian::config::Config;
use raindrop_guardian::fetch::{fetch_all, FetchFilters, FetchOptions};
use raindrop_guardian::logging;
use raindrop_guardian::raindrop::{RaindropClient, SearchQuery, MAX_PER_PAGE};
use raindrop_guardian::report::{
    save_report, BrokenLinksReport, DuplicatesReport, Report, ReportFormat, SearchReport,
};

// The #[tokio::main] attribute creates a tokio runtime and runs our async main inside it
#[tokio::main]
async fn main() {
    // Logs go to stderr, filtered by RUST_LOG
    logging::init(logging::DEFAULT_FILTER);

    if let Err(e) = run().await {
        // {:#} prints the whole context chain on one line
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Parse command-line arguments (clap handles --help and bad input for us)
    let cli = Cli::parse();

    let config = Config::from_env()
        .context("Make sure RAINDROP_TOKEN is set in your environment or .env file")?;
    let reports_dir = cli.reports_dir.clone().unwrap_or_else(|| config.reports_dir.clone());

    // One client for the whole run; it pools connections internally
    let client = RaindropClient::new(&config).context("Failed to create API client")?;

    // Dispatch to the handler for the requested mode
    match cli.mode() {
        Mode::Search(query) => search_and_save(&client, &cli, query, &reports_dir).await,
        Mode::Duplicates => duplicates_report(&client, &cli, &reports_dir).await,
        Mode::CheckLinks => broken_links_report(&client, &cli, &reports_dir).await,
    }
}

// Wider batches get proportionally longer pauses, so raising
// --max-concurrent never pushes us past the API's rate limit
fn fetch_options(cli: &Cli) -> FetchOptions {
    FetchOptions::with_concurrency(usize::from(cli.max_concurrent))
}

// Search mode: fetch every matching bookmark (or just page 0) and save them
async fn search_and_save(client: &RaindropClient, cli: &Cli, query: &str, reports_dir: &Path) -> Result<()> {
    println!("Searching for: '{}'", query);
    if !cli.tags.is_empty() {
        println!("With tags: {}", cli.tags.join(", "));
    }
    println!("Collection: {}", cli.collection);
    println!("Fetch all: {}\n", !cli.first_page_only);

    let items = if cli.first_page_only {
        let page_query = SearchQuery {
            search: Some(query.to_string()),
            tags: cli.tags.clone(),
            per_page: MAX_PER_PAGE,
            ..Default::default()
        };
        let page = client
            .search_raindrops(cli.collection, &page_query)
            .await
            .context("Failed to fetch the first page")?;
        println!("Found {} results (first page only)\n", page.items.len());
        page.items
    } else {
        let filters = FetchFilters {
            search: Some(query.to_string()),
            tags: cli.tags.clone(),
        };
        println!("Fetching pages (batches of {})...", cli.max_concurrent);
        let fetched = fetch_all(client, cli.collection, &filters, &fetch_options(cli))
            .await
            .context("Failed to fetch the first page")?;
        print_fetch_summary(&fetched);
        fetched.into_items()
    };

    if items.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    let count = items.len();
    let report = Report::Search(SearchReport {
        query: query.to_string(),
        tags: cli.tags.clone(),
        collection_id: cli.collection,
        generated: Local::now(),
        items,
    });

    let path = write_report(reports_dir, &report, cli.format)?;
    println!("  Results: {} bookmarks", count);
    print_size(&path);
    Ok(())
}

async fn duplicates_report(client: &RaindropClient, cli: &Cli, reports_dir: &Path) -> Result<()> {
    println!("Finding duplicate URLs in collection {}...", cli.collection);
    println!("This may take a while with large collections...\n");

    let fetched = fetch_all(client, cli.collection, &FetchFilters::default(), &fetch_options(cli))
        .await
        .context("Failed to fetch bookmarks")?;
    print_fetch_summary(&fetched);
    let items = fetched.into_items();

    let groups = find_duplicates(&items);
    if groups.is_empty() {
        println!("\n[OK] No duplicate bookmarks found!");
        return Ok(());
    }

    let redundant = redundant_count(&groups);
    let duplicate_urls = groups.len();
    println!(
        "\n[FOUND] {} URLs with duplicates ({} redundant bookmarks)\n",
        duplicate_urls, redundant
    );

    let report = Report::Duplicates(DuplicatesReport {
        collection_id: cli.collection,
        generated: Local::now(),
        scanned: items.len(),
        groups,
    });
    let path = write_report(reports_dir, &report, cli.format)?;
    println!("  Total URLs with duplicates: {}", duplicate_urls);
    println!("  Redundant bookmarks: {}", redundant);
    print_size(&path);
    Ok(())
}

async fn broken_links_report(client: &RaindropClient, cli: &Cli, reports_dir: &Path) -> Result<()> {
    println!("Checking links in collection {}...", cli.collection);
    println!("Timeout: {} seconds per request", cli.timeout);
    println!("This may take a while with large collections...\n");

    let fetched = fetch_all(client, cli.collection, &FetchFilters::default(), &fetch_options(cli))
        .await
        .context("Failed to fetch bookmarks")?;
    print_fetch_summary(&fetched);
    let items = fetched.into_items();

    println!("[CHECKING] Testing {} URLs (this will take several minutes)...\n", items.len());
    let broken = check_links(
        &items,
        Duration::from_secs(cli.timeout),
        usize::from(cli.link_concurrency),
    )
    .await
    .context("Failed to set up the link checker")?;

    let report = BrokenLinksReport {
        collection_id: cli.collection,
        generated: Local::now(),
        checked: items.len(),
        broken,
    };
    let percent_broken = if report.checked == 0 {
        0
    } else {
        report.broken.len() * 100 / report.checked
    };
    println!("\n[DONE] Checked {} links", report.checked);
    println!(
        "[FOUND] {} broken/unreachable links ({}%)\n",
        report.broken.len(),
        percent_broken
    );

    if report.broken.is_empty() {
        println!("[OK] No broken links found!");
        return Ok(());
    }

    let broken_count = report.broken.len();
    let success_rate = report.success_rate();
    let path = write_report(reports_dir, &Report::BrokenLinks(report), cli.format)?;
    println!("  Broken links: {}", broken_count);
    println!("  Success rate: {}%", success_rate);
    print_size(&path);
    Ok(())
}

fn write_report(reports_dir: &Path, report: &Report, format: ReportFormat) -> Result<PathBuf> {
    let path = save_report(reports_dir, report, format)
        .with_context(|| format!("Failed to write report into {}", reports_dir.display()))?;
    println!("[OK] Report saved to: {}", path.display());
    println!("  Format: {}", format.extension());
    Ok(path)
}

fn print_fetch_summary(fetched: &raindrop_guardian::fetch::FetchReport) {
    println!(
        "[OK] Fetched {} bookmarks ({} page requests)",
        fetched.items.len(),
        fetched.pages_requested
    );
    if fetched.failed_pages > 0 {
        println!(
            "  Warning: {} page(s) failed and were skipped, results may be incomplete",
            fetched.failed_pages
        );
    }
    if fetched.truncated {
        println!("  Warning: reached the page scan safety limit, results may be incomplete");
    }
}

fn print_size(path: &Path) {
    if let Ok(meta) = std::fs::metadata(path) {
        println!("  Size: {} bytes", meta.len());
    }
}
