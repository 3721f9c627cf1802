// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There are three modes:
// - search (default): a positional QUERY is required
// - --duplicates: report bookmarks that share a URL
// - --check-links: report bookmarks whose URL is broken
//
// The two analytics flags conflict with each other, and the query is only
// required when neither is given.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

use raindrop_guardian::report::ReportFormat;

/// Search Raindrop.io and save results to reports, or run analytics
#[derive(Parser, Debug)]
#[command(
    name = "raindrop-guardian",
    version,
    about = "Search Raindrop.io and save results to reports, or run analytics",
    after_help = "Examples:\n  \
        raindrop-guardian \"david grusch\"\n  \
        raindrop-guardian UAP --tags aliens --format md\n  \
        raindrop-guardian AI --collection 12345 --format json\n  \
        raindrop-guardian --duplicates --collection 12345\n  \
        raindrop-guardian --check-links --timeout 5"
)]
pub struct Cli {
    /// Search query (not used in analytics modes)
    #[arg(required_unless_present_any = ["duplicates", "check_links"])]
    pub query: Option<String>,

    /// Find duplicate bookmarks (same URL)
    #[arg(long, conflicts_with = "check_links")]
    pub duplicates: bool,

    /// Check for broken/unreachable links
    #[arg(long)]
    pub check_links: bool,

    /// Collection ID (0=all, -1=unsorted, -99=trash)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub collection: i64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Filter by tags (search mode only)
    #[arg(short, long, num_args = 1..)]
    pub tags: Vec<String>,

    /// Fetch only the first page (search mode only)
    #[arg(long)]
    pub first_page_only: bool,

    /// Max concurrent page requests
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_concurrent: u16,

    /// Request timeout in seconds for link checking
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Links probed at once during link checking
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
    pub link_concurrency: u16,

    /// Directory for report files (default: $RAINDROP_REPORTS_DIR or ./reports)
    #[arg(long)]
    pub reports_dir: Option<PathBuf>,
}

/// What the user asked for, after flag resolution.
#[derive(Debug, PartialEq, Eq)]
pub enum Mode<'a> {
    Search(&'a str),
    Duplicates,
    CheckLinks,
}

impl Cli {
    pub fn mode(&self) -> Mode<'_> {
        if self.duplicates {
            Mode::Duplicates
        } else if self.check_links {
            Mode::CheckLinks
        } else {
            // clap guarantees a query when no analytics flag is set
            Mode::Search(self.query.as_deref().unwrap_or_default())
        }
    }
}
