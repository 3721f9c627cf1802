// src/report/mod.rs
// =============================================================================
// Report structures and their renderings.
//
// A report is built once from fetched data and can then be rendered as plain
// text, JSON or Markdown, and saved to a timestamped file.
//
// Submodules:
// - text: plain text rendering
// - markdown: Markdown rendering
// - json: JSON rendering (full bookmark records included)
// - save: file naming and writing
// =============================================================================

mod json;
mod markdown;
mod save;
mod text;

use chrono::{DateTime, Local};

use crate::analysis::DuplicateGroup;
use crate::checker::BrokenLink;
use crate::error::Result;
use crate::raindrop::Bookmark;

pub use save::{safe_file_stem, save_report};
pub(crate) use text::short_excerpt;

/// Output format of a saved report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    #[value(name = "txt")]
    Text,
    #[value(name = "json")]
    Json,
    #[value(name = "md")]
    Markdown,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "md",
        }
    }
}

/// Results of a bookmark search.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub query: String,
    pub tags: Vec<String>,
    pub collection_id: i64,
    pub generated: DateTime<Local>,
    pub items: Vec<Bookmark>,
}

/// URLs bookmarked more than once.
#[derive(Debug, Clone)]
pub struct DuplicatesReport {
    pub collection_id: i64,
    pub generated: DateTime<Local>,
    /// Bookmarks examined.
    pub scanned: usize,
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicatesReport {
    pub fn redundant(&self) -> usize {
        crate::analysis::redundant_count(&self.groups)
    }
}

/// Bookmarks whose links failed a liveness probe.
#[derive(Debug, Clone)]
pub struct BrokenLinksReport {
    pub collection_id: i64,
    pub generated: DateTime<Local>,
    /// Bookmarks examined.
    pub checked: usize,
    pub broken: Vec<BrokenLink>,
}

impl BrokenLinksReport {
    /// Share of checked bookmarks that are not broken, as a whole percentage.
    pub fn success_rate(&self) -> usize {
        if self.checked == 0 {
            return 0;
        }
        self.checked.saturating_sub(self.broken.len()) * 100 / self.checked
    }
}

/// Any report the tool can produce.
#[derive(Debug, Clone)]
pub enum Report {
    Search(SearchReport),
    Duplicates(DuplicatesReport),
    BrokenLinks(BrokenLinksReport),
}

impl Report {
    pub fn generated(&self) -> DateTime<Local> {
        match self {
            Report::Search(r) => r.generated,
            Report::Duplicates(r) => r.generated,
            Report::BrokenLinks(r) => r.generated,
        }
    }

    /// First part of the file name, before the timestamp.
    pub fn file_stem(&self) -> String {
        match self {
            Report::Search(r) => safe_file_stem(&r.query),
            Report::Duplicates(_) => "duplicates".to_string(),
            Report::BrokenLinks(_) => "broken_links".to_string(),
        }
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        Ok(match format {
            ReportFormat::Text => text::render(self),
            ReportFormat::Markdown => markdown::render(self),
            ReportFormat::Json => json::render(self)?,
        })
    }
}

// Shared header line for the collection selector
fn collection_label(collection_id: i64) -> String {
    format!("{} (0=all, -1=unsorted, -99=trash)", collection_id)
}
