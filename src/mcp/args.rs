// src/mcp/args.rs
// =============================================================================
// Arguments of the MCP tools.
//
// Each tool takes a typed struct. Missing fields fall back to the documented
// defaults, so `{}` is a valid call for every tool except get_bookmark.
// The doc comments double as field descriptions in the generated JSON schema.
// =============================================================================

use schemars::JsonSchema;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::raindrop::{SearchQuery, MAX_PER_PAGE};

fn default_true() -> bool {
    true
}

fn default_per_page() -> u32 {
    25
}

fn default_sort() -> String {
    "-created".to_string()
}

fn default_min_count() -> u64 {
    1
}

fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListCollectionsArgs {
    /// Include nested/child collections
    #[serde(default = "default_true")]
    pub include_children: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchBookmarksArgs {
    /// Search query (supports operators like word -exclude 'exact phrase')
    #[serde(default)]
    pub query: Option<String>,
    /// Collection ID to search in (0=all, -1=unsorted, -99=trash)
    #[serde(default)]
    pub collection_id: i64,
    /// Filter by tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Page number (0-indexed)
    #[serde(default)]
    pub page: u32,
    /// Results per page (max 50)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Sort order: -created, created, title, -title, domain, -domain
    #[serde(default = "default_sort")]
    pub sort: String,
}

impl SearchBookmarksArgs {
    /// Checks the arguments and turns them into a page query.
    pub fn to_query(&self) -> Result<SearchQuery> {
        if self.per_page == 0 {
            return Err(Error::InvalidArgument("per_page must be at least 1".into()));
        }
        Ok(SearchQuery {
            search: self.query.clone().filter(|q| !q.trim().is_empty()),
            tags: self.tags.clone().unwrap_or_default(),
            page: self.page,
            per_page: self.per_page.min(MAX_PER_PAGE),
            sort: self.sort.clone(),
        })
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetBookmarkArgs {
    /// The raindrop (bookmark) ID
    #[serde(default)]
    pub raindrop_id: Option<i64>,
}

impl GetBookmarkArgs {
    pub fn id(&self) -> Result<i64> {
        match self.raindrop_id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(Error::InvalidArgument("raindrop_id is required".into())),
        }
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTagsArgs {
    /// Collection ID (0=all collections)
    #[serde(default)]
    pub collection_id: i64,
    /// Only show tags with at least this many bookmarks
    #[serde(default = "default_min_count")]
    pub min_count: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StatisticsArgs {
    /// Collection ID to analyze (0=all, -1=unsorted)
    #[serde(default)]
    pub collection_id: i64,
    /// Check for broken links (may be slow for large collections)
    #[serde(default)]
    pub check_links: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindDuplicatesArgs {
    /// Collection ID to search (0=all)
    #[serde(default)]
    pub collection_id: i64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindBrokenLinksArgs {
    /// Collection ID to check (0=all)
    #[serde(default)]
    pub collection_id: i64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl FindBrokenLinksArgs {
    pub fn timeout(&self) -> Result<Duration> {
        if self.timeout == 0 {
            return Err(Error::InvalidArgument("timeout must be at least 1 second".into()));
        }
        Ok(Duration::from_secs(self.timeout))
    }
}
