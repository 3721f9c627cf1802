// src/mcp/server.rs
// =============================================================================
// The MCP server: seven tools over one shared Raindrop.io client.
//
// Every tool follows the same shape:
//   typed args -> crate operation -> formatted text
// Failures become error tool results ("Error: ...") so one bad call never
// takes the server down.
// =============================================================================

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use std::sync::Arc;
use tracing::{error, info};

use super::args::{
    FindBrokenLinksArgs, FindDuplicatesArgs, GetBookmarkArgs, ListCollectionsArgs, ListTagsArgs,
    SearchBookmarksArgs, StatisticsArgs,
};
use super::format;
use crate::analysis::{compute_statistics, filter_tags, find_duplicates};
use crate::checker::{check_links, DEFAULT_LINK_CONCURRENCY, DEFAULT_LINK_TIMEOUT};
use crate::fetch::{fetch_all, FetchFilters, FetchOptions};
use crate::raindrop::{Bookmark, RaindropClient};

/// MCP handler exposing Raindrop.io bookmarks to an assistant.
#[derive(Clone)]
pub struct RaindropServer {
    client: Arc<RaindropClient>,
    fetch_options: FetchOptions,
    link_concurrency: usize,
    tool_router: ToolRouter<Self>,
}

// Turns a tool's outcome into what the protocol sends back
fn into_tool_result(tool: &str, result: crate::Result<String>) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            error!(tool, error = %e, "tool failed");
            CallToolResult::error(vec![Content::text(format!("Error: {}", e))])
        }
    }
}

#[tool_router]
impl RaindropServer {
    pub fn new(client: RaindropClient) -> Self {
        Self::with_options(client, FetchOptions::default(), DEFAULT_LINK_CONCURRENCY)
    }

    pub fn with_options(client: RaindropClient, fetch_options: FetchOptions, link_concurrency: usize) -> Self {
        RaindropServer {
            client: Arc::new(client),
            fetch_options,
            link_concurrency,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List all Raindrop.io collections (both root and nested)")]
    async fn list_collections(
        &self,
        Parameters(args): Parameters<ListCollectionsArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result("list_collections", self.collections_text(&args).await))
    }

    #[tool(
        description = "Search Raindrop.io bookmarks with filters. Supports keyword search, tag filtering, and collection filtering."
    )]
    async fn search_bookmarks(
        &self,
        Parameters(args): Parameters<SearchBookmarksArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result("search_bookmarks", self.search_text(&args).await))
    }

    #[tool(description = "Get a specific bookmark by ID")]
    async fn get_bookmark(
        &self,
        Parameters(args): Parameters<GetBookmarkArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result("get_bookmark", self.bookmark_text(&args).await))
    }

    #[tool(description = "List all tags with usage counts")]
    async fn list_tags(
        &self,
        Parameters(args): Parameters<ListTagsArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result("list_tags", self.tags_text(&args).await))
    }

    #[tool(
        description = "Get collection statistics including total count, duplicates, broken links, untagged bookmarks, and content type breakdown"
    )]
    async fn get_statistics(
        &self,
        Parameters(args): Parameters<StatisticsArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result("get_statistics", self.statistics_text(&args).await))
    }

    #[tool(description = "Find duplicate bookmarks (same URL)")]
    async fn find_duplicates(
        &self,
        Parameters(args): Parameters<FindDuplicatesArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result("find_duplicates", self.duplicates_text(&args).await))
    }

    #[tool(description = "Check bookmarks for broken/unreachable links")]
    async fn find_broken_links(
        &self,
        Parameters(args): Parameters<FindBrokenLinksArgs>,
    ) -> Result<CallToolResult, McpError> {
        Ok(into_tool_result("find_broken_links", self.broken_links_text(&args).await))
    }
}

// The tool bodies. Kept apart from the protocol glue so tests can call them.
impl RaindropServer {
    pub async fn collections_text(&self, args: &ListCollectionsArgs) -> crate::Result<String> {
        let mut collections = self.client.list_collections().await?;
        if args.include_children {
            collections.extend(self.client.list_child_collections().await?);
        }
        Ok(format::collections(&collections))
    }

    pub async fn search_text(&self, args: &SearchBookmarksArgs) -> crate::Result<String> {
        let query = args.to_query()?;
        let page = self.client.search_raindrops(args.collection_id, &query).await?;
        Ok(format::search_results(
            &page.items,
            query.search.as_deref(),
            &query.tags,
        ))
    }

    pub async fn bookmark_text(&self, args: &GetBookmarkArgs) -> crate::Result<String> {
        let id = args.id()?;
        match self.client.get_raindrop(id).await? {
            Some(item) => Ok(format::bookmark_details(id, &item)),
            None => Ok(format!("Bookmark {} not found", id)),
        }
    }

    pub async fn tags_text(&self, args: &ListTagsArgs) -> crate::Result<String> {
        let tags = self.client.get_tags(args.collection_id).await?;
        let tags = filter_tags(tags, args.min_count);
        Ok(format::tags(&tags, args.min_count))
    }

    pub async fn statistics_text(&self, args: &StatisticsArgs) -> crate::Result<String> {
        let items = self.fetch_collection(args.collection_id).await?;
        let broken = if args.check_links {
            info!("checking links, this may take a while");
            let broken = check_links(&items, DEFAULT_LINK_TIMEOUT, self.link_concurrency).await?;
            Some(broken.len())
        } else {
            None
        };
        Ok(format::statistics(&compute_statistics(&items, broken)))
    }

    pub async fn duplicates_text(&self, args: &FindDuplicatesArgs) -> crate::Result<String> {
        let items = self.fetch_collection(args.collection_id).await?;
        Ok(format::duplicates(&find_duplicates(&items)))
    }

    pub async fn broken_links_text(&self, args: &FindBrokenLinksArgs) -> crate::Result<String> {
        let timeout = args.timeout()?;
        let items = self.fetch_collection(args.collection_id).await?;
        info!(items = items.len(), timeout_secs = args.timeout, "checking links");
        let broken = check_links(&items, timeout, self.link_concurrency).await?;
        Ok(format::broken_links(&broken))
    }

    async fn fetch_collection(&self, collection_id: i64) -> crate::Result<Vec<Bookmark>> {
        info!(collection_id, "fetching all bookmarks");
        let report = fetch_all(
            self.client.as_ref(),
            collection_id,
            &FetchFilters::default(),
            &self.fetch_options,
        )
        .await?;
        Ok(report.into_items())
    }
}

#[tool_handler]
impl ServerHandler for RaindropServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Search, inspect and analyze Raindrop.io bookmarks: collections, tags, \
                 duplicate URLs and broken links."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
