// src/raindrop/client.rs
// =============================================================================
// A thin typed client for the Raindrop.io REST API.
//
// Each method is a 1:1 mapping of one endpoint:
//
//   GET /collections             -> list_collections
//   GET /collections/childrens   -> list_child_collections
//   GET /raindrops/{collection}  -> search_raindrops (one page)
//   GET /raindrop/{id}           -> get_raindrop
//   GET /tags/{collection}       -> get_tags
//
// The client is built once per process and shared by reference. reqwest's
// Client pools connections internally, so every request reuses them.
// =============================================================================

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::types::{
    Bookmark, Collection, ItemsResponse, RaindropItem, RaindropPage, Tag, MAX_PER_PAGE,
};
use crate::config::Config;
use crate::error::{Error, Result};

/// Parameters of a single-page bookmark search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Free-text query; supports the API's operators (`-exclude`, `"exact phrase"`).
    pub search: Option<String>,
    /// Tags to filter by, sent as `#tag` terms inside the search string.
    pub tags: Vec<String>,
    /// 0-indexed page number.
    pub page: u32,
    /// Items per page, clamped to 50 by the API.
    pub per_page: u32,
    /// Sort order: -created, created, title, -title, domain, -domain.
    pub sort: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        SearchQuery {
            search: None,
            tags: Vec::new(),
            page: 0,
            per_page: 25,
            sort: "-created".to_string(),
        }
    }
}

impl SearchQuery {
    /// The `search` query-string value: the free text followed by `#tag` terms.
    ///
    /// Returns `None` when there is neither a query nor tags.
    pub fn search_param(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            parts.push(search.to_string());
        }
        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|t| format!("#{}", t)).collect();
            parts.push(tags.join(" "));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Authenticated Raindrop.io API client.
#[derive(Clone)]
pub struct RaindropClient {
    http: Client,
    base_url: String,
    token: String,
}

impl RaindropClient {
    /// Builds a client from the loaded configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(&config.token, config.api_url.as_str(), config.request_timeout)
    }

    /// Builds a client against an explicit base URL (tests point this at a mock server).
    pub fn with_base_url(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(Error::MissingToken);
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("raindrop-guardian/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(RaindropClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Root collections.
    pub async fn list_collections(&self) -> Result<Vec<Collection>> {
        let response: ItemsResponse<Collection> = self.get_json("/collections", &[]).await?;
        Ok(response.items)
    }

    /// Nested collections (every collection that has a parent).
    pub async fn list_child_collections(&self) -> Result<Vec<Collection>> {
        let response: ItemsResponse<Collection> =
            self.get_json("/collections/childrens", &[]).await?;
        Ok(response.items)
    }

    /// Fetches one page of bookmarks from a collection.
    ///
    /// `collection_id` is forwarded as-is: 0 = all, -1 = unsorted, -99 = trash.
    pub async fn search_raindrops(
        &self,
        collection_id: i64,
        query: &SearchQuery,
    ) -> Result<RaindropPage> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("perpage", query.per_page.min(MAX_PER_PAGE).to_string()),
            ("sort", query.sort.clone()),
        ];
        if let Some(search) = query.search_param() {
            params.push(("search", search));
        }

        let path = format!("/raindrops/{}", collection_id);
        self.get_json(&path, &params).await
    }

    /// Fetches a single bookmark. `Ok(None)` when the API returns no item.
    pub async fn get_raindrop(&self, raindrop_id: i64) -> Result<Option<Bookmark>> {
        let path = format!("/raindrop/{}", raindrop_id);
        let response: RaindropItem = self.get_json(&path, &[]).await?;
        Ok(response.item)
    }

    /// Tags with usage counts, for one collection or all (0).
    pub async fn get_tags(&self, collection_id: i64) -> Result<Vec<Tag>> {
        let path = format!("/tags/{}", collection_id);
        let response: ItemsResponse<Tag> = self.get_json(&path, &[]).await?;
        Ok(response.items)
    }

    // Sends an authenticated GET and decodes the JSON body.
    // Non-2xx answers become Error::Api so callers can tell them from transport errors.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, ?params, "GET");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json::<T>().await?)
    }
}
