// src/raindrop/types.rs
// =============================================================================
// Typed views of the Raindrop.io JSON payloads.
//
// Only the fields this tool reads are named. Everything else a bookmark carries
// (cover, media, highlights, ...) is kept in `extra` so JSON reports re-emit the
// record exactly as the API returned it.
// =============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Collection selector meaning "every bookmark".
pub const ALL_COLLECTIONS: i64 = 0;
/// Collection selector for the "Unsorted" system collection.
pub const UNSORTED: i64 = -1;
/// Collection selector for the trash.
pub const TRASH: i64 = -99;

/// Most items the API will return for one page.
pub const MAX_PER_PAGE: u32 = 50;

/// Reference to another object, serialized by the API as `{"$id": 123}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    #[serde(rename = "$id")]
    pub id: i64,
}

/// One bookmark ("raindrop").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The bookmarked URL. The only field the fetch/check pipeline looks at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Content type: link, article, image, video, document, audio.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,

    #[serde(rename = "lastUpdate", default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<ObjectRef>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub important: bool,

    /// Every other field, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bookmark {
    /// The URL to check, or `None` when the bookmark has no usable link.
    pub fn url(&self) -> Option<&str> {
        self.link.as_deref().filter(|l| !l.trim().is_empty())
    }

    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// `N/A` when the id is missing, mirroring how reports print it.
    pub fn id_label(&self) -> String {
        self.id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Creation date without the time part (`2024-05-01T10:00:00Z` -> `2024-05-01`).
    pub fn created_date(&self) -> Option<&str> {
        self.created
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| c.get(..10).unwrap_or(c))
    }

    pub fn kind_or_default(&self) -> &str {
        self.kind.as_deref().unwrap_or("link")
    }
}

/// A collection (folder) of bookmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "_id")]
    pub id: i64,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub count: u64,

    #[serde(default)]
    pub parent: Option<ObjectRef>,
}

/// A tag with the number of bookmarks using it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "_id")]
    pub name: String,

    #[serde(default)]
    pub count: u64,
}

/// Response of `GET /raindrops/{collection}`.
///
/// `count` is the total size of the filtered collection when the API knows it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RaindropPage {
    #[serde(default)]
    pub items: Vec<Bookmark>,

    #[serde(default)]
    pub count: Option<u64>,
}

/// Response of `GET /raindrop/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RaindropItem {
    #[serde(default)]
    pub item: Option<Bookmark>,
}

/// Response of the collection listings and `GET /tags/{collection}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}
