// src/analysis.rs
// =============================================================================
// Derived views over a fetched bookmark set: duplicate URLs, tag filtering and
// collection statistics. Pure functions, recomputed on every run.
// =============================================================================

use serde::Serialize;
use std::collections::HashMap;

use crate::raindrop::{Bookmark, Tag};

/// Bookmarks that share one URL. Always holds at least two entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateGroup {
    pub url: String,
    pub bookmarks: Vec<Bookmark>,
}

/// Groups bookmarks by exact link and keeps the groups with more than one entry.
///
/// Bookmarks keep their input order inside a group. Groups are ordered by size,
/// largest first; equal sizes keep the order in which their URL first appeared.
pub fn find_duplicates(items: &[Bookmark]) -> Vec<DuplicateGroup> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&Bookmark>> = HashMap::new();

    for bookmark in items {
        let Some(url) = bookmark.url() else { continue };
        groups
            .entry(url)
            .or_insert_with(|| {
                order.push(url);
                Vec::new()
            })
            .push(bookmark);
    }

    let mut duplicates: Vec<DuplicateGroup> = order
        .into_iter()
        .filter_map(|url| {
            let members = groups.remove(url)?;
            (members.len() > 1).then(|| DuplicateGroup {
                url: url.to_string(),
                bookmarks: members.into_iter().cloned().collect(),
            })
        })
        .collect();

    // sort_by is stable, ties stay in first-seen order
    duplicates.sort_by(|a, b| b.bookmarks.len().cmp(&a.bookmarks.len()));
    duplicates
}

/// Bookmarks that could be deleted without losing a URL.
pub fn redundant_count(groups: &[DuplicateGroup]) -> usize {
    groups.iter().map(|g| g.bookmarks.len().saturating_sub(1)).sum()
}

/// Tags used by at least `min_count` bookmarks, most used first.
pub fn filter_tags(tags: Vec<Tag>, min_count: u64) -> Vec<Tag> {
    let mut kept: Vec<Tag> = tags.into_iter().filter(|t| t.count >= min_count).collect();
    kept.sort_by(|a, b| b.count.cmp(&a.count));
    kept
}

/// Summary numbers for a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub duplicate_urls: usize,
    pub redundant: usize,
    pub untagged: usize,
    /// `(type, count)`, most common first.
    pub content_types: Vec<(String, usize)>,
    /// Present only when links were checked.
    pub broken_links: Option<usize>,
}

impl Statistics {
    /// `part` as a whole-number percentage of the total, 0 for an empty collection.
    pub fn percent(&self, part: usize) -> usize {
        if self.total == 0 {
            0
        } else {
            part * 100 / self.total
        }
    }
}

pub fn compute_statistics(items: &[Bookmark], broken_links: Option<usize>) -> Statistics {
    let duplicates = find_duplicates(items);

    let mut type_order: Vec<&str> = Vec::new();
    let mut type_counts: HashMap<&str, usize> = HashMap::new();
    for bookmark in items {
        let kind = bookmark.kind_or_default();
        let count = type_counts.entry(kind).or_insert_with(|| {
            type_order.push(kind);
            0
        });
        *count += 1;
    }

    let mut content_types: Vec<(String, usize)> = type_order
        .into_iter()
        .map(|kind| (kind.to_string(), type_counts[kind]))
        .collect();
    content_types.sort_by(|a, b| b.1.cmp(&a.1));

    Statistics {
        total: items.len(),
        duplicate_urls: duplicates.len(),
        redundant: redundant_count(&duplicates),
        untagged: items.iter().filter(|b| b.tags.is_empty()).count(),
        content_types,
        broken_links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookmark(id: i64, link: &str) -> Bookmark {
        Bookmark {
            id: Some(id),
            link: Some(link.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_duplicate_group_cardinality() {
        let items = vec![
            bookmark(1, "https://u1.example"),
            bookmark(2, "https://u1.example"),
            bookmark(3, "https://u2.example"),
            bookmark(4, "https://u1.example"),
        ];

        let groups = find_duplicates(&items);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].url, "https://u1.example");
        let ids: Vec<Option<i64>> = groups[0].bookmarks.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![Some(1), Some(2), Some(4)]);
        assert_eq!(redundant_count(&groups), 2);
    }

    #[test]
    fn test_duplicates_sorted_by_size() {
        let items = vec![
            bookmark(1, "https://a.example"),
            bookmark(2, "https://b.example"),
            bookmark(3, "https://a.example"),
            bookmark(4, "https://b.example"),
            bookmark(5, "https://b.example"),
            bookmark(6, "https://c.example"),
            bookmark(7, "https://c.example"),
        ];

        let urls: Vec<String> = find_duplicates(&items).into_iter().map(|g| g.url).collect();
        assert_eq!(urls, vec!["https://b.example", "https://a.example", "https://c.example"]);
    }

    #[test]
    fn test_bookmarks_without_links_never_group() {
        let items = vec![Bookmark::default(), Bookmark::default()];
        assert!(find_duplicates(&items).is_empty());
    }

    #[test]
    fn test_filter_tags() {
        let tags = vec![
            Tag { name: "rare".into(), count: 1 },
            Tag { name: "rust".into(), count: 9 },
            Tag { name: "go".into(), count: 3 },
        ];
        let kept = filter_tags(tags, 2);
        let names: Vec<&str> = kept.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["rust", "go"]);
    }

    #[test]
    fn test_statistics() {
        let mut items = vec![
            bookmark(1, "https://a.example"),
            bookmark(2, "https://a.example"),
            bookmark(3, "https://b.example"),
            bookmark(4, "https://c.example"),
        ];
        items[0].tags = vec!["x".into()];
        items[2].kind = Some("article".into());

        let stats = compute_statistics(&items, Some(1));

        assert_eq!(stats.total, 4);
        assert_eq!(stats.duplicate_urls, 1);
        assert_eq!(stats.redundant, 1);
        assert_eq!(stats.untagged, 3);
        assert_eq!(
            stats.content_types,
            vec![("link".to_string(), 3), ("article".to_string(), 1)]
        );
        assert_eq!(stats.broken_links, Some(1));
        assert_eq!(stats.percent(stats.untagged), 75);
    }

    #[test]
    fn test_statistics_empty_collection() {
        let stats = compute_statistics(&[], None);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.percent(0), 0);
        assert!(stats.content_types.is_empty());
    }

    #[test]
    fn test_redundant_count_empty_group() {
        let groups = vec![DuplicateGroup {
            url: "https://empty.example".to_string(),
            bookmarks: Vec::new(),
        }];
        assert_eq!(redundant_count(&groups), 0);
    }
}
