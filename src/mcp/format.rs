// src/mcp/format.rs
// =============================================================================
// Text shown to the assistant for each tool result.
//
// These are short, chat-friendly listings, unlike the saved reports in
// crate::report which are meant to be read as documents.
// =============================================================================

use std::fmt::Write;

use crate::analysis::{redundant_count, DuplicateGroup, Statistics};
use crate::checker::BrokenLink;
use crate::raindrop::{Bookmark, Collection, Tag};
use crate::report::short_excerpt;

pub fn collections(collections: &[Collection]) -> String {
    let mut out = format!("Found {} collections:\n\n", collections.len());
    for collection in collections {
        let title = collection.title.as_deref().unwrap_or("Untitled");
        let indent = if collection.parent.is_some() { "  " } else { "" };
        let _ = write!(
            out,
            "{}• [{}] {} ({} items)",
            indent, collection.id, title, collection.count
        );
        if let Some(parent) = &collection.parent {
            let _ = write!(out, " [child of {}]", parent.id);
        }
        out.push('\n');
    }
    out
}

pub fn search_results(items: &[Bookmark], query: Option<&str>, tags: &[String]) -> String {
    let mut out = format!("Found {} bookmarks", items.len());
    if let Some(query) = query {
        let _ = write!(out, " matching '{}'", query);
    }
    if !tags.is_empty() {
        let _ = write!(out, " with tags: {}", tags.join(", "));
    }
    out.push_str(":\n\n");

    for item in items {
        let _ = writeln!(out, "[{}] {}", item.id_label(), item.title_or_default());
        let _ = writeln!(out, "🔗 {}", item.link.as_deref().unwrap_or(""));
        if let Some(excerpt) = item.excerpt.as_deref().filter(|e| !e.is_empty()) {
            let _ = writeln!(out, "📝 {}", short_excerpt(excerpt));
        }
        if !item.tags.is_empty() {
            let _ = writeln!(out, "🏷️  {}", item.tags.join(", "));
        }
        if let Some(domain) = item.domain.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "🌐 {}", domain);
        }
        out.push('\n');
    }
    out
}

pub fn bookmark_details(id: i64, item: &Bookmark) -> String {
    let mut out = format!("Bookmark Details (ID: {})\n\n", id);
    let _ = writeln!(out, "Title: {}", item.title_or_default());
    let _ = writeln!(out, "URL: {}", item.link.as_deref().unwrap_or("N/A"));
    let _ = writeln!(out, "Type: {}", item.kind_or_default());

    if let Some(excerpt) = item.excerpt.as_deref().filter(|e| !e.is_empty()) {
        let _ = writeln!(out, "\nDescription:\n{}", excerpt);
    }
    if !item.tags.is_empty() {
        let _ = writeln!(out, "\nTags: {}", item.tags.join(", "));
    }
    if let Some(collection) = &item.collection {
        let _ = writeln!(out, "\nCollection ID: {}", collection.id);
    }

    let _ = writeln!(out, "\nDomain: {}", item.domain.as_deref().unwrap_or("N/A"));
    let _ = writeln!(out, "Created: {}", item.created.as_deref().unwrap_or("N/A"));
    let _ = writeln!(out, "Last Updated: {}", item.last_update.as_deref().unwrap_or("N/A"));

    if item.important {
        out.push_str("\n⭐ Marked as important\n");
    }
    out
}

pub fn tags(tags: &[Tag], min_count: u64) -> String {
    let mut out = format!("Found {} tags", tags.len());
    if min_count > 1 {
        let _ = write!(out, " (with {}+ bookmarks)", min_count);
    }
    out.push_str(":\n\n");
    for tag in tags {
        let _ = writeln!(out, "#{} ({})", tag.name, tag.count);
    }
    out
}

pub fn statistics(stats: &Statistics) -> String {
    let mut out = String::from("📊 Collection Statistics\n\n");
    let _ = writeln!(out, "Total Bookmarks: {}", stats.total);
    let _ = writeln!(out, "Duplicates: {} redundant bookmarks", stats.redundant);
    let _ = writeln!(
        out,
        "Untagged: {} ({}%)",
        stats.untagged,
        stats.percent(stats.untagged)
    );
    if let Some(broken) = stats.broken_links {
        let _ = writeln!(out, "Broken Links: {} ({}%)", broken, stats.percent(broken));
    }

    out.push_str("\n📑 Content Types:\n");
    for (kind, count) in &stats.content_types {
        let _ = writeln!(out, "  {}: {} ({}%)", kind, count, stats.percent(*count));
    }
    out
}

pub fn duplicates(groups: &[DuplicateGroup]) -> String {
    if groups.is_empty() {
        return "No duplicate bookmarks found!".to_string();
    }

    let mut out = format!(
        "Found {} URLs with duplicates ({} redundant bookmarks):\n\n",
        groups.len(),
        redundant_count(groups)
    );
    for group in groups {
        let _ = writeln!(out, "🔗 {}", group.url);
        let _ = writeln!(out, "   {} copies:", group.bookmarks.len());
        for bookmark in &group.bookmarks {
            let _ = write!(out, "   • [{}] {}", bookmark.id_label(), bookmark.title_or_default());
            if let Some(created) = bookmark.created_date() {
                let _ = write!(out, " (created {})", created);
            }
            if !bookmark.tags.is_empty() {
                let tags: Vec<&str> = bookmark.tags.iter().take(3).map(String::as_str).collect();
                let _ = write!(out, " [tags: {}]", tags.join(", "));
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

pub fn broken_links(broken: &[BrokenLink]) -> String {
    if broken.is_empty() {
        return "No broken links found!".to_string();
    }

    let mut out = format!("Found {} broken/unreachable links:\n\n", broken.len());
    for entry in broken {
        let bookmark = &entry.bookmark;
        let _ = writeln!(out, "[{}] {}", bookmark.id_label(), bookmark.title_or_default());
        let _ = writeln!(out, "🔗 {}", bookmark.link.as_deref().unwrap_or(""));
        let _ = writeln!(out, "❌ Status: {}\n", entry.status);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::LinkStatus;
    use crate::raindrop::ObjectRef;

    #[test]
    fn test_collections_indent_children() {
        let list = vec![
            Collection {
                id: 1,
                title: Some("Root".into()),
                count: 10,
                parent: None,
            },
            Collection {
                id: 2,
                title: None,
                count: 3,
                parent: Some(ObjectRef { id: 1 }),
            },
        ];
        let text = collections(&list);
        assert!(text.starts_with("Found 2 collections:\n\n"));
        assert!(text.contains("• [1] Root (10 items)\n"));
        assert!(text.contains("  • [2] Untitled (3 items) [child of 1]\n"));
    }

    #[test]
    fn test_tags_header_mentions_min_count() {
        let list = vec![Tag { name: "rust".into(), count: 4 }];
        assert_eq!(tags(&list, 1), "Found 1 tags:\n\n#rust (4)\n");
        assert!(tags(&list, 3).starts_with("Found 1 tags (with 3+ bookmarks):"));
    }

    #[test]
    fn test_empty_results_messages() {
        assert_eq!(duplicates(&[]), "No duplicate bookmarks found!");
        assert_eq!(broken_links(&[]), "No broken links found!");
    }

    #[test]
    fn test_broken_links_lists_status() {
        let entry = BrokenLink {
            bookmark: Bookmark {
                id: Some(3),
                title: Some("Old".into()),
                link: Some("https://old.example".into()),
                ..Default::default()
            },
            status: LinkStatus::Timeout,
        };
        let text = broken_links(&[entry]);
        assert!(text.contains("[3] Old\n🔗 https://old.example\n❌ Status: Timeout\n"));
    }

    #[test]
    fn test_statistics_with_broken_links() {
        let stats = Statistics {
            total: 4,
            duplicate_urls: 1,
            redundant: 1,
            untagged: 2,
            content_types: vec![("link".into(), 3), ("article".into(), 1)],
            broken_links: Some(1),
        };
        let text = statistics(&stats);
        assert!(text.contains("Untagged: 2 (50%)\n"));
        assert!(text.contains("Broken Links: 1 (25%)\n"));
        assert!(text.contains("  link: 3 (75%)\n"));
    }

    #[test]
    fn test_search_results_header() {
        let text = search_results(&[], Some("ufo"), &["aliens".to_string()]);
        assert_eq!(text, "Found 0 bookmarks matching 'ufo' with tags: aliens:\n\n");
    }
}
