// src/report/text.rs
// Plain text rendering of reports.

use std::fmt::Write;

use super::{collection_label, BrokenLinksReport, DuplicatesReport, Report, SearchReport};

const RULE_WIDTH: usize = 80;
const EXCERPT_LIMIT: usize = 200;

pub(super) fn render(report: &Report) -> String {
    match report {
        Report::Search(r) => render_search(r),
        Report::Duplicates(r) => render_duplicates(r),
        Report::BrokenLinks(r) => render_broken(r),
    }
}

// Shortens long excerpts to EXCERPT_LIMIT characters plus "..."
pub(crate) fn short_excerpt(excerpt: &str) -> String {
    if excerpt.chars().count() > EXCERPT_LIMIT {
        let cut: String = excerpt.chars().take(EXCERPT_LIMIT).collect();
        format!("{}...", cut)
    } else {
        excerpt.to_string()
    }
}

fn rule(ch: char) -> String {
    ch.to_string().repeat(RULE_WIDTH)
}

// writeln! into a String cannot fail, so results are ignored below
fn render_search(r: &SearchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Raindrop.io Search Report");
    let _ = writeln!(out, "{}\n", rule('='));
    let _ = writeln!(out, "Query: '{}'", r.query);
    if !r.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", r.tags.join(", "));
    }
    let _ = writeln!(out, "Collection: {}", collection_label(r.collection_id));
    let _ = writeln!(out, "Generated: {}", r.generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Results: {} bookmarks\n", r.items.len());
    let _ = writeln!(out, "{}\n", rule('='));

    for (i, item) in r.items.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, item.title_or_default());
        let _ = writeln!(out, "   URL: {}", item.link.as_deref().unwrap_or("N/A"));
        let _ = writeln!(out, "   ID: {}", item.id_label());
        if let Some(excerpt) = item.excerpt.as_deref().filter(|e| !e.is_empty()) {
            let _ = writeln!(out, "   Description: {}", short_excerpt(excerpt));
        }
        if !item.tags.is_empty() {
            let _ = writeln!(out, "   Tags: {}", item.tags.join(", "));
        }
        if let Some(domain) = item.domain.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "   Source: {}", domain);
        }
        if let Some(created) = item.created.as_deref().filter(|c| !c.is_empty()) {
            let _ = writeln!(out, "   Saved: {}", created);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", rule('='));
    let _ = writeln!(out, "End of Report - {} results", r.items.len());
    out
}

fn render_duplicates(r: &DuplicatesReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Duplicate Bookmarks Report");
    let _ = writeln!(out, "{}\n", rule('='));
    let _ = writeln!(out, "Collection: {}", collection_label(r.collection_id));
    let _ = writeln!(out, "Generated: {}", r.generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Total Bookmarks Scanned: {}", r.scanned);
    let _ = writeln!(out, "Duplicate URLs: {}", r.groups.len());
    let _ = writeln!(out, "Redundant Bookmarks: {}\n", r.redundant());
    let _ = writeln!(out, "{}\n", rule('='));

    for group in &r.groups {
        let _ = writeln!(out, "URL: {}", group.url);
        let _ = writeln!(out, "Copies: {}\n", group.bookmarks.len());

        for (i, bookmark) in group.bookmarks.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. [{}] {}",
                i + 1,
                bookmark.id_label(),
                bookmark.title_or_default()
            );
            if let Some(created) = bookmark.created_date() {
                let _ = writeln!(out, "     Created: {}", created);
            }
            if !bookmark.tags.is_empty() {
                let tags: Vec<&str> = bookmark.tags.iter().take(5).map(String::as_str).collect();
                let _ = writeln!(out, "     Tags: {}", tags.join(", "));
            }
            out.push('\n');
        }

        let _ = writeln!(out, "{}\n", rule('-'));
    }
    out
}

fn render_broken(r: &BrokenLinksReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Broken Links Report");
    let _ = writeln!(out, "{}\n", rule('='));
    let _ = writeln!(out, "Collection: {}", collection_label(r.collection_id));
    let _ = writeln!(out, "Generated: {}", r.generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "Total Bookmarks Checked: {}", r.checked);
    let _ = writeln!(out, "Broken Links: {}", r.broken.len());
    let _ = writeln!(out, "Success Rate: {}%\n", r.success_rate());
    let _ = writeln!(out, "{}\n", rule('='));

    for (i, entry) in r.broken.iter().enumerate() {
        let bookmark = &entry.bookmark;
        let _ = writeln!(
            out,
            "{}. [{}] {}",
            i + 1,
            bookmark.id_label(),
            bookmark.title_or_default()
        );
        let _ = writeln!(out, "   URL: {}", bookmark.link.as_deref().unwrap_or(""));
        let _ = writeln!(out, "   Status: {}", entry.status);
        if !bookmark.tags.is_empty() {
            let tags: Vec<&str> = bookmark.tags.iter().take(5).map(String::as_str).collect();
            let _ = writeln!(out, "   Tags: {}", tags.join(", "));
        }
        out.push('\n');
    }
    out
}
