// src/report/markdown.rs
// =============================================================================
// Markdown rendering of reports.
//
// Lines that must stay separate inside one paragraph end with two spaces,
// the Markdown hard line break.
// =============================================================================

use std::fmt::Write;

use super::{collection_label, BrokenLinksReport, DuplicatesReport, Report, SearchReport};

pub(super) fn render(report: &Report) -> String {
    match report {
        Report::Search(r) => render_search(r),
        Report::Duplicates(r) => render_duplicates(r),
        Report::BrokenLinks(r) => render_broken(r),
    }
}

// Square brackets in titles would end the link text early
fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

fn render_search(r: &SearchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Raindrop.io Search Report\n");
    let _ = writeln!(out, "**Query:** `{}`  ", r.query);
    if !r.tags.is_empty() {
        let _ = writeln!(out, "**Tags:** {}  ", r.tags.join(", "));
    }
    let _ = writeln!(out, "**Collection:** {}  ", collection_label(r.collection_id));
    let _ = writeln!(out, "**Generated:** {}  ", r.generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "**Results:** {} bookmarks\n", r.items.len());
    let _ = writeln!(out, "---\n");

    for (i, item) in r.items.iter().enumerate() {
        let _ = writeln!(
            out,
            "## {}. [{}]({})\n",
            i + 1,
            escape_link_text(item.title_or_default()),
            item.link.as_deref().unwrap_or("#")
        );
        let _ = writeln!(out, "**ID:** {}  ", item.id_label());

        if let Some(excerpt) = item.excerpt.as_deref().filter(|e| !e.is_empty()) {
            let _ = writeln!(out, "\n{}\n", excerpt);
        }
        if !item.tags.is_empty() {
            let badges: Vec<String> = item.tags.iter().map(|t| format!("`{}`", t)).collect();
            let _ = writeln!(out, "**Tags:** {}  ", badges.join(" "));
        }
        if let Some(domain) = item.domain.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "**Source:** {}  ", domain);
        }
        if let Some(created) = item.created.as_deref().filter(|c| !c.is_empty()) {
            let _ = writeln!(out, "**Saved:** {}  ", created);
        }
        let _ = writeln!(out, "\n---\n");
    }

    let _ = writeln!(out, "\n**Total Results:** {}", r.items.len());
    out
}

fn render_duplicates(r: &DuplicatesReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Duplicate Bookmarks Report\n");
    let _ = writeln!(out, "**Collection:** {}  ", collection_label(r.collection_id));
    let _ = writeln!(out, "**Generated:** {}  ", r.generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "**Total Bookmarks Scanned:** {}  ", r.scanned);
    let _ = writeln!(out, "**Duplicate URLs:** {}  ", r.groups.len());
    let _ = writeln!(out, "**Redundant Bookmarks:** {}\n", r.redundant());
    let _ = writeln!(out, "---\n");

    for group in &r.groups {
        let _ = writeln!(out, "## <{}>\n", group.url);
        let _ = writeln!(out, "{} copies:\n", group.bookmarks.len());
        for bookmark in &group.bookmarks {
            let mut line = format!(
                "- **[{}]** {}",
                bookmark.id_label(),
                bookmark.title_or_default()
            );
            if let Some(created) = bookmark.created_date() {
                let _ = write!(line, " (created {})", created);
            }
            if !bookmark.tags.is_empty() {
                let tags: Vec<String> = bookmark.tags.iter().take(5).map(|t| format!("`{}`", t)).collect();
                let _ = write!(line, " {}", tags.join(" "));
            }
            let _ = writeln!(out, "{}", line);
        }
        out.push('\n');
    }
    out
}

fn render_broken(r: &BrokenLinksReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Broken Links Report\n");
    let _ = writeln!(out, "**Collection:** {}  ", collection_label(r.collection_id));
    let _ = writeln!(out, "**Generated:** {}  ", r.generated.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "**Total Bookmarks Checked:** {}  ", r.checked);
    let _ = writeln!(out, "**Broken Links:** {}  ", r.broken.len());
    let _ = writeln!(out, "**Success Rate:** {}%\n", r.success_rate());

    if r.broken.is_empty() {
        return out;
    }

    let _ = writeln!(out, "| # | ID | Title | URL | Status |");
    let _ = writeln!(out, "|---|----|-------|-----|--------|");
    for (i, entry) in r.broken.iter().enumerate() {
        let bookmark = &entry.bookmark;
        let _ = writeln!(
            out,
            "| {} | {} | {} | <{}> | {} |",
            i + 1,
            bookmark.id_label(),
            bookmark.title_or_default().replace('|', "\\|"),
            bookmark.link.as_deref().unwrap_or(""),
            entry.status
        );
    }
    out
}
