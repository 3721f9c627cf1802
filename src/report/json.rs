// src/report/json.rs
// JSON rendering. Bookmarks are emitted with every field the API returned.

use serde_json::{json, Value};

use super::Report;
use crate::error::Result;

pub(super) fn render(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_value(report))?)
}

fn to_value(report: &Report) -> Value {
    match report {
        Report::Search(r) => json!({
            "query": r.query,
            "tags": r.tags,
            "collection_id": r.collection_id,
            "generated": r.generated.to_rfc3339(),
            "count": r.items.len(),
            "results": r.items,
        }),
        Report::Duplicates(r) => json!({
            "collection_id": r.collection_id,
            "generated": r.generated.to_rfc3339(),
            "scanned": r.scanned,
            "duplicate_urls": r.groups.len(),
            "redundant": r.redundant(),
            "groups": r.groups,
        }),
        Report::BrokenLinks(r) => json!({
            "collection_id": r.collection_id,
            "generated": r.generated.to_rfc3339(),
            "checked": r.checked,
            "broken_count": r.broken.len(),
            "success_rate": r.success_rate(),
            "broken": r.broken,
        }),
    }
}
