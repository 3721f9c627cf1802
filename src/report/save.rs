// src/report/save.rs
// =============================================================================
// Writes reports to disk.
//
// File names look like `<stem>_<YYYYmmdd_HHMMSS>.<ext>`, for example
// `rust_async_20260314_092653.md`. The stem is the search query made safe for
// file systems, or `duplicates` / `broken_links` for the analytics reports.
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{Report, ReportFormat};
use crate::error::Result;

const MAX_STEM_LEN: usize = 50;

/// Keeps letters, digits, `-` and `_`, turns spaces into `_`, caps the length.
///
/// Falls back to `search` when nothing usable is left.
pub fn safe_file_stem(query: &str) -> String {
    let kept: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let stem: String = kept
        .trim()
        .replace(' ', "_")
        .chars()
        .take(MAX_STEM_LEN)
        .collect();

    if stem.is_empty() {
        "search".to_string()
    } else {
        stem
    }
}

/// Renders `report` in `format` and writes it into `dir`, creating `dir` if needed.
///
/// Returns the path of the written file.
pub fn save_report(dir: &Path, report: &Report, format: ReportFormat) -> Result<PathBuf> {
    let content = report.render(format)?;

    fs::create_dir_all(dir)?;
    let filename = format!(
        "{}_{}.{}",
        report.file_stem(),
        report.generated().format("%Y%m%d_%H%M%S"),
        format.extension()
    );
    let path = dir.join(filename);
    fs::write(&path, content)?;

    debug!(path = %path.display(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;

    #[test]
    fn test_safe_file_stem() {
        assert_eq!(safe_file_stem("david grusch"), "david_grusch");
        assert_eq!(safe_file_stem("  C++ / Rust?  "), "C__Rust");
        assert_eq!(safe_file_stem("***"), "search");
        assert_eq!(safe_file_stem(&"a".repeat(80)).len(), 50);
    }

    #[test]
    fn test_save_report_creates_dir_and_names_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("reports");

        let path = save_report(&dir, &fixtures::search(), ReportFormat::Markdown).unwrap();

        assert_eq!(path, dir.join("rust_async_20260314_092653.md"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# Raindrop.io Search Report"));
    }

    #[test]
    fn test_save_each_format() {
        let tmp = tempfile::tempdir().unwrap();
        let json = save_report(tmp.path(), &fixtures::broken(), ReportFormat::Json).unwrap();
        let text = save_report(tmp.path(), &fixtures::duplicates(), ReportFormat::Text).unwrap();

        assert_eq!(
            json.file_name().unwrap().to_str().unwrap(),
            "broken_links_20260314_092653.json"
        );
        assert_eq!(
            text.file_name().unwrap().to_str().unwrap(),
            "duplicates_20260314_092653.txt"
        );
    }
}
