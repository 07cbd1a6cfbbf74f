use serde::Serialize;

use crate::indexer::entry::FileInfo;
use crate::stats::format_bytes;

use super::query::SearchResult;

/// Formats search results as human-readable text.
///
/// ```text
///  [1] /docs/계약서_최종.pdf  (2.0 KB, 2024-07-11, parseable)
///  [2] /docs/contracts/  (folder)
/// ```
pub fn format_text(result: &SearchResult) -> String {
    let mut out = String::new();

    for (i, info) in result.items.iter().enumerate() {
        out.push_str(&format!(" [{}] {}\n", i + 1, describe(info)));
    }

    if result.total_matches > result.items.len() {
        out.push_str(&format!(
            "     ... {} more not shown\n",
            result.total_matches - result.items.len()
        ));
    }

    out
}

fn describe(info: &FileInfo) -> String {
    if info.is_directory {
        return format!("{}/  (folder)", info.path.trim_end_matches(['/', '\\']));
    }
    let day = info.modified_time.get(..10).unwrap_or(&info.modified_time);
    let mut detail = format!("{}, {}", format_bytes(info.size_bytes), day);
    if info.is_parseable {
        detail.push_str(", parseable");
    }
    format!("{}  ({})", info.path, detail)
}

/// One path per line.
pub fn format_files_only(result: &SearchResult) -> String {
    let mut out = String::new();
    for info in &result.items {
        out.push_str(&info.path);
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    query: &'a str,
    #[serde(flatten)]
    result: &'a SearchResult,
    suggestions: &'a [String],
}

/// Pretty JSON document with the items, the applied filters and
/// refinement suggestions.
pub fn format_json(
    result: &SearchResult,
    query: &str,
    suggestions: &[String],
) -> Result<String, serde_json::Error> {
    let doc = JsonOutput {
        query,
        result,
        suggestions,
    };
    let mut out = serde_json::to_string_pretty(&doc)?;
    out.push('\n');
    Ok(out)
}

/// Summary line, e.g. `3 results (searched 120 entries in 2ms)`.
pub fn format_summary(result: &SearchResult) -> String {
    let result_word = if result.total_matches == 1 { "result" } else { "results" };
    let entry_word = if result.entries_searched == 1 { "entry" } else { "entries" };
    format!(
        "{} {} (searched {} {} in {}ms)",
        result.total_matches, result_word, result.entries_searched, entry_word, result.elapsed_ms
    )
}
