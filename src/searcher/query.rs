use std::collections::HashSet;
use std::time::Instant;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use tracing::debug;

use crate::indexer::entry::{FileInfo, Snapshot};
use crate::indexer::extension::dotted;

use super::analyze::QueryAnalyzer;

/// What to search for: free text, optionally with keywords that were
/// already extracted by the caller (extension, year and day filters are
/// still taken from the text). A supplied list with no usable keyword
/// falls back to extraction from the text.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub text: String,
    pub keywords: Option<Vec<String>>,
}

impl SearchQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keywords: None,
        }
    }

    pub fn with_keywords(text: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            text: text.into(),
            keywords: Some(keywords),
        }
    }
}

/// Options that control search behaviour; maps 1:1 to CLI flags.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of items returned.
    pub limit: usize,
    /// Caller-supplied extension allow-list (dotted or not). Empty means
    /// no restriction.
    pub allowed_extensions: Vec<String>,
    /// Year that relative terms are resolved against; the local calendar
    /// year when `None`.
    pub current_year: Option<i32>,
    /// Day that relative day terms are resolved against; the local date
    /// when `None`.
    pub today: Option<NaiveDate>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 200,
            allowed_extensions: Vec::new(),
            current_year: None,
            today: None,
        }
    }
}

/// Ranked items plus the filters that produced them.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub items: Vec<FileInfo>,
    /// Keywords before expansion.
    pub keywords: Vec<String>,
    pub expanded_keywords: Vec<String>,
    /// Dotted extensions detected in the query text.
    pub extensions: Vec<String>,
    pub years: Vec<i32>,
    pub days: Vec<NaiveDate>,
    /// Matches before truncation to the limit.
    pub total_matches: usize,
    /// Entries in the snapshot that was searched.
    pub entries_searched: usize,
    pub elapsed_ms: u64,
}

/// Runs the keyword / extension / year pipeline over `snapshot`.
///
/// Every expanded keyword is matched case-insensitively against each
/// entry's name and path; per keyword, the detected extension, year and
/// day filters are applied. The per-keyword matches are unioned by path (first
/// occurrence wins), parseable entries are moved ahead of the rest without
/// disturbing relative order, the caller's extension allow-list is applied,
/// and the list is cut to `opts.limit`.
pub fn search(
    analyzer: &QueryAnalyzer,
    query: &SearchQuery,
    snapshot: &Snapshot,
    opts: &SearchOptions,
) -> SearchResult {
    let start = Instant::now();
    let today = opts.today.unwrap_or_else(|| Local::now().date_naive());
    let current_year = opts.current_year.unwrap_or_else(|| today.year());

    let extensions = analyzer.extract_extensions(&query.text);
    let years = analyzer.extract_years(&query.text, current_year);
    let days = analyzer.extract_days(&query.text, today);
    let supplied: Vec<String> = query
        .keywords
        .iter()
        .flatten()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    let keywords = if supplied.is_empty() {
        analyzer.extract_keywords(&query.text)
    } else {
        supplied
    };
    let expanded_keywords = analyzer.expand_keywords(&keywords);
    debug!(
        "search keywords={:?} extensions={:?} years={:?} days={:?}",
        expanded_keywords, extensions, years, days
    );

    let mut seen: HashSet<&str> = HashSet::new();
    let mut matches: Vec<&FileInfo> = Vec::new();
    for keyword in &expanded_keywords {
        let needle = keyword.to_lowercase();
        for info in snapshot {
            if !contains_keyword(info, &needle) {
                continue;
            }
            if !extension_allowed(info, &extensions)
                || !year_allowed(info, &years)
                || !day_allowed(info, &days)
            {
                continue;
            }
            if seen.insert(info.path.as_str()) {
                matches.push(info);
            }
        }
    }

    let (parseable, others): (Vec<&FileInfo>, Vec<&FileInfo>) =
        matches.into_iter().partition(|info| info.is_parseable);

    let allowed: Vec<String> = opts.allowed_extensions.iter().map(|e| dotted(e)).collect();
    let ranked: Vec<&FileInfo> = parseable
        .into_iter()
        .chain(others)
        .filter(|info| extension_allowed(info, &allowed))
        .collect();

    let total_matches = ranked.len();
    let items = ranked.into_iter().take(opts.limit).cloned().collect();

    SearchResult {
        items,
        keywords,
        expanded_keywords,
        extensions,
        years,
        days,
        total_matches,
        entries_searched: snapshot.len(),
        elapsed_ms: start.elapsed().as_millis() as u64,
    }
}

fn contains_keyword(info: &FileInfo, needle: &str) -> bool {
    info.name.to_lowercase().contains(needle) || info.path.to_lowercase().contains(needle)
}

/// An active extension filter never admits directories.
fn extension_allowed(info: &FileInfo, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    if info.is_directory {
        return false;
    }
    let ext = info.extension.to_lowercase();
    extensions.iter().any(|e| *e == ext)
}

fn year_allowed(info: &FileInfo, years: &[i32]) -> bool {
    if years.is_empty() {
        return true;
    }
    info.modified_year().is_some_and(|y| years.contains(&y))
}

fn day_allowed(info: &FileInfo, days: &[NaiveDate]) -> bool {
    if days.is_empty() {
        return true;
    }
    info.modified_date().is_some_and(|d| days.contains(&d))
}
