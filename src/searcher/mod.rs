pub mod analyze;
pub mod format;
pub mod query;
pub mod refine;

pub use analyze::QueryAnalyzer;
pub use query::{search, SearchOptions, SearchQuery, SearchResult};

use crate::error::OdxError;
use format::{format_files_only, format_json, format_text};
use refine::{suggest_keywords, DEFAULT_SUGGESTIONS};

/// Output mode for formatting results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text (default).
    Text,
    /// Bare file paths, one per line (`-l`/`--files`).
    FilesOnly,
    /// Machine-readable JSON (`--json`).
    Json,
}

/// Renders `result` in the requested mode.
pub fn render(
    result: &SearchResult,
    query: &str,
    mode: OutputMode,
) -> Result<String, OdxError> {
    match mode {
        OutputMode::Text => Ok(format_text(result)),
        OutputMode::FilesOnly => Ok(format_files_only(result)),
        OutputMode::Json => {
            let paths: Vec<&str> = result.items.iter().map(|i| i.path.as_str()).collect();
            let suggestions = suggest_keywords(&paths, DEFAULT_SUGGESTIONS);
            Ok(format_json(result, query, &suggestions)?)
        }
    }
}
