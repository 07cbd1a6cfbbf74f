use std::path::PathBuf;

use thiserror::Error;

/// Structured error type for odx operations.
///
/// Only failures a caller can act on end up here. Per-node traversal and
/// stat errors are logged and the node is omitted; they never surface as
/// an `OdxError`.
#[derive(Debug, Error)]
pub enum OdxError {
    /// File system I/O failure (cache directory, cache file, lock file).
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Snapshot row encoding failure.
    #[error("snapshot encoding error: {0}")]
    Csv(#[from] csv::Error),
    /// JSON output serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    /// A vocabulary table produced a pattern that does not compile.
    #[error("invalid vocabulary pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// Invalid `--glob` pattern.
    #[error("invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
    /// The base path handed to the indexer is not a directory.
    #[error("'{}' is not a valid directory", .0.display())]
    InvalidBasePath(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_base_path_message() {
        let err = OdxError::InvalidBasePath(PathBuf::from("/no/such/dir"));
        assert_eq!(err.to_string(), "'/no/such/dir' is not a valid directory");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: OdxError = io.into();
        assert!(matches!(err, OdxError::Io(_)));
    }
}
