//! Structured file index: a persisted snapshot of a directory tree's
//! metadata, kept fresh incrementally, with keyword / extension / year
//! search over it.

pub mod cmd;
pub mod config;
pub mod error;
pub mod indexer;
pub mod parsers;
pub mod searcher;
pub mod stats;

pub use config::{Config, IndexPolicy, SearchVocabulary};
pub use error::OdxError;
pub use indexer::entry::{FileInfo, Snapshot};
pub use indexer::{IndexSource, Indexer, Prepared};
pub use searcher::{search, QueryAnalyzer, SearchOptions, SearchQuery, SearchResult};
