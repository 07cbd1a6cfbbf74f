pub mod entry;
pub mod extension;
pub mod incremental;
pub mod paths;
pub mod snapshot;
pub mod walker;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::IndexPolicy;
use crate::error::OdxError;
use crate::stats::SnapshotStats;
use entry::Snapshot;
use incremental::{FreshnessDiff, IncrementalStats};

pub use snapshot::{load, save};

/// Scans and maintains snapshots of one base directory.
#[derive(Debug, Clone)]
pub struct Indexer {
    base: PathBuf,
    policy: IndexPolicy,
}

/// How [`Indexer::prepare`] obtained its snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// No usable cache (or a forced rebuild): full scan.
    FullBuild,
    /// Cache matched the live tree.
    Cache,
    /// Cache was brought up to date incrementally.
    Incremental(IncrementalStats),
}

/// Result of [`Indexer::prepare`].
#[derive(Debug)]
pub struct Prepared {
    pub snapshot: Snapshot,
    pub source: IndexSource,
    pub cache_file: PathBuf,
}

impl Indexer {
    /// Creates an indexer for `base`, which must be an existing directory.
    pub fn new(base: &Path, policy: IndexPolicy) -> Result<Self, OdxError> {
        if !base.is_dir() {
            return Err(OdxError::InvalidBasePath(base.to_path_buf()));
        }
        let base = paths::strip_verbatim(base.canonicalize()?);
        Ok(Self { base, policy })
    }

    /// Canonical base path.
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn policy(&self) -> &IndexPolicy {
        &self.policy
    }

    /// Full recursive scan.
    pub fn build(&self) -> Snapshot {
        let snapshot = walker::build_snapshot(&self.base, &self.policy);
        let stats = SnapshotStats::collect(&snapshot);
        info!(
            "indexed {}: {} entries ({} folders, {} files, {} parseable)",
            self.base.display(),
            stats.total,
            stats.folders,
            stats.files,
            stats.parseable
        );
        snapshot
    }

    /// New/modified/deleted files relative to `prior`.
    pub fn check_freshness(&self, prior: &Snapshot) -> FreshnessDiff {
        incremental::check_freshness(&self.base, prior, &self.policy)
    }

    /// Brings `prior` up to date with the live tree.
    pub fn update_incremental(&self, prior: Snapshot) -> (Snapshot, IncrementalStats) {
        incremental::update_incremental(&self.base, prior, &self.policy)
    }

    /// Cache file for this base inside `cache_dir`.
    pub fn cache_path(&self, cache_dir: &Path) -> PathBuf {
        snapshot::cache_path(cache_dir, &self.base)
    }

    /// Loads the cached snapshot and updates it incrementally, or performs
    /// a full build when there is no usable cache or `force_full` is set.
    /// The cache file is rewritten only when its contents changed.
    pub fn prepare(&self, cache_dir: &Path, force_full: bool) -> Result<Prepared, OdxError> {
        let cache_file = self.cache_path(cache_dir);

        let cached = if force_full {
            Snapshot::default()
        } else {
            snapshot::load(&cache_file)
        };

        if cached.is_empty() {
            let snapshot = self.build();
            snapshot::save(&snapshot, &cache_file)?;
            return Ok(Prepared {
                snapshot,
                source: IndexSource::FullBuild,
                cache_file,
            });
        }

        let (snapshot, stats) = self.update_incremental(cached);
        if stats.is_noop() {
            return Ok(Prepared {
                snapshot,
                source: IndexSource::Cache,
                cache_file,
            });
        }

        snapshot::save(&snapshot, &cache_file)?;
        Ok(Prepared {
            snapshot,
            source: IndexSource::Incremental(stats),
            cache_file,
        })
    }
}
