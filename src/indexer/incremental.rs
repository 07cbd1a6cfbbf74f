use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::config::IndexPolicy;

use super::entry::{ChangeSignature, FileInfo, Snapshot};
use super::paths::{depth_under, normalize_path};
use super::walker::{walk_tree, WalkedNode};

/// Summary of an incremental update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncrementalStats {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub elapsed_ms: u64,
}

impl IncrementalStats {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.modified == 0 && self.deleted == 0
    }
}

/// Normalized file paths that drifted between a snapshot and the live tree.
/// The three sets are disjoint; directories never appear in them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreshnessDiff {
    pub created: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
}

impl FreshnessDiff {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }
}

/// A live file keyed by its normalized path.
struct LiveFile {
    path: PathBuf,
    signature: ChangeSignature,
}

/// Diffs `prior` against the live tree under `base`.
pub fn check_freshness(base: &Path, prior: &Snapshot, policy: &IndexPolicy) -> FreshnessDiff {
    let nodes = walk_tree(base, policy);
    let live = live_files(&nodes, policy.fold_case);
    diff_against(prior, &live, policy.fold_case)
}

fn live_files(nodes: &[WalkedNode], fold_case: bool) -> HashMap<String, LiveFile> {
    nodes
        .iter()
        .filter(|node| !node.is_dir())
        .map(|node| {
            let key = normalize_path(&node.path.to_string_lossy(), fold_case);
            let live = LiveFile {
                path: node.path.clone(),
                signature: ChangeSignature::from_metadata(&node.metadata),
            };
            (key, live)
        })
        .collect()
}

fn diff_against(
    prior: &Snapshot,
    live: &HashMap<String, LiveFile>,
    fold_case: bool,
) -> FreshnessDiff {
    let known: HashMap<String, ChangeSignature> = prior
        .iter()
        .filter(|info| !info.is_directory)
        .map(|info| (normalize_path(&info.path, fold_case), ChangeSignature::of(info)))
        .collect();

    let mut diff = FreshnessDiff::default();

    for (key, file) in live {
        match known.get(key) {
            None => {
                diff.created.insert(key.clone());
            }
            Some(signature) if *signature != file.signature => {
                diff.modified.insert(key.clone());
            }
            Some(_) => {}
        }
    }

    for key in known.keys() {
        if !live.contains_key(key) {
            diff.deleted.insert(key.clone());
        }
    }

    diff
}

/// Produces a snapshot reflecting the live tree, re-stating only the files
/// implicated by the freshness diff.
///
/// 1. Diffs `prior` against the live tree
/// 2. Returns `prior` untouched when nothing changed
/// 3. Drops deleted/modified files and directories that no longer exist
/// 4. Re-stats created/modified files under `base`
/// 5. Appends directories not yet present
/// 6. Deduplicates by normalized path (last wins) and sorts by path
pub fn update_incremental(
    base: &Path,
    prior: Snapshot,
    policy: &IndexPolicy,
) -> (Snapshot, IncrementalStats) {
    let start = Instant::now();
    let fold_case = policy.fold_case;

    let nodes = walk_tree(base, policy);
    let live = live_files(&nodes, fold_case);
    let diff = diff_against(&prior, &live, fold_case);

    if diff.is_empty() {
        debug!("snapshot of {} is up to date", base.display());
        return (prior, IncrementalStats::default());
    }

    let mut stats = IncrementalStats {
        added: diff.created.len(),
        modified: diff.modified.len(),
        deleted: diff.deleted.len(),
        elapsed_ms: 0,
    };

    let mut updated: Vec<FileInfo> = Vec::with_capacity(prior.len() + diff.created.len());
    for info in prior.into_entries() {
        if info.is_directory {
            if Path::new(&info.path).exists() {
                updated.push(info);
            }
        } else {
            let key = normalize_path(&info.path, fold_case);
            if !diff.deleted.contains(&key) && !diff.modified.contains(&key) {
                updated.push(info);
            }
        }
    }

    for key in diff.created.iter().chain(diff.modified.iter()) {
        let Some(file) = live.get(key) else {
            continue;
        };
        if let Some(info) = restat_file(base, &file.path, policy) {
            updated.push(info);
        }
    }

    let known_dirs: HashSet<String> = updated
        .iter()
        .filter(|info| info.is_directory)
        .map(|info| normalize_path(&info.path, fold_case))
        .collect();
    for node in nodes.iter().filter(|node| node.is_dir()) {
        let key = normalize_path(&node.path.to_string_lossy(), fold_case);
        if !known_dirs.contains(&key) {
            updated.push(FileInfo::from_metadata(
                &node.path,
                &node.metadata,
                node.depth,
                policy,
            ));
        }
    }

    let mut by_path: HashMap<String, FileInfo> = HashMap::with_capacity(updated.len());
    for info in updated {
        by_path.insert(normalize_path(&info.path, fold_case), info);
    }
    let mut entries: Vec<FileInfo> = by_path.into_values().collect();
    entries.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then(a.is_directory.cmp(&b.is_directory))
    });

    stats.elapsed_ms = start.elapsed().as_millis() as u64;
    info!(
        "incremental update of {}: {} added, {} modified, {} deleted ({} entries)",
        base.display(),
        stats.added,
        stats.modified,
        stats.deleted,
        entries.len()
    );

    (Snapshot::new(entries), stats)
}

/// Builds a fresh entry for a created or modified file. Paths that vanished,
/// turned into directories, or resolve outside `base` are skipped.
fn restat_file(base: &Path, path: &Path, policy: &IndexPolicy) -> Option<FileInfo> {
    let Some(depth) = depth_under(base, path) else {
        debug!("skipping {}: outside {}", path.display(), base.display());
        return None;
    };
    match FileInfo::from_path(path, depth, policy) {
        Ok(info) if !info.is_directory => Some(info),
        Ok(_) => None,
        Err(err) => {
            debug!("cannot stat {}: {}", path.display(), err);
            None
        }
    }
}
