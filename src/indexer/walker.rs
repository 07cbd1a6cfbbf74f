use std::collections::HashMap;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::config::IndexPolicy;

use super::entry::{FileInfo, Snapshot};

/// A node reached by the walker, already stat'ed.
pub struct WalkedNode {
    pub path: PathBuf,
    /// Segments below the base path (direct children are 1).
    pub depth: usize,
    pub metadata: Metadata,
}

impl WalkedNode {
    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir()
    }
}

/// Walks the tree under `base`, returning every reachable node except
/// `base` itself.
///
/// Skips:
/// - Directories, or links to directories, whose name starts with an
///   excluded prefix (and their whole subtree)
/// - Nodes that cannot be stat'ed (permission denied, dangling links)
/// - Contents of directories that cannot be listed
///
/// Ignore files (`.gitignore` etc.) are not consulted and symlinked
/// directories are recorded but not descended into.
pub fn walk_tree(base: &Path, policy: &IndexPolicy) -> Vec<WalkedNode> {
    let mut nodes = Vec::new();
    let filter_policy = policy.clone();

    let walker = WalkBuilder::new(base)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            // A link to a directory is recorded as a directory, so the
            // denylist applies to it as well.
            let is_dir = entry.file_type().map_or(false, |ft| {
                ft.is_dir() || (ft.is_symlink() && entry.path().is_dir())
            });
            if is_dir {
                let name = entry.file_name().to_string_lossy();
                return !filter_policy.is_excluded_dir(&name);
            }
            true
        })
        .build();

    for result in walker {
        let entry = match result {
            Ok(e) => e,
            Err(err) => {
                warn!("walk error: {}", err);
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let path = entry.path();
        let metadata = match std::fs::metadata(path) {
            Ok(m) => m,
            Err(err) => {
                debug!("cannot stat {}: {}", path.display(), err);
                continue;
            }
        };

        nodes.push(WalkedNode {
            path: path.to_path_buf(),
            depth: entry.depth(),
            metadata,
        });
    }

    nodes
}

/// Builds a full snapshot of `base`.
///
/// Output order, per directory: each subdirectory entry (name-sorted)
/// immediately followed by its own subtree, then the directory's
/// parseable files, then its remaining files, both name-sorted.
pub fn build_snapshot(base: &Path, policy: &IndexPolicy) -> Snapshot {
    let nodes = walk_tree(base, policy);

    let mut children: HashMap<PathBuf, Vec<(PathBuf, FileInfo)>> = HashMap::new();
    for node in nodes {
        let info = FileInfo::from_metadata(&node.path, &node.metadata, node.depth, policy);
        let parent = node
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        children.entry(parent).or_default().push((node.path, info));
    }

    let capacity = children.values().map(Vec::len).sum();
    let mut entries = Vec::with_capacity(capacity);
    emit_directory(base, &mut children, &mut entries);

    Snapshot::new(entries)
}

fn emit_directory(
    dir: &Path,
    children: &mut HashMap<PathBuf, Vec<(PathBuf, FileInfo)>>,
    out: &mut Vec<FileInfo>,
) {
    let Some(mut items) = children.remove(dir) else {
        return;
    };
    items.sort_by(|a, b| a.1.name.cmp(&b.1.name));

    let (dirs, files): (Vec<_>, Vec<_>) = items.into_iter().partition(|(_, info)| info.is_directory);

    for (path, info) in dirs {
        out.push(info);
        emit_directory(&path, children, out);
    }

    let (parseable, other): (Vec<_>, Vec<_>) =
        files.into_iter().partition(|(_, info)| info.is_parseable);
    out.extend(parseable.into_iter().map(|(_, info)| info));
    out.extend(other.into_iter().map(|(_, info)| info));
}
