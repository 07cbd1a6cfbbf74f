use std::collections::BTreeSet;

use serde::Serialize;

use crate::indexer::entry::Snapshot;
use crate::parsers::ParserRegistry;

/// Counts describing one snapshot.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct SnapshotStats {
    pub total: usize,
    pub folders: usize,
    pub files: usize,
    pub parseable: usize,
    pub total_bytes: u64,
    /// Distinct dotted file extensions, sorted.
    pub extensions: Vec<String>,
}

impl SnapshotStats {
    pub fn collect(snapshot: &Snapshot) -> Self {
        let mut stats = SnapshotStats {
            total: snapshot.len(),
            ..Default::default()
        };
        let mut extensions = BTreeSet::new();

        for info in snapshot {
            if info.is_directory {
                stats.folders += 1;
                continue;
            }
            stats.files += 1;
            stats.total_bytes += info.size_bytes;
            if info.is_parseable {
                stats.parseable += 1;
            }
            if !info.extension.is_empty() {
                extensions.insert(info.extension.clone());
            }
        }

        stats.extensions = extensions.into_iter().collect();
        stats
    }

    /// Extensions present in the snapshot that a registered parser can read.
    pub fn readable_extensions(&self, registry: &ParserRegistry) -> Vec<String> {
        self.extensions
            .iter()
            .filter(|ext| registry.supports(ext))
            .cloned()
            .collect()
    }
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::entry::FileInfo;

    fn entry(path: &str, is_directory: bool, extension: &str, size: u64, parseable: bool) -> FileInfo {
        FileInfo {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap().to_string(),
            parent_path: "/b".to_string(),
            is_directory,
            extension: extension.to_string(),
            size_bytes: size,
            created_time: "2024-01-01T00:00:00".to_string(),
            modified_time: "2024-01-01T00:00:00".to_string(),
            is_parseable: parseable,
            depth_level: 1,
        }
    }

    #[test]
    fn counts_folders_files_and_parseable() {
        let snapshot = Snapshot::new(vec![
            entry("/b/docs", true, "", 0, false),
            entry("/b/docs/a.pdf", false, ".pdf", 100, true),
            entry("/b/docs/b.txt", false, ".txt", 20, true),
            entry("/b/img.png", false, ".png", 5, false),
            entry("/b/Makefile", false, "", 1, false),
        ]);

        let stats = SnapshotStats::collect(&snapshot);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.folders, 1);
        assert_eq!(stats.files, 4);
        assert_eq!(stats.parseable, 2);
        assert_eq!(stats.total_bytes, 126);
        assert_eq!(stats.extensions, vec![".pdf", ".png", ".txt"]);
    }

    #[test]
    fn readable_extensions_follow_registry() {
        let snapshot = Snapshot::new(vec![
            entry("/b/a.pdf", false, ".pdf", 1, true),
            entry("/b/b.txt", false, ".txt", 1, true),
            entry("/b/c.csv", false, ".csv", 1, true),
        ]);
        let stats = SnapshotStats::collect(&snapshot);
        let readable = stats.readable_extensions(&ParserRegistry::with_defaults());
        assert_eq!(readable, vec![".csv", ".txt"]);
    }

    #[test]
    fn format_bytes_ranges() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }
}
