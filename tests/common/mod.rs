#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{Local, TimeZone};
use odx::indexer::Indexer;
use odx::{FileInfo, IndexPolicy, Snapshot};

/// Creates a temp directory holding `files` (relative paths, parents
/// created as needed). Each file's content is its own relative path.
pub fn tree(files: &[&str]) -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().expect("failed to create tempdir");
    let root = tmp.path().join("tree");
    fs::create_dir_all(&root).expect("failed to create tree root");
    for rel in files {
        write_file(&root, rel, rel);
    }
    (tmp, root)
}

/// Writes `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create parent dir");
    }
    fs::write(&path, content).expect("failed to write file");
    path
}

/// Pins the modification time of `path` to noon on 15 June of `year`.
pub fn set_year(path: &Path, year: i32) {
    let when = Local
        .with_ymd_and_hms(year, 6, 15, 12, 0, 0)
        .single()
        .expect("valid local time");
    let file = fs::File::options()
        .write(true)
        .open(path)
        .expect("failed to open file for set_modified");
    file.set_modified(SystemTime::from(when))
        .expect("failed to set mtime");
}

pub fn indexer(root: &Path) -> Indexer {
    Indexer::new(root, IndexPolicy::default()).expect("root should be a directory")
}

/// Paths relative to the indexer's base, in snapshot order.
pub fn relative_paths(indexer: &Indexer, snapshot: &Snapshot) -> Vec<String> {
    snapshot
        .iter()
        .map(|info| relative(indexer, info))
        .collect()
}

pub fn relative(indexer: &Indexer, info: &FileInfo) -> String {
    Path::new(&info.path)
        .strip_prefix(indexer.base())
        .expect("entry under base")
        .to_string_lossy()
        .replace('\\', "/")
}

/// File entries sorted by path, compared field for field.
pub fn file_entries(snapshot: &Snapshot) -> Vec<FileInfo> {
    snapshot
        .sorted_by_path()
        .into_iter()
        .filter(|info| !info.is_directory)
        .collect()
}

/// (path, is_directory, depth) for every entry, sorted. Directory
/// timestamps change whenever a child changes, so they are left out.
pub fn shape(snapshot: &Snapshot) -> Vec<(String, bool, usize)> {
    let mut shape: Vec<_> = snapshot
        .iter()
        .map(|info| (info.path.clone(), info.is_directory, info.depth_level))
        .collect();
    shape.sort();
    shape
}
