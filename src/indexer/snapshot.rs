use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use tracing::{debug, warn};

use crate::error::OdxError;

use super::entry::{FileInfo, Snapshot};
use super::paths::safe_file_stem;

/// Column order of the on-disk format.
pub const COLUMNS: [&str; 10] = [
    "path",
    "name",
    "parent_path",
    "is_directory",
    "extension",
    "size_bytes",
    "created_time",
    "modified_time",
    "is_parseable",
    "depth_level",
];

/// Cache file for `base` inside `cache_dir`.
pub fn cache_path(cache_dir: &Path, base: &Path) -> PathBuf {
    cache_dir.join(format!("structured_index_{}.csv", safe_file_stem(base)))
}

/// Writes `snapshot` to `path`, one row per entry with a header row.
///
/// Rows go to a temporary sibling first and are renamed into place while
/// an exclusive lock is held on `<path>.lock`.
pub fn save(snapshot: &Snapshot, path: &Path) -> Result<(), OdxError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let lock_path = with_suffix(path, "lock");
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)?;
    lock_file.lock_exclusive()?;

    let result = write_rows(snapshot, path);

    if let Err(err) = FileExt::unlock(&lock_file) {
        debug!("cannot release {}: {}", lock_path.display(), err);
    }
    result
}

fn write_rows(snapshot: &Snapshot, path: &Path) -> Result<(), OdxError> {
    let tmp_path = with_suffix(path, "tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp_path)?;
        if snapshot.is_empty() {
            writer.write_record(COLUMNS)?;
        }
        for info in snapshot {
            writer.serialize(info)?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Reads a snapshot written by [`save`].
///
/// Any failure (missing file, malformed row, missing column) yields an
/// empty snapshot. Callers treat empty as "no cache", never as "empty
/// directory".
pub fn load(path: &Path) -> Snapshot {
    match try_load(path) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            if path.exists() {
                warn!("discarding unreadable cache {}: {}", path.display(), err);
            } else {
                debug!("no cache at {}", path.display());
            }
            Snapshot::default()
        }
    }
}

/// Strict variant of [`load`] that reports why a cache is unusable.
pub fn try_load(path: &Path) -> Result<Snapshot, OdxError> {
    let mut reader = csv::Reader::from_path(path)?;
    let entries = reader
        .deserialize::<FileInfo>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Snapshot::new(entries))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry(path: &str, is_directory: bool) -> FileInfo {
        let name = Path::new(path)
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        FileInfo {
            path: path.to_string(),
            name,
            parent_path: "/base".to_string(),
            is_directory,
            extension: if is_directory { String::new() } else { ".pdf".to_string() },
            size_bytes: if is_directory { 0 } else { 2048 },
            created_time: "2024-05-01T09:30:00.000000".to_string(),
            modified_time: "2024-05-02T10:15:30.123456".to_string(),
            is_parseable: !is_directory,
            depth_level: 1,
        }
    }

    #[test]
    fn save_then_load_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.csv");
        let snapshot = Snapshot::new(vec![
            sample_entry("/base/docs", true),
            sample_entry("/base/보고서, 최종.pdf", false),
        ]);

        save(&snapshot, &path).unwrap();
        assert_eq!(load(&path), snapshot);
        assert!(!with_suffix(&path, "tmp").exists());
    }

    #[test]
    fn header_row_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.csv");
        save(&Snapshot::new(vec![sample_entry("/base/a.pdf", false)]), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn empty_snapshot_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.csv");
        save(&Snapshot::default(), &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim(), COLUMNS.join(","));
        assert!(load(&path).is_empty());
    }

    #[test]
    fn booleans_are_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.csv");
        let text = format!(
            "{}\n/b/x.txt,x.txt,/b,False,.txt,3,2024-01-01T00:00:00,2024-01-01T00:00:00,TRUE,1\n",
            COLUMNS.join(",")
        );
        fs::write(&path, text).unwrap();

        let snapshot = load(&path);
        assert_eq!(snapshot.len(), 1);
        let entry = &snapshot.entries()[0];
        assert!(!entry.is_directory);
        assert!(entry.is_parseable);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("absent.csv")).is_empty());
    }

    #[test]
    fn malformed_row_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.csv");
        let text = format!(
            "{}\n/b/x.txt,x.txt,/b,false,.txt,not-a-number,t,t,true,1\n",
            COLUMNS.join(",")
        );
        fs::write(&path, text).unwrap();
        assert!(load(&path).is_empty());
        assert!(try_load(&path).is_err());
    }

    #[test]
    fn missing_column_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.csv");
        fs::write(&path, "path,name\n/b/x.txt,x.txt\n").unwrap();
        assert!(load(&path).is_empty());
    }

    #[test]
    fn cache_path_uses_safe_stem() {
        let path = cache_path(Path::new("/cache"), Path::new("/home/me/docs"));
        assert_eq!(
            path,
            PathBuf::from("/cache/structured_index__home_me_docs.csv")
        );
    }
}
