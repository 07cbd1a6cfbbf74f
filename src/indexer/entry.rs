use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::IndexPolicy;

use super::extension::extension_of;

/// Timestamp layout used for `created_time` / `modified_time`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// One file-system node recorded in a snapshot.
///
/// Entries are never edited in place: a change on disk is represented by
/// replacing the whole entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Absolute path.
    pub path: String,
    /// Base name.
    pub name: String,
    /// Absolute path of the containing directory.
    pub parent_path: String,
    #[serde(deserialize_with = "bool_token")]
    pub is_directory: bool,
    /// Lower-cased dotted extension (`.pdf`); empty for directories.
    pub extension: String,
    /// Size in bytes; 0 for directories.
    pub size_bytes: u64,
    /// Local ISO-8601 creation timestamp.
    pub created_time: String,
    /// Local ISO-8601 modification timestamp.
    pub modified_time: String,
    #[serde(deserialize_with = "bool_token")]
    pub is_parseable: bool,
    /// Number of path segments between the base path and this entry.
    pub depth_level: usize,
}

impl FileInfo {
    /// Stats `path` (following symlinks) and builds an entry at `depth`.
    pub fn from_path(path: &Path, depth: usize, policy: &IndexPolicy) -> io::Result<FileInfo> {
        let meta = std::fs::metadata(path)?;
        Ok(Self::from_metadata(path, &meta, depth, policy))
    }

    pub(crate) fn from_metadata(
        path: &Path,
        meta: &Metadata,
        depth: usize,
        policy: &IndexPolicy,
    ) -> FileInfo {
        let is_directory = meta.is_dir();
        let extension = if is_directory {
            String::new()
        } else {
            extension_of(path)
        };
        let is_parseable = policy.is_parseable(&extension);

        FileInfo {
            path: path.to_string_lossy().to_string(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            parent_path: path
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            is_directory,
            extension,
            size_bytes: if is_directory { 0 } else { meta.len() },
            created_time: format_timestamp(created_at(meta)),
            modified_time: format_timestamp(meta.modified().unwrap_or(SystemTime::UNIX_EPOCH)),
            is_parseable,
            depth_level: depth,
        }
    }

    /// Year of the modification timestamp, if it parses.
    pub fn modified_year(&self) -> Option<i32> {
        timestamp_year(&self.modified_time)
    }

    /// Calendar day of the last modification.
    pub fn modified_date(&self) -> Option<NaiveDate> {
        timestamp_date(&self.modified_time)
    }
}

/// The (modified time, size, created time) triple compared between scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSignature {
    pub modified_time: String,
    pub size_bytes: u64,
    pub created_time: String,
}

impl ChangeSignature {
    pub fn of(info: &FileInfo) -> Self {
        Self {
            modified_time: info.modified_time.clone(),
            size_bytes: info.size_bytes,
            created_time: info.created_time.clone(),
        }
    }

    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            modified_time: format_timestamp(meta.modified().unwrap_or(SystemTime::UNIX_EPOCH)),
            size_bytes: meta.len(),
            created_time: format_timestamp(created_at(meta)),
        }
    }
}

/// An ordered collection of entries describing one base path at one point
/// in time. Every transformation produces a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<FileInfo>,
}

impl Snapshot {
    pub fn new(entries: Vec<FileInfo>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FileInfo] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileInfo> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<FileInfo> {
        self.entries
    }

    /// Entries sorted by path, for order-insensitive comparison.
    pub fn sorted_by_path(&self) -> Vec<FileInfo> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    /// Entry recorded at exactly `path`.
    pub fn find(&self, path: &str) -> Option<&FileInfo> {
        self.entries.iter().find(|e| e.path == path)
    }
}

impl FromIterator<FileInfo> for Snapshot {
    fn from_iter<I: IntoIterator<Item = FileInfo>>(iter: I) -> Self {
        Snapshot::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a FileInfo;
    type IntoIter = std::slice::Iter<'a, FileInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Formats a system time as a local, microsecond-precision ISO-8601 string.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Extracts the year from an ISO-8601 timestamp (naive or offset-carrying).
pub fn timestamp_year(s: &str) -> Option<i32> {
    timestamp_date(s).map(|d| d.year())
}

/// Calendar day of an ISO-8601 timestamp, as written (no zone conversion).
pub fn timestamp_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    DateTime::parse_from_rfc3339(&s.replace('Z', "+00:00"))
        .ok()
        .map(|dt| dt.date_naive())
}

/// Creation time where the platform records one; otherwise the inode
/// change time on unix, else the modification time.
fn created_at(meta: &Metadata) -> SystemTime {
    if let Ok(t) = meta.created() {
        return t;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        let secs = meta.ctime();
        let nanos = meta.ctime_nsec() as u32;
        if secs >= 0 {
            return SystemTime::UNIX_EPOCH + std::time::Duration::new(secs as u64, nanos);
        }
    }
    meta.modified().unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Accepts `true`/`false` in any letter case.
fn bool_token<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let token = String::deserialize(deserializer)?;
    match token.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected true/false, got '{}'",
            other
        ))),
    }
}
