//! Narrowing an existing result list, and suggesting words to narrow by.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use crate::indexer::entry::{FileInfo, Snapshot};

/// Default cap for [`suggest_keywords`].
pub const DEFAULT_SUGGESTIONS: usize = 20;

const SUGGESTION_STOPWORDS_KO: &[&str] = &[
    "파일", "문서", "자료", "최종", "최종본", "사본", "수정", "최신", "버전", "보고", "보고서", "첨부",
];
const SUGGESTION_STOPWORDS_EN: &[&str] = &[
    "final", "copy", "new", "ver", "version", "doc", "file", "report", "draft",
];

/// Keeps the paths that contain at least one keyword: in the lower-cased
/// path, in the raw path, or in the lower-cased file stem. Blank keywords
/// are ignored; with no usable keyword the input is returned unchanged.
pub fn refine_paths<S: AsRef<str>>(paths: &[S], keywords: &[String]) -> Vec<String> {
    let keywords: Vec<&str> = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    let paths: Vec<&str> = paths.iter().map(|p| p.as_ref()).collect();
    if keywords.is_empty() {
        return paths.into_iter().map(str::to_string).collect();
    }

    paths
        .into_iter()
        .filter(|path| {
            let lower = path.to_lowercase();
            let stem = file_stem(path).to_lowercase();
            keywords.iter().any(|k| {
                let k_lower = k.to_lowercase();
                lower.contains(&k_lower) || path.contains(k) || stem.contains(&k_lower)
            })
        })
        .map(str::to_string)
        .collect()
}

/// [`refine_paths`] resolved against a snapshot; paths the snapshot does
/// not know are dropped.
pub fn refine(snapshot: &Snapshot, paths: &[String], keywords: &[String]) -> Vec<FileInfo> {
    let by_path: HashMap<&str, &FileInfo> =
        snapshot.iter().map(|i| (i.path.as_str(), i)).collect();
    refine_paths(paths, keywords)
        .iter()
        .filter_map(|p| by_path.get(p.as_str()).map(|i| (*i).clone()))
        .collect()
}

/// Words worth refining by: file-stem tokens shared by at least two paths
/// (most frequent first, then alphabetical), followed by folder-name tokens
/// (alphabetical). At most `max` are returned.
pub fn suggest_keywords<S: AsRef<str>>(paths: &[S], max: usize) -> Vec<String> {
    let mut file_counts: HashMap<String, usize> = HashMap::new();
    let mut folder_tokens: BTreeSet<String> = BTreeSet::new();

    let paths: Vec<&str> = paths.iter().map(|p| p.as_ref()).collect();
    for path in paths {
        let mut seen_here: HashSet<String> = HashSet::new();
        for token in tokens(file_stem(path)) {
            if seen_here.insert(token.to_lowercase()) {
                *file_counts.entry(token.to_string()).or_default() += 1;
            }
        }

        for part in parent_of(path).split(['/', '\\']) {
            for token in tokens(part) {
                folder_tokens.insert(token.to_string());
            }
        }
    }

    let mut shared: Vec<(String, usize)> =
        file_counts.into_iter().filter(|(_, c)| *c >= 2).collect();
    shared.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut merged: Vec<String> = Vec::new();
    for (token, _) in shared {
        if merged.len() >= max {
            return merged;
        }
        merged.push(token);
    }
    for token in folder_tokens {
        if merged.len() >= max {
            break;
        }
        if !merged.contains(&token) {
            merged.push(token);
        }
    }
    merged
}

/// Alphanumeric / Hangul runs that are not numbers, short, or noise words.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || ('가'..='힣').contains(&c)))
        .filter(|t| !t.is_empty())
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .filter(|t| t.chars().count() >= 2)
        .filter(|t| {
            !SUGGESTION_STOPWORDS_KO.contains(t)
                && !SUGGESTION_STOPWORDS_EN.contains(&t.to_lowercase().as_str())
        })
}

fn file_stem(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

fn parent_of(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(i) => &path[..i],
        None => "",
    }
}
