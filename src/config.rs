//! Explicit policy and vocabulary values.
//!
//! Nothing here is process-global: an `Indexer` owns its `IndexPolicy` and a
//! `QueryAnalyzer` owns its `SearchVocabulary`, so several instances with
//! different tables can coexist.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::OdxError;

/// Rules applied while walking a tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexPolicy {
    /// Directory-name prefixes that are never descended into, matched
    /// case-insensitively against the directory's base name.
    pub exclude_prefixes: Vec<String>,
    /// Lower-cased, dotted extensions whose content can be extracted.
    pub parseable_extensions: BTreeSet<String>,
    /// Case-fold paths before comparing them across snapshots.
    pub fold_case: bool,
}

impl Default for IndexPolicy {
    fn default() -> Self {
        let exclude_prefixes = [
            ".git",
            ".hg",
            ".svn",
            "node_modules",
            "__pycache__",
            ".venv",
            "venv",
            "env",
            ".mypy_cache",
            ".ruff_cache",
            "$recycle.bin",
            "system volume information",
            "windows",
            "program files",
            "program files (x86)",
            "programdata",
            "msocache",
            "perflogs",
            "recovery",
            "documents and settings",
        ];
        let parseable = [
            ".txt", ".md", ".docx", ".pdf", ".xlsx", ".xls", ".csv", ".pptx", ".hwp",
        ];
        Self {
            exclude_prefixes: exclude_prefixes.iter().map(|s| s.to_string()).collect(),
            parseable_extensions: parseable.iter().map(|s| s.to_string()).collect(),
            fold_case: cfg!(windows),
        }
    }
}

impl IndexPolicy {
    /// True if a directory with this base name must be skipped.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.exclude_prefixes
            .iter()
            .any(|prefix| lower.starts_with(&prefix.to_lowercase()))
    }

    /// True if `extension` (dotted, lower-cased) is in the parseable set.
    pub fn is_parseable(&self, extension: &str) -> bool {
        !extension.is_empty() && self.parseable_extensions.contains(extension)
    }
}

/// A term and the values it expands to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    pub term: String,
    pub expands_to: Vec<String>,
}

impl TermEntry {
    fn new(term: &str, expands_to: &[&str]) -> Self {
        Self {
            term: term.to_string(),
            expands_to: expands_to.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A relative time phrase and its offset from the current year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeYear {
    pub term: String,
    pub offset: i32,
}

/// A relative day phrase and its offset in days from today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeDay {
    pub term: String,
    pub offset_days: i64,
}

/// Tables used to turn free text into keywords and filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchVocabulary {
    /// Extensions recognised literally in a query (undotted).
    pub literal_extensions: Vec<String>,
    /// Words that stand for a set of extensions (e.g. a spreadsheet word).
    pub extension_synonyms: Vec<TermEntry>,
    /// Domain keywords and their additive synonyms.
    pub keyword_expansions: Vec<TermEntry>,
    /// Relative year phrases.
    pub relative_years: Vec<RelativeYear>,
    /// Relative day phrases ("today", "yesterday").
    pub relative_days: Vec<RelativeDay>,
    /// Functional words never used as keywords.
    pub stopwords: BTreeSet<String>,
    /// Time words never used as keywords.
    pub time_words: BTreeSet<String>,
    /// Extension words never used as keywords.
    pub extension_words: BTreeSet<String>,
    /// Earliest year accepted as a filter.
    pub min_year: i32,
}

fn set_of(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|s| s.to_string()).collect()
}

impl Default for SearchVocabulary {
    fn default() -> Self {
        let literal_extensions = [
            "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "md", "csv", "hwp",
        ];

        let extension_synonyms = vec![
            TermEntry::new("문서", &["pdf", "docx", "doc"]),
            TermEntry::new("엑셀", &["xlsx", "xls"]),
            TermEntry::new("파워포인트", &["pptx", "ppt"]),
            TermEntry::new("텍스트", &["txt", "md"]),
            TermEntry::new("한글", &["hwp"]),
            TermEntry::new("마이크로소프트", &["docx", "xlsx", "pptx"]),
            TermEntry::new("excel", &["xlsx", "xls"]),
            TermEntry::new("powerpoint", &["pptx", "ppt"]),
            TermEntry::new("text", &["txt", "md"]),
        ];

        let keyword_expansions = vec![
            TermEntry::new("사업보고서", &["business_report", "annual_report", "경영보고서", "연간보고서"]),
            TermEntry::new("계약서", &["contract", "agreement", "계약", "협약"]),
            TermEntry::new("제안서", &["proposal", "제안", "기획서"]),
            TermEntry::new("회의록", &["meeting", "minutes", "회의", "미팅"]),
            TermEntry::new("매뉴얼", &["manual", "guide", "가이드", "지침"]),
            TermEntry::new("보고서", &["report", "리포트"]),
            TermEntry::new("계획", &["plan", "planning", "계획서"]),
            TermEntry::new("분석", &["analysis", "리포트", "report"]),
            TermEntry::new("예산", &["budget", "예산서"]),
            TermEntry::new("영업", &["sales", "매출", "세일즈"]),
        ];

        let relative_years = [
            ("재작년", -2),
            ("작년", -1),
            ("올해", 0),
            ("금년", 0),
            ("year before last", -2),
            ("last year", -1),
            ("this year", 0),
        ]
        .iter()
        .map(|(term, offset)| RelativeYear {
            term: term.to_string(),
            offset: *offset,
        })
        .collect();

        let relative_days = [
            ("오늘", 0),
            ("어제", -1),
            ("그제", -2),
            ("그저께", -2),
            ("day before yesterday", -2),
            ("yesterday", -1),
            ("today", 0),
        ]
        .iter()
        .map(|(term, offset_days)| RelativeDay {
            term: term.to_string(),
            offset_days: *offset_days,
        })
        .collect();

        let stopwords = set_of(&[
            // Korean particles and request verbs
            "파일", "파일을", "파일이", "파일에", "파일의", "파일은", "파일과",
            "중에", "중에서", "에서", "에게", "에", "을", "를", "이", "가", "는", "은", "의", "와", "과",
            "찾아줘", "찾아", "찾기", "검색", "검색해", "검색해줘", "보여줘", "알려줘",
            "관련", "관련된", "관련있는", "관련이", "대한", "대해", "대해서",
            "작성된", "만든", "생성된", "저장된", "있는", "없는", "되는", "하는",
            "그", "그것", "이것", "저것", "여기", "거기", "저기",
            "때", "시", "때문에", "위해", "통해", "같은", "다른", "새로운", "기존",
            "모든", "전체", "일부", "몇", "여러", "다양한",
            "좀", "좀더", "조금", "많이", "전부", "다",
            "및", "또는", "또", "그리고", "하지만", "그러나", "그래서", "따라서",
            // English
            "file", "files", "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
            "of", "with", "by", "find", "search", "show", "get", "related", "about", "from",
            "that", "this", "all", "some", "any",
        ]);

        let time_words = set_of(&[
            "올해", "작년", "재작년", "금년", "년", "월", "일", "시간", "때", "시기", "기간", "동안",
            "1월", "2월", "3월", "4월", "5월", "6월", "7월", "8월", "9월", "10월", "11월", "12월",
            "오늘", "어제", "그제", "그저께",
            "year", "last", "before", "day", "today", "yesterday",
        ]);

        let extension_words = set_of(&[
            "pdf", "docx", "doc", "xlsx", "xls", "pptx", "ppt", "txt", "md", "csv", "hwp",
            "문서", "엑셀", "파워포인트", "텍스트", "한글", "마이크로소프트", "excel", "powerpoint",
            "text",
        ]);

        Self {
            literal_extensions: literal_extensions.iter().map(|s| s.to_string()).collect(),
            extension_synonyms,
            keyword_expansions,
            relative_years,
            relative_days,
            stopwords,
            time_words,
            extension_words,
            min_year: 2000,
        }
    }
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexPolicy,
    pub search: SearchVocabulary,
}

impl Config {
    /// Loads configuration from `path`, or from the per-user config file
    /// when `path` is `None`. A missing per-user file yields defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, OdxError> {
        match path {
            Some(p) => Self::from_file(p),
            None => match default_config_path() {
                Some(p) if p.is_file() => Self::from_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, OdxError> {
        let text = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)?;
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "odx").map(|p| p.config_dir().join("config.toml"))
}

/// Resolves the cache directory: explicit flag, then `ODX_CACHE_DIR`, then
/// the per-user cache directory, then `./.odx_index`.
pub fn resolve_cache_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os("ODX_CACHE_DIR") {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("", "", "odx")
        .map(|p| p.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".odx_index"))
}
