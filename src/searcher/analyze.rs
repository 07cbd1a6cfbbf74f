//! Turns free query text into extension filters, year filters and keywords.

use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;

use chrono::{Duration, NaiveDate};
use regex::Regex;

use crate::config::SearchVocabulary;
use crate::error::OdxError;
use crate::indexer::extension::dotted;

/// Compiled form of a [`SearchVocabulary`].
#[derive(Debug, Clone)]
pub struct QueryAnalyzer {
    vocabulary: SearchVocabulary,
    literal_ext: Option<Regex>,
    synonyms: Vec<(Regex, Vec<String>)>,
    explicit_year: Regex,
    year_token: Regex,
    token: Regex,
    excluded: BTreeSet<String>,
}

impl QueryAnalyzer {
    pub fn new(vocabulary: &SearchVocabulary) -> Result<Self, OdxError> {
        let mut literals: Vec<String> = vocabulary
            .literal_extensions
            .iter()
            .map(|e| regex::escape(e.trim_start_matches('.').to_lowercase().as_str()))
            .filter(|e| !e.is_empty())
            .collect();
        literals.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        literals.dedup();
        let literal_ext = if literals.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"\b({})\b", literals.join("|")))?)
        };

        let mut synonyms = Vec::with_capacity(vocabulary.extension_synonyms.len());
        for entry in &vocabulary.extension_synonyms {
            let pattern = term_pattern(&entry.term.to_lowercase());
            let exts = entry.expands_to.iter().map(|e| dotted(e)).collect();
            synonyms.push((Regex::new(&pattern)?, exts));
        }

        let excluded = vocabulary
            .stopwords
            .iter()
            .chain(&vocabulary.time_words)
            .chain(&vocabulary.extension_words)
            .map(|w| w.to_lowercase())
            .collect();

        Ok(Self {
            vocabulary: vocabulary.clone(),
            literal_ext,
            synonyms,
            explicit_year: Regex::new(r"(20[0-9]{2})\s*년?")?,
            year_token: Regex::new(r"^20[0-9]{2}년?$")?,
            token: Regex::new(r"[\w가-힣]+")?,
            excluded,
        })
    }

    /// Dotted extensions named in `text`, literally or through a synonym.
    pub fn extract_extensions(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut found = Vec::new();

        if let Some(re) = &self.literal_ext {
            for cap in re.captures_iter(&lower) {
                found.push(dotted(&cap[1]));
            }
        }
        for (re, exts) in &self.synonyms {
            if re.is_match(&lower) {
                found.extend(exts.iter().cloned());
            }
        }

        dedup_stable(found)
    }

    /// Years named in `text`, explicit (`2024`, `2024년`) or relative to
    /// `current_year`, bounded to `[min_year, current_year + 1]`.
    pub fn extract_years(&self, text: &str, current_year: i32) -> Vec<i32> {
        let mut years = Vec::new();

        for cap in self.explicit_year.captures_iter(text) {
            if let Ok(year) = cap[1].parse::<i32>() {
                years.push(year);
            }
        }

        // Longest phrase first; each match is blanked so a shorter phrase
        // contained in it cannot fire again.
        let mut relative: Vec<_> = self.vocabulary.relative_years.iter().collect();
        relative.sort_by(|a, b| b.term.chars().count().cmp(&a.term.chars().count()));
        let mut rest = text.to_lowercase();
        for rel in relative {
            let term = rel.term.to_lowercase();
            if term.is_empty() || !rest.contains(&term) {
                continue;
            }
            years.push(current_year + rel.offset);
            rest = rest.replace(&term, " ");
        }

        let upper = current_year + 1;
        let min = self.vocabulary.min_year;
        dedup_stable(
            years
                .into_iter()
                .filter(|y| (min..=upper).contains(y))
                .collect(),
        )
    }

    /// Calendar days named in `text` relative to `today` ("오늘",
    /// "어제", "그저께"). Phrases match longest first, like relative years.
    pub fn extract_days(&self, text: &str, today: NaiveDate) -> Vec<NaiveDate> {
        let mut relative: Vec<_> = self.vocabulary.relative_days.iter().collect();
        relative.sort_by(|a, b| b.term.chars().count().cmp(&a.term.chars().count()));

        let mut days = Vec::new();
        let mut rest = text.to_lowercase();
        for rel in relative {
            let term = rel.term.to_lowercase();
            if term.is_empty() || !rest.contains(&term) {
                continue;
            }
            if let Some(day) = today.checked_add_signed(Duration::days(rel.offset_days)) {
                days.push(day);
            }
            rest = rest.replace(&term, " ");
        }

        dedup_stable(days)
    }

    /// Meaningful keywords of `text`: tokens minus stopwords, time words,
    /// extension words, numbers and short noise.
    pub fn extract_keywords(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let mut keywords = Vec::new();

        for m in self.token.find_iter(&lower) {
            let token = m.as_str();
            let len = token.chars().count();
            let hangul_only = token.chars().all(is_hangul);
            if !((hangul_only && len >= 2) || len >= 3) {
                continue;
            }
            if token.chars().all(|c| c.is_numeric()) || self.year_token.is_match(token) {
                continue;
            }
            if self.excluded.contains(token) {
                continue;
            }
            keywords.push(token.to_string());
        }

        dedup_stable(keywords)
    }

    /// `keywords` followed by their domain synonyms. Never drops a keyword.
    pub fn expand_keywords(&self, keywords: &[String]) -> Vec<String> {
        let mut expanded: Vec<String> = keywords.to_vec();
        for keyword in keywords {
            let lower = keyword.to_lowercase();
            for entry in &self.vocabulary.keyword_expansions {
                if entry.term.to_lowercase() == lower {
                    expanded.extend(entry.expands_to.iter().cloned());
                }
            }
        }
        dedup_stable(expanded)
    }
}

fn is_hangul(c: char) -> bool {
    ('가'..='힣').contains(&c)
}

/// ASCII terms must stand as whole words; others match anywhere, since
/// Korean attaches particles directly to the word.
fn term_pattern(term: &str) -> String {
    if term.is_ascii() {
        format!(r"\b{}\b", regex::escape(term))
    } else {
        regex::escape(term)
    }
}

fn dedup_stable<T: Clone + Eq + Hash>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> QueryAnalyzer {
        QueryAnalyzer::new(&SearchVocabulary::default()).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn literal_extensions() {
        let a = analyzer();
        assert_eq!(a.extract_extensions("작년 계약서 pdf"), vec![".pdf"]);
        assert_eq!(a.extract_extensions("budget DOCX and xlsx"), vec![".docx", ".xlsx"]);
        assert!(a.extract_extensions("pdfs about docker").is_empty());
    }

    #[test]
    fn synonym_extensions() {
        let a = analyzer();
        assert_eq!(a.extract_extensions("엑셀 파일"), vec![".xlsx", ".xls"]);
        assert_eq!(a.extract_extensions("Excel sheets"), vec![".xlsx", ".xls"]);
        assert!(a.extract_extensions("context switch").is_empty());
    }

    #[test]
    fn relative_years() {
        let a = analyzer();
        assert_eq!(a.extract_years("작년 계약서 pdf", 2025), vec![2024]);
        assert_eq!(a.extract_years("재작년 보고서", 2025), vec![2023]);
        assert_eq!(a.extract_years("올해 예산", 2025), vec![2025]);
        assert_eq!(a.extract_years("report from last year", 2025), vec![2024]);
        assert_eq!(a.extract_years("the year before last", 2025), vec![2023]);
    }

    #[test]
    fn relative_days() {
        let a = analyzer();
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let day = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
        assert_eq!(a.extract_days("오늘 받은 보고서", today), vec![today]);
        assert_eq!(a.extract_days("어제 회의록", today), vec![day(2, 28)]);
        assert_eq!(a.extract_days("그저께 자료", today), vec![day(2, 27)]);
        assert_eq!(a.extract_days("어제나 그제 메모", today), vec![day(2, 28), day(2, 27)]);
        assert_eq!(a.extract_days("notes from the day before yesterday", today), vec![day(2, 27)]);
        assert!(a.extract_days("작년 계약서", today).is_empty());
    }

    #[test]
    fn day_words_are_not_keywords() {
        let a = analyzer();
        assert_eq!(a.extract_keywords("오늘 보고서"), strings(&["보고서"]));
        assert_eq!(a.extract_keywords("yesterday budget"), strings(&["budget"]));
    }

    #[test]
    fn explicit_years_are_bounded() {
        let a = analyzer();
        assert_eq!(a.extract_years("2024년 2021 보고서", 2025), vec![2024, 2021]);
        assert_eq!(a.extract_years("2026 plan", 2025), vec![2026]);
        assert!(a.extract_years("2027 plan", 2025).is_empty());
        assert_eq!(a.extract_years("2024 작년", 2025), vec![2024]);
    }

    #[test]
    fn keywords_drop_noise() {
        let a = analyzer();
        assert_eq!(a.extract_keywords("작년 계약서 pdf"), strings(&["계약서"]));
        assert_eq!(
            a.extract_keywords("find the GitHub files about 영업 in 2024년"),
            strings(&["github", "영업"])
        );
        assert!(a.extract_keywords("a b 1234 가").is_empty());
    }

    #[test]
    fn keywords_are_unique() {
        let a = analyzer();
        assert_eq!(a.extract_keywords("budget Budget budget"), strings(&["budget"]));
    }

    #[test]
    fn expansion_is_additive() {
        let a = analyzer();
        let expanded = a.expand_keywords(&strings(&["계약서", "github"]));
        assert_eq!(
            expanded,
            strings(&["계약서", "github", "contract", "agreement", "계약", "협약"])
        );
    }

    #[test]
    fn expansion_dedupes_shared_synonyms() {
        let a = analyzer();
        let expanded = a.expand_keywords(&strings(&["보고서", "분석"]));
        assert_eq!(expanded, strings(&["보고서", "분석", "report", "리포트", "analysis"]));
    }
}
