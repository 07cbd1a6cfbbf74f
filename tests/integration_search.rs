mod common;

use odx::searcher::refine::{refine, refine_paths, suggest_keywords};
use odx::{search, QueryAnalyzer, SearchOptions, SearchQuery, SearchVocabulary};

fn analyzer() -> QueryAnalyzer {
    QueryAnalyzer::new(&SearchVocabulary::default()).expect("default vocabulary compiles")
}

fn opts_2025(limit: usize) -> SearchOptions {
    SearchOptions {
        limit,
        current_year: Some(2025),
        ..Default::default()
    }
}

fn names(result: &odx::SearchResult) -> Vec<&str> {
    result.items.iter().map(|i| i.name.as_str()).collect()
}

#[test]
fn last_year_contract_pdf_scenario() {
    let (_tmp, root) = common::tree(&[
        "legal/계약서_초안.pdf",
        "legal/계약서_최종.pdf",
        "legal/계약_검토.txt",
    ]);
    common::set_year(&root.join("legal/계약서_초안.pdf"), 2023);
    common::set_year(&root.join("legal/계약서_최종.pdf"), 2024);
    common::set_year(&root.join("legal/계약_검토.txt"), 2024);

    let indexer = common::indexer(&root);
    let snapshot = indexer.build();
    let result = search(
        &analyzer(),
        &SearchQuery::text("작년 계약서 pdf"),
        &snapshot,
        &opts_2025(200),
    );

    assert_eq!(result.years, vec![2024]);
    assert_eq!(result.extensions, vec![".pdf"]);
    assert!(result.expanded_keywords.iter().any(|k| k == "계약"));
    assert_eq!(names(&result), vec!["계약서_최종.pdf"]);
}

#[test]
fn github_limit_one_prefers_parseable() {
    let (_tmp, root) = common::tree(&["github-export.zip", "github-notes.md"]);
    let indexer = common::indexer(&root);
    let snapshot = indexer.build();

    let result = search(
        &analyzer(),
        &SearchQuery::text("github"),
        &snapshot,
        &opts_2025(1),
    );

    assert_eq!(result.total_matches, 2);
    assert_eq!(names(&result), vec!["github-notes.md"]);
}

#[test]
fn keyword_matches_folder_path() {
    let (_tmp, root) = common::tree(&["영업팀/q1.xlsx", "영업팀/q2.xlsx", "기타/memo.txt"]);
    let indexer = common::indexer(&root);
    let snapshot = indexer.build();

    let query = SearchQuery::with_keywords("", vec!["영업팀".to_string()]);
    let result = search(&analyzer(), &query, &snapshot, &opts_2025(200));

    // The folder itself plus both files under it; parseable files first.
    assert_eq!(names(&result), vec!["q1.xlsx", "q2.xlsx", "영업팀"]);
}

#[test]
fn explicit_extension_filter_is_applied() {
    let (_tmp, root) = common::tree(&["budget/plan.pdf", "budget/plan.txt", "budget/plan.csv"]);
    let indexer = common::indexer(&root);
    let snapshot = indexer.build();

    let opts = SearchOptions {
        allowed_extensions: vec!["csv".to_string(), ".TXT".to_string()],
        ..opts_2025(200)
    };
    let result = search(&analyzer(), &SearchQuery::text("budget plan"), &snapshot, &opts);

    let mut found = names(&result);
    found.sort();
    assert_eq!(found, vec!["plan.csv", "plan.txt"]);
}

#[test]
fn refine_narrows_search_results() {
    let (_tmp, root) = common::tree(&[
        "projects/alpha/report_sales.pdf",
        "projects/alpha/report_hr.pdf",
        "projects/beta/report_sales.txt",
    ]);
    let indexer = common::indexer(&root);
    let snapshot = indexer.build();

    let result = search(
        &analyzer(),
        &SearchQuery::with_keywords("", vec!["report".to_string()]),
        &snapshot,
        &opts_2025(200),
    );
    let paths: Vec<String> = result.items.iter().map(|i| i.path.clone()).collect();
    assert_eq!(paths.len(), 3);

    let sales = refine_paths(&paths, &["SALES".to_string()]);
    assert_eq!(sales.len(), 2);

    let infos = refine(&snapshot, &paths, &["beta".to_string()]);
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].name, "report_sales.txt");

    let suggestions = suggest_keywords(&paths, 20);
    assert_eq!(suggestions.first().map(String::as_str), Some("sales"));
    assert!(suggestions.iter().any(|s| s == "alpha"));
}
