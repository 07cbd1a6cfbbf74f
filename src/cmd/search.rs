use crate::cmd::{Context, SearchArgs};
use crate::error::OdxError;
use crate::indexer::entry::Snapshot;
use crate::searcher::format::format_summary;
use crate::searcher::{
    self, OutputMode, QueryAnalyzer, SearchOptions, SearchQuery, SearchResult,
};

pub fn run(ctx: &Context, args: &SearchArgs) {
    let output_mode = if args.files_only {
        OutputMode::FilesOnly
    } else if args.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let indexer = ctx.indexer();
    let snapshot = match indexer.prepare(&ctx.cache_dir, false) {
        Ok(prepared) => prepared.snapshot,
        Err(err) => {
            eprintln!("warning: cannot update cache ({}); searching a fresh scan", err);
            indexer.build()
        }
    };

    let result = match execute(ctx, args, &snapshot) {
        Ok(r) => r,
        Err(err) => {
            match &err {
                OdxError::Glob(e) => {
                    eprintln!("error: invalid glob pattern: {}", e);
                }
                OdxError::Pattern(e) => {
                    eprintln!("error: invalid search vocabulary: {}", e);
                }
                _ => {
                    eprintln!("error: search failed: {}", err);
                }
            }
            std::process::exit(1);
        }
    };

    let output = match searcher::render(&result, &args.query, output_mode) {
        Ok(o) => o,
        Err(err) => {
            eprintln!("error: cannot encode results: {}", err);
            std::process::exit(1);
        }
    };

    if result.items.is_empty() {
        // JSON consumers still get a document; exit 1 like grep.
        if args.json {
            print!("{}", output);
        }
        eprintln!("{}", format_summary(&result));
        std::process::exit(1);
    }

    print!("{}", output);
    eprintln!("{}", format_summary(&result));
}

/// Runs the pipeline and the optional path glob. The glob is applied before
/// the limit so it never hides matches that would otherwise fit.
fn execute(
    ctx: &Context,
    args: &SearchArgs,
    snapshot: &Snapshot,
) -> Result<SearchResult, OdxError> {
    let analyzer = QueryAnalyzer::new(&ctx.config.search)?;
    let pattern = args
        .file_glob
        .as_deref()
        .map(glob::Pattern::new)
        .transpose()?;

    let query = if args.keywords.is_empty() {
        SearchQuery::text(args.query.clone())
    } else {
        SearchQuery::with_keywords(args.query.clone(), args.keywords.clone())
    };
    let opts = SearchOptions {
        limit: if pattern.is_some() { usize::MAX } else { args.max_count },
        allowed_extensions: args.extensions.clone(),
        current_year: None,
        today: None,
    };

    let mut result = searcher::search(&analyzer, &query, snapshot, &opts);

    if let Some(pattern) = pattern {
        result.items.retain(|info| pattern.matches(&info.path));
        result.total_matches = result.items.len();
        result.items.truncate(args.max_count);
    }

    Ok(result)
}
