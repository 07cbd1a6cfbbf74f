use crate::cmd::Context;
use crate::error::OdxError;
use crate::indexer::snapshot;
use crate::parsers::ParserRegistry;
use crate::stats::{format_bytes, SnapshotStats};

pub fn run(ctx: &Context) {
    let indexer = ctx.indexer();
    let cache_file = indexer.cache_path(&ctx.cache_dir);

    if !cache_file.is_file() {
        eprintln!("error: no index found. Run 'odx index' to create one.");
        std::process::exit(1);
    }

    let cached = match snapshot::try_load(&cache_file) {
        Ok(s) if !s.is_empty() => s,
        Ok(_) => {
            eprintln!("error: cached index is empty. Run 'odx index --full' to rebuild.");
            std::process::exit(1);
        }
        Err(OdxError::Csv(_)) => {
            eprintln!("error: corrupt index cache. Run 'odx index --full' to rebuild.");
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("error: failed to read index: {}", err);
            std::process::exit(1);
        }
    };

    let stats = SnapshotStats::collect(&cached);
    let readable = stats.readable_extensions(&ParserRegistry::with_defaults());
    let diff = indexer.check_freshness(&cached);

    println!("odx index status");
    println!("  root           : {}", indexer.base().display());
    println!("  cache file     : {}", cache_file.display());
    println!(
        "  entries        : {} ({} folders, {} files)",
        stats.total, stats.folders, stats.files
    );
    println!("  parseable      : {}", stats.parseable);
    println!("  total size     : {}", format_bytes(stats.total_bytes));
    println!("  extensions     : {}", stats.extensions.join(" "));
    println!("  readable       : {}", readable.join(" "));
    println!(
        "  skipped dirs   : {}",
        indexer.policy().exclude_prefixes.join(" ")
    );
    if diff.is_empty() {
        println!("  freshness      : up to date");
    } else {
        println!(
            "  freshness      : {} new, {} modified, {} deleted (run 'odx index')",
            diff.created.len(),
            diff.modified.len(),
            diff.deleted.len()
        );
    }
}
