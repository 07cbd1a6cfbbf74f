use std::time::Instant;

use crate::cmd::{Context, IndexArgs};
use crate::error::OdxError;
use crate::indexer::IndexSource;
use crate::stats::SnapshotStats;

pub fn run(ctx: &Context, args: &IndexArgs) {
    let indexer = ctx.indexer();
    let start = Instant::now();

    match indexer.prepare(&ctx.cache_dir, args.full) {
        Ok(prepared) => match prepared.source {
            IndexSource::FullBuild => {
                let stats = SnapshotStats::collect(&prepared.snapshot);
                eprintln!(
                    "Indexed {} entries ({} folders, {} files, {} parseable) in {}ms",
                    stats.total,
                    stats.folders,
                    stats.files,
                    stats.parseable,
                    start.elapsed().as_millis()
                );
                eprintln!("Cache written to {}", prepared.cache_file.display());
            }
            IndexSource::Cache => {
                eprintln!("Index is up to date.");
            }
            IndexSource::Incremental(stats) => {
                eprintln!(
                    "Incremental update: {} added, {} modified, {} deleted in {}ms",
                    stats.added, stats.modified, stats.deleted, stats.elapsed_ms
                );
            }
        },
        Err(err) => {
            match &err {
                OdxError::Io(e) => {
                    eprintln!(
                        "error: cannot write cache under '{}': {}",
                        ctx.cache_dir.display(),
                        e
                    );
                }
                OdxError::Csv(e) => {
                    eprintln!("error: failed to write cache rows: {}", e);
                }
                _ => {
                    eprintln!("error: indexing failed: {}", err);
                }
            }
            std::process::exit(1);
        }
    }
}
