use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use odx::cmd::{self, Cli, Command, Context, SearchArgs};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Some(Command::Search(sub)) => {
            let ctx = Context::from_cli(&cli);
            let args = SearchArgs::from_search_sub(sub, &cli);
            cmd::search::run(&ctx, &args);
        }
        Some(Command::Index(args)) => cmd::index::run(&Context::from_cli(&cli), args),
        Some(Command::Status) => cmd::status::run(&Context::from_cli(&cli)),
        Some(Command::Refine(args)) => cmd::refine::run(args),
        Some(Command::Extract(args)) => cmd::extract::run(args),
        None => {
            // Default mode: search
            match &cli.query {
                Some(query) => {
                    let ctx = Context::from_cli(&cli);
                    let args = SearchArgs::from_cli(&cli, query.clone());
                    cmd::search::run(&ctx, &args);
                }
                None => {
                    if let Err(err) = Cli::command().print_help() {
                        eprintln!("error: cannot print help: {}", err);
                        std::process::exit(1);
                    }
                    println!();
                }
            }
        }
    }
}

/// Diagnostics go to stderr. `-v`/`-vv` win over `ODX_LOG`; without
/// either only warnings are shown.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env("ODX_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
