pub mod extract;
pub mod index;
pub mod refine;
pub mod search;
pub mod status;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{resolve_cache_dir, Config};
use crate::error::OdxError;
use crate::indexer::Indexer;

#[derive(Parser)]
#[command(
    name = "odx",
    about = "odx -- structured file index with keyword, extension and year search",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Search query (default when no subcommand is given)
    pub query: Option<String>,

    /// Directory to index and search
    #[arg(long = "root", global = true, default_value = ".")]
    pub root: PathBuf,

    /// Directory holding cached snapshots
    #[arg(long = "cache-dir", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path glob filter
    #[arg(short = 'g', long = "glob", global = true)]
    pub file_glob: Option<String>,

    /// Keyword to search for instead of extracting keywords from the query
    #[arg(short = 'k', long = "keyword")]
    pub keywords: Vec<String>,

    /// Only return files with this extension (repeatable)
    #[arg(short = 'e', long = "ext")]
    pub extensions: Vec<String>,

    /// Show matching file paths only
    #[arg(short = 'l', long = "files")]
    pub files_only: bool,

    /// Maximum number of results
    #[arg(short = 'm', long = "max-count", default_value_t = 200)]
    pub max_count: usize,

    /// Output results as JSON
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search the index (use when query matches a subcommand name)
    Search(SearchSubArgs),
    /// Build the index, or bring the cached one up to date
    Index(IndexArgs),
    /// Show index statistics and freshness
    Status,
    /// Keep only the paths that mention one of the keywords
    Refine(RefineArgs),
    /// Print the text content parsers extract from a file
    Extract(ExtractArgs),
}

#[derive(Parser)]
pub struct SearchSubArgs {
    /// Search query
    pub query: String,

    /// Keyword to search for instead of extracting keywords from the query
    #[arg(short = 'k', long = "keyword")]
    pub keywords: Vec<String>,

    /// Only return files with this extension (repeatable)
    #[arg(short = 'e', long = "ext")]
    pub extensions: Vec<String>,

    /// Show matching file paths only
    #[arg(short = 'l', long = "files")]
    pub files_only: bool,

    /// Maximum number of results
    #[arg(short = 'm', long = "max-count", default_value_t = 200)]
    pub max_count: usize,

    /// Output results as JSON
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct IndexArgs {
    /// Ignore the cache and rescan the whole tree
    #[arg(long)]
    pub full: bool,
}

#[derive(Parser)]
pub struct RefineArgs {
    /// Keyword to keep (repeatable, any one must match)
    #[arg(short = 'k', long = "keyword", required = true)]
    pub keywords: Vec<String>,

    /// Also print words that would narrow the result further
    #[arg(long = "suggest")]
    pub suggest: bool,

    /// Paths to filter; read from stdin when omitted
    pub paths: Vec<String>,
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// File to extract text from
    pub file: PathBuf,
}

/// Extracts search args from the top-level Cli struct.
pub struct SearchArgs {
    pub query: String,
    pub keywords: Vec<String>,
    pub extensions: Vec<String>,
    pub file_glob: Option<String>,
    pub files_only: bool,
    pub max_count: usize,
    pub json: bool,
}

impl SearchArgs {
    pub fn from_cli(cli: &Cli, query: String) -> Self {
        Self {
            query,
            keywords: cli.keywords.clone(),
            extensions: cli.extensions.clone(),
            file_glob: cli.file_glob.clone(),
            files_only: cli.files_only,
            max_count: cli.max_count,
            json: cli.json,
        }
    }

    pub fn from_search_sub(sub: &SearchSubArgs, cli: &Cli) -> Self {
        Self {
            query: sub.query.clone(),
            keywords: sub.keywords.clone(),
            extensions: sub.extensions.clone(),
            file_glob: cli.file_glob.clone(),
            files_only: sub.files_only,
            max_count: sub.max_count,
            json: sub.json,
        }
    }
}

/// Settings shared by every subcommand.
pub struct Context {
    pub root: PathBuf,
    pub cache_dir: PathBuf,
    pub config: Config,
}

impl Context {
    /// Loads the configuration; exits on a bad config file.
    pub fn from_cli(cli: &Cli) -> Self {
        let config = match Config::load(cli.config.as_deref()) {
            Ok(c) => c,
            Err(OdxError::Io(e)) => {
                let shown = cli
                    .config
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                eprintln!("error: cannot read {}: {}", shown, e);
                std::process::exit(1);
            }
            Err(OdxError::Config(e)) => {
                eprintln!("error: invalid configuration: {}", e);
                std::process::exit(1);
            }
            Err(err) => {
                eprintln!("error: failed to load configuration: {}", err);
                std::process::exit(1);
            }
        };

        Self {
            root: cli.root.clone(),
            cache_dir: resolve_cache_dir(cli.cache_dir.as_deref()),
            config,
        }
    }

    /// Indexer for the root directory; exits if it is not a directory.
    pub fn indexer(&self) -> Indexer {
        match Indexer::new(&self.root, self.config.index.clone()) {
            Ok(indexer) => indexer,
            Err(OdxError::InvalidBasePath(p)) => {
                eprintln!("error: '{}' is not a valid directory", p.display());
                std::process::exit(1);
            }
            Err(err) => {
                eprintln!("error: cannot resolve root path '{}': {}", self.root.display(), err);
                std::process::exit(1);
            }
        }
    }
}
