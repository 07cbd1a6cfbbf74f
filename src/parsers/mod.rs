//! Content parser registry.
//!
//! Maps a dotted, lower-cased extension to a parser that turns one file
//! into text. Parsing never fails from the caller's point of view: any
//! error (encrypted, corrupted, unreadable file) yields an empty string.

pub mod delimited;
pub mod text;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::error::OdxError;
use crate::indexer::extension::{dotted, extension_of};

/// Turns the content of one file into plain text.
pub trait ContentParser: Send + Sync {
    fn parse(&self, path: &Path) -> Result<String, OdxError>;
}

/// Extension-keyed parser table.
#[derive(Default)]
pub struct ParserRegistry {
    parsers: BTreeMap<String, Box<dyn ContentParser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in plain-text and CSV parsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(".txt", text::PlainTextParser);
        registry.register(".md", text::PlainTextParser);
        registry.register(".csv", delimited::CsvParser::default());
        registry
    }

    /// Registers `parser` for `extension` (dotted or not, any case),
    /// replacing any previous parser.
    pub fn register<P: ContentParser + 'static>(&mut self, extension: &str, parser: P) {
        self.parsers.insert(dotted(extension), Box::new(parser));
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.parsers.contains_key(&dotted(extension))
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<String> {
        self.parsers.keys().cloned().collect()
    }

    /// Extracts the text of `path`, or an empty string when there is no
    /// parser for its extension or parsing fails.
    pub fn parse(&self, path: &Path) -> String {
        let ext = extension_of(path);
        let Some(parser) = self.parsers.get(&ext) else {
            debug!("no parser for {}", path.display());
            return String::new();
        };
        match parser.parse(path) {
            Ok(text) => text,
            Err(err) => {
                debug!("cannot parse {}: {}", path.display(), err);
                String::new()
            }
        }
    }
}
