use std::fs;
use std::path::Path;

use crate::error::OdxError;

use super::ContentParser;

/// Reads `.txt` / `.md` files. Invalid UTF-8 is decoded lossily rather
/// than rejected.
pub struct PlainTextParser;

impl ContentParser for PlainTextParser {
    fn parse(&self, path: &Path) -> Result<String, OdxError> {
        let raw = fs::read(path)?;
        match String::from_utf8(raw) {
            Ok(text) => Ok(text),
            Err(err) => Ok(String::from_utf8_lossy(err.as_bytes()).into_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.txt");
        fs::write(&path, "회의록 요약\nsecond line").unwrap();
        assert_eq!(PlainTextParser.parse(&path).unwrap(), "회의록 요약\nsecond line");
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.txt");
        fs::write(&path, [b'o', b'k', 0xff, b'!']).unwrap();
        let text = PlainTextParser.parse(&path).unwrap();
        assert!(text.starts_with("ok"));
        assert!(text.ends_with('!'));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PlainTextParser.parse(&dir.path().join("nope.txt")).is_err());
    }
}
