use std::path::Path;

use crate::error::OdxError;

use super::ContentParser;

/// Renders a CSV file as text: the header row and every data row, one
/// line each, cells separated by tabs. Output stops after `max_rows`.
pub struct CsvParser {
    pub max_rows: usize,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { max_rows: 10_000 }
    }
}

impl ContentParser for CsvParser {
    fn parse(&self, path: &Path) -> Result<String, OdxError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_path(path)?;

        let mut out = String::new();

        let headers = reader.headers()?;
        if !headers.is_empty() {
            out.push_str(&headers.iter().collect::<Vec<_>>().join("\t"));
            out.push('\n');
        }

        for (idx, record) in reader.records().enumerate() {
            if idx >= self.max_rows {
                break;
            }
            let record = record?;
            out.push_str(&record.iter().map(str::trim).collect::<Vec<_>>().join("\t"));
            out.push('\n');
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn renders_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.csv");
        fs::write(&path, "team,amount\nsales, 100\n\"ops, infra\",200\n").unwrap();

        let text = CsvParser::default().parse(&path).unwrap();
        assert_eq!(text, "team\tamount\nsales\t100\nops, infra\t200\n");
    }

    #[test]
    fn ragged_rows_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b,c\n1\n2,3,4,5\n").unwrap();

        let text = CsvParser::default().parse(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn row_limit_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.csv");
        let mut body = String::from("n\n");
        for i in 0..50 {
            body.push_str(&format!("{}\n", i));
        }
        fs::write(&path, body).unwrap();

        let text = CsvParser { max_rows: 5 }.parse(&path).unwrap();
        assert_eq!(text.lines().count(), 6);
    }
}
