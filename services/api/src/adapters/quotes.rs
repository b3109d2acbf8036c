//! services/api/src/adapters/quotes.rs
//!
//! Motivational quotes for the dashboard, read from a CSV file with a `quote` column.

use std::path::PathBuf;

use rand::seq::SliceRandom;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct QuoteBook {
    path: PathBuf,
}

impl QuoteBook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A random non-blank quote, or `None` if the file is missing or has none.
    pub async fn random(&self) -> Option<String> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %self.path.display(), "Could not read quotes: {}", e);
                return None;
            }
        };
        let quotes = parse_quotes(&bytes);
        quotes.choose(&mut rand::thread_rng()).cloned()
    }
}

fn parse_quotes(bytes: &[u8]) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let Some(column) = reader
        .headers()
        .ok()
        .and_then(|headers| headers.iter().position(|h| h.trim() == "quote"))
    else {
        return Vec::new();
    };

    reader
        .records()
        .filter_map(Result::ok)
        .filter_map(|row| row.get(column).map(str::to_string))
        .filter(|quote| !quote.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_quotes_are_skipped() {
        let quotes = parse_quotes(b"author,quote\nA,\"Be kind, always.\"\nB,   \nC,Breathe.\n");
        assert_eq!(quotes, vec!["Be kind, always.", "Breathe."]);
    }

    #[test]
    fn missing_column_yields_nothing() {
        assert!(parse_quotes(b"text\nhello\n").is_empty());
    }

    #[tokio::test]
    async fn missing_file_has_no_quote() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(QuoteBook::new(dir.path().join("nope.csv")).random().await, None);
    }
}
