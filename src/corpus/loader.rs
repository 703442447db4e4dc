// CSV loader for headline corpora.
//
// The reader is column-name driven: the publish date and headline text are
// looked up by header name, so extra columns in the file are ignored. Files
// without a header fall back to positional columns (date first, text second).

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One row of the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    /// Parsed publish date, when the raw value looks like a date
    pub publish_date: Option<NaiveDate>,
    /// The publish date exactly as it appeared in the file
    pub raw_date: String,
    /// Headline text (empty when the field is missing)
    pub text: String,
}

/// How to read the CSV file.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub text_column: String,
    pub date_column: String,
    pub delimiter: u8,
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            text_column: "headline_text".to_string(),
            date_column: "publish_date".to_string(),
            delimiter: b',',
            has_header: true,
        }
    }
}

/// Load every row of the CSV at `path`.
pub fn load_headlines<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Vec<Headline>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open corpus file: {}", path.display()))?;

    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_header)
        .flexible(true)
        .from_reader(file);

    let (date_idx, text_idx) = if options.has_header {
        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header row of {}", path.display()))?
            .clone();
        (
            column_index(&headers, &options.date_column)?,
            column_index(&headers, &options.text_column)?,
        )
    } else {
        (0, 1)
    };

    debug!(date_idx, text_idx, "Resolved corpus columns");

    let mut headlines = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to parse CSV row {}", row + 1))?;
        let raw_date = record.get(date_idx).unwrap_or("").trim().to_string();
        let text = record.get(text_idx).unwrap_or("").to_string();

        headlines.push(Headline {
            publish_date: parse_publish_date(&raw_date),
            raw_date,
            text,
        });
    }

    info!(
        rows = headlines.len(),
        path = %path.display(),
        "Loaded headline corpus"
    );

    Ok(headlines)
}

/// Parse a publish date written as `YYYYMMDD` or `YYYY-MM-DD`.
pub fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .with_context(|| {
            let available: Vec<&str> = headers.iter().collect();
            format!(
                "Column '{name}' not found in CSV header (available: {})",
                available.join(", ")
            )
        })
}
