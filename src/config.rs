use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every field
/// has a default suited to a headline corpus, and CLI flags
/// override individual values after loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the headline CSV file
    pub csv_path: PathBuf,
    /// Column holding the headline text
    pub text_column: String,
    /// Column holding the publish date
    pub date_column: String,
    pub delimiter: u8,
    pub has_header: bool,
    /// Rows kept after preprocessing (0 keeps everything)
    pub row_limit: usize,
    /// Maximum vocabulary size for the count vectorizer
    pub vocab_size: usize,
    /// Minimum document frequency (absolute when >= 1.0, fraction otherwise)
    pub min_df: f64,
    pub num_topics: usize,
    pub max_iter: usize,
    /// Fixed RNG seed; unset means a fresh seed per run
    pub seed: Option<u64>,
    pub terms_per_topic: usize,
    /// Extra stop words on top of the English defaults
    pub extra_stopwords: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("./abcnews-date-text.csv"),
            text_column: "headline_text".to_string(),
            date_column: "publish_date".to_string(),
            delimiter: b',',
            has_header: true,
            row_limit: 10_000,
            vocab_size: 500,
            min_df: 3.0,
            num_topics: 3,
            max_iter: 10,
            seed: None,
            terms_per_topic: 10,
            extra_stopwords: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from `TOPICS_*` environment variables.
    ///
    /// Unset variables fall back to the defaults. A variable that is set but
    /// cannot be parsed is an error naming the variable.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let delimiter = match env::var("TOPICS_DELIMITER") {
            Ok(value) => parse_delimiter(&value)?,
            Err(_) => defaults.delimiter,
        };

        let seed = match env::var("TOPICS_SEED") {
            Ok(value) if !value.trim().is_empty() => Some(parse_var("TOPICS_SEED", &value)?),
            _ => None,
        };

        let extra_stopwords = env::var("TOPICS_EXTRA_STOPWORDS")
            .map(|value| split_list(&value))
            .unwrap_or_default();

        Ok(Self {
            csv_path: env::var("TOPICS_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.csv_path),
            text_column: env::var("TOPICS_TEXT_COLUMN").unwrap_or(defaults.text_column),
            date_column: env::var("TOPICS_DATE_COLUMN").unwrap_or(defaults.date_column),
            delimiter,
            has_header: env_or("TOPICS_HAS_HEADER", defaults.has_header)?,
            row_limit: env_or("TOPICS_ROW_LIMIT", defaults.row_limit)?,
            vocab_size: env_or("TOPICS_VOCAB_SIZE", defaults.vocab_size)?,
            min_df: env_or("TOPICS_MIN_DF", defaults.min_df)?,
            num_topics: env_or("TOPICS_NUM_TOPICS", defaults.num_topics)?,
            max_iter: env_or("TOPICS_MAX_ITER", defaults.max_iter)?,
            seed,
            terms_per_topic: env_or("TOPICS_TERMS_PER_TOPIC", defaults.terms_per_topic)?,
            extra_stopwords,
        })
    }

    /// Check that the CSV file exists before any stage runs.
    pub fn require_csv(&self) -> Result<()> {
        if !self.csv_path.is_file() {
            anyhow::bail!(
                "CSV file not found: {}\n\
                 Set TOPICS_CSV_PATH in your .env file or pass --csv.",
                self.csv_path.display()
            );
        }
        Ok(())
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => parse_var(name, &value),
        Err(_) => Ok(default),
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("{name} has an invalid value: {value:?}"))
}

/// Parse a single-byte delimiter. `\t` and `tab` both mean a tab.
pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }
    let bytes = value.as_bytes();
    if bytes.len() != 1 {
        anyhow::bail!("TOPICS_DELIMITER must be a single ASCII character, got {value:?}");
    }
    Ok(bytes[0])
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
