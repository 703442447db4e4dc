// Corpus loading: CSV headlines into typed rows.

pub mod loader;

pub use loader::{load_headlines, parse_publish_date, CsvOptions, Headline};
