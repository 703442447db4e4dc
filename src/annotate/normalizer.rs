// Normalizer: strip everything that isn't a letter from each token.
//
// Tokens that end up empty (pure punctuation, numbers) are dropped, so the
// stages after this one only ever see words.

use super::traits::{Annotation, Annotator};

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    /// Lowercase the cleaned token (off by default; the stemmer lowercases anyway)
    pub lowercase: bool,
    /// Drop tokens shorter than this many characters after cleanup
    pub min_length: usize,
    /// Drop tokens longer than this many characters after cleanup
    pub max_length: Option<usize>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clean a single token, returning None when nothing usable is left.
    pub fn normalize(&self, token: &str) -> Option<String> {
        let cleaned: String = token.chars().filter(|c| c.is_alphabetic()).collect();
        let cleaned = if self.lowercase {
            cleaned.to_lowercase()
        } else {
            cleaned
        };

        let len = cleaned.chars().count();
        if len == 0 || len < self.min_length {
            return None;
        }
        if self.max_length.is_some_and(|max| len > max) {
            return None;
        }
        Some(cleaned)
    }
}

impl Annotator for Normalizer {
    fn name(&self) -> &'static str {
        "normalized"
    }

    fn annotate(&self, annotations: Vec<Annotation>) -> Vec<Annotation> {
        annotations
            .iter()
            .filter_map(|a| self.normalize(&a.result).map(|n| a.with_result(n)))
            .collect()
    }
}
