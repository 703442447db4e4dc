// Stop word removal using the NLTK English list from the stop-words crate.

use std::collections::HashSet;

use stop_words::{get, LANGUAGE};

use super::traits::{Annotation, Annotator};

#[derive(Debug, Clone)]
pub struct StopWordsCleaner {
    stop_words: HashSet<String>,
    case_sensitive: bool,
}

impl Default for StopWordsCleaner {
    fn default() -> Self {
        Self::english(false)
    }
}

impl StopWordsCleaner {
    /// NLTK English defaults (under two hundred function words). With
    /// `case_sensitive` off, matching ignores case.
    pub fn english(case_sensitive: bool) -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::from_words(words, case_sensitive)
    }

    /// Build a cleaner from an explicit word list.
    pub fn from_words<I, S>(words: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cleaner = Self {
            stop_words: HashSet::new(),
            case_sensitive,
        };
        cleaner.add_stop_words(words);
        cleaner
    }

    pub fn add_stop_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            let word = if self.case_sensitive {
                word.to_string()
            } else {
                word.to_lowercase()
            };
            self.stop_words.insert(word);
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        if self.case_sensitive {
            self.stop_words.contains(token)
        } else {
            self.stop_words.contains(&token.to_lowercase())
        }
    }

    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Annotator for StopWordsCleaner {
    fn name(&self) -> &'static str {
        "cleanTokens"
    }

    fn annotate(&self, annotations: Vec<Annotation>) -> Vec<Annotation> {
        annotations
            .into_iter()
            .filter(|a| !self.is_stop_word(&a.result))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_defaults_case_insensitive() {
        let cleaner = StopWordsCleaner::default();
        assert!(!cleaner.is_empty());
        assert!(cleaner.is_stop_word("the"));
        assert!(cleaner.is_stop_word("The"));
        assert!(!cleaner.is_stop_word("council"));
    }

    #[test]
    fn test_english_list_keeps_content_words() {
        let cleaner = StopWordsCleaner::default();
        assert!(cleaner.len() < 300, "list has {} words", cleaner.len());
        for word in ["new", "man", "says", "world", "year", "home", "two", "high"] {
            assert!(!cleaner.is_stop_word(word), "{word} should not be a stop word");
        }
        assert!(cleaner.is_stop_word("of"));
    }

    #[test]
    fn test_case_sensitive_matching() {
        let cleaner = StopWordsCleaner::from_words(["the"], true);
        assert!(cleaner.is_stop_word("the"));
        assert!(!cleaner.is_stop_word("The"));
    }

    #[test]
    fn test_extra_stop_words() {
        let mut cleaner = StopWordsCleaner::default();
        cleaner.add_stop_words(["Says", " ", "new"]);
        assert!(cleaner.is_stop_word("says"));
        assert!(cleaner.is_stop_word("NEW"));
    }

    #[test]
    fn test_annotate_filters_tokens() {
        let cleaner = StopWordsCleaner::from_words(["of", "the"], false);
        let out = cleaner.annotate(vec![
            Annotation::new(0, 2, "The"),
            Annotation::new(4, 7, "fire"),
            Annotation::new(9, 10, "of"),
        ]);
        assert_eq!(out, vec![Annotation::new(4, 7, "fire")]);
    }
}
