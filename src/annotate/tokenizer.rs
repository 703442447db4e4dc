// Tokenizer: split document annotations into word tokens.
//
// Candidate tokens are the matches of a target pattern (whitespace-delimited
// runs by default). Punctuation at either edge of a candidate is split off
// into single-character tokens; punctuation inside a candidate (u.s, o'neill,
// well-being) stays part of the word.

use regex_lite::Regex;

use super::traits::{Annotation, Annotator};

pub const DEFAULT_TARGET_PATTERN: &str = r"\S+";

#[derive(Debug, Clone)]
pub struct Tokenizer {
    target_pattern: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            target_pattern: Regex::new(DEFAULT_TARGET_PATTERN).expect("default target pattern"),
        }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom pattern for candidate tokens.
    pub fn with_target_pattern(pattern: &str) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            target_pattern: Regex::new(pattern)?,
        })
    }

    /// Tokenize one document; offsets continue from the document's `begin`.
    fn tokenize_document(&self, doc: &Annotation) -> Vec<Annotation> {
        let text = doc.result.as_str();
        let mut tokens = Vec::new();

        // Track char offsets alongside byte offsets so spans stay in chars.
        let mut chars_before = 0usize;
        let mut last_byte = 0usize;

        for m in self.target_pattern.find_iter(text) {
            if m.as_str().is_empty() {
                continue;
            }
            chars_before += text[last_byte..m.start()].chars().count();
            last_byte = m.start();

            let start = doc.begin + chars_before;
            split_edges(m.as_str(), start, &mut tokens);
        }

        tokens
    }
}

/// Push the word in `candidate` plus each edge punctuation character as
/// separate annotations. `start` is the char offset of the candidate.
fn split_edges(candidate: &str, start: usize, out: &mut Vec<Annotation>) {
    let chars: Vec<char> = candidate.chars().collect();

    let lead = chars.iter().take_while(|c| is_edge_punct(**c)).count();
    if lead == chars.len() {
        for (i, c) in chars.iter().enumerate() {
            out.push(Annotation::new(start + i, start + i, c.to_string()));
        }
        return;
    }
    let trail = chars.iter().rev().take_while(|c| is_edge_punct(**c)).count();

    for (i, c) in chars[..lead].iter().enumerate() {
        out.push(Annotation::new(start + i, start + i, c.to_string()));
    }

    let word_end = chars.len() - trail;
    let word: String = chars[lead..word_end].iter().collect();
    out.push(Annotation::new(start + lead, start + word_end - 1, word));

    for (i, c) in chars[word_end..].iter().enumerate() {
        let offset = start + word_end + i;
        out.push(Annotation::new(offset, offset, c.to_string()));
    }
}

fn is_edge_punct(c: char) -> bool {
    !c.is_alphanumeric() && c != '_'
}

impl Annotator for Tokenizer {
    fn name(&self) -> &'static str {
        "token"
    }

    fn annotate(&self, annotations: Vec<Annotation>) -> Vec<Annotation> {
        annotations
            .iter()
            .flat_map(|doc| self.tokenize_document(doc))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(text: &str) -> Vec<String> {
        let doc = Annotation::new(0, text.chars().count().saturating_sub(1), text);
        Tokenizer::new()
            .annotate(vec![doc])
            .into_iter()
            .map(|a| a.result)
            .collect()
    }

    #[test]
    fn test_splits_on_whitespace() {
        assert_eq!(tokens("rain helps farmers"), vec!["rain", "helps", "farmers"]);
    }

    #[test]
    fn test_splits_edge_punctuation() {
        assert_eq!(
            tokens("\"police probe\" crash!"),
            vec!["\"", "police", "probe", "\"", "crash", "!"]
        );
    }

    #[test]
    fn test_keeps_infix_punctuation() {
        assert_eq!(tokens("u.s. o'neill"), vec!["u.s", ".", "o'neill"]);
    }

    #[test]
    fn test_punctuation_only_candidate() {
        assert_eq!(tokens("-- ok"), vec!["-", "-", "ok"]);
    }

    #[test]
    fn test_offsets_are_char_based() {
        let doc = Annotation::new(0, 9, "café opens");
        let out = Tokenizer::new().annotate(vec![doc]);
        assert_eq!(out[0], Annotation::new(0, 3, "café"));
        assert_eq!(out[1], Annotation::new(5, 9, "opens"));
    }

    #[test]
    fn test_custom_target_pattern() {
        let tokenizer = Tokenizer::with_target_pattern(r"[^,]+").unwrap();
        let doc = Annotation::new(0, 6, "a b,c d");
        let out: Vec<String> = tokenizer
            .annotate(vec![doc])
            .into_iter()
            .map(|a| a.result)
            .collect();
        assert_eq!(out, vec!["a b", "c d"]);
    }
}
