// NLP pipeline: the fixed chain of annotators plus the finisher.
//
// Stage order is document -> token -> normalized -> cleanTokens -> stem,
// then the finisher flattens the stems into a Vec<String> per headline.

use tracing::debug;

use super::document::{CleanupMode, DocumentAssembler};
use super::finisher::Finisher;
use super::normalizer::Normalizer;
use super::stemmer::Stemmer;
use super::stopwords::StopWordsCleaner;
use super::tokenizer::Tokenizer;
use super::traits::{Annotation, Annotator};

/// Knobs for the standard pipeline.
#[derive(Debug, Clone, Default)]
pub struct PreprocessConfig {
    pub cleanup_mode: CleanupMode,
    /// Lowercase in the normalizer (the stemmer lowercases regardless)
    pub lowercase: bool,
    pub min_token_length: usize,
    pub stopwords_case_sensitive: bool,
    pub extra_stopwords: Vec<String>,
}

pub struct NlpPipeline {
    stages: Vec<Box<dyn Annotator>>,
    finisher: Finisher,
}

impl NlpPipeline {
    /// Build a pipeline from explicit stages.
    pub fn new(stages: Vec<Box<dyn Annotator>>, finisher: Finisher) -> Self {
        Self { stages, finisher }
    }

    /// The standard headline pipeline.
    pub fn standard(config: &PreprocessConfig) -> Self {
        let mut stopwords = StopWordsCleaner::english(config.stopwords_case_sensitive);
        stopwords.add_stop_words(&config.extra_stopwords);

        let normalizer = Normalizer {
            lowercase: config.lowercase,
            min_length: config.min_token_length,
            max_length: None,
        };

        let stages: Vec<Box<dyn Annotator>> = vec![
            Box::new(DocumentAssembler::new(config.cleanup_mode)),
            Box::new(Tokenizer::new()),
            Box::new(normalizer),
            Box::new(stopwords),
            Box::new(Stemmer::new()),
        ];

        debug!(
            stages = stages.len(),
            extra_stopwords = config.extra_stopwords.len(),
            "Built standard NLP pipeline"
        );

        Self::new(stages, Finisher::default())
    }

    /// Names of the stages in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage over `text` and return the finished tokens.
    pub fn process(&self, text: &str) -> Vec<String> {
        let len = text.chars().count();
        let raw = vec![Annotation::new(0, len.saturating_sub(1), text)];

        let annotations = self
            .stages
            .iter()
            .fold(raw, |acc, stage| stage.annotate(acc));

        self.finisher.finish(annotations)
    }

    /// Process a batch of texts, one token list per input.
    pub fn process_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<String>> {
        texts.iter().map(|t| self.process(t.as_ref())).collect()
    }
}

impl Default for NlpPipeline {
    fn default() -> Self {
        Self::standard(&PreprocessConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        let pipeline = NlpPipeline::default();
        assert_eq!(
            pipeline.stage_names(),
            vec!["document", "token", "normalized", "cleanTokens", "stem"]
        );
    }

    #[test]
    fn test_process_headline() {
        let pipeline = NlpPipeline::default();
        let tokens = pipeline.process("Farmers welcome the rain, after 3 years of drought!");
        assert!(tokens.contains(&"farmer".to_string()));
        assert!(tokens.contains(&"drought".to_string()));
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.iter().any(|t| t.chars().any(|c| !c.is_alphabetic())));
        assert!(tokens.iter().all(|t| t.to_lowercase() == *t));
    }

    #[test]
    fn test_process_empty_text() {
        assert!(NlpPipeline::default().process("   ").is_empty());
        assert!(NlpPipeline::default().process("").is_empty());
    }

    #[test]
    fn test_extra_stopwords_are_removed() {
        let config = PreprocessConfig {
            extra_stopwords: vec!["drought".to_string()],
            ..PreprocessConfig::default()
        };
        let tokens = NlpPipeline::standard(&config).process("drought grips council");
        assert!(!tokens.contains(&"drought".to_string()));
        assert!(tokens.contains(&"council".to_string()));
    }

    #[test]
    fn test_custom_stages() {
        let stages: Vec<Box<dyn Annotator>> =
            vec![Box::new(DocumentAssembler::default()), Box::new(Tokenizer::new())];
        let pipeline = NlpPipeline::new(stages, Finisher::default());
        assert_eq!(pipeline.process("a, b"), vec!["a", ",", "b"]);
    }
}
