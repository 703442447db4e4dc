// Stemmer: reduce each token to its English (Porter2) stem.

use rust_stemmers::{Algorithm, Stemmer as SnowballStemmer};

use super::traits::{Annotation, Annotator};

pub struct Stemmer {
    inner: SnowballStemmer,
}

impl Default for Stemmer {
    fn default() -> Self {
        Self {
            inner: SnowballStemmer::create(Algorithm::English),
        }
    }
}

impl std::fmt::Debug for Stemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stemmer").field("algorithm", &"english").finish()
    }
}

impl Stemmer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stem a token. Input is lowercased first; output is always lowercase.
    pub fn stem(&self, token: &str) -> String {
        self.inner.stem(&token.to_lowercase()).into_owned()
    }
}

impl Annotator for Stemmer {
    fn name(&self) -> &'static str {
        "stem"
    }

    fn annotate(&self, annotations: Vec<Annotation>) -> Vec<Annotation> {
        annotations
            .iter()
            .map(|a| a.with_result(self.stem(&a.result)))
            .collect()
    }
}
