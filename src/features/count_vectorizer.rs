// Count vectorizer: learn a capped vocabulary from tokenized documents and
// turn each document into a sparse vector of term counts.
//
// Vocabulary selection happens in two passes over the corpus statistics:
// terms outside the [min_df, max_df] document-frequency window are dropped,
// then the survivors are ranked by total term frequency and the top
// `vocab_size` are kept. Ties are broken alphabetically so the vocabulary
// (and therefore every feature index) is stable between runs.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::sparse::SparseVector;
use super::VectorizerError;

/// Vectorizer settings.
///
/// Thresholds given as values >= 1.0 are absolute counts; values below 1.0
/// are fractions (of the document count for `min_df`/`max_df`, of the
/// document's own token count for `min_tf`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountVectorizerParams {
    pub vocab_size: usize,
    pub min_df: f64,
    pub max_df: f64,
    pub min_tf: f64,
    /// Emit 1.0 for every present term instead of its count
    pub binary: bool,
}

impl Default for CountVectorizerParams {
    fn default() -> Self {
        Self {
            vocab_size: 1 << 18,
            min_df: 1.0,
            max_df: i64::MAX as f64,
            min_tf: 1.0,
            binary: false,
        }
    }
}

impl CountVectorizerParams {
    pub fn validate(&self) -> Result<(), VectorizerError> {
        if self.vocab_size == 0 {
            return Err(VectorizerError::InvalidParameter(
                "vocab_size must be greater than 0".into(),
            ));
        }
        if !(self.min_df >= 0.0) {
            return Err(VectorizerError::InvalidParameter(format!(
                "min_df must be >= 0, got {}",
                self.min_df
            )));
        }
        if !(self.max_df >= 0.0) {
            return Err(VectorizerError::InvalidParameter(format!(
                "max_df must be >= 0, got {}",
                self.max_df
            )));
        }
        let comparable = (self.min_df >= 1.0) == (self.max_df >= 1.0);
        if comparable && self.min_df > self.max_df {
            return Err(VectorizerError::InvalidParameter(format!(
                "min_df ({}) must not exceed max_df ({})",
                self.min_df, self.max_df
            )));
        }
        if !(self.min_tf >= 0.0) {
            return Err(VectorizerError::InvalidParameter(format!(
                "min_tf must be >= 0, got {}",
                self.min_tf
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    pub params: CountVectorizerParams,
}

impl CountVectorizer {
    pub fn new(params: CountVectorizerParams) -> Self {
        Self { params }
    }

    /// Learn the vocabulary from tokenized documents.
    pub fn fit<S: AsRef<str>>(
        &self,
        docs: &[Vec<S>],
    ) -> Result<CountVectorizerModel, VectorizerError> {
        self.params.validate()?;

        // term -> (total term frequency, document frequency)
        let mut stats: HashMap<&str, (u64, u64)> = HashMap::new();
        for doc in docs {
            let mut seen: HashMap<&str, u64> = HashMap::new();
            for token in doc {
                *seen.entry(token.as_ref()).or_insert(0) += 1;
            }
            for (term, tf) in seen {
                let entry = stats.entry(term).or_insert((0, 0));
                entry.0 += tf;
                entry.1 += 1;
            }
        }

        let n_docs = docs.len() as f64;
        let min_df = threshold(self.params.min_df, n_docs);
        let max_df = threshold(self.params.max_df, n_docs);

        let mut candidates: Vec<(&str, u64, u64)> = stats
            .into_iter()
            .filter(|(_, (_, df))| (*df as f64) >= min_df && (*df as f64) <= max_df)
            .map(|(term, (tf, df))| (term, tf, df))
            .collect();

        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        candidates.truncate(self.params.vocab_size);

        if candidates.is_empty() {
            return Err(VectorizerError::EmptyVocabulary);
        }

        info!(
            documents = docs.len(),
            vocabulary = candidates.len(),
            top_term = candidates[0].0,
            min_df,
            "Fitted count vectorizer"
        );

        let vocabulary: Vec<String> = candidates.iter().map(|(t, _, _)| t.to_string()).collect();
        let term_freq = candidates.iter().map(|(_, tf, _)| *tf).collect();
        let doc_freq = candidates.iter().map(|(_, _, df)| *df).collect();

        Ok(CountVectorizerModel::new(
            vocabulary,
            term_freq,
            doc_freq,
            self.params.clone(),
        ))
    }
}

/// Turn an absolute-or-fraction threshold into an absolute one.
fn threshold(value: f64, total: f64) -> f64 {
    if value >= 1.0 {
        value
    } else {
        value * total
    }
}

/// A fitted vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountVectorizerModel {
    /// Terms in feature-index order (most frequent first)
    pub vocabulary: Vec<String>,
    /// Corpus term frequency of each vocabulary term
    pub term_freq: Vec<u64>,
    /// Document frequency of each vocabulary term
    pub doc_freq: Vec<u64>,
    pub params: CountVectorizerParams,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl CountVectorizerModel {
    pub fn new(
        vocabulary: Vec<String>,
        term_freq: Vec<u64>,
        doc_freq: Vec<u64>,
        params: CountVectorizerParams,
    ) -> Self {
        let index = build_index(&vocabulary);
        Self {
            vocabulary,
            term_freq,
            doc_freq,
            params,
            index,
        }
    }

    /// Rebuild the term lookup after deserializing.
    pub fn reindex(&mut self) {
        self.index = build_index(&self.vocabulary);
    }

    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// Count in-vocabulary terms of one document.
    pub fn transform<S: AsRef<str>>(&self, tokens: &[S]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokens {
            if let Some(idx) = self.term_index(token.as_ref()) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let min_tf = threshold(self.params.min_tf, tokens.len() as f64);
        let binary = self.params.binary;
        let pairs = counts
            .into_iter()
            .filter(|(_, count)| *count >= min_tf)
            .map(|(idx, count)| (idx, if binary { 1.0 } else { count }))
            .collect();

        SparseVector::from_pairs(self.vocab_size(), pairs)
    }

    pub fn transform_all<S: AsRef<str>>(&self, docs: &[Vec<S>]) -> Vec<SparseVector> {
        docs.iter().map(|d| self.transform(d)).collect()
    }
}

fn build_index(vocabulary: &[String]) -> HashMap<String, usize> {
    vocabulary
        .iter()
        .enumerate()
        .map(|(i, t)| (t.clone(), i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|d| d.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_vocabulary_ordered_by_frequency() {
        let corpus = docs(&["a b b c", "b c", "c c d"]);
        let model = CountVectorizer::default().fit(&corpus).unwrap();
        assert_eq!(model.vocabulary, vec!["c", "b", "a", "d"]);
        assert_eq!(model.term_freq, vec![4, 3, 1, 1]);
        assert_eq!(model.doc_freq, vec![3, 2, 1, 1]);
    }

    #[test]
    fn test_min_df_absolute_and_fraction() {
        let corpus = docs(&["a b", "a c", "a b", "d"]);
        let absolute = CountVectorizer::new(CountVectorizerParams {
            min_df: 2.0,
            ..Default::default()
        })
        .fit(&corpus)
        .unwrap();
        assert_eq!(absolute.vocabulary, vec!["a", "b"]);

        let fraction = CountVectorizer::new(CountVectorizerParams {
            min_df: 0.7,
            ..Default::default()
        })
        .fit(&corpus)
        .unwrap();
        assert_eq!(fraction.vocabulary, vec!["a"]);
    }

    #[test]
    fn test_max_df_drops_ubiquitous_terms() {
        let corpus = docs(&["a b", "a c", "a b"]);
        let model = CountVectorizer::new(CountVectorizerParams {
            max_df: 2.0,
            ..Default::default()
        })
        .fit(&corpus)
        .unwrap();
        assert!(!model.vocabulary.contains(&"a".to_string()));
    }

    #[test]
    fn test_vocab_size_cap() {
        let corpus = docs(&["a a a b b c"]);
        let model = CountVectorizer::new(CountVectorizerParams {
            vocab_size: 2,
            ..Default::default()
        })
        .fit(&corpus)
        .unwrap();
        assert_eq!(model.vocabulary, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_vocabulary_is_an_error() {
        let corpus = docs(&["a", "b"]);
        let err = CountVectorizer::new(CountVectorizerParams {
            min_df: 3.0,
            ..Default::default()
        })
        .fit(&corpus)
        .unwrap_err();
        assert_eq!(err, VectorizerError::EmptyVocabulary);
    }

    #[test]
    fn test_invalid_params() {
        let params = CountVectorizerParams {
            vocab_size: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());

        let params = CountVectorizerParams {
            min_df: 5.0,
            max_df: 2.0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_transform_counts() {
        let corpus = docs(&["a b b c", "b c"]);
        let model = CountVectorizer::default().fit(&corpus).unwrap();
        let v = model.transform(&["b", "b", "a", "zzz"]);
        assert_eq!(v.size, 3);
        assert_eq!(v.get(model.term_index("b").unwrap()), 2.0);
        assert_eq!(v.get(model.term_index("a").unwrap()), 1.0);
        assert!(v.indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_transform_binary_and_min_tf() {
        let corpus = docs(&["a b b c"]);
        let binary = CountVectorizer::new(CountVectorizerParams {
            binary: true,
            ..Default::default()
        })
        .fit(&corpus)
        .unwrap();
        let v = binary.transform(&["b", "b", "c"]);
        assert_eq!(v.values, vec![1.0, 1.0]);

        let min_tf = CountVectorizer::new(CountVectorizerParams {
            min_tf: 2.0,
            ..Default::default()
        })
        .fit(&corpus)
        .unwrap();
        let v = min_tf.transform(&["b", "b", "c"]);
        assert_eq!(v.nnz(), 1);
        assert_eq!(v.get(min_tf.term_index("b").unwrap()), 2.0);
    }

    #[test]
    fn test_reindex_after_deserialize() {
        let corpus = docs(&["a b"]);
        let model = CountVectorizer::default().fit(&corpus).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let mut restored: CountVectorizerModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.term_index("a"), None);
        restored.reindex();
        assert_eq!(restored.term_index("a"), model.term_index("a"));
    }
}
