// Fitted LDA model: topic-word parameters plus evaluation.
//
// `lambda` holds the variational Dirichlet parameters of each topic's word
// distribution (k x V). The likelihood bound re-runs the E-step for every
// document with a fixed RNG stream, so evaluating the same corpus twice
// gives the same number.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;

use super::inference::{infer_document, init_sampler};
use super::special::{dirichlet_expectation, dirichlet_expectation_rows, log_sum_exp};
use super::LdaError;
use crate::features::SparseVector;

/// The highest-weighted terms of one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicDescription {
    pub topic: usize,
    /// Vocabulary indices, highest weight first
    pub term_indices: Vec<usize>,
    /// Normalized weights matching `term_indices`
    pub term_weights: Vec<f64>,
}

impl TopicDescription {
    /// Resolve the term indices against a vocabulary.
    pub fn terms<'a>(&self, vocabulary: &'a [String]) -> Vec<&'a str> {
        self.term_indices
            .iter()
            .filter_map(|&i| vocabulary.get(i).map(String::as_str))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdaModel {
    pub k: usize,
    pub vocab_size: usize,
    /// Variational topic-word parameters, k x V
    pub lambda: Array2<f64>,
    /// Document concentration (alpha), possibly learned during training
    pub alpha: Array1<f64>,
    /// Topic concentration (eta)
    pub eta: f64,
    pub gamma_shape: f64,
    /// Seed for the E-step RNG used by evaluation
    pub seed: u64,
}

impl LdaModel {
    /// Topic-word parameters (k x V).
    pub fn topics_matrix(&self) -> &Array2<f64> {
        &self.lambda
    }

    pub fn estimated_doc_concentration(&self) -> &Array1<f64> {
        &self.alpha
    }

    pub fn topic_concentration(&self) -> f64 {
        self.eta
    }

    /// Top `max_terms` terms per topic by normalized weight.
    pub fn describe_topics(&self, max_terms: usize) -> Vec<TopicDescription> {
        self.lambda
            .axis_iter(Axis(0))
            .enumerate()
            .map(|(topic, row)| {
                let total = row.sum();
                let mut weighted: Vec<(usize, f64)> = row
                    .iter()
                    .enumerate()
                    .map(|(i, &w)| (i, if total > 0.0 { w / total } else { 0.0 }))
                    .collect();
                weighted.sort_by(|a, b| {
                    b.1.partial_cmp(&a.1)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then_with(|| a.0.cmp(&b.0))
                });
                weighted.truncate(max_terms);

                let (term_indices, term_weights): (Vec<usize>, Vec<f64>) =
                    weighted.into_iter().unzip();
                TopicDescription {
                    topic,
                    term_indices,
                    term_weights,
                }
            })
            .collect()
    }

    /// Variational lower bound on the log likelihood of the whole corpus.
    pub fn log_likelihood(&self, docs: &[SparseVector]) -> Result<f64, LdaError> {
        self.check_sizes(docs)?;

        let elogbeta = dirichlet_expectation_rows(&self.lambda);
        let exp_elogbeta = elogbeta.mapv(f64::exp);
        let sampler = init_sampler(self.gamma_shape)?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let alpha_sum = self.alpha.sum();
        let mut corpus_part = 0.0;

        for doc in docs.iter().filter(|d| !d.is_empty()) {
            let inferred = infer_document(doc, &exp_elogbeta, &self.alpha, &sampler, &mut rng);
            let gamma = inferred.gamma;
            let elogtheta = dirichlet_expectation(gamma.view());

            let mut doc_bound = 0.0;
            for (idx, count) in doc.iter() {
                let scores = &elogtheta + &elogbeta.column(idx);
                doc_bound += count * log_sum_exp(scores.view());
            }
            doc_bound += ((&self.alpha - &gamma) * &elogtheta).sum();
            doc_bound += gamma
                .iter()
                .zip(self.alpha.iter())
                .map(|(&g, &a)| ln_gamma(g) - ln_gamma(a))
                .sum::<f64>();
            doc_bound += ln_gamma(alpha_sum) - ln_gamma(gamma.sum());

            corpus_part += doc_bound;
        }

        Ok(corpus_part + self.topics_bound(&elogbeta))
    }

    /// Upper bound on per-token perplexity: -bound / token count.
    pub fn log_perplexity(&self, docs: &[SparseVector]) -> Result<f64, LdaError> {
        let tokens: f64 = docs.iter().map(SparseVector::total).sum();
        if tokens <= 0.0 {
            return Err(LdaError::NoTokens);
        }
        Ok(-self.log_likelihood(docs)? / tokens)
    }

    /// Topic mixture of one document (zeros for an empty document).
    pub fn transform(&self, doc: &SparseVector) -> Result<Vec<f64>, LdaError> {
        Ok(self.transform_all(std::slice::from_ref(doc))?.remove(0))
    }

    /// Topic mixtures for a batch of documents.
    pub fn transform_all(&self, docs: &[SparseVector]) -> Result<Vec<Vec<f64>>, LdaError> {
        self.check_sizes(docs)?;

        let exp_elogbeta = dirichlet_expectation_rows(&self.lambda).mapv(f64::exp);
        let sampler = init_sampler(self.gamma_shape)?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        Ok(docs
            .iter()
            .map(|doc| {
                if doc.is_empty() {
                    return vec![0.0; self.k];
                }
                let gamma =
                    infer_document(doc, &exp_elogbeta, &self.alpha, &sampler, &mut rng).gamma;
                let total = gamma.sum();
                gamma.iter().map(|g| g / total).collect()
            })
            .collect())
    }

    /// Index of the highest-weighted topic in a mixture.
    pub fn dominant_topic(distribution: &[f64]) -> Option<usize> {
        distribution
            .iter()
            .enumerate()
            .filter(|(_, w)| **w > 0.0)
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
    }

    /// Corpus-independent part of the bound, added once.
    fn topics_bound(&self, elogbeta: &Array2<f64>) -> f64 {
        let eta = self.eta;
        let mut bound = ((eta - &self.lambda) * elogbeta).sum();
        bound += self
            .lambda
            .iter()
            .map(|&l| ln_gamma(l) - ln_gamma(eta))
            .sum::<f64>();
        let vocab_prior = ln_gamma(eta * self.vocab_size as f64);
        bound += self
            .lambda
            .axis_iter(Axis(0))
            .map(|row| vocab_prior - ln_gamma(row.sum()))
            .sum::<f64>();
        bound
    }

    fn check_sizes(&self, docs: &[SparseVector]) -> Result<(), LdaError> {
        match docs.iter().find(|d| d.size != self.vocab_size) {
            Some(doc) => Err(LdaError::DimensionMismatch {
                expected: self.vocab_size,
                found: doc.size,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy_model() -> LdaModel {
        LdaModel {
            k: 2,
            vocab_size: 4,
            lambda: array![[9.0, 6.0, 0.5, 0.5], [0.5, 0.5, 6.0, 9.0]],
            alpha: array![0.5, 0.5],
            eta: 0.5,
            gamma_shape: 100.0,
            seed: 11,
        }
    }

    #[test]
    fn test_describe_topics_sorted_and_normalized() {
        let topics = toy_model().describe_topics(3);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].term_indices, vec![0, 1, 2]);
        assert_eq!(topics[1].term_indices, vec![3, 2, 0]);
        for t in &topics {
            assert!(t.term_weights.windows(2).all(|w| w[0] >= w[1]));
            assert!(t.term_weights.iter().sum::<f64>() <= 1.0 + 1e-12);
        }
        assert!((topics[0].term_weights[0] - 9.0 / 16.0).abs() < 1e-12);
    }

    #[test]
    fn test_terms_resolve_against_vocabulary() {
        let vocab: Vec<String> = ["police", "crash", "rain", "farmer"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let topics = toy_model().describe_topics(2);
        assert_eq!(topics[1].terms(&vocab), vec!["farmer", "rain"]);
    }

    #[test]
    fn test_bound_and_perplexity_signs() {
        let model = toy_model();
        let docs = vec![
            SparseVector::from_pairs(4, vec![(0, 2.0), (1, 1.0)]),
            SparseVector::from_pairs(4, vec![(2, 1.0), (3, 3.0)]),
            SparseVector::empty(4),
        ];
        let ll = model.log_likelihood(&docs).unwrap();
        let lp = model.log_perplexity(&docs).unwrap();
        assert!(ll.is_finite() && ll < 0.0, "bound was {ll}");
        assert!(lp.is_finite() && lp > 0.0, "perplexity was {lp}");
        assert!((lp - (-ll / 7.0)).abs() < 1e-9);

        // Same corpus, same number
        assert_eq!(ll, model.log_likelihood(&docs).unwrap());
    }

    #[test]
    fn test_perplexity_without_tokens() {
        let docs = vec![SparseVector::empty(4)];
        assert_eq!(toy_model().log_perplexity(&docs), Err(LdaError::NoTokens));
    }

    #[test]
    fn test_size_mismatch() {
        let docs = vec![SparseVector::empty(3)];
        assert_eq!(
            toy_model().log_likelihood(&docs),
            Err(LdaError::DimensionMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_transform_mixtures() {
        let model = toy_model();
        let docs = vec![
            SparseVector::from_pairs(4, vec![(0, 4.0), (1, 2.0)]),
            SparseVector::empty(4),
        ];
        let mixes = model.transform_all(&docs).unwrap();
        assert!((mixes[0].iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert_eq!(LdaModel::dominant_topic(&mixes[0]), Some(0));
        assert_eq!(mixes[1], vec![0.0, 0.0]);
        assert_eq!(LdaModel::dominant_topic(&mixes[1]), None);
    }
}
