// Latent Dirichlet Allocation fitted with online variational Bayes.
//
// `OnlineLda` consumes sparse term-count vectors and produces an `LdaModel`,
// which holds the variational topic-word parameters (lambda) and the learned
// document concentration. The model reports the variational bound on the
// corpus log likelihood, the matching perplexity bound, and the top-weighted
// terms per topic.

pub mod inference;
pub mod model;
pub mod online;
pub mod params;
pub mod special;

pub use model::{LdaModel, TopicDescription};
pub use online::{IterationStats, OnlineLda};
pub use params::LdaParams;

use thiserror::Error;

/// Errors that can occur while fitting or evaluating an LDA model
#[derive(Error, Debug, PartialEq)]
pub enum LdaError {
    #[error("Invalid LDA parameter: {0}")]
    InvalidParameter(String),

    #[error("Cannot fit a topic model on an empty corpus")]
    EmptyCorpus,

    #[error("Document vector size mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Vocabulary size must be greater than 0")]
    EmptyVocabulary,

    #[error("Corpus contains no tokens; perplexity is undefined")]
    NoTokens,
}
