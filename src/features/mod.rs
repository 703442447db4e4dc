// Feature extraction: bag-of-words count vectors over a capped vocabulary.

pub mod count_vectorizer;
pub mod sparse;

pub use count_vectorizer::{CountVectorizer, CountVectorizerModel, CountVectorizerParams};
pub use sparse::SparseVector;

use thiserror::Error;

/// Errors raised while fitting the vectorizer.
#[derive(Error, Debug, PartialEq)]
pub enum VectorizerError {
    #[error("Invalid vectorizer parameter: {0}")]
    InvalidParameter(String),

    #[error("The vocabulary is empty; lower min_df or supply more documents")]
    EmptyVocabulary,
}
