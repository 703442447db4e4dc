// Headline topics: topic modeling over a CSV corpus of news headlines.
//
// This is the library root. Each module corresponds to one stage of the
// pipeline: load the corpus, annotate text into tokens, vectorize, fit LDA,
// and render the results.

pub mod annotate;
pub mod config;
pub mod corpus;
pub mod features;
pub mod lda;
pub mod output;
pub mod persist;
pub mod pipeline;
