// Text annotation: the fixed preprocessing chain that turns a headline into
// a flat list of stemmed tokens.

pub mod document;
pub mod finisher;
pub mod normalizer;
pub mod pipeline;
pub mod stemmer;
pub mod stopwords;
pub mod tokenizer;
pub mod traits;

pub use pipeline::NlpPipeline;
pub use traits::{Annotation, Annotator};
