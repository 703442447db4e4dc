// Annotator trait: one stage of the preprocessing chain.
//
// Every stage consumes the annotations produced by the previous one and
// returns a new list. Keeping the stages behind one trait lets the pipeline
// be assembled (and inspected) as an ordered list of boxed stages.

/// A span of the source text plus the stage's current reading of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Character offset of the first character (inclusive)
    pub begin: usize,
    /// Character offset of the last character (inclusive)
    pub end: usize,
    /// The text this annotation currently stands for
    pub result: String,
}

impl Annotation {
    pub fn new(begin: usize, end: usize, result: impl Into<String>) -> Self {
        Self {
            begin,
            end,
            result: result.into(),
        }
    }

    /// Same span, different text.
    pub fn with_result(&self, result: impl Into<String>) -> Self {
        Self {
            begin: self.begin,
            end: self.end,
            result: result.into(),
        }
    }
}

/// A single preprocessing stage.
pub trait Annotator: Send + Sync {
    /// Short stage name, used in logs and `NlpPipeline::stage_names`.
    fn name(&self) -> &'static str;

    /// Transform the previous stage's annotations.
    fn annotate(&self, annotations: Vec<Annotation>) -> Vec<Annotation>;
}
