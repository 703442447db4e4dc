// Document assembly: turn the raw headline into a single document annotation,
// cleaning up whitespace on the way.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::traits::{Annotation, Annotator};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern"));
static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t]").expect("static line break pattern"));

/// How the raw text is cleaned before tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupMode {
    /// Leave the text exactly as loaded
    Disabled,
    /// Replace new lines and tabs with spaces, keeping offsets stable
    Inplace,
    /// Remove new lines and tabs, merge whitespace runs, trim the ends
    #[default]
    Shrink,
}

impl std::str::FromStr for CleanupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disabled" => Ok(Self::Disabled),
            "inplace" => Ok(Self::Inplace),
            "shrink" => Ok(Self::Shrink),
            other => Err(format!(
                "unknown cleanup mode '{other}' (expected disabled, inplace or shrink)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentAssembler {
    pub cleanup_mode: CleanupMode,
}

impl DocumentAssembler {
    pub fn new(cleanup_mode: CleanupMode) -> Self {
        Self { cleanup_mode }
    }

    /// Apply the configured cleanup to raw text.
    pub fn clean(&self, text: &str) -> String {
        match self.cleanup_mode {
            CleanupMode::Disabled => text.to_string(),
            CleanupMode::Inplace => LINE_BREAKS.replace_all(text, " ").into_owned(),
            CleanupMode::Shrink => WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned(),
        }
    }
}

impl Annotator for DocumentAssembler {
    fn name(&self) -> &'static str {
        "document"
    }

    /// Joins the incoming raw text and emits one document annotation, or
    /// nothing when the cleaned text is empty.
    fn annotate(&self, annotations: Vec<Annotation>) -> Vec<Annotation> {
        let raw: Vec<&str> = annotations.iter().map(|a| a.result.as_str()).collect();
        let cleaned = self.clean(&raw.join(" "));

        let len = cleaned.chars().count();
        if len == 0 || cleaned.trim().is_empty() {
            return Vec::new();
        }
        vec![Annotation::new(0, len - 1, cleaned)]
    }
}
