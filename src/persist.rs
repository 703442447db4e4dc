// Save and load a fitted model together with its vocabulary.
//
// The vocabulary is stored next to the topic parameters so `describe` can
// print words without refitting the vectorizer.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::lda::LdaModel;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedModel {
    /// Terms in feature-index order
    pub vocabulary: Vec<String>,
    pub model: LdaModel,
    pub created_at: DateTime<Utc>,
}

impl SavedModel {
    pub fn new(vocabulary: Vec<String>, model: LdaModel) -> Self {
        Self {
            vocabulary,
            model,
            created_at: Utc::now(),
        }
    }
}

/// Write the model as JSON, creating parent directories as needed.
pub fn save_model<P: AsRef<Path>>(path: P, saved: &SavedModel) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string(saved).context("Failed to serialize model")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        k = saved.model.k,
        vocab_size = saved.vocabulary.len(),
        "Saved model"
    );
    Ok(())
}

pub fn load_model<P: AsRef<Path>>(path: P) -> Result<SavedModel> {
    let path = path.as_ref();
    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let saved: SavedModel = serde_json::from_str(&json)
        .with_context(|| format!("{} is not a saved model", path.display()))?;

    if saved.vocabulary.len() != saved.model.vocab_size {
        bail!(
            "Saved vocabulary has {} terms but the model expects {}",
            saved.vocabulary.len(),
            saved.model.vocab_size
        );
    }
    if saved.model.lambda.dim() != (saved.model.k, saved.model.vocab_size) {
        bail!("Saved topic matrix does not match k={}", saved.model.k);
    }
    if saved.model.alpha.len() != saved.model.k {
        bail!(
            "Saved alpha has {} entries but the model has k={}",
            saved.model.alpha.len(),
            saved.model.k
        );
    }
    Ok(saved)
}
