// LDA hyperparameters.

use serde::{Deserialize, Serialize};

use super::LdaError;

/// LDA model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LdaParams {
    /// Number of topics (must be > 1)
    pub k: usize,
    /// Number of mini-batch iterations
    pub max_iter: usize,
    /// Document-topic prior (alpha). `None` means 1/k for every topic; a
    /// single value is broadcast to all topics.
    pub doc_concentration: Option<Vec<f64>>,
    /// Topic-word prior (eta). `None` means 1/k.
    pub topic_concentration: Option<f64>,
    /// Downweights early iterations (tau0)
    pub learning_offset: f64,
    /// Exponential decay rate of the step size (kappa), in (0.5, 1]
    pub learning_decay: f64,
    /// Fraction of the corpus sampled into each mini-batch, in (0, 1]
    pub subsampling_rate: f64,
    /// Learn alpha during training
    pub optimize_doc_concentration: bool,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Terms reported per topic by `describe_topics`
    pub max_terms_per_topic: usize,
    /// Shape of the gamma distribution used to initialize variational parameters
    pub gamma_shape: f64,
}

impl Default for LdaParams {
    fn default() -> Self {
        Self {
            k: 10,
            max_iter: 20,
            doc_concentration: None,
            topic_concentration: None,
            learning_offset: 1024.0,
            learning_decay: 0.51,
            subsampling_rate: 0.05,
            optimize_doc_concentration: true,
            seed: None,
            max_terms_per_topic: 10,
            gamma_shape: 100.0,
        }
    }
}

impl LdaParams {
    /// Create a new configuration with specified number of topics
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    /// Set number of iterations
    pub fn max_iter(mut self, n: usize) -> Self {
        self.max_iter = n;
        self
    }

    /// Set alpha, either one value for all topics or one per topic
    pub fn doc_concentration(mut self, alpha: Vec<f64>) -> Self {
        self.doc_concentration = Some(alpha);
        self
    }

    /// Set eta (topic-word prior)
    pub fn topic_concentration(mut self, eta: f64) -> Self {
        self.topic_concentration = Some(eta);
        self
    }

    pub fn learning_offset(mut self, tau0: f64) -> Self {
        self.learning_offset = tau0;
        self
    }

    pub fn learning_decay(mut self, kappa: f64) -> Self {
        self.learning_decay = kappa;
        self
    }

    pub fn subsampling_rate(mut self, rate: f64) -> Self {
        self.subsampling_rate = rate;
        self
    }

    pub fn optimize_doc_concentration(mut self, enable: bool) -> Self {
        self.optimize_doc_concentration = enable;
        self
    }

    /// Set random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_terms_per_topic(mut self, n: usize) -> Self {
        self.max_terms_per_topic = n;
        self
    }

    pub fn validate(&self) -> Result<(), LdaError> {
        if self.k <= 1 {
            return Err(LdaError::InvalidParameter(format!(
                "k must be greater than 1, got {}",
                self.k
            )));
        }
        if !(self.learning_offset > 0.0) {
            return Err(LdaError::InvalidParameter(format!(
                "learning_offset must be positive, got {}",
                self.learning_offset
            )));
        }
        if !(self.learning_decay > 0.5 && self.learning_decay <= 1.0) {
            return Err(LdaError::InvalidParameter(format!(
                "learning_decay must be in (0.5, 1.0], got {}",
                self.learning_decay
            )));
        }
        if !(self.subsampling_rate > 0.0 && self.subsampling_rate <= 1.0) {
            return Err(LdaError::InvalidParameter(format!(
                "subsampling_rate must be in (0, 1], got {}",
                self.subsampling_rate
            )));
        }
        if let Some(alpha) = &self.doc_concentration {
            if alpha.len() != 1 && alpha.len() != self.k {
                return Err(LdaError::InvalidParameter(format!(
                    "doc_concentration must have length 1 or k={}, got {}",
                    self.k,
                    alpha.len()
                )));
            }
            if alpha.iter().any(|a| !(*a > 0.0)) {
                return Err(LdaError::InvalidParameter(
                    "doc_concentration values must be positive".into(),
                ));
            }
        }
        if let Some(eta) = self.topic_concentration {
            if !(eta > 0.0) {
                return Err(LdaError::InvalidParameter(format!(
                    "topic_concentration must be positive, got {eta}"
                )));
            }
        }
        if !(self.gamma_shape > 0.0) {
            return Err(LdaError::InvalidParameter(format!(
                "gamma_shape must be positive, got {}",
                self.gamma_shape
            )));
        }
        Ok(())
    }

    /// Alpha expanded to one value per topic.
    pub fn resolved_doc_concentration(&self) -> Vec<f64> {
        match &self.doc_concentration {
            Some(alpha) if alpha.len() == 1 => vec![alpha[0]; self.k],
            Some(alpha) => alpha.clone(),
            None => vec![1.0 / self.k as f64; self.k],
        }
    }

    pub fn resolved_topic_concentration(&self) -> f64 {
        self.topic_concentration.unwrap_or(1.0 / self.k as f64)
    }
}
