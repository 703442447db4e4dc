// Online variational Bayes for LDA (Hoffman, Blei & Bach 2010).
//
// Each iteration samples a mini-batch of documents, runs the per-document
// E-step against the current topics, and blends the batch's estimate of
// lambda into the running one with step size
//
//   rho = (learning_offset + updates) ^ (-learning_decay)
//
// where `updates` counts the mini-batches that actually changed lambda. An
// iteration whose sample holds no non-empty document leaves the step size
// where it was.
//
// When enabled, alpha takes one Newton step per iteration towards the
// batch's mean E[log theta], and the step is only kept if every component
// stays positive.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use tracing::{debug, info, warn};

use super::inference::{infer_document, init_sampler};
use super::model::LdaModel;
use super::params::LdaParams;
use super::special::{dirichlet_expectation, dirichlet_expectation_rows, trigamma};
use super::LdaError;
use crate::features::SparseVector;

/// Reported after every training iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationStats {
    pub iteration: usize,
    pub max_iter: usize,
    /// Non-empty documents in this iteration's mini-batch
    pub batch_size: usize,
    /// Lambda updates applied so far, including this iteration's
    pub updates: usize,
    /// Step size used for the lambda update (0.0 when the batch was empty)
    pub rho: f64,
}

#[derive(Debug, Clone)]
pub struct OnlineLda {
    params: LdaParams,
}

impl OnlineLda {
    /// Create an optimizer, validating the parameters up front.
    pub fn new(params: LdaParams) -> Result<Self, LdaError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &LdaParams {
        &self.params
    }

    pub fn fit(&self, docs: &[SparseVector]) -> Result<LdaModel, LdaError> {
        self.fit_with_progress(docs, |_| {})
    }

    /// Fit the model, calling `on_iteration` after every mini-batch.
    pub fn fit_with_progress<F>(
        &self,
        docs: &[SparseVector],
        mut on_iteration: F,
    ) -> Result<LdaModel, LdaError>
    where
        F: FnMut(IterationStats),
    {
        let vocab_size = check_corpus(docs)?;
        let params = &self.params;
        let k = params.k;

        let seed = params.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let sampler = init_sampler(params.gamma_shape)?;

        let mut alpha = Array1::from(params.resolved_doc_concentration());
        let eta = params.resolved_topic_concentration();
        let mut lambda =
            Array2::from_shape_simple_fn((k, vocab_size), || sampler.sample(&mut rng));

        let corpus_size = docs.len() as f64;

        info!(
            documents = docs.len(),
            vocab_size,
            k,
            max_iter = params.max_iter,
            seed,
            "Fitting online LDA"
        );

        let mut updates = 0usize;
        for iteration in 1..=params.max_iter {
            let batch: Vec<&SparseVector> = docs
                .iter()
                .filter(|_| rng.random::<f64>() < params.subsampling_rate)
                .filter(|d| !d.is_empty())
                .collect();

            if batch.is_empty() {
                warn!(iteration, "No non-empty documents sampled; skipping update");
                on_iteration(IterationStats {
                    iteration,
                    max_iter: params.max_iter,
                    batch_size: 0,
                    updates,
                    rho: 0.0,
                });
                continue;
            }

            let exp_elogbeta = dirichlet_expectation_rows(&lambda).mapv(f64::exp);
            let mut stats = Array2::<f64>::zeros((k, vocab_size));
            let mut logphat = Array1::<f64>::zeros(k);

            for doc in &batch {
                let inferred = infer_document(doc, &exp_elogbeta, &alpha, &sampler, &mut rng);
                for (col, &term) in doc.indices.iter().enumerate() {
                    let mut target = stats.column_mut(term);
                    target += &inferred.sstats.column(col);
                }
                if params.optimize_doc_concentration {
                    logphat += &dirichlet_expectation(inferred.gamma.view());
                }
            }

            let batch_size = batch.len();
            updates += 1;
            let rho = step_size(params, updates);
            let scale = corpus_size / batch_size as f64;

            let batch_lambda = (stats * &exp_elogbeta) * scale + eta;
            lambda = lambda * (1.0 - rho) + batch_lambda * rho;

            if params.optimize_doc_concentration {
                logphat /= batch_size as f64;
                update_alpha(&mut alpha, &logphat, rho, batch_size as f64);
            }

            debug!(iteration, batch_size, updates, rho, "Online LDA iteration");
            on_iteration(IterationStats {
                iteration,
                max_iter: params.max_iter,
                batch_size,
                updates,
                rho,
            });
        }

        Ok(LdaModel {
            k,
            vocab_size,
            lambda,
            alpha,
            eta,
            gamma_shape: params.gamma_shape,
            seed,
        })
    }
}

fn step_size(params: &LdaParams, updates: usize) -> f64 {
    (params.learning_offset + updates as f64).powf(-params.learning_decay)
}

/// Validate the corpus and return its vocabulary size.
fn check_corpus(docs: &[SparseVector]) -> Result<usize, LdaError> {
    let first = docs.first().ok_or(LdaError::EmptyCorpus)?;
    let vocab_size = first.size;
    if vocab_size == 0 {
        return Err(LdaError::EmptyVocabulary);
    }
    if let Some(doc) = docs.iter().find(|d| d.size != vocab_size) {
        return Err(LdaError::DimensionMismatch {
            expected: vocab_size,
            found: doc.size,
        });
    }
    Ok(vocab_size)
}

/// One damped Newton step on alpha (Huang, "Maximum likelihood estimation of
/// Dirichlet distribution parameters"), exploiting the diagonal-plus-constant
/// structure of the Hessian.
fn update_alpha(alpha: &mut Array1<f64>, logphat: &Array1<f64>, rho: f64, n: f64) {
    let gradf = (logphat - &dirichlet_expectation(alpha.view())) * n;
    let c = n * trigamma(alpha.sum());
    let q = alpha.mapv(|a| -n * trigamma(a));

    let b = (&gradf / &q).sum() / (1.0 / c + q.mapv(|v| 1.0 / v).sum());
    let dalpha = -(&gradf - b) / &q;

    let candidate = &*alpha + &(dalpha * rho);
    if candidate.iter().all(|a| *a > 0.0) {
        *alpha = candidate;
    }
}
