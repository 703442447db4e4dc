// Per-document variational E-step.
//
// Given exp(E[log beta]) for the current topics, iterate the document's
// variational Dirichlet (gamma) until its mean absolute change drops below
// the tolerance. Shared by training, the likelihood bound, and transform.

use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use rand_distr::{Distribution, Gamma};

use super::special::dirichlet_expectation;
use super::LdaError;
use crate::features::SparseVector;

const GAMMA_TOLERANCE: f64 = 1e-3;
const MAX_INNER_ITERATIONS: usize = 100;
const PHI_FLOOR: f64 = 1e-100;

/// Output of the E-step for a single document.
#[derive(Debug, Clone)]
pub struct DocInference {
    /// Variational Dirichlet parameters over topics (length k)
    pub gamma: Array1<f64>,
    /// Sufficient statistics, k x nnz, columns aligned with the document's indices
    pub sstats: Array2<f64>,
}

/// Gamma(shape, 1/shape) sampler used to initialize variational parameters.
pub fn init_sampler(shape: f64) -> Result<Gamma<f64>, LdaError> {
    Gamma::new(shape, 1.0 / shape)
        .map_err(|e| LdaError::InvalidParameter(format!("gamma initialization: {e}")))
}

/// Run the E-step for one non-empty document.
///
/// `exp_elogbeta` is k x V; `alpha` has length k.
pub fn infer_document<R: Rng + ?Sized>(
    doc: &SparseVector,
    exp_elogbeta: &Array2<f64>,
    alpha: &Array1<f64>,
    sampler: &Gamma<f64>,
    rng: &mut R,
) -> DocInference {
    let k = exp_elogbeta.nrows();
    let counts = Array1::from(doc.values.clone());
    let exp_elogbeta_d = exp_elogbeta.select(Axis(1), &doc.indices);

    let mut gamma: Array1<f64> = (0..k).map(|_| sampler.sample(&mut *rng)).collect();
    let mut exp_elogtheta = dirichlet_expectation(gamma.view()).mapv(f64::exp);
    let mut phi_norm = exp_elogtheta.dot(&exp_elogbeta_d) + PHI_FLOOR;

    for _ in 0..MAX_INNER_ITERATIONS {
        let last_gamma = gamma.clone();

        let ratio = &counts / &phi_norm;
        gamma = &exp_elogtheta * &exp_elogbeta_d.dot(&ratio) + alpha;
        exp_elogtheta = dirichlet_expectation(gamma.view()).mapv(f64::exp);
        phi_norm = exp_elogtheta.dot(&exp_elogbeta_d) + PHI_FLOOR;

        let mean_change = (&gamma - &last_gamma).mapv(f64::abs).sum() / k as f64;
        if mean_change < GAMMA_TOLERANCE {
            break;
        }
    }

    let ratio = &counts / &phi_norm;
    let sstats = Array2::from_shape_fn((k, doc.nnz()), |(t, j)| exp_elogtheta[t] * ratio[j]);

    DocInference { gamma, sstats }
}
