// Special functions used by the variational updates.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use statrs::function::gamma::digamma;

/// Second derivative of ln Γ(x), for x > 0.
///
/// Shifts x up with the recurrence ψ₁(x) = ψ₁(x+1) + 1/x², then applies the
/// asymptotic series.
pub fn trigamma(x: f64) -> f64 {
    let mut x = x;
    let mut result = 0.0;
    while x < 6.0 {
        result += 1.0 / (x * x);
        x += 1.0;
    }
    let inv = 1.0 / x;
    let inv2 = inv * inv;
    result
        + inv
        + inv2 / 2.0
        + inv * inv2
            * (1.0 / 6.0 - inv2 * (1.0 / 30.0 - inv2 * (1.0 / 42.0 - inv2 / 30.0)))
}

/// E[log θ] for θ ~ Dirichlet(alpha).
pub fn dirichlet_expectation(alpha: ArrayView1<f64>) -> Array1<f64> {
    let total = digamma(alpha.sum());
    alpha.mapv(|a| digamma(a) - total)
}

/// Row-wise Dirichlet expectation of a matrix (one Dirichlet per row).
pub fn dirichlet_expectation_rows(alpha: &Array2<f64>) -> Array2<f64> {
    let mut out = alpha.mapv(digamma);
    for (mut row, src) in out.axis_iter_mut(Axis(0)).zip(alpha.axis_iter(Axis(0))) {
        let total = digamma(src.sum());
        row -= total;
    }
    out
}

/// Numerically stable log(sum(exp(values))).
pub fn log_sum_exp(values: ArrayView1<f64>) -> f64 {
    let max = values.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
    if !max.is_finite() {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}
