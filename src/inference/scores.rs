//! Per-observation score aggregation for sandwich covariances.
use ndarray::Array2;

/// Outer product of scores `Σᵢ sᵢ sᵢᵀ` for an `n × K` score matrix.
///
/// Observations are treated as independent, so there are no lag terms.
/// The sum (not the average) keeps the result on the same scale as the
/// information of the summed log-likelihood.
pub fn score_outer_product(scores: &Array2<f64>) -> Array2<f64> {
    scores.t().dot(scores)
}
