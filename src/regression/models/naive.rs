//! Ordinary logistic regression by iteratively reweighted least squares.
//!
//! The naive fit ignores misclassification. It is the baseline the adjusted
//! estimator is compared against and the starting point handed to its
//! optimizer.
use crate::{
    inference::{
        HessianPolicy, InferenceError, WaldInference, WaldOptions, covariance_from_information,
    },
    optimization::numerical_stability::{EIGEN_EPS, clamp_eta, log1p_exp, safe_logistic},
    regression::{
        core::{data::Observations, options::IrlsOptions},
        errors::{EstimationError, EstimationResult, FitStage},
        models::summary::{Coefficient, coefficient_table},
    },
};
use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2, Axis};

/// Floor on IRLS working weights.
const MIN_WEIGHT: f64 = 1e-6;

/// Step halvings tried before a Newton step is declared unusable.
const MAX_HALVINGS: usize = 40;

/// Result of [`fit_naive`].
#[derive(Debug, Clone, PartialEq)]
pub struct NaiveFit {
    pub coefficients: Array1<f64>,
    /// Logistic log-likelihood at `coefficients`.
    pub log_likelihood: f64,
    pub iterations: usize,
    /// Classical Wald inference from `(XᵀWX)⁻¹`.
    pub inference: Result<WaldInference, InferenceError>,
}

impl NaiveFit {
    /// # Errors
    /// [`EstimationError::SingularHessian`] when the weighted information is
    /// not invertible.
    pub fn inference(&self) -> EstimationResult<&WaldInference> {
        self.inference.as_ref().map_err(|e| e.clone().into())
    }

    pub fn coefficient_table(&self) -> Vec<Coefficient> {
        coefficient_table(&self.coefficients, self.inference.as_ref().ok())
    }
}

/// Fit `P(y* = 1 | x) = σ(xβ)` to the observed outcome.
///
/// Newton steps on the logistic log-likelihood, halved while they fail to
/// reduce the deviance. Converges when the largest coefficient change drops
/// below `opts.tol`.
///
/// # Errors
/// - [`EstimationError::SingularDesign`] if `XᵀX` or a weighted normal
///   system is rank deficient.
/// - [`EstimationError::OptimizationFailure`] (stage `Naive`) when the budget
///   runs out or no step reduces the deviance; `best_so_far` holds the last
///   iterate.
pub fn fit_naive(obs: &Observations, opts: &IrlsOptions) -> EstimationResult<NaiveFit> {
    let x = obs.design();
    let y = obs.outcome();
    check_design_rank(x)?;

    let mut beta = Array1::<f64>::zeros(obs.n_coef());
    let mut dev = deviance(x, y, &beta);

    for iter in 1..=opts.max_iter {
        let eta = x.dot(&beta).mapv(clamp_eta);
        let mu = eta.mapv(safe_logistic);
        let weights = mu.mapv(|m| (m * (1.0 - m)).max(MIN_WEIGHT));
        let score = x.t().dot(&(y - &mu));
        let step = solve_spd(&weighted_gram(x, &weights), &score)?;

        let mut scale = 1.0;
        let mut halvings = 0;
        let (candidate, cand_dev) = loop {
            let candidate = &beta + &(&step * scale);
            let cand_dev = deviance(x, y, &candidate);
            if cand_dev.is_finite() && cand_dev <= dev + 1e-12 * (1.0 + dev.abs()) {
                break (candidate, cand_dev);
            }
            halvings += 1;
            if halvings > MAX_HALVINGS {
                return Err(EstimationError::OptimizationFailure {
                    stage: FitStage::Naive,
                    status: "step halving could not reduce the deviance".to_string(),
                    iterations: iter,
                    best_so_far: Some(beta),
                });
            }
            scale *= 0.5;
        };

        let max_change = step.iter().fold(0.0_f64, |m, s| m.max((s * scale).abs()));
        debug!("IRLS iter {iter}: deviance {cand_dev:.10}, max |Δβ| {max_change:.3e}");
        beta = candidate;
        dev = cand_dev;

        if max_change < opts.tol {
            return Ok(finish(x, beta, dev, iter));
        }
    }

    Err(EstimationError::OptimizationFailure {
        stage: FitStage::Naive,
        status: "MaxItersReached".to_string(),
        iterations: opts.max_iter,
        best_so_far: Some(beta),
    })
}

// ---- Helper methods ----

fn finish(x: &Array2<f64>, beta: Array1<f64>, dev: f64, iterations: usize) -> NaiveFit {
    let mu = x.dot(&beta).mapv(|e| safe_logistic(clamp_eta(e)));
    let info = weighted_gram(x, &mu.mapv(|m| m * (1.0 - m)));
    let inference = covariance_from_information(&info, HessianPolicy::Strict)
        .and_then(|cov| WaldInference::from_covariance(&beta, &cov, &WaldOptions::default()));
    if let Err(e) = &inference {
        warn!("naive fit: inference unavailable: {e}");
    }
    NaiveFit { coefficients: beta, log_likelihood: -0.5 * dev, iterations, inference }
}

/// `-2ℓ(β)` for the logistic model, evaluated as `2 Σ ln(1 + e^η) - y·η`.
fn deviance(x: &Array2<f64>, y: &Array1<f64>, beta: &Array1<f64>) -> f64 {
    let eta = x.dot(beta);
    2.0 * eta
        .iter()
        .zip(y.iter())
        .map(|(&e, &yi)| {
            let e = clamp_eta(e);
            log1p_exp(e) - yi * e
        })
        .sum::<f64>()
}

/// `Xᵀ diag(w) X`.
fn weighted_gram(x: &Array2<f64>, w: &Array1<f64>) -> Array2<f64> {
    let xw = x * &w.view().insert_axis(Axis(1));
    x.t().dot(&xw)
}

fn check_design_rank(x: &Array2<f64>) -> EstimationResult<()> {
    let gram = x.t().dot(x);
    let k = gram.nrows();
    let eigen = DMatrix::from_fn(k, k, |i, j| gram[[i, j]]).symmetric_eigen();
    let lambda_min = eigen.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
    let lambda_max = eigen.eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(lambda_min > EIGEN_EPS * lambda_max.max(1.0)) {
        return Err(EstimationError::SingularDesign { min_eigenvalue: lambda_min });
    }
    Ok(())
}

/// Solve `A s = b` for symmetric positive-definite `A` by Cholesky.
fn solve_spd(a: &Array2<f64>, b: &Array1<f64>) -> EstimationResult<Array1<f64>> {
    let k = a.nrows();
    let mat = DMatrix::from_fn(k, k, |i, j| a[[i, j]]);
    let Some(chol) = mat.clone().cholesky() else {
        let min_eigenvalue =
            mat.symmetric_eigen().eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);
        return Err(EstimationError::SingularDesign { min_eigenvalue });
    };
    let rhs = DVector::from_iterator(k, b.iter().copied());
    let sol = chol.solve(&rhs);
    Ok(Array1::from_iter(sol.iter().copied()))
}
