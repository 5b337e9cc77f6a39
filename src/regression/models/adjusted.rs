//! Misclassification-adjusted maximum likelihood.
use crate::{
    inference::{
        InferenceError, InferenceResult, WaldInference, covariance_from_information,
        robust_covariance, score_outer_product,
    },
    optimization::loglik_optimizer::{LbfgsMinimizer, Minimizer, Minimum},
    regression::{
        core::{
            data::Observations,
            likelihood::MisclassifiedLogit,
            misclass::Misclassification,
            options::{CovarianceKind, FitOptions},
        },
        errors::{EstimationError, EstimationResult, FitStage},
        models::{
            naive::{NaiveFit, fit_naive},
            summary::{Coefficient, coefficient_table},
        },
    },
};
use log::{debug, warn};
use ndarray::Array1;

/// Result of [`fit_adjusted`].
///
/// Only converged fits are returned, so `coefficients` is always a local
/// maximizer of the corrected likelihood. `inference` is kept separate:
/// the point estimate stands even when its covariance does not exist.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedFit {
    pub coefficients: Array1<f64>,
    pub misclass: Misclassification,
    /// The uncorrected fit used as the starting point.
    pub naive: NaiveFit,
    /// Corrected log-likelihood at `coefficients`, summed over observations.
    pub log_likelihood: f64,
    pub status: String,
    pub iterations: usize,
    pub covariance_kind: CovarianceKind,
    pub inference: Result<WaldInference, InferenceError>,
}

impl AdjustedFit {
    /// Standard errors, p-values and intervals.
    ///
    /// # Errors
    /// [`EstimationError::SingularHessian`] when the information matrix is
    /// singular, not positive definite, or could not be evaluated.
    pub fn inference(&self) -> EstimationResult<&WaldInference> {
        self.inference.as_ref().map_err(|e| e.clone().into())
    }

    pub fn std_errors(&self) -> Option<&Array1<f64>> {
        self.inference.as_ref().ok().map(|inf| &inf.std_errors)
    }

    pub fn coefficient_table(&self) -> Vec<Coefficient> {
        coefficient_table(&self.coefficients, self.inference.as_ref().ok())
    }
}

/// Fit the misclassification-adjusted logistic model with the default
/// L-BFGS minimizer configured by `opts.mle`.
///
/// # Errors
/// See [`fit_adjusted_with`].
pub fn fit_adjusted(
    obs: &Observations, misclass: &Misclassification, opts: &FitOptions,
) -> EstimationResult<AdjustedFit> {
    fit_adjusted_with(obs, misclass, opts, &LbfgsMinimizer::new(opts.mle.clone()))
}

/// Fit the adjusted model with any [`Minimizer`].
///
/// 1. Naive IRLS fit, used as the seed.
/// 2. Objective: the misclassified-outcome log-likelihood, averaged over
///    observations.
/// 3. Minimize its negative from the naive estimate.
/// 4. Covariance from the Hessian at the optimum (or the sandwich when
///    `opts.covariance` is `Robust`), then Wald statistics.
///
/// # Errors
/// - [`EstimationError::SingularDesign`] and naive-stage
///   [`EstimationError::OptimizationFailure`] from step 1.
/// - [`EstimationError::OptimizationFailure`] (stage `Adjusted`) when the
///   minimizer stops without converging; `best_so_far` is its last point.
/// - [`EstimationError::Optimizer`] for objective or configuration errors.
///
/// A singular Hessian is not an error here; it is reported through
/// [`AdjustedFit::inference`].
pub fn fit_adjusted_with<M: Minimizer>(
    obs: &Observations, misclass: &Misclassification, opts: &FitOptions, minimizer: &M,
) -> EstimationResult<AdjustedFit> {
    let naive = fit_naive(obs, &opts.irls)?;
    debug!(
        "naive fit converged in {} iterations; starting adjusted fit (sens {}, spec {})",
        naive.iterations,
        misclass.sensitivity(),
        misclass.specificity()
    );

    let model = MisclassifiedLogit::new(*misclass);
    let min = minimizer
        .minimize(&model, naive.coefficients.clone(), obs)
        .map_err(|e| EstimationError::from_solver(FitStage::Adjusted, e))?;

    if !min.converged {
        return Err(EstimationError::OptimizationFailure {
            stage: FitStage::Adjusted,
            status: min.status,
            iterations: min.iterations,
            best_so_far: Some(min.theta_hat),
        });
    }

    let inference = adjusted_inference(&model, obs, &min, opts);
    if let Err(e) = &inference {
        warn!("adjusted fit: inference unavailable: {e}");
    }

    Ok(AdjustedFit {
        log_likelihood: -min.value * obs.n_obs() as f64,
        coefficients: min.theta_hat,
        misclass: *misclass,
        naive,
        status: min.status,
        iterations: min.iterations,
        covariance_kind: opts.covariance,
        inference,
    })
}

// ---- Helper methods ----

/// The minimizer works on `-ℓ/n`, so its Hessian is rescaled by `n` to the
/// summed information before inversion.
fn adjusted_inference(
    model: &MisclassifiedLogit, obs: &Observations, min: &Minimum, opts: &FitOptions,
) -> InferenceResult<WaldInference> {
    let hessian = min.hessian.as_ref().ok_or(InferenceError::MissingHessian)?;
    let info = hessian * obs.n_obs() as f64;
    let cov = match opts.covariance {
        CovarianceKind::Classical => covariance_from_information(&info, opts.hessian_policy)?,
        CovarianceKind::Robust => {
            let meat = score_outer_product(&model.scores(&min.theta_hat, obs)?);
            robust_covariance(&info, &meat, opts.hessian_policy)?
        }
    };
    WaldInference::from_covariance(&min.theta_hat, &cov, &opts.wald)
}
