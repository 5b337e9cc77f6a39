//! Error taxonomy for the estimators.
//!
//! [`InputError`] covers everything detectable before fitting starts.
//! [`EstimationError`] is what the fitting entry points return; it wraps
//! input errors and the failure modes of the naive and adjusted fits.
use crate::{inference::errors::InferenceError, optimization::errors::OptError};
use ndarray::Array1;
use std::fmt;
use thiserror::Error;

pub type EstimationResult<T> = Result<T, EstimationError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    // ---- Shapes ----
    #[error("Observation set is empty")]
    Empty,

    #[error("Design matrix has no columns")]
    NoCovariates,

    #[error("Design matrix has {rows} rows but the outcome has {outcomes} entries")]
    LengthMismatch { rows: usize, outcomes: usize },

    #[error("Row {row} has {found} covariates, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("Fewer observations ({n_obs}) than coefficients ({n_coef})")]
    Underdetermined { n_obs: usize, n_coef: usize },

    #[error("Coefficient vector has length {actual}, expected {expected}")]
    CoefficientLength { expected: usize, actual: usize },

    // ---- Values ----
    #[error("Non-finite covariate at ({row}, {col}): {value}")]
    NonFiniteCovariate { row: usize, col: usize, value: f64 },

    #[error("Outcome at index {index} is {value}, expected 0 or 1")]
    InvalidOutcome { index: usize, value: f64 },

    #[error("{name} must lie in (0, 1], got {value}")]
    InvalidRate { name: &'static str, value: f64 },

    // ---- Options ----
    #[error("Invalid {option}: {reason}")]
    InvalidOption { option: &'static str, reason: &'static str },
}

/// Which optimization a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStage {
    Naive,
    Adjusted,
}

impl fmt::Display for FitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitStage::Naive => write!(f, "naive"),
            FitStage::Adjusted => write!(f, "adjusted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// `XᵀX` (or the weighted normal equations) is not of full rank.
    #[error("Singular design: smallest eigenvalue {min_eigenvalue:e}")]
    SingularDesign { min_eigenvalue: f64 },

    /// The optimizer did not reach its stopping rule. `best_so_far`, when
    /// present, is the last iterate and is not an estimate.
    #[error("The {stage} fit did not converge after {iterations} iterations: {status}")]
    OptimizationFailure {
        stage: FitStage,
        status: String,
        iterations: usize,
        best_so_far: Option<Array1<f64>>,
    },

    /// Point estimates exist but their covariance does not.
    #[error("Singular Hessian (smallest eigenvalue {min_eigenvalue:e}); inference unavailable")]
    SingularHessian { min_eigenvalue: f64 },

    #[error("Inference error: {0}")]
    Inference(InferenceError),

    #[error("Optimizer error: {0}")]
    Optimizer(#[from] OptError),
}

impl From<InferenceError> for EstimationError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::SingularHessian { min_eigenvalue } => {
                EstimationError::SingularHessian { min_eigenvalue }
            }
            InferenceError::MissingHessian => {
                EstimationError::SingularHessian { min_eigenvalue: f64::NAN }
            }
            other => EstimationError::Inference(other),
        }
    }
}

impl EstimationError {
    /// Map an optimizer error raised during `stage`. Failures of the solver
    /// itself become [`EstimationError::OptimizationFailure`]; configuration
    /// and model errors are kept as [`EstimationError::Optimizer`].
    pub fn from_solver(stage: FitStage, err: OptError) -> Self {
        if err.is_solver_failure() {
            EstimationError::OptimizationFailure {
                stage,
                status: err.to_string(),
                iterations: 0,
                best_so_far: None,
            }
        } else {
            EstimationError::Optimizer(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Inference failures that mean "no covariance" collapse into
    // `SingularHessian`; the rest stay wrapped.
    fn inference_errors_map_onto_estimation_taxonomy() {
        let singular: EstimationError =
            InferenceError::SingularHessian { min_eigenvalue: -2.0 }.into();
        let missing: EstimationError = InferenceError::MissingHessian.into();
        let other: EstimationError = InferenceError::InvalidConfidenceLevel { level: 2.0 }.into();

        assert_eq!(singular, EstimationError::SingularHessian { min_eigenvalue: -2.0 });
        assert!(matches!(missing, EstimationError::SingularHessian { .. }));
        assert!(matches!(other, EstimationError::Inference(_)));
    }

    #[test]
    fn from_solver_separates_line_search_failures_from_configuration() {
        let ls = OptError::ConditionViolated { text: "no descent".to_string() };
        let cfg = OptError::NoTolerancesProvided;

        assert!(matches!(
            EstimationError::from_solver(FitStage::Adjusted, ls),
            EstimationError::OptimizationFailure { stage: FitStage::Adjusted, best_so_far: None, .. }
        ));
        assert_eq!(
            EstimationError::from_solver(FitStage::Adjusted, cfg.clone()),
            EstimationError::Optimizer(cfg)
        );
    }
}
