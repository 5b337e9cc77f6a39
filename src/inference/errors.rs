//! Errors raised while turning curvature into standard errors.
use crate::optimization::errors::OptError;
use thiserror::Error;

pub type InferenceResult<T> = Result<T, InferenceError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    // ---- Curvature ----
    /// Information matrix is singular or not positive definite.
    #[error("Singular Hessian: smallest eigenvalue {min_eigenvalue:e}")]
    SingularHessian { min_eigenvalue: f64 },

    /// The optimizer did not provide a Hessian at the optimum.
    #[error("Hessian unavailable at the optimum")]
    MissingHessian,

    /// Information matrix has a non-finite entry.
    #[error("Non-finite information entry at ({row}, {col}): {value}")]
    NonFiniteInformation { row: usize, col: usize, value: f64 },

    // ---- Covariance ----
    /// A variance on the diagonal is non-finite or not positive.
    #[error("Invalid variance for coefficient {index}: {value}")]
    NonFiniteVariance { index: usize, value: f64 },

    /// Matrix or vector shapes disagree.
    #[error("Dimension mismatch: expected {expected}, found {found:?}")]
    DimensionMismatch { expected: usize, found: (usize, usize) },

    // ---- Options ----
    #[error("Invalid confidence level {level}: must lie strictly between 0 and 1")]
    InvalidConfidenceLevel { level: f64 },

    #[error("Invalid eigenvalue floor {floor}: must be finite and positive")]
    InvalidEigenFloor { floor: f64 },

    // ---- Numerical differentiation ----
    #[error(transparent)]
    Optimizer(#[from] OptError),
}
