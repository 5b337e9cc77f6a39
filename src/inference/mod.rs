//! inference — standard errors and Wald statistics for fitted coefficients.
//!
//! Purpose
//! -------
//! Turn the curvature of a log-likelihood at its maximizer into a
//! covariance matrix, then into standard errors, z-statistics, p-values and
//! confidence intervals.
//!
//! Key behaviors
//! -------------
//! - [`covariance_from_information`] inverts the information through a
//!   symmetric eigendecomposition, with [`HessianPolicy`] deciding what
//!   happens to eigenvalues that are zero, negative, or numerically tiny.
//! - [`robust_covariance`] forms the sandwich `J⁻¹ S J⁻¹` with
//!   `S =` [`score_outer_product`].
//! - [`WaldInference::from_covariance`] produces the per-coefficient table.
//!
//! Invariants & assumptions
//! ------------------------
//! - Information and meat matrices refer to the *summed* log-likelihood.
//!   Callers optimizing an average must rescale by `n` first.
//! - Under [`HessianPolicy::Strict`] a covariance is returned only for a
//!   matrix with `λ_min > EIGEN_EPS · max(1, λ_max)`.
//!
//! Testing notes
//! -------------
//! - Unit tests use small matrices with analytic inverses; the regression
//!   layer checks coverage end to end.

pub mod errors;
pub mod hessian;
pub mod scores;
pub mod wald;

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hessian::{HessianPolicy, covariance_from_information, robust_covariance};
pub use self::scores::score_outer_product;
pub use self::wald::{WaldInference, WaldOptions, Z_CRIT_95};

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hessian::{HessianPolicy, covariance_from_information, robust_covariance};
    pub use super::wald::{WaldInference, WaldOptions};
}
