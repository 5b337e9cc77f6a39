//! loglik_optimizer — argmin-powered log-likelihood optimizer.
//!
//! Purpose
//! -------
//! Maximize log-likelihoods `ℓ(θ)` with L-BFGS. Models implement
//! [`LogLikelihood`]; estimators call either [`maximize`] directly or go
//! through the narrower [`Minimizer`] interface, which also reports the
//! curvature at the optimum.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost
//!   `c(θ) = -ℓ(θ)`, negating analytic gradients and finite-differencing the
//!   cost when no gradient is supplied.
//! - [`maximize`] validates the start with [`LogLikelihood::check`], builds a
//!   solver for the chosen [`traits::LineSearcher`] and normalizes the final
//!   state into an [`OptimOutcome`].
//! - [`LbfgsMinimizer`] wraps [`maximize`], short-circuits a stationary start,
//!   and attaches a finite-difference Hessian of the cost.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only `SolverConverged` and `TargetCostReached` count as convergence.
//! - [`OptimOutcome::value`] is a log-likelihood; [`Minimum::value`] is a cost.
//! - Model code reports failures as [`OptError`] values, never panics.
//!
//! Testing notes
//! -------------
//! - Submodules carry unit tests on toy quadratics; the regression layer
//!   exercises the full path on logistic likelihoods.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod minimizer;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

pub use self::api::maximize;
pub use self::minimizer::{LbfgsMinimizer, Minimizer, Minimum};
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::minimizer::{LbfgsMinimizer, Minimizer, Minimum};
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Hessian, Theta};
}
