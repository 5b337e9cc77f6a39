//! misclass_logit — logistic regression for misclassified binary outcomes.
//!
//! Purpose
//! -------
//! Fit `P(y = 1 | x) = σ(xβ)` when the outcome is only observed through a
//! recording process with known sensitivity and specificity, and study the
//! estimator by simulation.
//!
//! Key behaviors
//! -------------
//! - [`regression`]: validated inputs, the naive IRLS fit, the adjusted
//!   maximum-likelihood fit and its Wald inference.
//! - [`optimization`]: argmin-based L-BFGS behind a narrow
//!   [`Minimizer`](optimization::loglik_optimizer::Minimizer) interface and
//!   numerically guarded transforms.
//! - [`inference`]: information matrices, covariance policies and Wald
//!   statistics.
//! - [`simulation`] and [`sweep`]: seeded synthetic data and parallel
//!   parameter sweeps with per-cell bias and coverage summaries.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every entry point is a pure function of its arguments; no global state
//!   is read or written, so fits may run concurrently.
//! - Errors are typed per layer (`OptError`, `InferenceError`,
//!   `EstimationError`) and converted at layer boundaries.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` holds end-to-end
//!   simulation checks of bias reduction, coverage and degenerate inputs.

pub mod inference;
pub mod optimization;
pub mod regression;
pub mod simulation;
pub mod sweep;

pub mod prelude {
    pub use crate::inference::prelude::*;
    pub use crate::optimization::prelude::*;
    pub use crate::regression::prelude::*;
    pub use crate::simulation::{CovariateLaw, SimulationDesign, simulate};
    pub use crate::sweep::{SweepConfig, run_sweep, summarize};
}
