//! regression — logistic regression for a misclassified binary outcome.
//!
//! Purpose
//! -------
//! Estimate the coefficients of `P(y = 1 | x) = σ(xβ)` when only a noisy
//! recording `y*` of the outcome is available and the recording process has
//! known sensitivity and specificity.
//!
//! Key behaviors
//! -------------
//! - [`fit_naive`] ignores misclassification and fits `y*` by IRLS.
//! - [`fit_adjusted`] maximizes the corrected likelihood from the naive
//!   estimate and attaches Wald inference from the observed information.
//! - [`fit_adjusted_with`] does the same with a caller-supplied
//!   [`Minimizer`](crate::optimization::loglik_optimizer::Minimizer).
//!
//! Invariants & assumptions
//! ------------------------
//! - Misclassification is nondifferential: given the true outcome, the
//!   recording error does not depend on `x`.
//! - Inputs are validated up front ([`Observations`], [`Misclassification`]);
//!   nothing is coerced silently.
//! - A returned [`AdjustedFit`] is always converged. Missing inference is a
//!   property of the fit, not a failure of it.
//!
//! Conventions
//! -----------
//! - Column 0 of the design is the intercept when the data were built with
//!   [`Observations::with_intercept`].
//! - Log-likelihoods in results are summed over observations.

pub mod core;
pub mod errors;
pub mod models;

pub use self::core::{
    data::Observations,
    likelihood::MisclassifiedLogit,
    misclass::Misclassification,
    options::{CovarianceKind, FitOptions, IrlsOptions},
};
pub use self::errors::{EstimationError, EstimationResult, FitStage, InputError};
pub use self::models::{
    adjusted::{AdjustedFit, fit_adjusted, fit_adjusted_with},
    naive::{NaiveFit, fit_naive},
    summary::{Coefficient, coefficient_table},
};

pub mod prelude {
    pub use super::core::{
        data::Observations,
        misclass::Misclassification,
        options::{CovarianceKind, FitOptions, IrlsOptions},
    };
    pub use super::errors::{EstimationError, EstimationResult};
    pub use super::models::{adjusted::fit_adjusted, naive::fit_naive};
}
