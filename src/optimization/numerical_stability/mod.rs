//! numerical_stability — guarded transforms and shared numeric tolerances.
//!
//! Everything that evaluates `σ(xβ)` or takes the log of a probability goes
//! through these helpers so that extreme linear predictors and boundary
//! sensitivity/specificity values never produce `NaN` or `-∞`.

pub mod transformations;

pub use self::transformations::{
    ETA_CLAMP, EIGEN_EPS, PROB_EPS, clamp_eta, clamp_probability, log1p_exp, safe_logistic,
};

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, PROB_EPS, clamp_probability, log1p_exp, safe_logistic,
    };
}
