//! optimization — numerical optimization and stability layer.
//!
//! - [`loglik_optimizer`]: L-BFGS maximization of log-likelihoods plus the
//!   [`Minimizer`](loglik_optimizer::Minimizer) interface used by the
//!   estimators.
//! - [`numerical_stability`]: guarded logistic transforms, probability
//!   clamping and shared tolerances.
//! - [`errors`]: [`OptError`](errors::OptError), the error type of this layer.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
