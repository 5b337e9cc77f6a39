//! Narrow minimization interface used by the estimators.
//!
//! Estimators only need "start here, give me the optimum, its curvature and
//! whether you trust it". [`Minimizer`] captures exactly that so a fit can be
//! driven by any backend; [`LbfgsMinimizer`] is the argmin implementation.
//!
//! The objective is a [`LogLikelihood`]; a minimizer works on the cost
//! `c(θ) = -ℓ(θ)`, so [`Minimum::value`] and [`Minimum::hessian`] refer to
//! the cost.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Theta,
        adapter::ArgMinAdapter,
        api::maximize,
        finite_diff::compute_hessian,
        traits::{LogLikelihood, MLEOptions},
        types::Hessian,
        validation::validate_theta_input,
    },
};
use argmin_math::ArgminL2Norm;
use log::{debug, warn};

/// Result of a minimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found.
    pub theta_hat: Theta,
    /// Cost `c(θ̂) = -ℓ(θ̂)`.
    pub value: f64,
    /// Hessian of the cost at `theta_hat`; `None` when not requested or when
    /// it could not be evaluated.
    pub hessian: Option<Hessian>,
    /// `true` only when the backend's stopping rule was met.
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
}

/// Unconstrained minimization of `-ℓ(θ)` from a starting point.
///
/// The gradient is optional: objectives that do not override
/// [`LogLikelihood::grad`] are differentiated numerically.
pub trait Minimizer {
    fn minimize<F: LogLikelihood>(
        &self, objective: &F, theta0: Theta, data: &F::Data,
    ) -> OptResult<Minimum>;
}

/// Argmin L-BFGS minimizer with a finite-difference Hessian at the optimum.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LbfgsMinimizer {
    pub opts: MLEOptions,
    /// Skip the Hessian when only point estimates are needed.
    pub skip_hessian: bool,
}

impl LbfgsMinimizer {
    pub fn new(opts: MLEOptions) -> Self {
        Self { opts, skip_hessian: false }
    }

    pub fn without_hessian(mut self) -> Self {
        self.skip_hessian = true;
        self
    }
}

impl Minimizer for LbfgsMinimizer {
    /// If the gradient at `theta0` already meets `tol_grad`, the start is
    /// returned as converged with zero iterations. Otherwise L-BFGS runs via
    /// [`maximize`].
    ///
    /// # Errors
    /// - `theta0` with non-finite entries.
    /// - Errors from `objective.check`, the cost/gradient, or the backend.
    fn minimize<F: LogLikelihood>(
        &self, objective: &F, theta0: Theta, data: &F::Data,
    ) -> OptResult<Minimum> {
        validate_theta_input(&theta0, theta0.len())?;
        objective.check(&theta0, data)?;
        let problem = ArgMinAdapter::new(objective, data);

        let start_norm = problem.cost_gradient_at(&theta0)?.l2_norm();
        let at_start = self.opts.tols.tol_grad.is_some_and(|tol| start_norm < tol);

        let (theta_hat, value, converged, status, iterations) = if at_start {
            debug!("starting point already stationary (|grad| = {start_norm:.3e})");
            let value = problem.cost_at(&theta0)?;
            (theta0, value, true, "StartingPointStationary".to_string(), 0)
        } else {
            let out = maximize(objective, theta0, data, &self.opts)?;
            (out.theta_hat, -out.value, out.converged, out.status, out.iterations)
        };

        let hessian = if self.skip_hessian {
            None
        } else {
            match compute_hessian(&|t: &Theta| problem.cost_gradient_at(t), &theta_hat) {
                Ok(h) => Some(h),
                Err(e) => {
                    warn!("Hessian at the optimum could not be evaluated: {e}");
                    None
                }
            }
        };

        Ok(Minimum { theta_hat, value, hessian, converged, status, iterations })
    }
}
