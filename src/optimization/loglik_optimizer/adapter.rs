//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! Maximizing `ℓ(θ)` becomes minimizing `c(θ) = -ℓ(θ)`. Analytic gradients are
//! negated; without one, the **cost** closure is finite-differenced so no sign
//! flip is needed on that branch.
use std::cell::RefCell;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-ℓ(θ)`.
/// - `Gradient::gradient` returns `-∇ℓ(θ)` from the analytic gradient, or a
///   finite-difference gradient of the cost when none is implemented.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user `LogLikelihood` and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    /// Cost `c(θ)` with crate errors instead of argmin errors.
    pub fn cost_at(&self, theta: &Theta) -> OptResult<Cost> {
        let output = self.f.value(theta, self.data)?;
        if !output.is_finite() {
            return Err(OptError::NonFiniteCost { value: output });
        }
        Ok(-output)
    }

    /// Cost gradient `∇c(θ)` with crate errors instead of argmin errors.
    ///
    /// Central differences are tried first; if any cost evaluation failed or
    /// the result is not finite, one forward-difference retry is made.
    pub fn cost_gradient_at(&self, theta: &Theta) -> OptResult<Grad> {
        let dim = theta.len();
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, dim)?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |theta: &Theta| -> f64 {
                    match self.cost_at(theta) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e.into());
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = theta.central_diff(&cost_func);
                if closure_err.borrow().is_none() && validate_grad(&fd_grad, dim).is_ok() {
                    return Ok(fd_grad);
                }
                run_fd_diff(theta, &cost_func, &closure_err)
            }
            Err(e) => Err(e),
        }
    }
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        Ok(self.cost_at(theta)?)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        Ok(self.cost_gradient_at(theta)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    struct Quadratic;

    impl LogLikelihood for Quadratic {
        type Data = ();
        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            Ok(-(theta - 1.0).mapv(|x| x * x).sum())
        }
        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
    }

    struct QuadraticWithGrad;

    impl LogLikelihood for QuadraticWithGrad {
        type Data = ();
        fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
            Quadratic.value(theta, &())
        }
        fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
            Ok(())
        }
        fn grad(&self, theta: &Theta, _: &()) -> OptResult<Grad> {
            Ok(theta.mapv(|x| -2.0 * (x - 1.0)))
        }
    }

    #[test]
    // Purpose
    // -------
    // The adapter flips the sign of the log-likelihood and of an analytic
    // gradient.
    fn adapter_negates_value_and_analytic_gradient() {
        let model = QuadraticWithGrad;
        let adapter = ArgMinAdapter::new(&model, &());
        let theta = array![0.0, 3.0];

        assert_eq!(adapter.cost_at(&theta).unwrap(), 5.0);
        assert_eq!(adapter.cost_gradient_at(&theta).unwrap(), array![-2.0, 4.0]);
    }

    #[test]
    // Purpose
    // -------
    // Without an analytic gradient the finite-difference path returns the
    // cost gradient directly.
    fn adapter_falls_back_to_finite_differences() {
        let model = Quadratic;
        let adapter = ArgMinAdapter::new(&model, &());
        let theta = array![0.0, 3.0];

        let g = adapter.cost_gradient_at(&theta).unwrap();

        assert!((g[0] + 2.0).abs() < 1e-5);
        assert!((g[1] - 4.0).abs() < 1e-5);
    }
}
