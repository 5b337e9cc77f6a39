//! loglik_optimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Key behaviors
//! -------------
//! - [`run_fd_diff`]: forward-difference gradient with error capture, used by
//!   the argmin adapter when a model has no analytic gradient.
//! - [`compute_hessian`]: Hessian of a *fallible* gradient function. Errors
//!   raised by the gradient are captured and surfaced instead of being
//!   smeared into `NaN` entries. Central differences are preferred; forward
//!   differences are the fallback when the central matrix fails validation.
//! - [`symmetrize_hess`]: average each off-diagonal pair in place.
//!
//! Conventions
//! -----------
//! - Differences are taken in the unconstrained parameter vector `Theta`.
//! - Argmin's [`Error`] only appears at the closure boundary; callers see
//!   [`OptError`](crate::optimization::errors::OptError).
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use ndarray::Array1;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// `func` is expected to write any evaluation error into `closure_err` and
/// return `NaN`. The cell is cleared on entry and inspected afterwards.
///
/// # Errors
/// - The captured closure error, converted into an `OptError`.
/// - [`validate_grad`] failures (`GradientDimMismatch`, `InvalidGradient`).
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Finite-difference Hessian of a fallible gradient function at `theta`.
///
/// The first error returned by `grad_fn` aborts the computation once the
/// difference scheme finishes. If the central matrix has a non-finite entry,
/// a forward-difference matrix is tried before giving up. The result is
/// symmetrized.
///
/// # Errors
/// - The first error produced by `grad_fn`.
/// - `HessianDimMismatch` / `InvalidHessian` from the forward fallback.
pub fn compute_hessian<F>(grad_fn: &F, theta: &Theta) -> OptResult<Hessian>
where
    F: Fn(&Theta) -> OptResult<Grad>,
{
    let dim = theta.len();
    let closure_err: RefCell<Option<Error>> = RefCell::new(None);
    let infallible = |t: &Theta| -> Grad {
        match grad_fn(t) {
            Ok(g) => g,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e.into());
                }
                Array1::from_elem(dim, f64::NAN)
            }
        }
    };

    let mut hess = theta.central_hessian(&infallible);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(&infallible);
        if let Some(err) = closure_err.take() {
            return Err(err.into());
        }
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

/// Replace each off-diagonal pair with its average; the diagonal is left as is.
pub fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
