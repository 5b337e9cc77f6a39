//! High-level entry point: [`maximize`] a [`LogLikelihood`] with L-BFGS.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` starting from `theta0`.
///
/// Calls `f.check(theta0, data)` first, then minimizes `-ℓ(θ)` with L-BFGS
/// using the line search selected in `opts`. The returned
/// [`OptimOutcome::value`] is the log-likelihood at the best iterate, not the
/// cost.
///
/// # Errors
/// - Anything raised by `f.check`.
/// - Invalid solver configuration (see the builders).
/// - Backend failures mapped into `OptError` (line-search breakdowns surface
///   as `ConditionViolated`).
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
