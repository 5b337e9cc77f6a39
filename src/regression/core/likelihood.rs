//! Log-likelihood of a logistic model observed through a misclassifying
//! measurement.
//!
//! For observation `i` with true probability `pᵢ = σ(xᵢβ)` the observed
//! outcome `y*ᵢ` is Bernoulli with
//!
//! ```text
//! q1ᵢ = sens·pᵢ + (1 - spec)·(1 - pᵢ)      P(y* = 1)
//! q0ᵢ = (1 - sens)·pᵢ + spec·(1 - pᵢ)      P(y* = 0)
//! ```
//!
//! and `ℓ(β) = Σᵢ y*ᵢ ln q1ᵢ + (1 - y*ᵢ) ln q0ᵢ`. Both probabilities are
//! clamped to `[PROB_EPS, 1 - PROB_EPS]` before the logarithm, so the value is
//! finite for any finite `β`. At `sens = spec = 1` this is exactly the
//! logistic log-likelihood.
//!
//! The optimizer sees the *average* `ℓ(β)/n`; [`MisclassifiedLogit::total`]
//! and [`MisclassifiedLogit::scores`] work on the summed scale.
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, LogLikelihood, Theta, validation::validate_theta_input},
        numerical_stability::{clamp_eta, clamp_probability, safe_logistic},
    },
    regression::core::{data::Observations, misclass::Misclassification},
};
use ndarray::{Array1, Array2, Axis};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MisclassifiedLogit {
    pub misclass: Misclassification,
}

/// Per-observation pieces shared by value, gradient and scores.
struct Terms {
    /// `ln q1` for positives, `ln q0` for negatives.
    loglik: Array1<f64>,
    /// `∂ℓᵢ/∂ηᵢ`.
    deta: Array1<f64>,
}

impl MisclassifiedLogit {
    pub fn new(misclass: Misclassification) -> Self {
        Self { misclass }
    }

    /// Summed log-likelihood `ℓ(β)`.
    ///
    /// # Errors
    /// Wrong coefficient length or non-finite entries.
    pub fn total(&self, beta: &Theta, data: &Observations) -> OptResult<f64> {
        let terms = self.terms(beta, data)?;
        finite(terms.loglik.sum())
    }

    /// Clamped `P(y* = 1 | xᵢ)` for every row.
    ///
    /// # Errors
    /// Wrong coefficient length or non-finite entries.
    pub fn observed_probabilities(
        &self, beta: &Theta, data: &Observations,
    ) -> OptResult<Array1<f64>> {
        let eta = self.eta(beta, data)?;
        Ok(eta.mapv(|e| {
            let (q1, _) = self.misclass.observed_pair(safe_logistic(e), safe_logistic(-e));
            clamp_probability(q1)
        }))
    }

    /// `n × K` matrix of per-observation scores `∂ℓᵢ/∂β`.
    ///
    /// # Errors
    /// Wrong coefficient length or non-finite entries.
    pub fn scores(&self, beta: &Theta, data: &Observations) -> OptResult<Array2<f64>> {
        let terms = self.terms(beta, data)?;
        Ok(data.design() * &terms.deta.insert_axis(Axis(1)))
    }

    fn eta(&self, beta: &Theta, data: &Observations) -> OptResult<Array1<f64>> {
        validate_theta_input(beta, data.n_coef())?;
        Ok(data.design().dot(beta).mapv(clamp_eta))
    }

    fn terms(&self, beta: &Theta, data: &Observations) -> OptResult<Terms> {
        let eta = self.eta(beta, data)?;
        let c = self.misclass.informativeness();
        let n = eta.len();
        let mut loglik = Array1::<f64>::zeros(n);
        let mut deta = Array1::<f64>::zeros(n);
        for (i, (&e, &y)) in eta.iter().zip(data.outcome().iter()).enumerate() {
            let p = safe_logistic(e);
            let p_bar = safe_logistic(-e);
            let (q1, q0) = self.misclass.observed_pair(p, p_bar);
            let (q1, q0) = (clamp_probability(q1), clamp_probability(q0));
            // dq1/dη = c·p(1-p) = -dq0/dη
            let dq = c * p * p_bar;
            if y == 1.0 {
                loglik[i] = q1.ln();
                deta[i] = dq / q1;
            } else {
                loglik[i] = q0.ln();
                deta[i] = -dq / q0;
            }
        }
        Ok(Terms { loglik, deta })
    }
}

impl LogLikelihood for MisclassifiedLogit {
    type Data = Observations;

    /// Average log-likelihood `ℓ(β)/n`.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        Ok(self.total(theta, data)? / data.n_obs() as f64)
    }

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        validate_theta_input(theta, data.n_coef())
    }

    /// Gradient of the average log-likelihood, `Xᵀ(∂ℓ/∂η)/n`.
    fn grad(&self, theta: &Theta, data: &Self::Data) -> OptResult<Grad> {
        let terms = self.terms(theta, data)?;
        let grad = data.design().t().dot(&terms.deta) / data.n_obs() as f64;
        if let Some((index, &value)) = grad.indexed_iter().find(|(_, g)| !g.is_finite()) {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
        Ok(grad)
    }
}

fn finite(value: f64) -> OptResult<f64> {
    if value.is_finite() { Ok(value) } else { Err(OptError::NonFiniteCost { value }) }
}
