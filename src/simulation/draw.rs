//! Drawing data sets from a [`SimulationDesign`].
use crate::{
    optimization::numerical_stability::safe_logistic,
    regression::{
        core::{data::Observations, misclass::Misclassification},
        errors::EstimationResult,
    },
    simulation::design::{CovariateLaw, SimulationDesign},
};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, distributions::Uniform, rngs::StdRng};
use rand_distr::StandardNormal;

/// One simulated data set.
///
/// `observed` holds the recorded (possibly misclassified) outcome that the
/// estimators see; `true_outcome` is the latent outcome before relabeling.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedData {
    pub observed: Observations,
    pub true_outcome: Array1<f64>,
}

impl SimulatedData {
    /// Observations with the latent outcome in place of the recorded one.
    ///
    /// # Errors
    /// Only if the stored arrays were altered to break the invariants of
    /// [`Observations`].
    pub fn truth(&self) -> EstimationResult<Observations> {
        Ok(Observations::new(self.observed.design().clone(), self.true_outcome.clone())?)
    }

    /// Share of rows whose recorded outcome differs from the latent one.
    pub fn flip_rate(&self) -> f64 {
        let flips = self
            .observed
            .outcome()
            .iter()
            .zip(self.true_outcome.iter())
            .filter(|(a, b)| a != b)
            .count();
        flips as f64 / self.true_outcome.len() as f64
    }
}

/// Draw covariates, latent outcomes `y ~ Bernoulli(σ(xβ))`, then record each
/// outcome through `misclass`: a true 1 is kept with probability
/// `sensitivity`, a true 0 with probability `specificity`.
///
/// The same `seed` always produces the same data set.
///
/// # Errors
/// [`EstimationError::InvalidInput`](crate::regression::EstimationError::InvalidInput)
/// when `design` fails validation.
pub fn simulate(
    design: &SimulationDesign, misclass: &Misclassification, seed: u64,
) -> EstimationResult<SimulatedData> {
    design.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let n = design.n_obs;
    let k = design.n_coef();

    let x = match design.covariates {
        CovariateLaw::StandardNormal => Array2::from_shape_fn((n, k), |(_, j)| {
            if j == 0 { 1.0 } else { rng.sample(StandardNormal) }
        }),
        CovariateLaw::Uniform { low, high } => {
            let law = Uniform::new(low, high);
            Array2::from_shape_fn((n, k), |(_, j)| if j == 0 { 1.0 } else { rng.sample(&law) })
        }
    };

    let betas = Array1::from(design.betas.clone());
    let p = x.dot(&betas).mapv(safe_logistic);
    let true_outcome = p.mapv(|pi| if rng.gen::<f64>() < pi { 1.0 } else { 0.0 });
    let recorded = true_outcome.mapv(|y| {
        let keep = if y == 1.0 { misclass.sensitivity() } else { misclass.specificity() };
        if rng.gen::<f64>() < keep { y } else { 1.0 - y }
    });

    Ok(SimulatedData { observed: Observations::new(x, recorded)?, true_outcome })
}
