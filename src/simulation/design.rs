//! What a simulated data set looks like.
use crate::regression::errors::InputError;
use serde::{Deserialize, Serialize};

/// Distribution of each non-intercept covariate, drawn independently.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "law", rename_all = "snake_case")]
pub enum CovariateLaw {
    #[default]
    StandardNormal,
    Uniform {
        low: f64,
        high: f64,
    },
}

impl CovariateLaw {
    /// # Errors
    /// [`InputError::InvalidOption`] for a uniform range that is not finite
    /// with `low < high`.
    pub fn validate(&self) -> Result<(), InputError> {
        match *self {
            CovariateLaw::StandardNormal => Ok(()),
            CovariateLaw::Uniform { low, high } => {
                if low.is_finite() && high.is_finite() && low < high {
                    Ok(())
                } else {
                    Err(InputError::InvalidOption {
                        option: "covariates",
                        reason: "uniform bounds must be finite with low < high",
                    })
                }
            }
        }
    }
}

/// True coefficients, sample size and covariate law.
///
/// `betas[0]` is the intercept; the design gets `betas.len() - 1` random
/// covariate columns after a column of ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationDesign {
    pub betas: Vec<f64>,
    pub n_obs: usize,
    #[serde(default)]
    pub covariates: CovariateLaw,
}

impl SimulationDesign {
    /// Standard-normal covariates.
    ///
    /// # Errors
    /// - [`InputError::NoCovariates`] for empty `betas`.
    /// - [`InputError::InvalidOption`] for non-finite coefficients.
    /// - [`InputError::Underdetermined`] when `n_obs < betas.len()`.
    pub fn new(betas: Vec<f64>, n_obs: usize) -> Result<Self, InputError> {
        let design = Self { betas, n_obs, covariates: CovariateLaw::StandardNormal };
        design.validate()?;
        Ok(design)
    }

    /// # Errors
    /// As [`CovariateLaw::validate`].
    pub fn with_covariates(mut self, law: CovariateLaw) -> Result<Self, InputError> {
        law.validate()?;
        self.covariates = law;
        Ok(self)
    }

    pub fn n_coef(&self) -> usize {
        self.betas.len()
    }

    /// Re-check a design that did not go through [`SimulationDesign::new`],
    /// e.g. one deserialized from a config file.
    ///
    /// # Errors
    /// As [`SimulationDesign::new`] and [`CovariateLaw::validate`].
    pub fn validate(&self) -> Result<(), InputError> {
        if self.betas.is_empty() {
            return Err(InputError::NoCovariates);
        }
        if self.betas.iter().any(|b| !b.is_finite()) {
            return Err(InputError::InvalidOption {
                option: "betas",
                reason: "coefficients must be finite",
            });
        }
        if self.n_obs == 0 {
            return Err(InputError::Empty);
        }
        if self.n_obs < self.n_coef() {
            return Err(InputError::Underdetermined { n_obs: self.n_obs, n_coef: self.n_coef() });
        }
        self.covariates.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_coefficients_and_size() {
        assert_eq!(SimulationDesign::new(vec![], 10), Err(InputError::NoCovariates));
        assert!(matches!(
            SimulationDesign::new(vec![0.0, f64::NAN], 10),
            Err(InputError::InvalidOption { option: "betas", .. })
        ));
        assert_eq!(
            SimulationDesign::new(vec![0.0, 1.0, 2.0], 2),
            Err(InputError::Underdetermined { n_obs: 2, n_coef: 3 })
        );
        assert_eq!(SimulationDesign::new(vec![0.5], 0), Err(InputError::Empty));
    }

    #[test]
    fn uniform_law_requires_ordered_finite_bounds() {
        let design = SimulationDesign::new(vec![0.0, 1.0], 10).unwrap();

        let degenerate = CovariateLaw::Uniform { low: 1.0, high: 1.0 };
        assert!(design.clone().with_covariates(degenerate).is_err());
        let ok = design.with_covariates(CovariateLaw::Uniform { low: -1.0, high: 2.0 }).unwrap();
        assert_eq!(ok.covariates, CovariateLaw::Uniform { low: -1.0, high: 2.0 });
    }

    #[test]
    // Purpose
    // -------
    // The covariate law reads from a tagged table and defaults to normal.
    fn covariate_law_deserializes_from_toml() {
        let normal: SimulationDesign = toml::from_str("betas = [0.1, 0.2]\nn_obs = 50").unwrap();
        let uniform: SimulationDesign = toml::from_str(
            "betas = [0.1]\nn_obs = 5\ncovariates = { law = \"uniform\", low = 0.0, high = 2.0 }",
        )
        .unwrap();

        assert_eq!(normal.covariates, CovariateLaw::StandardNormal);
        assert_eq!(uniform.covariates, CovariateLaw::Uniform { low: 0.0, high: 2.0 });
    }
}
