//! Fitting options.
use crate::{
    inference::{HessianPolicy, WaldOptions},
    optimization::loglik_optimizer::MLEOptions,
    regression::errors::InputError,
};
use serde::{Deserialize, Serialize};

/// Newton/IRLS settings for the naive fit.
///
/// Default: `max_iter = 100`, `tol = 1e-10` on the largest coefficient step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawIrlsOptions")]
pub struct IrlsOptions {
    pub max_iter: usize,
    pub tol: f64,
}

impl IrlsOptions {
    /// # Errors
    /// [`InputError::InvalidOption`] for `max_iter == 0` or a tolerance that
    /// is not finite and positive.
    pub fn new(max_iter: usize, tol: f64) -> Result<Self, InputError> {
        if max_iter == 0 {
            return Err(InputError::InvalidOption {
                option: "max_iter",
                reason: "must be greater than zero",
            });
        }
        if !tol.is_finite() || tol <= 0.0 {
            return Err(InputError::InvalidOption {
                option: "tol",
                reason: "must be finite and positive",
            });
        }
        Ok(Self { max_iter, tol })
    }
}

#[derive(Deserialize)]
struct RawIrlsOptions {
    max_iter: usize,
    tol: f64,
}

impl TryFrom<RawIrlsOptions> for IrlsOptions {
    type Error = InputError;

    fn try_from(raw: RawIrlsOptions) -> Result<Self, Self::Error> {
        IrlsOptions::new(raw.max_iter, raw.tol)
    }
}

impl Default for IrlsOptions {
    fn default() -> Self {
        Self { max_iter: 100, tol: 1e-10 }
    }
}

/// Which covariance feeds the Wald statistics of the adjusted fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CovarianceKind {
    /// Inverse observed information.
    #[default]
    Classical,
    /// Sandwich `J⁻¹ S J⁻¹` with the outer product of per-observation scores.
    Robust,
}

/// Everything `fit_adjusted` needs besides the data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FitOptions {
    pub irls: IrlsOptions,
    pub mle: MLEOptions,
    pub hessian_policy: HessianPolicy,
    pub covariance: CovarianceKind,
    pub wald: WaldOptions,
}

impl FitOptions {
    pub fn new(
        irls: IrlsOptions, mle: MLEOptions, hessian_policy: HessianPolicy,
        covariance: CovarianceKind, wald: WaldOptions,
    ) -> FitOptions {
        FitOptions { irls, mle, hessian_policy, covariance, wald }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn irls_options_validate_inputs() {
        assert!(IrlsOptions::new(0, 1e-8).is_err());
        assert!(IrlsOptions::new(10, 0.0).is_err());
        assert!(IrlsOptions::new(10, f64::INFINITY).is_err());
        assert_eq!(IrlsOptions::new(10, 1e-8).unwrap(), IrlsOptions { max_iter: 10, tol: 1e-8 });
    }

    #[test]
    // Purpose
    // -------
    // IRLS settings read from TOML pass the same checks as `IrlsOptions::new`.
    //
    // Given
    // -----
    // - `max_iter = 0, tol = -1.0`, `max_iter = 25, tol = -1.0`, and
    //   `max_iter = 25, tol = 1e-8`.
    //
    // Expect
    // ------
    // - The first two fail naming the bad field; the last deserializes.
    fn irls_options_deserialization_is_validated() {
        let zero_iter = toml::from_str::<IrlsOptions>("max_iter = 0\ntol = -1.0");
        let bad_tol = toml::from_str::<IrlsOptions>("max_iter = 25\ntol = -1.0");
        let valid = toml::from_str::<IrlsOptions>("max_iter = 25\ntol = 1e-8");

        assert!(zero_iter.unwrap_err().to_string().contains("max_iter"));
        assert!(bad_tol.unwrap_err().to_string().contains("tol"));
        assert_eq!(valid.unwrap(), IrlsOptions { max_iter: 25, tol: 1e-8 });
    }

    #[test]
    // Purpose
    // -------
    // Defaults are strict inference with classical covariance and a 1.96
    // interval multiplier.
    fn fit_options_default_is_classical_and_strict() {
        let opts = FitOptions::default();

        assert_eq!(opts.hessian_policy, HessianPolicy::Strict);
        assert_eq!(opts.covariance, CovarianceKind::Classical);
        assert_eq!(opts.wald.z_crit, 1.96);
        assert_eq!(opts.irls, IrlsOptions::default());
    }
}
