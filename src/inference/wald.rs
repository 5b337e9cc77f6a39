//! Wald statistics from a coefficient covariance matrix.
use crate::inference::errors::{InferenceError, InferenceResult};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided 95% normal critical value.
pub const Z_CRIT_95: f64 = 1.96;

/// Configuration of the confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaldOptions {
    /// Half-width multiplier: CI = estimate ± z_crit · SE.
    pub z_crit: f64,
}

impl Default for WaldOptions {
    fn default() -> Self {
        Self { z_crit: Z_CRIT_95 }
    }
}

impl WaldOptions {
    /// Derive `z_crit = Φ⁻¹((1 + level) / 2)` from a confidence level.
    ///
    /// # Errors
    /// [`InferenceError::InvalidConfidenceLevel`] unless `0 < level < 1`.
    pub fn from_level(level: f64) -> InferenceResult<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(InferenceError::InvalidConfidenceLevel { level });
        }
        let z_crit = Normal::standard().inverse_cdf(0.5 + 0.5 * level);
        Ok(Self { z_crit })
    }
}

/// Standard errors, z-statistics, two-sided p-values and confidence bounds
/// for one coefficient vector.
#[derive(Debug, Clone, PartialEq)]
pub struct WaldInference {
    pub covariance: Array2<f64>,
    pub std_errors: Array1<f64>,
    pub z_stats: Array1<f64>,
    pub p_values: Array1<f64>,
    pub ci_lower: Array1<f64>,
    pub ci_upper: Array1<f64>,
    pub z_crit: f64,
}

impl WaldInference {
    /// Build Wald statistics for `estimates` with covariance `cov`.
    ///
    /// `p = 2 · (1 - Φ(|z|))`, evaluated through the survival function so
    /// very large `|z|` keeps precision.
    ///
    /// # Errors
    /// - [`InferenceError::DimensionMismatch`] if `cov` is not `K × K`.
    /// - [`InferenceError::NonFiniteVariance`] for a diagonal entry that is
    ///   not finite and positive.
    pub fn from_covariance(
        estimates: &Array1<f64>, cov: &Array2<f64>, opts: &WaldOptions,
    ) -> InferenceResult<Self> {
        let k = estimates.len();
        if cov.dim() != (k, k) {
            return Err(InferenceError::DimensionMismatch { expected: k, found: cov.dim() });
        }
        let variances = cov.diag();
        if let Some((index, &value)) =
            variances.indexed_iter().find(|(_, v)| !(v.is_finite() && **v > 0.0))
        {
            return Err(InferenceError::NonFiniteVariance { index, value });
        }

        let normal = Normal::standard();
        let std_errors = variances.mapv(f64::sqrt);
        let z_stats = estimates / &std_errors;
        let p_values = z_stats.mapv(|z| (2.0 * normal.sf(z.abs())).min(1.0));
        let half_width = &std_errors * opts.z_crit;
        let ci_lower = estimates - &half_width;
        let ci_upper = estimates + &half_width;

        Ok(Self {
            covariance: cov.clone(),
            std_errors,
            z_stats,
            p_values,
            ci_lower,
            ci_upper,
            z_crit: opts.z_crit,
        })
    }

    /// `true` when the interval for coefficient `j` contains `value`.
    pub fn covers(&self, j: usize, value: f64) -> bool {
        self.ci_lower[j] <= value && value <= self.ci_upper[j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Textbook Wald quantities for a diagonal covariance.
    //
    // Given
    // -----
    // - β̂ = (1.96, 0), Σ = diag(1, 4).
    //
    // Expect
    // ------
    // - SE = (1, 2), z = (1.96, 0), p ≈ (0.05, 1), CI = β̂ ± 1.96·SE.
    fn from_covariance_matches_textbook_values() {
        // Arrange
        let beta = array![1.96, 0.0];
        let cov = array![[1.0, 0.3], [0.3, 4.0]];

        // Act
        let w = WaldInference::from_covariance(&beta, &cov, &WaldOptions::default()).unwrap();

        // Assert
        assert_eq!(w.std_errors, array![1.0, 2.0]);
        assert_relative_eq!(w.z_stats[0], 1.96);
        assert_relative_eq!(w.p_values[0], 0.04999579, epsilon = 1e-6);
        assert_relative_eq!(w.p_values[1], 1.0);
        assert_relative_eq!(w.ci_lower[1], -3.92);
        assert_relative_eq!(w.ci_upper[0], 3.92);
        assert!(w.covers(1, 0.0));
        assert!(!w.covers(0, 0.0));
    }

    #[test]
    fn from_covariance_rejects_non_positive_variance() {
        let err = WaldInference::from_covariance(
            &array![1.0, 2.0],
            &array![[1.0, 0.0], [0.0, 0.0]],
            &WaldOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, InferenceError::NonFiniteVariance { index: 1, value: 0.0 });
    }

    #[test]
    fn from_level_recovers_common_critical_values() {
        assert_relative_eq!(WaldOptions::from_level(0.95).unwrap().z_crit, 1.959964, epsilon = 1e-5);
        assert_relative_eq!(WaldOptions::from_level(0.90).unwrap().z_crit, 1.644854, epsilon = 1e-5);
        assert!(WaldOptions::from_level(1.0).is_err());
        assert!(WaldOptions::from_level(f64::NAN).is_err());
    }
}
