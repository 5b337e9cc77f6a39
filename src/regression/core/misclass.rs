//! Sensitivity and specificity of the outcome measurement.
use crate::regression::errors::InputError;
use serde::{Deserialize, Serialize};

/// Known (or assumed) accuracy of the process that recorded the outcome.
///
/// - `sensitivity = P(y* = 1 | y = 1)`
/// - `specificity = P(y* = 0 | y = 0)`
///
/// Both lie in `(0, 1]`. Values at or below `0.5` are accepted: at
/// `sensitivity + specificity = 1` the observed outcome carries no
/// information and the adjusted fit reports inference as unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMisclassification")]
pub struct Misclassification {
    sensitivity: f64,
    specificity: f64,
}

impl Misclassification {
    /// Error-free measurement.
    pub const PERFECT: Misclassification = Misclassification { sensitivity: 1.0, specificity: 1.0 };

    /// # Errors
    /// [`InputError::InvalidRate`] if either value is not finite or lies
    /// outside `(0, 1]`.
    pub fn new(sensitivity: f64, specificity: f64) -> Result<Self, InputError> {
        check_rate("sensitivity", sensitivity)?;
        check_rate("specificity", specificity)?;
        Ok(Self { sensitivity, specificity })
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn specificity(&self) -> f64 {
        self.specificity
    }

    /// `true` when both rates are exactly one.
    pub fn is_identity(&self) -> bool {
        self.sensitivity == 1.0 && self.specificity == 1.0
    }

    /// `sensitivity + specificity - 1`: the slope of `P(y* = 1)` in the true
    /// probability. Zero means pure relabeling noise.
    pub fn informativeness(&self) -> f64 {
        self.sensitivity + self.specificity - 1.0
    }

    /// `P(y* = 1 | p)` and `P(y* = 0 | p)` for true probability `p` given as
    /// the pair `(p, 1 - p)`, before clamping.
    pub fn observed_pair(&self, p: f64, one_minus_p: f64) -> (f64, f64) {
        let q1 = self.sensitivity * p + (1.0 - self.specificity) * one_minus_p;
        let q0 = (1.0 - self.sensitivity) * p + self.specificity * one_minus_p;
        (q1, q0)
    }
}

impl Default for Misclassification {
    fn default() -> Self {
        Self::PERFECT
    }
}

// Unvalidated wire form; deserialization goes through `Misclassification::new`.
#[derive(Deserialize)]
struct RawMisclassification {
    sensitivity: f64,
    specificity: f64,
}

impl TryFrom<RawMisclassification> for Misclassification {
    type Error = InputError;

    fn try_from(raw: RawMisclassification) -> Result<Self, Self::Error> {
        Misclassification::new(raw.sensitivity, raw.specificity)
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), InputError> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(InputError::InvalidRate { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Rates outside (0, 1] are rejected before any fitting.
    //
    // Given
    // -----
    // - sensitivity 0, 1.2, NaN; specificity -0.1.
    //
    // Expect
    // ------
    // - `InvalidRate` naming the offending rate.
    fn new_rejects_rates_outside_unit_interval() {
        for bad in [0.0, 1.2, f64::NAN] {
            assert!(matches!(
                Misclassification::new(bad, 0.9),
                Err(InputError::InvalidRate { name: "sensitivity", .. })
            ));
        }
        assert!(matches!(
            Misclassification::new(0.9, -0.1),
            Err(InputError::InvalidRate { name: "specificity", .. })
        ));
        assert!(Misclassification::new(1.0, 0.5).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Observed probabilities sum to one and reduce to the truth at identity.
    fn observed_pair_is_a_distribution() {
        let m = Misclassification::new(0.9, 0.8).unwrap();

        let (q1, q0) = m.observed_pair(0.3, 0.7);

        assert!((q1 - (0.27 + 0.14)).abs() < 1e-15);
        assert!((q1 + q0 - 1.0).abs() < 1e-15);
        assert_eq!(Misclassification::PERFECT.observed_pair(0.3, 0.7), (0.3, 0.7));
        assert!(Misclassification::PERFECT.is_identity());
        assert!((m.informativeness() - 0.7).abs() < 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Deserialized rates are validated like constructed ones.
    //
    // Given
    // -----
    // - TOML with sensitivity 1.5, TOML with specificity -0.2, and a valid
    //   pair (0.9, 0.8).
    //
    // Expect
    // ------
    // - Both invalid documents fail naming the offending rate; the valid one
    //   equals `Misclassification::new(0.9, 0.8)`.
    fn deserialization_rejects_invalid_rates() {
        // Act
        let high = toml::from_str::<Misclassification>("sensitivity = 1.5\nspecificity = 0.9");
        let negative =
            toml::from_str::<Misclassification>("sensitivity = 0.9\nspecificity = -0.2");
        let valid = toml::from_str::<Misclassification>("sensitivity = 0.9\nspecificity = 0.8");

        // Assert
        let high = high.unwrap_err().to_string();
        assert!(high.contains("sensitivity"), "{high}");
        let negative = negative.unwrap_err().to_string();
        assert!(negative.contains("specificity"), "{negative}");
        assert_eq!(valid.unwrap(), Misclassification::new(0.9, 0.8).unwrap());
    }
}
