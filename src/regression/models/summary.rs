//! Coefficient tables.
use crate::inference::WaldInference;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// One row of a fitted-coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    /// `intercept` for column 0, `x1`, `x2`, … after it.
    pub name: String,
    pub estimate: f64,
    pub std_error: Option<f64>,
    pub z_stat: Option<f64>,
    pub p_value: Option<f64>,
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
    pub is_intercept: bool,
}

impl Coefficient {
    pub fn new(name: impl Into<String>, estimate: f64) -> Self {
        Self {
            name: name.into(),
            estimate,
            std_error: None,
            z_stat: None,
            p_value: None,
            ci_lower: None,
            ci_upper: None,
            is_intercept: false,
        }
    }

    pub fn with_inference(mut self, inference: &WaldInference, j: usize) -> Self {
        self.std_error = Some(inference.std_errors[j]);
        self.z_stat = Some(inference.z_stats[j]);
        self.p_value = Some(inference.p_values[j]);
        self.ci_lower = Some(inference.ci_lower[j]);
        self.ci_upper = Some(inference.ci_upper[j]);
        self
    }

    pub fn as_intercept(mut self) -> Self {
        self.is_intercept = true;
        self
    }
}

/// Table for a design whose first column is the intercept. Inference
/// columns stay `None` when `inference` is unavailable.
pub fn coefficient_table(
    estimates: &Array1<f64>, inference: Option<&WaldInference>,
) -> Vec<Coefficient> {
    estimates
        .iter()
        .enumerate()
        .map(|(j, &estimate)| {
            let coef = if j == 0 {
                Coefficient::new("intercept", estimate).as_intercept()
            } else {
                Coefficient::new(format!("x{j}"), estimate)
            };
            match inference {
                Some(inf) => coef.with_inference(inf, j),
                None => coef,
            }
        })
        .collect()
}
