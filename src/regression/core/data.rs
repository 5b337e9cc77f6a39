//! Validated observation sets.
use crate::regression::errors::InputError;
use ndarray::{Array1, Array2, ArrayView1, Axis, concatenate};

/// Design matrix and observed binary outcome.
///
/// Invariants (enforced by every constructor):
/// - at least one row and one column, and no more columns than rows;
/// - one outcome per row, each exactly `0.0` or `1.0`;
/// - every covariate finite.
///
/// The intercept, when wanted, is an ordinary column of ones; see
/// [`Observations::with_intercept`].
#[derive(Debug, Clone, PartialEq)]
pub struct Observations {
    design: Array2<f64>,
    outcome: Array1<f64>,
}

impl Observations {
    /// # Errors
    /// The first violated invariant, as an [`InputError`].
    pub fn new(design: Array2<f64>, outcome: Array1<f64>) -> Result<Self, InputError> {
        let (n_obs, n_coef) = design.dim();
        if n_obs == 0 || outcome.is_empty() {
            return Err(InputError::Empty);
        }
        if n_coef == 0 {
            return Err(InputError::NoCovariates);
        }
        if n_obs != outcome.len() {
            return Err(InputError::LengthMismatch { rows: n_obs, outcomes: outcome.len() });
        }
        if let Some(((row, col), &value)) = design.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(InputError::NonFiniteCovariate { row, col, value });
        }
        if let Some((index, &value)) =
            outcome.iter().enumerate().find(|(_, y)| **y != 0.0 && **y != 1.0)
        {
            return Err(InputError::InvalidOutcome { index, value });
        }
        if n_obs < n_coef {
            return Err(InputError::Underdetermined { n_obs, n_coef });
        }
        Ok(Self { design, outcome })
    }

    /// Prepend a column of ones to `covariates`.
    ///
    /// # Errors
    /// As [`Observations::new`].
    pub fn with_intercept(
        covariates: Array2<f64>, outcome: Array1<f64>,
    ) -> Result<Self, InputError> {
        let ones = Array2::<f64>::ones((covariates.nrows(), 1));
        let design = concatenate(Axis(1), &[ones.view(), covariates.view()])
            .map_err(|_| InputError::LengthMismatch { rows: covariates.nrows(), outcomes: 1 })?;
        Self::new(design, outcome)
    }

    /// Build from row vectors, e.g. parsed records.
    ///
    /// # Errors
    /// [`InputError::RaggedRow`] for rows of unequal length, then as
    /// [`Observations::new`].
    pub fn from_rows(rows: &[Vec<f64>], outcome: &[f64]) -> Result<Self, InputError> {
        let n_coef = rows.first().map_or(0, Vec::len);
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_coef) {
            return Err(InputError::RaggedRow { row, expected: n_coef, found: r.len() });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let design = Array2::from_shape_vec((rows.len(), n_coef), flat)
            .map_err(|_| InputError::NoCovariates)?;
        Self::new(design, Array1::from(outcome.to_vec()))
    }

    pub fn design(&self) -> &Array2<f64> {
        &self.design
    }

    pub fn outcome(&self) -> &Array1<f64> {
        &self.outcome
    }

    pub fn n_obs(&self) -> usize {
        self.design.nrows()
    }

    pub fn n_coef(&self) -> usize {
        self.design.ncols()
    }

    /// Linear predictor `Xβ`.
    ///
    /// # Errors
    /// [`InputError::CoefficientLength`] if `beta` has the wrong length.
    pub fn linear_predictor(&self, beta: ArrayView1<f64>) -> Result<Array1<f64>, InputError> {
        if beta.len() != self.n_coef() {
            return Err(InputError::CoefficientLength {
                expected: self.n_coef(),
                actual: beta.len(),
            });
        }
        Ok(self.design.dot(&beta))
    }

    /// Share of observed positives.
    pub fn positive_rate(&self) -> f64 {
        self.outcome.sum() / self.n_obs() as f64
    }
}
