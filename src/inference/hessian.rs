//! Observed information and its inverse.
//!
//! Curvature is decomposed with `nalgebra`'s symmetric eigensolver. What
//! happens to small or negative eigenvalues is a [`HessianPolicy`] decision:
//! by default such a matrix is rejected, because inverting it would report
//! confident standard errors along directions the data do not identify.
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::numerical_stability::EIGEN_EPS,
};
use log::debug;
use nalgebra::DMatrix;
use ndarray::Array2;

/// What to do when the information matrix is only numerically (or not at
/// all) positive definite.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HessianPolicy {
    /// Fail with [`InferenceError::SingularHessian`] when
    /// `λ_min ≤ EIGEN_EPS · max(1, λ_max)`.
    #[default]
    Strict,
    /// Raise every eigenvalue below `floor · max(1, λ_max)` to that value
    /// before inverting.
    ClampEigenvalues { floor: f64 },
}

impl HessianPolicy {
    /// Validated [`HessianPolicy::ClampEigenvalues`].
    ///
    /// # Errors
    /// [`InferenceError::InvalidEigenFloor`] unless `floor` is finite and > 0.
    pub fn clamp(floor: f64) -> InferenceResult<Self> {
        if !floor.is_finite() || floor <= 0.0 {
            return Err(InferenceError::InvalidEigenFloor { floor });
        }
        Ok(HessianPolicy::ClampEigenvalues { floor })
    }
}

/// Invert an information matrix into a covariance matrix.
///
/// # Errors
/// - [`InferenceError::DimensionMismatch`] for a non-square matrix.
/// - [`InferenceError::NonFiniteInformation`] for `NaN`/`±∞` entries.
/// - [`InferenceError::SingularHessian`] under [`HessianPolicy::Strict`].
pub fn covariance_from_information(
    info: &Array2<f64>, policy: HessianPolicy,
) -> InferenceResult<Array2<f64>> {
    let dmat = fill_dmatrix(info)?;
    let k = info.nrows();
    let eigen = dmat.symmetric_eigen();
    let q = eigen.eigenvectors;
    let lambdas = eigen.eigenvalues;

    let lambda_min = lambdas.iter().copied().fold(f64::INFINITY, f64::min);
    let lambda_max = lambdas.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = lambda_max.max(1.0);

    let inverted: Vec<f64> = match policy {
        HessianPolicy::Strict => {
            if lambda_min <= EIGEN_EPS * scale {
                return Err(InferenceError::SingularHessian { min_eigenvalue: lambda_min });
            }
            lambdas.iter().map(|l| 1.0 / l).collect()
        }
        HessianPolicy::ClampEigenvalues { floor } => {
            let floor = floor * scale;
            if lambda_min < floor {
                debug!("clamping eigenvalues below {floor:e} (smallest was {lambda_min:e})");
            }
            lambdas.iter().map(|l| 1.0 / l.max(floor)).collect()
        }
    };

    let mut cov = Array2::<f64>::zeros((k, k));
    for i in 0..k {
        for j in 0..=i {
            let v: f64 = (0..k).map(|m| q[(i, m)] * q[(j, m)] * inverted[m]).sum();
            cov[[i, j]] = v;
            cov[[j, i]] = v;
        }
    }
    Ok(cov)
}

/// Sandwich covariance `J⁻¹ S J⁻¹`.
///
/// `info` and `meat` must be on the same scale (both summed over
/// observations, see [`score_outer_product`](crate::inference::score_outer_product)).
///
/// # Errors
/// As [`covariance_from_information`], plus a shape mismatch on `meat`.
pub fn robust_covariance(
    info: &Array2<f64>, meat: &Array2<f64>, policy: HessianPolicy,
) -> InferenceResult<Array2<f64>> {
    let k = info.nrows();
    if meat.dim() != (k, k) {
        return Err(InferenceError::DimensionMismatch { expected: k, found: meat.dim() });
    }
    let bread = covariance_from_information(info, policy)?;
    Ok(bread.dot(meat).dot(&bread))
}

// ---- Helper methods ----

fn fill_dmatrix(info: &Array2<f64>) -> InferenceResult<DMatrix<f64>> {
    let (rows, cols) = info.dim();
    if rows != cols || rows == 0 {
        return Err(InferenceError::DimensionMismatch { expected: rows, found: (rows, cols) });
    }
    if let Some(((row, col), &value)) = info.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFiniteInformation { row, col, value });
    }
    Ok(DMatrix::from_fn(rows, cols, |i, j| info[[i, j]]))
}
