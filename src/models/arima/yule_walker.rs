//! Yule-Walker AR estimation.

use crate::error::{ForecastError, Result};
use crate::linalg::{DenseMatrix, DenseVector};

/// Biased sample autocovariances `ρ[0..=max_lag]` (divided by `N`, no
/// mean removal; the estimators work on centered data).
pub fn autocovariances(data: &[f64], max_lag: usize) -> Vec<f64> {
    let n = data.len();
    (0..=max_lag)
        .map(|lag| {
            if lag >= n {
                return 0.0;
            }
            let sum: f64 = data[..n - lag]
                .iter()
                .zip(&data[lag..])
                .map(|(a, b)| a * b)
                .sum();
            sum / n as f64
        })
        .collect()
}

/// Fit an AR(`order`) model by solving the Yule-Walker equations.
///
/// Returns the lag-1..=`order` coefficients. The Toeplitz system is solved
/// with the given condition-number bound.
pub fn fit_yule_walker(data: &[f64], order: usize, max_condition_number: f64) -> Result<Vec<f64>> {
    if data.is_empty() || order < 1 {
        return Err(ForecastError::InvalidParameter(format!(
            "yule-walker needs data and order >= 1, got length {} and order {}",
            data.len(),
            order
        )));
    }

    let rho = autocovariances(data, order);
    let mut toeplitz = DenseMatrix::toeplitz(&rho[..order])?;
    let rhs = DenseVector::from_vec(rho[1..].to_vec())?;
    let phi = toeplitz.solve_spd(&rhs, Some(max_condition_number))?;
    Ok(phi.into_vec())
}
