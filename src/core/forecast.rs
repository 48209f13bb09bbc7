//! Forecast result structure holding predictions and confidence bounds.

use crate::error::{ForecastError, Result};

/// Result of a SARIMA forecast.
///
/// Created with the point forecast; the bounds equal the forecast until
/// [`ForecastResult::set_confidence_interval`] fills them in. `-1` marks an
/// undefined RMSE, variance or normalized variance.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    forecast: Vec<f64>,
    upper: Vec<f64>,
    lower: Vec<f64>,
    data_variance: f64,
    rmse: f64,
    max_normalized_variance: f64,
}

impl ForecastResult {
    /// Create a result from point predictions and the variance of the
    /// centered stationary training data.
    pub fn new(forecast: Vec<f64>, data_variance: f64) -> Self {
        Self {
            upper: forecast.clone(),
            lower: forecast.clone(),
            forecast,
            data_variance,
            rmse: -1.0,
            max_normalized_variance: -1.0,
        }
    }

    /// Point predictions.
    pub fn forecast(&self) -> &[f64] {
        &self.forecast
    }

    /// Upper confidence bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Lower confidence bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.forecast.len()
    }

    /// Variance of the centered stationary training data.
    pub fn data_variance(&self) -> f64 {
        self.data_variance
    }

    /// Validation RMSE of the model that produced this forecast.
    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    /// Set the model RMSE used for the bounds.
    pub fn set_rmse(&mut self, rmse: f64) {
        self.rmse = rmse;
    }

    /// Largest normalized variance over the horizon.
    pub fn max_normalized_variance(&self) -> f64 {
        self.max_normalized_variance
    }

    /// Normalize a variance by the data variance.
    ///
    /// `-1` if either is negative (undefined), the raw value if the data
    /// variance is near zero.
    pub fn normalized_variance(&self, v: f64) -> f64 {
        if v < -0.5 || self.data_variance < -0.5 {
            -1.0
        } else if self.data_variance < 1e-7 {
            v
        } else {
            (v / self.data_variance).abs()
        }
    }

    /// Fill the bounds as `forecast ± z · rmse · cumulative[i]`.
    ///
    /// Stores and returns the maximum normalized variance of the bound.
    pub fn set_confidence_interval(&mut self, z: f64, cumulative: &[f64]) -> Result<f64> {
        if cumulative.len() < self.forecast.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.forecast.len(),
                got: cumulative.len(),
            });
        }

        let mut max_normalized = -1.0_f64;
        for (i, &point) in self.forecast.iter().enumerate() {
            let bound = z * self.rmse * cumulative[i];
            self.upper[i] = point + bound;
            self.lower[i] = point - bound;
            let normalized = self.normalized_variance(bound * bound);
            if normalized > max_normalized {
                max_normalized = normalized;
            }
        }
        self.max_normalized_variance = max_normalized;
        Ok(max_normalized)
    }
}
