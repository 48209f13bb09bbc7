//! Configuration for SARIMA estimation and forecasting.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{ForecastError, Result};

/// Share of the training series held out to score the fitted model.
pub const DEFAULT_VALIDATION_FRACTION: f64 = 0.15;

/// Condition-number bound used for every SPD solve in the estimators.
pub const DEFAULT_MAX_CONDITION_NUMBER: f64 = 100.0;

/// Refinement passes of the Hannan-Rissanen loop after the initial fit.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Default two-sided confidence level of the forecast bounds.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Two-sided 95% standard normal quantile.
pub const Z_95: f64 = 1.959963984540054;

/// Configuration for [`crate::forecast_with_config`] and the estimators.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastConfig {
    /// Fraction of the series held out for the validation RMSE.
    pub validation_fraction: f64,
    /// Condition-number bound for the Cholesky solves.
    pub max_condition_number: f64,
    /// Hannan-Rissanen refinement passes after the first least-squares fit.
    pub max_iterations: usize,
    /// Two-sided confidence level of the bounds.
    pub confidence_level: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            validation_fraction: DEFAULT_VALIDATION_FRACTION,
            max_condition_number: DEFAULT_MAX_CONDITION_NUMBER,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl ForecastConfig {
    /// Set the validation fraction.
    pub fn with_validation_fraction(mut self, fraction: f64) -> Self {
        self.validation_fraction = fraction;
        self
    }

    /// Set the condition-number bound.
    pub fn with_max_condition_number(mut self, bound: f64) -> Self {
        self.max_condition_number = bound;
        self
    }

    /// Set the number of refinement passes.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the confidence level.
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.validation_fraction > 0.0 && self.validation_fraction < 1.0) {
            return Err(ForecastError::InvalidConfiguration(format!(
                "validation fraction must be in (0, 1), got {}",
                self.validation_fraction
            )));
        }
        if !(self.max_condition_number > 0.0 && self.max_condition_number.is_finite()) {
            return Err(ForecastError::InvalidConfiguration(format!(
                "max condition number must be positive, got {}",
                self.max_condition_number
            )));
        }
        check_level(self.confidence_level)
    }

    /// Two-sided normal quantile for the configured confidence level.
    pub fn z_value(&self) -> Result<f64> {
        z_for_level(self.confidence_level)
    }
}

/// Two-sided standard normal quantile for `level`.
///
/// `0.95` maps exactly to [`Z_95`].
pub fn z_for_level(level: f64) -> Result<f64> {
    check_level(level)?;
    if level == DEFAULT_CONFIDENCE_LEVEL {
        return Ok(Z_95);
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| ForecastError::InvalidConfiguration(e.to_string()))?;
    Ok(normal.inverse_cdf((1.0 + level) / 2.0))
}

fn check_level(level: f64) -> Result<()> {
    if level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(ForecastError::InvalidConfiguration(format!(
            "confidence level must be in (0, 1), got {}",
            level
        )))
    }
}
