//! Forecaster trait defining the common interface for models.

use crate::core::ForecastResult;
use crate::error::Result;

/// Common interface for forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to a series of observations.
    fn fit(&mut self, series: &[f64]) -> Result<()>;

    /// Generate point predictions for the specified horizon.
    fn predict(&self, horizon: usize) -> Result<ForecastResult>;

    /// Generate predictions with confidence intervals.
    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<ForecastResult> {
        // Default implementation just returns point predictions
        let _ = level;
        self.predict(horizon)
    }

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool;
}

/// Type alias for boxed forecaster trait objects.
///
/// # Example
///
/// ```
/// use sarima_forecast::models::arima::SARIMA;
/// use sarima_forecast::models::{BoxedForecaster, Forecaster};
///
/// let model: BoxedForecaster = Box::new(SARIMA::from_order(1, 1, 1, 0, 0, 0, 0).unwrap());
/// assert_eq!(model.name(), "SARIMA");
/// assert!(!model.is_fitted());
/// ```
pub type BoxedForecaster = Box<dyn Forecaster>;
