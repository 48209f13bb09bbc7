//! Forecasting models.

mod traits;

pub mod arima;

pub use arima::SARIMA;
pub use traits::{BoxedForecaster, Forecaster};
