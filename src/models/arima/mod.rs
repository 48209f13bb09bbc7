//! Seasonal ARIMA models estimated by Hannan-Rissanen.
//!
//! This module provides:
//! - Sparse lag polynomials and composed SARIMA(p,d,q)(P,D,Q)\[s\] operators
//! - Differencing and integration with recorded initial conditions
//! - Yule-Walker and Hannan-Rissanen estimation
//! - Recursive forecasting with ψ-weight confidence intervals

mod config;
mod diff;
mod hannan_rissanen;
mod interval;
mod lag;
mod model;
mod pipeline;
mod spec;
mod yule_walker;

pub use config::{
    z_for_level, ForecastConfig, DEFAULT_CONFIDENCE_LEVEL, DEFAULT_MAX_CONDITION_NUMBER,
    DEFAULT_MAX_ITERATIONS, DEFAULT_VALIDATION_FRACTION, Z_95,
};
pub use diff::{difference_step, integrate_step, DifferenceLevel, DifferencingState};
pub use hannan_rissanen::{estimate_arma, EstimationReport, IterationRecord};
pub use interval::{apply_confidence_interval, arma_to_ma, cumulative_sqrt_energy};
pub use lag::LagPolynomial;
pub use model::{FittedModel, SARIMA};
pub use pipeline::{
    estimate_arima, forecast, forecast_arima, forecast_arma, forecast_with_config,
    validation_rmse,
};
pub use spec::{OrderSpec, OrderSpecBuilder, SarimaOrder};
pub use yule_walker::{autocovariances, fit_yule_walker};
