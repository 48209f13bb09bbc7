//! Fitted SARIMA model and the [`Forecaster`] implementation.

use log::debug;

use crate::core::ForecastResult;
use crate::error::{ForecastError, Result};
use crate::models::arima::config::{z_for_level, ForecastConfig};
use crate::models::arima::hannan_rissanen::EstimationReport;
use crate::models::arima::interval::apply_confidence_interval;
use crate::models::arima::pipeline::{estimate_arima, forecast_arima, validation_rmse};
use crate::models::arima::spec::{OrderSpec, SarimaOrder};
use crate::models::traits::Forecaster;

/// An order specification with estimated coefficients, bound to the series
/// it was fitted on.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    spec: OrderSpec,
    data: Vec<f64>,
    train_len: usize,
    rmse: f64,
    report: EstimationReport,
}

impl FittedModel {
    pub(crate) fn new(
        spec: OrderSpec,
        data: Vec<f64>,
        train_len: usize,
        report: EstimationReport,
    ) -> Self {
        Self {
            spec,
            data,
            train_len,
            rmse: -1.0,
            report,
        }
    }

    /// Attach a validation RMSE, used to scale confidence bounds.
    pub fn with_rmse(mut self, rmse: f64) -> Self {
        self.rmse = rmse;
        self
    }

    /// Fitted specification.
    pub fn spec(&self) -> &OrderSpec {
        &self.spec
    }

    pub fn order(&self) -> SarimaOrder {
        self.spec.order()
    }

    /// Original (undifferenced) series.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Length of the training prefix; forecasts start right after it.
    pub fn train_len(&self) -> usize {
        self.train_len
    }

    /// Validation RMSE, `-1` if none was attached.
    pub fn rmse(&self) -> f64 {
        self.rmse
    }

    /// Per-pass trace of the estimator.
    pub fn report(&self) -> &EstimationReport {
        &self.report
    }

    pub fn parameters(&self) -> Vec<f64> {
        self.spec.parameters()
    }

    /// AR coefficients indexed by lag.
    pub fn ar_coefficients(&self) -> Vec<f64> {
        self.spec.ar_coefficients()
    }

    /// MA coefficients indexed by lag.
    pub fn ma_coefficients(&self) -> Vec<f64> {
        self.spec.ma_coefficients()
    }

    /// Point forecast of the `horizon` steps after the training prefix.
    pub fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        let end = self.train_len + horizon;
        let mut result = forecast_arima(&self.spec, &self.data, self.train_len, end)?;
        result.set_rmse(self.rmse);
        Ok(result)
    }

    /// Point forecast with two-sided bounds at confidence `level`.
    pub fn forecast_with_intervals(&self, horizon: usize, level: f64) -> Result<ForecastResult> {
        let z = z_for_level(level)?;
        let mut result = self.forecast(horizon)?;
        apply_confidence_interval(&mut result, &self.spec, z)?;
        Ok(result)
    }
}

/// Seasonal ARIMA forecaster estimated by Hannan-Rissanen.
///
/// # Example
///
/// ```
/// use sarima_forecast::models::arima::SARIMA;
/// use sarima_forecast::models::Forecaster;
///
/// let series: Vec<f64> = (0..48)
///     .map(|i| 10.0 + (i % 12) as f64 + 0.1 * i as f64)
///     .collect();
///
/// let mut model = SARIMA::from_order(1, 0, 0, 0, 1, 0, 12).unwrap();
/// model.fit(&series).unwrap();
/// let result = model.predict_with_intervals(12, 0.9).unwrap();
/// assert_eq!(result.horizon(), 12);
/// ```
#[derive(Debug, Clone)]
pub struct SARIMA {
    spec: OrderSpec,
    config: ForecastConfig,
    model: Option<FittedModel>,
}

impl SARIMA {
    /// Create an unfitted forecaster with default configuration.
    pub fn new(spec: OrderSpec) -> Self {
        Self::with_config(spec, ForecastConfig::default())
    }

    pub fn with_config(spec: OrderSpec, config: ForecastConfig) -> Self {
        Self {
            spec,
            config,
            model: None,
        }
    }

    /// Create from the seven order values.
    pub fn from_order(
        p: usize,
        d: usize,
        q: usize,
        cap_p: usize,
        cap_d: usize,
        cap_q: usize,
        s: usize,
    ) -> Result<Self> {
        Ok(Self::new(OrderSpec::new(p, d, q, cap_p, cap_d, cap_q, s)?))
    }

    /// Unfitted specification.
    pub fn spec(&self) -> &OrderSpec {
        &self.spec
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Fitted model, if any.
    pub fn model(&self) -> Option<&FittedModel> {
        self.model.as_ref()
    }

    fn fitted(&self, horizon: usize) -> Result<&FittedModel> {
        let model = self.model.as_ref().ok_or(ForecastError::FitRequired)?;
        if horizon == 0 {
            return Err(ForecastError::InvalidConfiguration(
                "horizon must be positive".into(),
            ));
        }
        Ok(model)
    }
}

impl Forecaster for SARIMA {
    fn fit(&mut self, series: &[f64]) -> Result<()> {
        self.config.validate()?;
        if series.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let n = series.len();
        let rmse = validation_rmse(series, &self.spec, &self.config)?;
        let model = estimate_arima(&self.spec, series, n, n + 1, &self.config)?.with_rmse(rmse);
        debug!(
            "fitted {} on {} points: parameters {:?}, rmse {}",
            self.spec,
            n,
            model.parameters(),
            rmse
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<ForecastResult> {
        self.fitted(horizon)?.forecast(horizon)
    }

    fn predict_with_intervals(&self, horizon: usize, level: f64) -> Result<ForecastResult> {
        self.fitted(horizon)?.forecast_with_intervals(horizon, level)
    }

    fn name(&self) -> &str {
        "SARIMA"
    }

    fn is_fitted(&self) -> bool {
        self.model.is_some()
    }
}
