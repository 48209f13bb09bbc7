//! Estimation and forecast pipeline on the undifferenced scale.
//!
//! Every call follows the same path: difference the training prefix, center
//! it, run the ARMA recursion or estimator on the stationary series, then
//! un-center and integrate back.

use log::debug;

use crate::core::ForecastResult;
use crate::error::{ForecastError, Result};
use crate::models::arima::config::ForecastConfig;
use crate::models::arima::diff::DifferencingState;
use crate::models::arima::hannan_rissanen::estimate_arma;
use crate::models::arima::model::FittedModel;
use crate::models::arima::spec::{OrderSpec, SarimaOrder};
use crate::utils::stats::{mean, rmse_window, shift, variance};

/// Recursive ARMA forecast on a centered stationary series.
///
/// Residuals are reconstructed for `max_degree..train_len`, then
/// `train_len..total_len` is forecast with future residuals set to zero.
/// Returns the `total_len - train_len` forecasts.
pub fn forecast_arma(
    spec: &OrderSpec,
    stationary: &[f64],
    train_len: usize,
    total_len: usize,
) -> Result<Vec<f64>> {
    if total_len < train_len {
        return Err(ForecastError::InvalidConfiguration(format!(
            "forecast end {} precedes training length {}",
            total_len, train_len
        )));
    }
    let start = spec.max_degree();
    if train_len < start {
        return Err(ForecastError::InsufficientData {
            needed: start,
            got: train_len,
        });
    }
    if stationary.len() < train_len {
        return Err(ForecastError::InsufficientData {
            needed: train_len,
            got: stationary.len(),
        });
    }

    let mut data = vec![0.0; total_len];
    let known = stationary.len().min(total_len);
    data[..known].copy_from_slice(&stationary[..known]);
    let mut errors = vec![0.0; total_len];

    for j in start..train_len {
        let fitted = spec.forecast_one_point(&data, &errors, j);
        errors[j] = data[j] - fitted;
    }

    let mut forecasts = Vec::with_capacity(total_len - train_len);
    for j in train_len..total_len {
        let point = spec.forecast_one_point(&data, &errors, j);
        data[j] = point;
        errors[j] = 0.0;
        forecasts.push(point);
    }
    Ok(forecasts)
}

/// A training prefix reduced to a centered stationary series.
struct Stationary {
    state: DifferencingState,
    values: Vec<f64>,
    mean: f64,
}

impl Stationary {
    fn prepare(order: &SarimaOrder, train: &[f64]) -> Result<Self> {
        let (state, mut values) = DifferencingState::differentiate(order, train)?;
        let mean = mean(&values);
        shift(&mut values, -mean);
        Ok(Self {
            state,
            values,
            mean,
        })
    }

    /// Append forecasts, un-center and integrate back to the undifferenced scale.
    fn restore(self, forecasts: Vec<f64>) -> Result<Vec<f64>> {
        let mut extended = self.values;
        extended.extend(forecasts);
        shift(&mut extended, self.mean);
        self.state.integrate(&extended)
    }
}

fn check_data_length(order: &SarimaOrder, data_len: usize, start: usize, end: usize) -> Result<()> {
    let needed = order.initial_condition_size();
    if data_len < needed || start < needed {
        return Err(ForecastError::InsufficientData {
            needed,
            got: data_len.min(start),
        });
    }
    if start > data_len {
        return Err(ForecastError::InsufficientData {
            needed: start,
            got: data_len,
        });
    }
    if end <= start {
        return Err(ForecastError::InsufficientData {
            needed: start + 1,
            got: end,
        });
    }
    Ok(())
}

/// Forecast points `start..end` of `data` using `data[..start]` as training.
///
/// The coefficients of `spec` are used as they are; the result carries the
/// variance of the centered stationary training data and collapsed bounds.
pub fn forecast_arima(
    spec: &OrderSpec,
    data: &[f64],
    start: usize,
    end: usize,
) -> Result<ForecastResult> {
    let order = spec.order();
    check_data_length(&order, data.len(), start, end)?;

    let prepared = Stationary::prepare(&order, &data[..start])?;
    let data_variance = variance(&prepared.values);
    let n = prepared.values.len();
    let forecasts = forecast_arma(spec, &prepared.values, n, n + (end - start))?;

    let mut merged = prepared.restore(forecasts)?;
    let forecast = merged.split_off(start);
    Ok(ForecastResult::new(forecast, data_variance))
}

/// Fit the coefficients of `spec` on `data[..start]`, holding out
/// `end - start` points of the stationary series for iteration scoring.
pub fn estimate_arima(
    spec: &OrderSpec,
    data: &[f64],
    start: usize,
    end: usize,
    config: &ForecastConfig,
) -> Result<FittedModel> {
    let order = spec.order();
    check_data_length(&order, data.len(), start, end)?;

    let prepared = Stationary::prepare(&order, &data[..start])?;
    let (fitted, report) = estimate_arma(&prepared.values, spec, end - start, config)?;
    Ok(FittedModel::new(fitted, data.to_vec(), start, report))
}

/// Hold out the last `floor(n · validation_fraction)` points (at least one),
/// fit on the rest and return the RMSE of the forecast over the held-out part.
pub fn validation_rmse(data: &[f64], spec: &OrderSpec, config: &ForecastConfig) -> Result<f64> {
    let n = data.len();
    let test_len = ((n as f64 * config.validation_fraction).floor() as usize).max(1);
    if test_len >= n {
        return Err(ForecastError::InsufficientData {
            needed: test_len + 1,
            got: n,
        });
    }
    let train_len = n - test_len;

    let model = estimate_arima(spec, data, train_len, n, config)?;
    let result = model.forecast(test_len)?;
    rmse_window(data, result.forecast(), train_len, 0, test_len)
}

/// Fit `spec` on the whole series and forecast `horizon` steps ahead with
/// 95% confidence bounds.
///
/// # Example
///
/// ```
/// use sarima_forecast::models::arima::OrderSpec;
///
/// let series = [2.0, 1.0, 2.0, 5.0].repeat(4);
/// let spec = OrderSpec::new(4, 1, 2, 1, 1, 0, 0).unwrap();
/// let result = sarima_forecast::forecast(&series, 3, &spec).unwrap();
/// assert_eq!(result.horizon(), 3);
/// ```
pub fn forecast(series: &[f64], horizon: usize, spec: &OrderSpec) -> Result<ForecastResult> {
    forecast_with_config(series, horizon, spec, &ForecastConfig::default())
}

/// [`forecast`] with explicit configuration.
pub fn forecast_with_config(
    series: &[f64],
    horizon: usize,
    spec: &OrderSpec,
    config: &ForecastConfig,
) -> Result<ForecastResult> {
    config.validate()?;
    if series.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if horizon == 0 {
        return Err(ForecastError::InvalidConfiguration(
            "horizon must be positive".into(),
        ));
    }

    let n = series.len();
    let rmse = validation_rmse(series, spec, config)?;
    let model = estimate_arima(spec, series, n, n + 1, config)?.with_rmse(rmse);
    let result = model.forecast_with_intervals(horizon, config.confidence_level)?;

    debug!(
        "{{\"order\": \"{}\", \"forecast_size\": {}, \"input_size\": {}, \"rmse\": {}}}",
        spec.order(),
        horizon,
        n,
        rmse
    );
    Ok(result)
}
