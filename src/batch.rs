//! Rayon-based parallel forecasting of many series with one specification.
//!
//! Each series is fitted independently; failures are reported per series.

use rayon::prelude::*;

use crate::core::ForecastResult;
use crate::error::Result;
use crate::models::arima::{forecast_with_config, ForecastConfig, OrderSpec};

/// Forecast every series in parallel with the default configuration.
pub fn forecast_batch(
    series: &[Vec<f64>],
    horizon: usize,
    spec: &OrderSpec,
) -> Vec<Result<ForecastResult>> {
    forecast_batch_with_config(series, horizon, spec, &ForecastConfig::default())
}

/// Forecast every series in parallel.
///
/// `result[i]` corresponds to `series[i]`.
pub fn forecast_batch_with_config(
    series: &[Vec<f64>],
    horizon: usize,
    spec: &OrderSpec,
    config: &ForecastConfig,
) -> Vec<Result<ForecastResult>> {
    series
        .par_iter()
        .map(|values| forecast_with_config(values, horizon, spec, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;

    #[test]
    fn batch_matches_sequential() {
        let spec = OrderSpec::new(1, 1, 1, 0, 0, 0, 0).unwrap();
        let series: Vec<Vec<f64>> = (0..4)
            .map(|k| (0..30).map(|i| (i * (k + 2) % 7) as f64 + i as f64).collect())
            .collect();

        let batch = forecast_batch(&series, 5, &spec);
        assert_eq!(batch.len(), 4);
        for (values, result) in series.iter().zip(&batch) {
            let sequential = crate::forecast(values, 5, &spec);
            assert_eq!(result, &sequential);
        }
    }

    #[test]
    fn failures_stay_per_series() {
        let spec = OrderSpec::new(1, 0, 0, 0, 0, 0, 0).unwrap();
        let series = vec![vec![1.0; 30], vec![], vec![2.0, 1.0]];
        let results = forecast_batch(&series, 3, &spec);
        assert!(results[0].is_ok());
        assert_eq!(results[1], Err(ForecastError::EmptyData));
        assert!(matches!(
            results[2],
            Err(ForecastError::InsufficientData { .. })
        ));
    }
}
