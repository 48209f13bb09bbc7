//! Hannan-Rissanen estimation of ARMA coefficients.
//!
//! The unobserved innovations are replaced by residuals of a long AR fit
//! (Yule-Walker), then the AR and MA coefficients are refined by repeated
//! least squares on lagged data and lagged residuals. Every pass is scored on
//! a held-out tail and the best-scoring parameter vector is kept.

use log::debug;

use crate::error::{ForecastError, Result};
use crate::linalg::{DenseMatrix, DenseVector};
use crate::models::arima::config::ForecastConfig;
use crate::models::arima::lag::LagPolynomial;
use crate::models::arima::pipeline::forecast_arma;
use crate::models::arima::spec::OrderSpec;
use crate::models::arima::yule_walker::fit_yule_walker;
use crate::utils::stats::rmse_window;

/// Parameters and score of one least-squares pass.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    /// Parameter vector (AR offsets then MA offsets).
    pub parameters: Vec<f64>,
    /// RMSE over the held-out tail.
    pub validation_rmse: f64,
}

/// Trace of a Hannan-Rissanen run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstimationReport {
    iterations: Vec<IterationRecord>,
    best_iteration: Option<usize>,
}

impl EstimationReport {
    /// Every pass in order.
    pub fn iterations(&self) -> &[IterationRecord] {
        &self.iterations
    }

    /// Index of the pass whose parameters were installed.
    pub fn best_iteration(&self) -> Option<usize> {
        self.best_iteration
    }

    /// The installed pass.
    pub fn best(&self) -> Option<&IterationRecord> {
        self.best_iteration.map(|i| &self.iterations[i])
    }
}

/// Estimate the AR and MA coefficients of `spec` on centered stationary data.
///
/// The last `forecast_length` points of `data` are held out to score each
/// pass. Returns a copy of `spec` carrying the best parameters, plus the
/// per-pass trace. A specification without parameters is returned as is.
pub fn estimate_arma(
    data: &[f64],
    spec: &OrderSpec,
    forecast_length: usize,
    config: &ForecastConfig,
) -> Result<(OrderSpec, EstimationReport)> {
    if forecast_length == 0 {
        return Err(ForecastError::InvalidConfiguration(
            "held-out length must be positive".into(),
        ));
    }

    let total = data.len();
    let r = 1 + spec.max_degree();
    let needed = 2 * r + forecast_length;
    if total < needed {
        return Err(ForecastError::InsufficientData { needed, got: total });
    }
    let length = total - forecast_length;
    let size = length - r;

    let mut fitted = spec.clone();
    if spec.num_params() == 0 {
        return Ok((fitted, EstimationReport::default()));
    }

    let cond = config.max_condition_number;
    let mut errors = initial_errors(&data[..length], r, cond)?;

    let mut report = EstimationReport {
        iterations: Vec::with_capacity(config.max_iterations + 1),
        best_iteration: None,
    };

    for iteration in 0..=config.max_iterations {
        let estimated = least_squares_step(&fitted, data, &errors, r, size, cond)?;
        fitted.set_parameters(&estimated)?;

        let forecasts = forecast_arma(&fitted, data, length, total)?;
        let rmse = rmse_window(data, &forecasts, length, 0, forecast_length)?;

        let train_forecasts = forecast_arma(&fitted, data, r, total)?;
        for j in 0..size {
            errors[j + r] = data[j + r] - train_forecasts[j];
        }

        debug!(
            "hannan-rissanen {} pass {}: validation rmse {}",
            spec, iteration, rmse
        );

        let improved = match report.best() {
            None => true,
            Some(best) => rmse < best.validation_rmse,
        };
        report.iterations.push(IterationRecord {
            parameters: estimated,
            validation_rmse: rmse,
        });
        if improved {
            report.best_iteration = Some(iteration);
        }
    }

    if let Some(best) = report.best() {
        fitted.set_parameters(&best.parameters)?;
        debug!(
            "hannan-rissanen {} selected pass {:?} with rmse {}",
            spec, report.best_iteration, best.validation_rmse
        );
    }

    Ok((fitted, report))
}

/// Residual proxy from an AR(`r`) Yule-Walker fit: zero for `t < r`, then
/// `x[t] - Σ φ_k x[t-k]`.
fn initial_errors(window: &[f64], r: usize, max_condition_number: f64) -> Result<Vec<f64>> {
    let phi = fit_yule_walker(window, r, max_condition_number)?;
    let mut ar = LagPolynomial::non_seasonal(r)?;
    ar.initialize_parameters(false);
    for (j, &coeff) in phi.iter().enumerate() {
        ar.set(j + 1, coeff)?;
    }

    let mut errors = vec![0.0; window.len()];
    for t in r..window.len() {
        errors[t] = window[t] - ar.evaluate(window, t);
    }
    Ok(errors)
}

/// Solve `(Z Zᵗ) θ = Z y` where the rows of `Z` are the series lagged by
/// each AR offset and the residuals lagged by each MA offset, and `y` is the
/// series from `r` on.
fn least_squares_step(
    spec: &OrderSpec,
    data: &[f64],
    errors: &[f64],
    r: usize,
    size: usize,
    max_condition_number: f64,
) -> Result<Vec<f64>> {
    let mut rows = Vec::with_capacity(spec.num_params());
    for k in spec.offsets_ar() {
        rows.push(data[r - k..r - k + size].to_vec());
    }
    for k in spec.offsets_ma() {
        rows.push(errors[r - k..r - k + size].to_vec());
    }

    let z = DenseMatrix::from_rows(rows)?;
    let y = DenseVector::from_vec(data[r..r + size].to_vec())?;
    let zy = z.times_vector(&y)?;
    let mut zzt = z.gram();
    Ok(zzt.solve_spd(&zy, Some(max_condition_number))?.into_vec())
}
