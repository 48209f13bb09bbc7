//! Differencing and integration for SARIMA models.
//!
//! Differencing at period `m` maps `x` to `x[k+m] - x[k]` and records the
//! first `m` values of its input as the initial condition of that level, so
//! integration can rebuild the input exactly. Seasonal levels are applied
//! first, then non-seasonal ones; integration walks the levels in reverse.

use crate::error::{ForecastError, Result};
use crate::models::arima::spec::SarimaOrder;

/// Difference `src` once at the given period.
///
/// Returns `(initial, differenced)` where `initial` holds the first `period`
/// values of `src`.
pub fn difference_step(src: &[f64], period: usize) -> Result<(Vec<f64>, Vec<f64>)> {
    if period == 0 {
        return Err(ForecastError::InvalidConfiguration(
            "differencing period must be positive".into(),
        ));
    }
    if src.len() <= period {
        return Err(ForecastError::InsufficientData {
            needed: period + 1,
            got: src.len(),
        });
    }

    let initial = src[..period].to_vec();
    let differenced = src
        .iter()
        .skip(period)
        .zip(src.iter())
        .map(|(curr, prev)| curr - prev)
        .collect();
    Ok((initial, differenced))
}

/// Invert one differencing step using its recorded initial condition.
///
/// The output is `period` values longer than `src`. Any `src` length is
/// accepted, including one not longer than `period`.
pub fn integrate_step(src: &[f64], initial: &[f64], period: usize) -> Result<Vec<f64>> {
    if period == 0 || initial.len() != period {
        return Err(ForecastError::InvalidConfiguration(format!(
            "initial condition of size {} does not match period {}",
            initial.len(),
            period
        )));
    }

    let mut result = Vec::with_capacity(src.len() + period);
    result.extend_from_slice(initial);
    for (k, &diff) in src.iter().enumerate() {
        let value = result[k] + diff;
        result.push(value);
    }
    Ok(result)
}

/// One recorded differencing level.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceLevel {
    /// Lag used at this level (`s` for seasonal, 1 otherwise).
    pub period: usize,
    /// First `period` values of this level's input.
    pub initial: Vec<f64>,
}

/// Per-call differencing state: the initial conditions of every level in
/// the order the levels were applied.
///
/// Kept separate from [`crate::models::arima::OrderSpec`] so that concurrent
/// estimate and forecast calls never share buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DifferencingState {
    levels: Vec<DifferenceLevel>,
}

impl DifferencingState {
    /// Difference `series` according to `order`: `D` seasonal levels at
    /// period `s` (only when `s > 0`), then `d` non-seasonal levels.
    ///
    /// Returns the recorded state and the stationary (un-centered) series.
    pub fn differentiate(order: &SarimaOrder, series: &[f64]) -> Result<(Self, Vec<f64>)> {
        let mut state = Self::default();
        let mut current = series.to_vec();

        if order.has_seasonal_differencing() {
            for _ in 0..order.cap_d {
                current = state.push_level(&current, order.s)?;
            }
        }
        for _ in 0..order.d {
            current = state.push_level(&current, 1)?;
        }

        Ok((state, current))
    }

    fn push_level(&mut self, current: &[f64], period: usize) -> Result<Vec<f64>> {
        let (initial, next) = difference_step(current, period)?;
        self.levels.push(DifferenceLevel { period, initial });
        Ok(next)
    }

    /// Undo every recorded level, last applied first.
    pub fn integrate(&self, stationary: &[f64]) -> Result<Vec<f64>> {
        let mut current = stationary.to_vec();
        for level in self.levels.iter().rev() {
            current = integrate_step(&current, &level.initial, level.period)?;
        }
        Ok(current)
    }

    /// Recorded levels in application order.
    pub fn levels(&self) -> &[DifferenceLevel] {
        &self.levels
    }

    /// Total number of observations consumed by differencing.
    pub fn consumed(&self) -> usize {
        self.levels.iter().map(|l| l.period).sum()
    }
}
