//! Statistical utility functions.

use crate::error::{ForecastError, Result};

/// Calculate the mean of a slice (0 for an empty slice).
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
///
/// Returns `-1.0` ("undefined") for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return -1.0;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Add `amount` to every element in place.
pub fn shift(values: &mut [f64], amount: f64) {
    for v in values.iter_mut() {
        *v += amount;
    }
}

/// RMSE between `left[i + left_offset]` and `right[i]` over `i in start..end`.
pub fn rmse_window(
    left: &[f64],
    right: &[f64],
    left_offset: usize,
    start: usize,
    end: usize,
) -> Result<f64> {
    if start >= end || right.len() < end || left.len() < end + left_offset {
        return Err(ForecastError::InvalidConfiguration(format!(
            "invalid rmse window: start={}, end={}, left={}, right={}, offset={}",
            start,
            end,
            left.len(),
            right.len(),
            left_offset
        )));
    }
    let square_sum: f64 = (start..end)
        .map(|i| {
            let err = left[i + left_offset] - right[i];
            err * err
        })
        .sum();
    Ok((square_sum / (end - start) as f64).sqrt())
}
