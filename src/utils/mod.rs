//! Utility functions for forecasting models.

pub mod stats;

pub use stats::{mean, rmse_window, shift, variance};
