//! Error types for the sarima-forecast library.

use thiserror::Error;

/// Result type alias for estimation and forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during estimation and forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Malformed order, size or configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid argument passed to an estimator.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dimension mismatch between vectors and matrices.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Lag offset that is not part of a polynomial's parameter set.
    #[error("lag offset {offset} is not a parameter of this polynomial")]
    InvalidOffset { offset: usize },

    /// Cholesky factorization hit an exact zero pivot with no condition bound.
    #[error("singular matrix: zero pivot without a condition number bound")]
    SingularMatrix,

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = ForecastError::InsufficientData { needed: 10, got: 5 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 10, got 5"
        );

        let err = ForecastError::InvalidConfiguration("horizon must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: horizon must be positive"
        );

        let err = ForecastError::InvalidOffset { offset: 3 };
        assert_eq!(
            err.to_string(),
            "lag offset 3 is not a parameter of this polynomial"
        );

        let err = ForecastError::SingularMatrix;
        assert_eq!(
            err.to_string(),
            "singular matrix: zero pivot without a condition number bound"
        );

        let err = ForecastError::FitRequired;
        assert_eq!(err.to_string(), "model must be fitted before prediction");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::IndexOutOfBounds { index: 4, size: 2 };
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
