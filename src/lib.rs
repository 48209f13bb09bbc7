//! # sarima-forecast
//!
//! Seasonal ARIMA forecasting for univariate series.
//!
//! Models are specified as SARIMA(p,d,q)(P,D,Q)\[s\], differenced to a
//! stationary series, estimated with the Hannan-Rissanen procedure and
//! forecast recursively. Confidence bounds come from the MA(∞) expansion
//! of the fitted ARMA, scaled by a validation RMSE.
//!
//! ```
//! use sarima_forecast::models::arima::OrderSpec;
//!
//! let series = [2.0, 1.0, 2.0, 5.0].repeat(4);
//! let spec = OrderSpec::builder().ar(4).differencing(1).ma(2).build().unwrap();
//! let result = sarima_forecast::forecast(&series, 4, &spec).unwrap();
//! assert_eq!(result.forecast().len(), 4);
//! ```

// Allow some clippy warnings for cleaner code in specific cases
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod batch;
pub mod core;
pub mod error;
pub mod linalg;
pub mod models;
pub mod utils;

pub use error::{ForecastError, Result};
pub use models::arima::{forecast, forecast_with_config};

pub mod prelude {
    pub use crate::batch::forecast_batch;
    pub use crate::core::ForecastResult;
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::arima::{ForecastConfig, OrderSpec, SarimaOrder, SARIMA};
    pub use crate::models::Forecaster;
    pub use crate::{forecast, forecast_with_config};
}
