//! SARIMA order specification and the composed AR/MA lag operators.

use std::fmt;

use log::warn;

use crate::error::{ForecastError, Result};
use crate::models::arima::lag::{LagPolynomial, MAX_LAG_DEGREE};

/// Model order (p, d, q)(P, D, Q)\[s\].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SarimaOrder {
    /// Non-seasonal AR order.
    pub p: usize,
    /// Non-seasonal differencing order.
    pub d: usize,
    /// Non-seasonal MA order.
    pub q: usize,
    /// Seasonal AR order.
    pub cap_p: usize,
    /// Seasonal differencing order.
    pub cap_d: usize,
    /// Seasonal MA order.
    pub cap_q: usize,
    /// Seasonal period (0 for non-seasonal).
    pub s: usize,
}

impl SarimaOrder {
    /// Create a full seasonal order.
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        cap_p: usize,
        cap_d: usize,
        cap_q: usize,
        s: usize,
    ) -> Self {
        Self {
            p,
            d,
            q,
            cap_p,
            cap_d,
            cap_q,
            s,
        }
    }

    /// Create a non-seasonal ARIMA(p, d, q) order.
    pub fn non_seasonal(p: usize, d: usize, q: usize) -> Self {
        Self::new(p, d, q, 0, 0, 0, 0)
    }

    /// Seasonal differencing is applied only with a positive period.
    pub fn has_seasonal_differencing(&self) -> bool {
        self.cap_d > 0 && self.s > 0
    }

    /// Non-seasonal differencing is applied.
    pub fn has_differencing(&self) -> bool {
        self.d > 0
    }

    /// Number of leading observations consumed by differencing (`d + D*s`).
    pub fn initial_condition_size(&self) -> usize {
        self.cap_d.saturating_mul(self.s).saturating_add(self.d)
    }
}

impl fmt::Display for SarimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SARIMA({},{},{})({},{},{})[{}]",
            self.p, self.d, self.q, self.cap_p, self.cap_d, self.cap_q, self.s
        )
    }
}

/// Immutable order specification with its AR and MA operators.
///
/// Each operator is the product of a seasonal polynomial (lags `s·k`) and a
/// non-seasonal polynomial (lags `1..=order`). The parameter vector layout is
/// the AR offsets ascending followed by the MA offsets ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    order: SarimaOrder,
    ar: LagPolynomial,
    ma: LagPolynomial,
}

impl OrderSpec {
    /// Build a specification from the seven order values.
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        cap_p: usize,
        cap_d: usize,
        cap_q: usize,
        s: usize,
    ) -> Result<Self> {
        Self::from_order(SarimaOrder::new(p, d, q, cap_p, cap_d, cap_q, s))
    }

    /// Build a specification from an order.
    ///
    /// Fails with [`ForecastError::InvalidConfiguration`] when an operator
    /// degree (`p + P·s`, `q + Q·s`) or the differencing span (`d + D·s`)
    /// overflows or exceeds [`MAX_LAG_DEGREE`].
    pub fn from_order(order: SarimaOrder) -> Result<Self> {
        let span = |regular: usize, seasonal: usize| {
            seasonal
                .checked_mul(order.s)
                .and_then(|lags| lags.checked_add(regular))
                .filter(|&degree| degree <= MAX_LAG_DEGREE)
        };
        if span(order.p, order.cap_p).is_none()
            || span(order.q, order.cap_q).is_none()
            || span(order.d, order.cap_d).is_none()
        {
            return Err(ForecastError::InvalidConfiguration(format!(
                "lags of {} exceed {}",
                order, MAX_LAG_DEGREE
            )));
        }

        if order.s == 0 && (order.cap_p > 0 || order.cap_d > 0 || order.cap_q > 0) {
            warn!(
                "{}: seasonal orders given with period 0 are ignored",
                order
            );
        }

        let mut ar = merge_seasonal_with_non_seasonal(order.p, order.cap_p, order.s)?;
        let mut ma = merge_seasonal_with_non_seasonal(order.q, order.cap_q, order.s)?;
        ar.initialize_parameters(false);
        ma.initialize_parameters(false);

        Ok(Self { order, ar, ma })
    }

    /// Start a builder.
    pub fn builder() -> OrderSpecBuilder {
        OrderSpecBuilder::default()
    }

    /// The order this specification was built from.
    pub fn order(&self) -> SarimaOrder {
        self.order
    }

    /// Composed AR operator.
    pub fn ar(&self) -> &LagPolynomial {
        &self.ar
    }

    /// Composed MA operator.
    pub fn ma(&self) -> &LagPolynomial {
        &self.ma
    }

    /// Degree of the composed AR operator.
    pub fn degree_ar(&self) -> usize {
        self.ar.degree()
    }

    /// Degree of the composed MA operator.
    pub fn degree_ma(&self) -> usize {
        self.ma.degree()
    }

    /// Larger of the two operator degrees.
    pub fn max_degree(&self) -> usize {
        self.degree_ar().max(self.degree_ma())
    }

    /// Number of AR parameters.
    pub fn num_params_ar(&self) -> usize {
        self.ar.num_params()
    }

    /// Number of MA parameters.
    pub fn num_params_ma(&self) -> usize {
        self.ma.num_params()
    }

    /// Total number of estimated parameters.
    pub fn num_params(&self) -> usize {
        self.num_params_ar() + self.num_params_ma()
    }

    /// AR offsets, ascending.
    pub fn offsets_ar(&self) -> Vec<usize> {
        self.ar.offsets()
    }

    /// MA offsets, ascending.
    pub fn offsets_ma(&self) -> Vec<usize> {
        self.ma.offsets()
    }

    /// Current parameter vector: AR coefficients then MA coefficients.
    pub fn parameters(&self) -> Vec<f64> {
        let mut params = self.ar.coefficients();
        params.extend(self.ma.coefficients());
        params
    }

    /// Copy of this specification with the given parameter vector installed.
    pub fn with_parameters(&self, params: &[f64]) -> Result<Self> {
        let mut spec = self.clone();
        spec.set_parameters(params)?;
        Ok(spec)
    }

    /// Install a parameter vector laid out as AR offsets then MA offsets.
    pub(crate) fn set_parameters(&mut self, params: &[f64]) -> Result<()> {
        if params.len() != self.num_params() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.num_params(),
                got: params.len(),
            });
        }
        let (ar_params, ma_params) = params.split_at(self.num_params_ar());
        for (offset, &value) in self.ar.offsets().into_iter().zip(ar_params) {
            self.ar.set(offset, value)?;
        }
        for (offset, &value) in self.ma.offsets().into_iter().zip(ma_params) {
            self.ma.set(offset, value)?;
        }
        Ok(())
    }

    /// AR coefficients indexed by lag (index 0 is the lag-0 slot).
    pub fn ar_coefficients(&self) -> Vec<f64> {
        self.ar.flattened()
    }

    /// MA coefficients indexed by lag (index 0 is the lag-0 slot).
    pub fn ma_coefficients(&self) -> Vec<f64> {
        self.ma.flattened()
    }

    /// One-step ARMA prediction at `index` from past data and past errors.
    pub fn forecast_one_point(&self, data: &[f64], errors: &[f64], index: usize) -> f64 {
        self.ar.evaluate(data, index) + self.ma.evaluate(errors, index)
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.order.fmt(f)
    }
}

fn merge_seasonal_with_non_seasonal(
    order: usize,
    seasonal_order: usize,
    period: usize,
) -> Result<LagPolynomial> {
    let non_seasonal = LagPolynomial::non_seasonal(order)?;
    let seasonal = LagPolynomial::seasonal(seasonal_order, period)?;
    seasonal.compose(&non_seasonal)
}

/// Builder for [`OrderSpec`].
#[derive(Debug, Clone, Default)]
pub struct OrderSpecBuilder {
    order: SarimaOrder,
}

impl OrderSpecBuilder {
    /// Set the non-seasonal AR order.
    pub fn ar(mut self, p: usize) -> Self {
        self.order.p = p;
        self
    }

    /// Set the non-seasonal differencing order.
    pub fn differencing(mut self, d: usize) -> Self {
        self.order.d = d;
        self
    }

    /// Set the non-seasonal MA order.
    pub fn ma(mut self, q: usize) -> Self {
        self.order.q = q;
        self
    }

    /// Set the seasonal orders and period.
    pub fn seasonal(mut self, cap_p: usize, cap_d: usize, cap_q: usize, s: usize) -> Self {
        self.order.cap_p = cap_p;
        self.order.cap_d = cap_d;
        self.order.cap_q = cap_q;
        self.order.s = s;
        self
    }

    /// Build the specification.
    pub fn build(self) -> Result<OrderSpec> {
        OrderSpec::from_order(self.order)
    }
}
