//! Sparse lag (backshift) polynomials for AR and MA operators.

use crate::error::{ForecastError, Result};

/// Largest lag a polynomial may reach.
pub const MAX_LAG_DEGREE: usize = 1 << 20;

fn checked_degree(degree: Option<usize>) -> Result<usize> {
    match degree {
        Some(degree) if degree <= MAX_LAG_DEGREE => Ok(degree),
        _ => Err(ForecastError::InvalidConfiguration(format!(
            "lag polynomial degree exceeds {}",
            MAX_LAG_DEGREE
        ))),
    }
}

/// Polynomial in the backshift operator `B` over lags `0..=degree`.
///
/// Structure and coefficients are kept apart: the set of active lags is
/// edited first (construction, [`LagPolynomial::compose`]), then frozen by
/// [`LagPolynomial::initialize_parameters`] into an ascending list of
/// `(offset, coefficient)` terms. Lag 0 is always structurally active and is
/// left out of the terms unless explicitly requested.
#[derive(Debug, Clone, PartialEq)]
pub struct LagPolynomial {
    degree: usize,
    active: Vec<bool>,
    terms: Vec<(usize, f64)>,
}

impl LagPolynomial {
    /// Polynomial of the given degree with every lag set to `active`
    /// (lag 0 is always active).
    pub fn new(degree: usize, active: bool) -> Result<Self> {
        let degree = checked_degree(Some(degree))?;
        let mut flags = vec![active; degree + 1];
        flags[0] = true;
        Ok(Self {
            degree,
            active: flags,
            terms: Vec::new(),
        })
    }

    /// Dense non-seasonal polynomial with lags `1..=order` active.
    pub fn non_seasonal(order: usize) -> Result<Self> {
        Self::new(order, true)
    }

    /// Seasonal polynomial with lags `s * period` active for `s in 1..=order`.
    pub fn seasonal(order: usize, period: usize) -> Result<Self> {
        let degree = checked_degree(order.checked_mul(period))?;
        let mut poly = Self::new(degree, false)?;
        for s in 1..=order {
            poly.active[s * period] = true;
        }
        Ok(poly)
    }

    /// Maximum lag.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Whether `lag` is structurally active.
    pub fn is_active(&self, lag: usize) -> bool {
        self.active.get(lag).copied().unwrap_or(false)
    }

    /// Enable or disable a lag. Lag 0 stays active.
    pub fn set_active(&mut self, lag: usize, enable: bool) -> Result<()> {
        if lag > self.degree {
            return Err(ForecastError::IndexOutOfBounds {
                index: lag,
                size: self.degree + 1,
            });
        }
        if lag > 0 {
            self.active[lag] = enable;
        }
        Ok(())
    }

    /// Product of two backshift operators.
    ///
    /// A lag `j + k` is active in the result when `j` is active here and `k`
    /// is active in `other`. Coefficients of the result are not initialized.
    pub fn compose(&self, other: &LagPolynomial) -> Result<LagPolynomial> {
        let degree = checked_degree(self.degree.checked_add(other.degree))?;
        let mut active = vec![false; degree + 1];
        for (j, _) in self.active.iter().enumerate().filter(|&(_, &on)| on) {
            for (k, _) in other.active.iter().enumerate().filter(|&(_, &on)| on) {
                active[j + k] = true;
            }
        }
        Ok(LagPolynomial {
            degree,
            active,
            terms: Vec::new(),
        })
    }

    /// Freeze the active lags into a zero-initialized parameter list in
    /// ascending offset order.
    pub fn initialize_parameters(&mut self, include_zero_lag: bool) {
        let start = if include_zero_lag { 0 } else { 1 };
        self.terms = (start..=self.degree)
            .filter(|&lag| self.active[lag])
            .map(|lag| (lag, 0.0))
            .collect();
    }

    /// Number of frozen parameters.
    pub fn num_params(&self) -> usize {
        self.terms.len()
    }

    /// Frozen parameter offsets, ascending.
    pub fn offsets(&self) -> Vec<usize> {
        self.terms.iter().map(|&(offset, _)| offset).collect()
    }

    /// Coefficients in offset order.
    pub fn coefficients(&self) -> Vec<f64> {
        self.terms.iter().map(|&(_, coeff)| coeff).collect()
    }

    /// Largest frozen offset (0 when there are no parameters).
    pub fn max_offset(&self) -> usize {
        self.terms.last().map(|&(offset, _)| offset).unwrap_or(0)
    }

    /// Coefficient at lag `offset`.
    pub fn get(&self, offset: usize) -> Result<f64> {
        self.terms
            .iter()
            .find(|&&(o, _)| o == offset)
            .map(|&(_, coeff)| coeff)
            .ok_or(ForecastError::InvalidOffset { offset })
    }

    /// Set the coefficient at lag `offset`.
    pub fn set(&mut self, offset: usize, value: f64) -> Result<()> {
        let term = self
            .terms
            .iter_mut()
            .find(|(o, _)| *o == offset)
            .ok_or(ForecastError::InvalidOffset { offset })?;
        term.1 = value;
        Ok(())
    }

    /// Coefficients laid out densely by lag: index `k` holds the lag-`k`
    /// coefficient, up to the largest frozen offset. Empty when there are no
    /// parameters.
    pub fn flattened(&self) -> Vec<f64> {
        if self.terms.is_empty() {
            return Vec::new();
        }
        let mut dense = vec![0.0; self.max_offset() + 1];
        for &(offset, coeff) in &self.terms {
            dense[offset] = coeff;
        }
        dense
    }

    /// `Σ coeff · series[index - offset]` over the frozen terms.
    ///
    /// The caller guarantees `index >= max_offset()`.
    pub fn evaluate(&self, series: &[f64], index: usize) -> f64 {
        self.terms
            .iter()
            .map(|&(offset, coeff)| series[index - offset] * coeff)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn non_seasonal_offsets() {
        let mut poly = LagPolynomial::non_seasonal(3).unwrap();
        poly.initialize_parameters(false);
        assert_eq!(poly.degree(), 3);
        assert_eq!(poly.offsets(), vec![1, 2, 3]);
        assert_eq!(poly.coefficients(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_lag_only_on_request() {
        let mut poly = LagPolynomial::non_seasonal(2).unwrap();
        poly.initialize_parameters(true);
        assert_eq!(poly.offsets(), vec![0, 1, 2]);

        let mut empty = LagPolynomial::non_seasonal(0).unwrap();
        empty.initialize_parameters(false);
        assert_eq!(empty.num_params(), 0);
        assert!(empty.flattened().is_empty());
        assert!(empty.is_active(0));
    }

    #[test]
    fn seasonal_offsets() {
        let mut poly = LagPolynomial::seasonal(2, 4).unwrap();
        poly.initialize_parameters(false);
        assert_eq!(poly.degree(), 8);
        assert_eq!(poly.offsets(), vec![4, 8]);
    }

    #[test]
    fn compose_unions_pairwise_sums() {
        // (1 + B + B^2)(1 + B^4) -> lags {0,1,2,4,5,6}
        let non_seasonal = LagPolynomial::non_seasonal(2).unwrap();
        let seasonal = LagPolynomial::seasonal(1, 4).unwrap();
        let mut merged = seasonal.compose(&non_seasonal).unwrap();
        merged.initialize_parameters(false);
        assert_eq!(merged.degree(), 6);
        assert_eq!(merged.offsets(), vec![1, 2, 4, 5, 6]);
        assert!(!merged.is_active(3));
    }

    #[test]
    fn compose_with_zero_period_is_identity() {
        let non_seasonal = LagPolynomial::non_seasonal(4).unwrap();
        let seasonal = LagPolynomial::seasonal(1, 0).unwrap();
        let mut merged = seasonal.compose(&non_seasonal).unwrap();
        merged.initialize_parameters(false);
        assert_eq!(merged.offsets(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn get_set_by_offset() {
        let mut poly = LagPolynomial::seasonal(1, 3)
            .unwrap()
            .compose(&LagPolynomial::non_seasonal(1).unwrap())
            .unwrap();
        poly.initialize_parameters(false);
        poly.set(3, 0.25).unwrap();
        assert_relative_eq!(poly.get(3).unwrap(), 0.25);
        assert_eq!(poly.get(2), Err(ForecastError::InvalidOffset { offset: 2 }));
        assert_eq!(
            poly.set(0, 1.0),
            Err(ForecastError::InvalidOffset { offset: 0 })
        );
    }

    #[test]
    fn set_active_bounds() {
        let mut poly = LagPolynomial::new(3, false).unwrap();
        poly.set_active(2, true).unwrap();
        poly.set_active(0, false).unwrap();
        assert!(poly.is_active(0));
        assert!(poly.is_active(2));
        assert!(matches!(
            poly.set_active(4, true),
            Err(ForecastError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn flattened_by_lag() {
        let mut poly = LagPolynomial::seasonal(1, 3).unwrap();
        poly.initialize_parameters(false);
        poly.set(3, -0.5).unwrap();
        assert_eq!(poly.flattened(), vec![0.0, 0.0, 0.0, -0.5]);
    }

    #[test]
    fn evaluate_linear_combination() {
        let mut poly = LagPolynomial::non_seasonal(2).unwrap();
        poly.initialize_parameters(false);
        poly.set(1, 0.5).unwrap();
        poly.set(2, 0.25).unwrap();
        let series = [4.0, 2.0, 10.0];
        // 0.5 * series[1] + 0.25 * series[0]
        assert_relative_eq!(poly.evaluate(&series, 2), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn oversized_degrees_rejected() {
        assert!(matches!(
            LagPolynomial::non_seasonal(usize::MAX),
            Err(ForecastError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            LagPolynomial::seasonal(2, usize::MAX),
            Err(ForecastError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            LagPolynomial::new(MAX_LAG_DEGREE + 1, false),
            Err(ForecastError::InvalidConfiguration(_))
        ));

        let wide = LagPolynomial::new(MAX_LAG_DEGREE, false).unwrap();
        assert!(matches!(
            wide.compose(&LagPolynomial::non_seasonal(1).unwrap()),
            Err(ForecastError::InvalidConfiguration(_))
        ));
    }
}
