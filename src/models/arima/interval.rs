//! Forecast confidence intervals from the MA(∞) expansion of a fitted ARMA.

use crate::core::ForecastResult;
use crate::error::Result;
use crate::models::arima::spec::OrderSpec;

/// ψ-weights of the MA(∞) representation, `lag_max` of them.
///
/// `ar[j]` is the lag-`j+1` AR coefficient and `ma[i]` the lag-`i+1` MA
/// coefficient. The result starts with `ψ0 = 1`; each following weight is
/// `ma[i] + Σ_{j < min(i+1, p)} ar[j] · ψ_{i-j}` accumulated over `j`.
pub fn arma_to_ma(ar: &[f64], ma: &[f64], lag_max: usize) -> Vec<f64> {
    if lag_max == 0 {
        return Vec::new();
    }

    // psi[i] holds ψ_{i+1}
    let mut psi = vec![0.0; lag_max];
    for i in 0..lag_max {
        let mut tmp = ma.get(i).copied().unwrap_or(0.0);
        for j in 0..(i + 1).min(ar.len()) {
            let prev = if i > j { psi[i - j - 1] } else { 1.0 };
            tmp += ar[j] * prev;
        }
        psi[i] = tmp;
    }

    let mut weights = Vec::with_capacity(lag_max);
    weights.push(1.0);
    weights.extend_from_slice(&psi[..lag_max - 1]);
    weights
}

/// Running `sqrt(Σ_{k<=i} ψ_k²)` for every `i`.
pub fn cumulative_sqrt_energy(weights: &[f64]) -> Vec<f64> {
    weights
        .iter()
        .scan(0.0, |energy, w| {
            *energy += w * w;
            Some(energy.sqrt())
        })
        .collect()
}

/// Populate the bounds of `result` from the fitted coefficients of `spec`.
///
/// Returns the maximum normalized variance over the horizon.
pub fn apply_confidence_interval(
    result: &mut ForecastResult,
    spec: &OrderSpec,
    z: f64,
) -> Result<f64> {
    let ar = lag_one_onwards(spec.ar_coefficients());
    let ma = lag_one_onwards(spec.ma_coefficients());
    let weights = arma_to_ma(&ar, &ma, result.horizon());
    let cumulative = cumulative_sqrt_energy(&weights);
    result.set_confidence_interval(z, &cumulative)
}

fn lag_one_onwards(mut by_lag: Vec<f64>) -> Vec<f64> {
    if by_lag.is_empty() {
        return by_lag;
    }
    by_lag.remove(0);
    by_lag
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_without_coefficients() {
        assert_eq!(arma_to_ma(&[], &[], 5), vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(arma_to_ma(&[], &[], 0).is_empty());
    }

    #[test]
    fn ar1_weights_are_powers() {
        let weights = arma_to_ma(&[0.5], &[], 5);
        let expected = [1.0, 0.5, 0.25, 0.125, 0.0625];
        for (w, e) in weights.iter().zip(expected.iter()) {
            assert_relative_eq!(*w, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn ma_only_weights_are_coefficients() {
        let weights = arma_to_ma(&[], &[0.4, -0.2], 4);
        assert_eq!(weights, vec![1.0, 0.4, -0.2, 0.0]);
    }

    #[test]
    fn ar2_accumulates_every_term() {
        // ψ1 = 0.5, ψ2 = 0.5·0.5 + 0.2 = 0.45, ψ3 = 0.5·0.45 + 0.2·0.5 = 0.325
        let weights = arma_to_ma(&[0.5, 0.2], &[], 4);
        assert_relative_eq!(weights[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(weights[2], 0.45, epsilon = 1e-12);
        assert_relative_eq!(weights[3], 0.325, epsilon = 1e-12);
    }

    #[test]
    fn arma11_weights() {
        // ψ1 = θ + φ, ψk = φ ψ(k-1)
        let weights = arma_to_ma(&[0.6], &[0.3], 4);
        assert_relative_eq!(weights[1], 0.9, epsilon = 1e-12);
        assert_relative_eq!(weights[2], 0.54, epsilon = 1e-12);
        assert_relative_eq!(weights[3], 0.324, epsilon = 1e-12);
    }

    #[test]
    fn cumulative_energy() {
        let cumulative = cumulative_sqrt_energy(&[1.0, 0.0, 3.0]);
        assert_relative_eq!(cumulative[0], 1.0);
        assert_relative_eq!(cumulative[1], 1.0);
        assert_relative_eq!(cumulative[2], 10.0_f64.sqrt());
    }

    #[test]
    fn bounds_from_fitted_spec() {
        let spec = OrderSpec::new(1, 0, 0, 0, 0, 0, 0)
            .unwrap()
            .with_parameters(&[0.5])
            .unwrap();
        let mut result = ForecastResult::new(vec![0.0, 0.0, 0.0], 1.0);
        result.set_rmse(1.0);
        apply_confidence_interval(&mut result, &spec, 2.0).unwrap();

        let widths: Vec<f64> = result
            .upper()
            .iter()
            .zip(result.lower())
            .map(|(u, l)| u - l)
            .collect();
        assert_relative_eq!(widths[0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(widths[1], 4.0 * 1.25_f64.sqrt(), epsilon = 1e-12);
        assert!(widths.windows(2).all(|w| w[1] >= w[0]));
    }
}
