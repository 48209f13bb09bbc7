//! Property-based tests for the estimators and forecast pipeline.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series and matrices.

use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;
use sarima_forecast::linalg::{DenseMatrix, DenseVector};
use sarima_forecast::models::arima::{
    arma_to_ma, cumulative_sqrt_energy, estimate_arma, DifferencingState, ForecastConfig,
    OrderSpec, SarimaOrder,
};
use sarima_forecast::models::{Forecaster, SARIMA};

/// Strategy for generating series values.
/// Adds a small ramp to avoid all-constant series.
fn valid_values_strategy(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(-100.0..100.0_f64, len).prop_map(|mut v| {
            for (i, val) in v.iter_mut().enumerate() {
                *val += (i as f64) * 0.01;
            }
            v
        })
    })
}

/// Strategy for generating symmetric positive-definite matrices as `B Bᵗ + n I`.
fn spd_strategy(max_n: usize) -> impl Strategy<Value = (usize, Vec<f64>)> {
    (1..=max_n).prop_flat_map(|n| {
        prop::collection::vec(-5.0..5.0_f64, n * n).prop_map(move |b| {
            let mut a = vec![0.0; n * n];
            for i in 0..n {
                for j in 0..n {
                    let mut sum = 0.0;
                    for k in 0..n {
                        sum += b[i * n + k] * b[j * n + k];
                    }
                    a[i * n + j] = sum;
                }
                a[i * n + i] += n as f64;
            }
            (n, a)
        })
    })
}

fn to_dense(n: usize, a: &[f64]) -> DenseMatrix {
    DenseMatrix::from_rows(a.chunks(n).map(|row| row.to_vec()).collect()).unwrap()
}

// =============================================================================
// Property: differencing then integrating reproduces the series
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn differencing_round_trip(
        values in valid_values_strategy(30, 80),
        d in 0usize..3,
        cap_d in 0usize..2,
        s in 1usize..8,
    ) {
        let order = SarimaOrder::new(0, d, 0, 0, cap_d, 0, s);
        let (state, stationary) = DifferencingState::differentiate(&order, &values).unwrap();
        prop_assert_eq!(stationary.len(), values.len() - order.initial_condition_size());

        let restored = state.integrate(&stationary).unwrap();
        prop_assert_eq!(restored.len(), values.len());
        for (r, v) in restored.iter().zip(values.iter()) {
            prop_assert!((r - v).abs() < 1e-9 * (1.0 + v.abs()), "{} vs {}", r, v);
        }
    }
}

// =============================================================================
// Property: LDLᵗ reconstructs the matrix and solves match nalgebra
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn cholesky_reconstructs_spd((n, a) in spd_strategy(6)) {
        let mut matrix = to_dense(n, &a);
        let chol = matrix.cholesky(None).unwrap();
        prop_assert!(chol.is_positive());
        prop_assert!(!chol.was_regularized());

        let rebuilt = chol.reconstruct();
        for i in 0..n {
            for j in 0..n {
                let expected = a[i * n + j];
                let got = rebuilt.get(i, j).unwrap();
                prop_assert!((got - expected).abs() < 1e-8 * (1.0 + expected.abs()));
            }
        }
    }

    #[test]
    fn solve_spd_matches_nalgebra(
        (n, a) in spd_strategy(6),
        seed in prop::collection::vec(-10.0..10.0_f64, 6),
    ) {
        let b: Vec<f64> = seed[..n].to_vec();
        let mut matrix = to_dense(n, &a);
        let x = matrix
            .solve_spd(&DenseVector::from_vec(b.clone()).unwrap(), None)
            .unwrap();

        let reference = DMatrix::from_row_slice(n, n, &a)
            .cholesky()
            .unwrap()
            .solve(&DVector::from_vec(b.clone()));

        for i in 0..n {
            let xi = x.get(i).unwrap();
            prop_assert!((xi - reference[i]).abs() < 1e-8 * (1.0 + reference[i].abs()));
        }

        let ax = matrix.times_vector(&x).unwrap();
        for i in 0..n {
            prop_assert!((ax.get(i).unwrap() - b[i]).abs() < 1e-8 * (1.0 + b[i].abs()));
        }
    }
}

// =============================================================================
// Property: ψ-weights and cumulative energy
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn psi_weights_without_coefficients_are_identity(lag_max in 1usize..50) {
        let weights = arma_to_ma(&[], &[], lag_max);
        prop_assert_eq!(weights.len(), lag_max);
        prop_assert_eq!(weights[0], 1.0);
        prop_assert!(weights[1..].iter().all(|&w| w == 0.0));
    }

    #[test]
    fn cumulative_energy_non_decreasing(
        ar in prop::collection::vec(-0.9..0.9_f64, 0..3),
        ma in prop::collection::vec(-0.9..0.9_f64, 0..3),
        lag_max in 1usize..30,
    ) {
        let cumulative = cumulative_sqrt_energy(&arma_to_ma(&ar, &ma, lag_max));
        prop_assert_eq!(cumulative[0], 1.0);
        for w in cumulative.windows(2) {
            prop_assert!(w[1] >= w[0]);
        }
    }
}

// =============================================================================
// Property: Hannan-Rissanen installs the minimum-RMSE pass
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn installed_parameters_have_minimum_rmse(
        values in valid_values_strategy(40, 100),
        p in 1usize..3,
        q in 0usize..3,
    ) {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let centered: Vec<f64> = values.iter().map(|v| v - mean).collect();
        let spec = OrderSpec::new(p, 0, q, 0, 0, 0, 0).unwrap();

        let (fitted, report) =
            estimate_arma(&centered, &spec, 5, &ForecastConfig::default()).unwrap();
        let best = report.best().unwrap();
        for record in report.iterations() {
            prop_assert!(!(record.validation_rmse < best.validation_rmse));
        }
        prop_assert_eq!(fitted.parameters(), best.parameters.clone());
    }
}

// =============================================================================
// Property: bounds bracket the forecast and widen with the horizon
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn bounds_bracket_forecast(
        values in valid_values_strategy(30, 80),
        horizon in 1usize..12,
    ) {
        let mut model = SARIMA::from_order(1, 1, 1, 0, 0, 0, 0).unwrap();
        model.fit(&values).unwrap();
        let result = model.predict_with_intervals(horizon, 0.95).unwrap();

        prop_assert_eq!(result.forecast().len(), horizon);
        prop_assert_eq!(result.upper().len(), horizon);
        prop_assert_eq!(result.lower().len(), horizon);
        prop_assert!(result.rmse() >= 0.0);

        let mut previous_width = 0.0;
        for i in 0..horizon {
            prop_assert!(result.lower()[i] <= result.forecast()[i]);
            prop_assert!(result.forecast()[i] <= result.upper()[i]);
            let width = result.upper()[i] - result.lower()[i];
            prop_assert!(width >= previous_width - 1e-9 * (1.0 + width.abs()));
            previous_width = width;
        }
    }
}
