//! Dense matrix type with a cached LDLᵗ (Cholesky) factorization.

use log::{trace, warn};

use super::vector::{dot, DenseVector};
use crate::error::{ForecastError, Result};

/// LDLᵗ factorization of a symmetric matrix.
///
/// `L` is unit lower triangular and `D` diagonal. The sign flags record which
/// pivot signs were seen while factorizing; both set means the matrix was
/// indefinite.
#[derive(Debug, Clone, PartialEq)]
pub struct Cholesky {
    n: usize,
    d: Vec<f64>,
    l: Vec<f64>,
    positive: bool,
    negative: bool,
    regularized: bool,
}

impl Cholesky {
    /// Factorize a square matrix.
    ///
    /// With `max_condition_number == None` an exact zero pivot fails with
    /// [`ForecastError::SingularMatrix`]. With a bound, small or zero pivots are
    /// raised so that `|pivot| * bound` stays at least the largest pivot seen
    /// so far, keeping the system solvable at the cost of exactness.
    pub fn decompose(a: &DenseMatrix, max_condition_number: Option<f64>) -> Result<Self> {
        if a.rows != a.cols {
            return Err(ForecastError::DimensionMismatch {
                expected: a.rows,
                got: a.cols,
            });
        }

        let n = a.rows;
        let mut d = vec![0.0; n];
        let mut l = vec![0.0; n * n];
        let mut positive = false;
        let mut negative = false;
        let mut regularized = false;
        let mut current_max = -1.0_f64;

        for j in 0..n {
            let val: f64 = (0..j).map(|k| d[k] * l[j * n + k] * l[j * n + k]).sum();
            let mut pivot = a.at(j, j) - val;
            let sign = signum(pivot);

            match sign {
                0 if max_condition_number.is_none() => return Err(ForecastError::SingularMatrix),
                0 | 1 => positive = true,
                _ => negative = true,
            }

            if let Some(bound) = max_condition_number {
                let raw = pivot;
                if current_max <= 0.0 {
                    if sign == 0 {
                        pivot = 1.0;
                    }
                } else if sign == 0 {
                    pivot = (current_max / bound).abs();
                } else if (pivot * bound).abs() < current_max {
                    pivot = f64::from(sign) * (current_max / bound).abs();
                }
                if pivot != raw {
                    regularized = true;
                    trace!("cholesky pivot {} regularized from {:e} to {:e}", j, raw, pivot);
                }
            }

            d[j] = pivot;
            if pivot.abs() > current_max {
                current_max = pivot.abs();
            }

            l[j * n + j] = 1.0;
            for i in (j + 1)..n {
                let val: f64 = (0..j).map(|k| d[k] * l[j * n + k] * l[i * n + k]).sum();
                l[i * n + j] = ((a.at(i, j) + a.at(j, i)) / 2.0 - val) / d[j];
            }
        }

        if positive && negative {
            warn!("cholesky factorization of an indefinite {}x{} matrix", n, n);
        }

        Ok(Self {
            n,
            d,
            l,
            positive,
            negative,
            regularized,
        })
    }

    /// Diagonal factor `D`.
    pub fn diagonal(&self) -> &[f64] {
        &self.d
    }

    /// Entry `(i, j)` of the unit lower triangular factor `L`.
    pub fn lower(&self, i: usize, j: usize) -> Result<f64> {
        for index in [i, j] {
            if index >= self.n {
                return Err(ForecastError::IndexOutOfBounds {
                    index,
                    size: self.n,
                });
            }
        }
        Ok(self.l_at(i, j))
    }

    fn l_at(&self, i: usize, j: usize) -> f64 {
        if j > i {
            0.0
        } else {
            self.l[i * self.n + j]
        }
    }

    /// A non-negative pivot was observed.
    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// A negative pivot was observed.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Both pivot signs were observed.
    pub fn is_indefinite(&self) -> bool {
        self.positive && self.negative
    }

    /// At least one pivot was altered by the condition bound.
    pub fn was_regularized(&self) -> bool {
        self.regularized
    }

    /// Rebuild `L · diag(D) · Lᵗ`.
    pub fn reconstruct(&self) -> DenseMatrix {
        let n = self.n;
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let upto = i.min(j);
                data[i * n + j] = (0..=upto)
                    .map(|k| self.l_at(i, k) * self.d[k] * self.l_at(j, k))
                    .sum();
            }
        }
        DenseMatrix {
            rows: n,
            cols: n,
            data,
            factorization: None,
        }
    }

    /// Forward solve against `L, D`, then backward solve against `Lᵗ`.
    fn solve(&self, b: &[f64]) -> Vec<f64> {
        let n = self.n;
        let mut y = vec![0.0; n];
        for i in 0..n {
            let val: f64 = (0..i).map(|j| self.l[i * n + j] * y[j]).sum();
            y[i] = b[i] - val;
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let val: f64 = ((i + 1)..n).map(|j| self.l[j * n + i] * x[j]).sum();
            x[i] = y[i] / self.d[i] - val;
        }
        x
    }
}

fn signum(value: f64) -> i8 {
    if value == 0.0 {
        0
    } else if value > 0.0 {
        1
    } else {
        -1
    }
}

/// Row-major dense matrix of `f64`.
///
/// The factorization computed by [`DenseMatrix::solve_spd`] is cached together
/// with the condition bound it was computed under; any call to
/// [`DenseMatrix::set`] drops it.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
    factorization: Option<(Option<f64>, Cholesky)>,
}

impl DenseMatrix {
    /// Create a `rows x cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(ForecastError::InvalidConfiguration(format!(
                "matrix size must be positive, got {}x{}",
                rows, cols
            )));
        }
        Ok(Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
            factorization: None,
        })
    }

    /// Build a matrix from row vectors of equal length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut matrix = Self::zeros(rows.len(), cols)?;
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(ForecastError::DimensionMismatch {
                    expected: cols,
                    got: row.len(),
                });
            }
            matrix.data[i * cols..(i + 1) * cols].copy_from_slice(&row);
        }
        Ok(matrix)
    }

    /// Symmetric Toeplitz matrix whose first row is `first_row`.
    pub fn toeplitz(first_row: &[f64]) -> Result<Self> {
        let n = first_row.len();
        let mut matrix = Self::zeros(n, n)?;
        for i in 0..n {
            for j in 0..n {
                matrix.data[i * n + j] = first_row[i.abs_diff(j)];
            }
        }
        Ok(matrix)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get entry `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Result<f64> {
        self.check_index(i, j)?;
        Ok(self.at(i, j))
    }

    /// Set entry `(i, j)`, invalidating any cached factorization.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        self.check_index(i, j)?;
        self.data[i * self.cols + j] = value;
        self.factorization = None;
        Ok(())
    }

    /// Borrow row `i`.
    pub fn row(&self, i: usize) -> Result<&[f64]> {
        if i >= self.rows {
            return Err(ForecastError::IndexOutOfBounds {
                index: i,
                size: self.rows,
            });
        }
        Ok(self.row_at(i))
    }

    fn row_at(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Matrix-vector product `A · v`.
    pub fn times_vector(&self, v: &DenseVector) -> Result<DenseVector> {
        if self.cols != v.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.cols,
                got: v.len(),
            });
        }
        let out = (0..self.rows)
            .map(|i| dot(self.row_at(i), v.as_slice()))
            .collect();
        DenseVector::from_vec(out)
    }

    /// Gram matrix `A · Aᵗ` (`rows x rows`).
    pub fn gram(&self) -> DenseMatrix {
        let m = self.rows;
        let mut data = vec![0.0; m * m];
        for i in 0..m {
            for j in i..m {
                let value = dot(self.row_at(i), self.row_at(j));
                data[i * m + j] = value;
                data[j * m + i] = value;
            }
        }
        DenseMatrix {
            rows: m,
            cols: m,
            data,
            factorization: None,
        }
    }

    /// Factorize (or reuse the cached factorization for the same bound).
    pub fn cholesky(&mut self, max_condition_number: Option<f64>) -> Result<&Cholesky> {
        let stale = match &self.factorization {
            Some((bound, _)) => *bound != max_condition_number,
            None => true,
        };
        if stale {
            let chol = Cholesky::decompose(self, max_condition_number)?;
            self.factorization = Some((max_condition_number, chol));
        }
        match &self.factorization {
            Some((_, chol)) => Ok(chol),
            None => Err(ForecastError::SingularMatrix),
        }
    }

    /// Solve `A · x = b` for a symmetric positive (semi-)definite `A`.
    ///
    /// Fails with [`ForecastError::SingularMatrix`] when a zero pivot is met
    /// and no condition bound was given; callers can retry with a bound.
    pub fn solve_spd(
        &mut self,
        b: &DenseVector,
        max_condition_number: Option<f64>,
    ) -> Result<DenseVector> {
        if self.rows != self.cols || self.cols != b.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.cols,
                got: b.len(),
            });
        }
        let chol = self.cholesky(max_condition_number)?;
        DenseVector::from_vec(chol.solve(b.as_slice()))
    }

    fn at(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    fn check_index(&self, i: usize, j: usize) -> Result<()> {
        if i >= self.rows {
            return Err(ForecastError::IndexOutOfBounds {
                index: i,
                size: self.rows,
            });
        }
        if j >= self.cols {
            return Err(ForecastError::IndexOutOfBounds {
                index: j,
                size: self.cols,
            });
        }
        Ok(())
    }
}
