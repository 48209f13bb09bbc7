//! Dense vector type.

use crate::error::{ForecastError, Result};

/// Fixed-size dense vector of `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseVector {
    data: Vec<f64>,
}

impl DenseVector {
    /// Create a vector of `size` elements, all set to `value`.
    pub fn new(size: usize, value: f64) -> Result<Self> {
        if size == 0 {
            return Err(ForecastError::InvalidConfiguration(
                "vector size must be positive".into(),
            ));
        }
        Ok(Self {
            data: vec![value; size],
        })
    }

    /// Wrap existing data. The vector must not be empty.
    pub fn from_vec(data: Vec<f64>) -> Result<Self> {
        if data.is_empty() {
            return Err(ForecastError::InvalidConfiguration(
                "vector size must be positive".into(),
            ));
        }
        Ok(Self { data })
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get element `i`.
    pub fn get(&self, i: usize) -> Result<f64> {
        self.data
            .get(i)
            .copied()
            .ok_or(ForecastError::IndexOutOfBounds {
                index: i,
                size: self.data.len(),
            })
    }

    /// Set element `i`.
    pub fn set(&mut self, i: usize, value: f64) -> Result<()> {
        let size = self.data.len();
        let slot = self
            .data
            .get_mut(i)
            .ok_or(ForecastError::IndexOutOfBounds { index: i, size })?;
        *slot = value;
        Ok(())
    }

    /// Dot product with another vector of the same length.
    pub fn dot(&self, other: &DenseVector) -> Result<f64> {
        if self.len() != other.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.len(),
                got: other.len(),
            });
        }
        Ok(dot(&self.data, &other.data))
    }

    /// Borrow the elements.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consume the vector and return its elements.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}

/// Dot product of two equal-length slices.
pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
