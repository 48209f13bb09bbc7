//! Small dense linear-algebra kernel used by the estimators.
//!
//! Provides:
//! - [`DenseVector`] with bounds-checked access and dot products
//! - [`DenseMatrix`] with matrix-vector products, Gram matrices and Toeplitz construction
//! - [`Cholesky`], an LDLᵗ factorization with condition-number-aware pivot regularization

mod matrix;
mod vector;

pub use matrix::{Cholesky, DenseMatrix};
pub use vector::DenseVector;
