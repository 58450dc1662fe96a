//! Numeric primitives backing the training pipeline.
//!
//! - `vector`: element-wise slice operations, dot product, argmin
//! - `matrix`: row collections with the split/variance/SSE operations the
//!   hashing-tree trainer is built on

pub mod matrix;
pub mod vector;

pub use matrix::{Matrix, Row};
