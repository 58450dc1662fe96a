//! MADDNESS-style approximate matrix multiplication.
//!
//! This library implements the training and query pipeline for learned
//! product quantization with balanced hash trees ("Multiply-ADDitioN-lESS").
//! Given a set of example data vectors and a set of query vectors, it learns
//! a compact 4-bit-per-subspace encoder for data vectors and precomputes an
//! 8-bit lookup table per query, so that an approximate dot product between
//! any (data, query) pair reduces to summing a handful of table bytes.
//!
//! # Pipeline
//!
//! - **Training**: each example vector is split into `num_subspaces`
//!   equal-width subspaces. Per subspace, a depth-4 balanced binary
//!   regression tree is grown with greedy variance-based column selection
//!   and an optimal-SSE split search; the 16 leaf means become the
//!   subspace's prototypes. Subspace trainings run in parallel on the rayon
//!   pool.
//! - **Query registration**: for every query vector, the dot products
//!   between its sub-vectors and all prototypes are precomputed and
//!   linearly quantized to a byte table with a shared `(bias, scale)`.
//! - **Query time**: `quantize` walks each tree to a 4-bit leaf index,
//!   `lookup_table_indices` flattens the indices, and `dot_product` sums N
//!   table bytes and de-quantizes.
//!
//! # Element types
//!
//! All operations are generic over [`types::VectorElement`], implemented
//! for `f32` and `f64`; the pipeline monomorphises to the chosen precision.
//!
//! # Example
//!
//! ```rust
//! use maddness::prelude::*;
//!
//! // 16 examples of width 8; two clusters are visible in columns 3..8.
//! let examples: Vec<Vec<f32>> = vec![
//!     vec![1.0, 2.0, 3.0, 1.0, 1.0, 2.0, 3.0, 4.0],
//!     vec![2.0, 4.0, 4.0, 2.0, 1.0, 2.0, 3.0, 4.0],
//!     vec![3.0, 6.0, 6.0, 3.0, 1.0, 2.0, 3.0, 4.0],
//!     vec![4.0, 8.0, 9.0, 4.0, 1.0, 2.0, 3.0, 4.0],
//!     vec![5.0, 10.0, 13.0, 10.0, 1.0, 2.0, 3.0, 4.0],
//!     vec![6.0, 12.0, 18.0, 11.0, 1.0, 2.0, 3.0, 4.0],
//!     vec![7.0, 14.0, 24.0, 12.0, 1.0, 2.0, 3.0, 4.0],
//!     vec![8.0, 16.0, 31.0, 13.0, 1.0, 2.0, 3.0, 4.0],
//!     vec![9.0, 18.0, 39.0, 50.0, 9.0, 8.0, 7.0, 6.0],
//!     vec![10.0, 20.0, 48.0, 51.0, 9.0, 8.0, 7.0, 6.0],
//!     vec![11.0, 22.0, 58.0, 52.0, 9.0, 8.0, 7.0, 6.0],
//!     vec![12.0, 24.0, 81.0, 53.0, 9.0, 8.0, 7.0, 6.0],
//!     vec![13.0, 26.0, 94.0, 100.0, 9.0, 8.0, 7.0, 6.0],
//!     vec![14.0, 28.0, 108.0, 101.0, 9.0, 8.0, 7.0, 6.0],
//!     vec![15.0, 30.0, 123.0, 102.0, 9.0, 8.0, 7.0, 6.0],
//!     vec![16.0, 32.0, 139.0, 103.0, 9.0, 8.0, 7.0, 6.0],
//! ];
//! let queries: Vec<Vec<f32>> = vec![
//!     vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
//!     vec![9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0],
//! ];
//!
//! let m = Maddness::train(&examples, &queries, 4).unwrap();
//! assert_eq!(m.sub_vector_len(), 2);
//!
//! // Encode a data vector and approximate its dot product with query 0.
//! let codes = m.quantize(&examples[15]);
//! assert_eq!(codes, vec![15, 15, 15, 15]);
//!
//! let lut_indices = m.lookup_table_indices(&codes);
//! let approx = m.dot_product(&lut_indices, 0);
//! assert!(approx.is_finite());
//!
//! // The prototype reconstruction is available for error analysis.
//! let rebuilt = m.reconstruct(&codes);
//! assert_eq!(rebuilt.len(), 8);
//! ```

pub mod hash;
pub mod ops;
pub mod pq;
pub mod quantization;
pub mod types;
pub mod utils;


/// Prelude module for convenient imports.
///
/// Use `use maddness::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::hash::{Hash, TreeLevel, NUM_LEAVES, TREE_DEPTH};
    pub use crate::pq::{Maddness, TrainError};
    pub use crate::quantization::LookupTable;
    pub use crate::types::VectorElement;
}
