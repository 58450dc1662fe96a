//! Product-quantization root: training entry point and query operations.
//!
//! [`Maddness::train`] splits each example vector into `num_subspaces`
//! equal-width subspaces, learns one hashing tree per subspace (in
//! parallel), and precomputes one quantized lookup table per registered
//! query vector. After training the object is read-only: quantize data
//! vectors to per-subspace leaf indices, then approximate dot products
//! against any registered query by summing table bytes.

use crate::hash::{Hash, NUM_LEAVES};
use crate::ops::Matrix;
use crate::quantization::LookupTable;
use crate::types::VectorElement;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};

/// Errors rejecting invalid training inputs.
///
/// Training never proceeds past a violated precondition: the constructor
/// returns one of these instead of a partially trained model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrainError {
    #[error("training requires at least one data example")]
    EmptyExamples,

    #[error("training requires at least one query vector")]
    EmptyQueries,

    #[error("vectors must have at least one element")]
    ZeroVectorLen,

    #[error("vector length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("invalid subspace count {num_subspaces}: it must be a positive divisor of the vector length {vector_len}")]
    InvalidSubspaces {
        num_subspaces: usize,
        vector_len: usize,
    },
}

/// A trained MADDNESS model: per-subspace hash functions plus per-query
/// lookup tables.
#[derive(Debug, Clone)]
pub struct Maddness<F: VectorElement> {
    num_subspaces: usize,
    vector_len: usize,
    sub_vector_len: usize,
    hashes: Vec<Hash<F>>,
    lookup_tables: Vec<LookupTable<F>>,
}

impl<F: VectorElement> Maddness<F> {
    /// Run the learning process for the product quantization and hash
    /// function parameters.
    ///
    /// `data_examples` are the vectors the encoder is trained on;
    /// `query_vectors` are registered up front and each gets a precomputed
    /// lookup table. `num_subspaces` must be a positive divisor of the
    /// vector length, and every row of both inputs must share that length.
    ///
    /// Subspace trainings are independent and run on the rayon pool; the
    /// call returns once every subspace hash and lookup table is built.
    pub fn train(
        data_examples: &[Vec<F>],
        query_vectors: &[Vec<F>],
        num_subspaces: usize,
    ) -> Result<Self, TrainError> {
        let first = data_examples.first().ok_or(TrainError::EmptyExamples)?;
        if query_vectors.is_empty() {
            return Err(TrainError::EmptyQueries);
        }

        let vector_len = first.len();
        if vector_len == 0 {
            return Err(TrainError::ZeroVectorLen);
        }
        if num_subspaces == 0 || num_subspaces > vector_len || vector_len % num_subspaces != 0 {
            return Err(TrainError::InvalidSubspaces {
                num_subspaces,
                vector_len,
            });
        }
        for row in data_examples.iter().chain(query_vectors) {
            if row.len() != vector_len {
                return Err(TrainError::LengthMismatch {
                    expected: vector_len,
                    got: row.len(),
                });
            }
        }

        let sub_vector_len = vector_len / num_subspaces;
        info!(
            examples = data_examples.len(),
            queries = query_vectors.len(),
            num_subspaces,
            sub_vector_len,
            "maddness training starts"
        );

        // Phase A: one independent training job per subspace. The indexed
        // collect keeps hashes[s] bound to subspace s no matter which
        // worker finishes first.
        let hashes: Vec<Hash<F>> = (0..num_subspaces)
            .into_par_iter()
            .map(|s| {
                debug!(subspace = s, "training subspace hash");
                let offset = s * sub_vector_len;
                let sub_examples = Matrix::from_slices(
                    data_examples
                        .iter()
                        .map(|ex| &ex[offset..offset + sub_vector_len]),
                );
                Hash::train(sub_examples)
            })
            .collect();
        info!("subspace training completed");

        // Phase B: one lookup table per registered query.
        let lookup_tables = query_vectors
            .iter()
            .map(|q| LookupTable::build(q, &hashes, sub_vector_len))
            .collect();
        info!(tables = query_vectors.len(), "lookup tables created");

        Ok(Self {
            num_subspaces,
            vector_len,
            sub_vector_len,
            hashes,
            lookup_tables,
        })
    }

    /// Number of subspaces the vector is split into.
    #[inline]
    pub fn num_subspaces(&self) -> usize {
        self.num_subspaces
    }

    /// Full vector length the model was trained for.
    #[inline]
    pub fn vector_len(&self) -> usize {
        self.vector_len
    }

    /// Width of one subspace slice.
    #[inline]
    pub fn sub_vector_len(&self) -> usize {
        self.sub_vector_len
    }

    /// The trained hash function of every subspace, in subspace order.
    #[inline]
    pub fn hashes(&self) -> &[Hash<F>] {
        &self.hashes
    }

    /// The lookup tables, one per registered query vector, in registration
    /// order.
    #[inline]
    pub fn lookup_tables(&self) -> &[LookupTable<F>] {
        &self.lookup_tables
    }

    /// Encode a data vector: one leaf index in `[0, 16)` per subspace.
    pub fn quantize(&self, v: &[F]) -> Vec<u8> {
        assert_eq!(v.len(), self.vector_len, "vector length mismatch");
        self.hashes
            .iter()
            .enumerate()
            .map(|(s, hash)| {
                let offset = s * self.sub_vector_len;
                hash.hash(&v[offset..offset + self.sub_vector_len])
            })
            .collect()
    }

    /// Encode a batch of data vectors.
    pub fn quantize_batch(&self, vs: &[Vec<F>]) -> Vec<Vec<u8>> {
        vs.iter().map(|v| self.quantize(v)).collect()
    }

    /// Flatten per-subspace leaf indices (as returned by
    /// [`quantize`](Self::quantize)) into lookup-table data indices.
    pub fn lookup_table_indices(&self, q: &[u8]) -> Vec<u16> {
        assert_eq!(q.len(), self.num_subspaces, "subspace count mismatch");
        q.iter()
            .enumerate()
            .map(|(s, &proto)| (s * NUM_LEAVES) as u16 + proto as u16)
            .collect()
    }

    /// Approximate dot product between a quantized data vector (via its
    /// lookup-table indices) and the registered query vector at
    /// `query_index`.
    pub fn dot_product(&self, lut_indices: &[u16], query_index: usize) -> F {
        let lut = &self.lookup_tables[query_index];
        let mut sum: u32 = 0;
        for &idx in lut_indices {
            sum += lut.lookup(idx) as u32;
        }
        lut.dequantize_sum(sum)
    }

    /// Rebuild a full-length vector from per-subspace leaf indices using
    /// the learned prototypes. An error-analysis tool, not part of the
    /// dot-product path.
    pub fn reconstruct(&self, q: &[u8]) -> Vec<F> {
        assert_eq!(q.len(), self.num_subspaces, "subspace count mismatch");
        let mut v = Vec::with_capacity(self.vector_len);
        for (hash, &proto) in self.hashes.iter().zip(q) {
            v.extend_from_slice(&hash.prototypes[proto as usize]);
        }
        v
    }

    /// Mean squared error between `v` and its prototype reconstruction.
    pub fn reconstruction_error(&self, v: &[F]) -> F {
        let r = self.reconstruct(&self.quantize(v));
        let mut mse = F::zero();
        for (&a, &b) in v.iter().zip(&r) {
            let d = a - b;
            mse += d * d;
        }
        mse / F::from_usize(self.vector_len)
    }
}
