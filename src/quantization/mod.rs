//! Query-side lookup tables: precomputed dot products quantized to 8 bits.
//!
//! For one query vector, the table holds the dot product between the query's
//! sub-vector and each of the 16 prototypes of every subspace, linearly
//! quantized to `u8` with a single `(bias, scale)` shared across the whole
//! table:
//!
//! 1. Compute `float[s][k] = <q_sub_s, p_k>` and track the global min/max.
//! 2. `scale = 255 / (max − min)`, `bias = min · num_subspaces`.
//! 3. `data[s][k] = trunc((float[s][k] − min) · scale)` in row-major order.
//!
//! De-quantizing a sum of N table bytes as `sum / scale + bias` recovers the
//! sum of the N underlying dot products, up to the truncation error of each
//! 8-bit entry.

use crate::hash::{Hash, NUM_LEAVES};
use crate::ops::vector;
use crate::types::VectorElement;

/// A table of pre-computed, 8-bit-quantized dot products for one query
/// vector, plus the parameters needed for de-quantization during the
/// aggregation step.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable<F: VectorElement> {
    pub bias: F,
    pub scale: F,
    /// Row-major: row index = subspace, column index = prototype.
    data: Vec<u8>,
}

impl<F: VectorElement> LookupTable<F> {
    /// Build the table for `query` against the trained subspace hashes.
    pub(crate) fn build(query: &[F], hashes: &[Hash<F>], sub_vector_len: usize) -> Self {
        let num_subspaces = hashes.len();

        let mut float_data = Vec::with_capacity(num_subspaces);
        let mut min = F::infinity();
        let mut max = F::neg_infinity();

        for (s, hash) in hashes.iter().enumerate() {
            let offset = s * sub_vector_len;
            let sub_query = &query[offset..offset + sub_vector_len];

            let mut row = Vec::with_capacity(hash.prototypes.len());
            for proto in &hash.prototypes {
                let v = vector::dot(sub_query, proto);
                if v < min {
                    min = v;
                }
                if v > max {
                    max = v;
                }
                row.push(v);
            }
            float_data.push(row);
        }

        let scale = F::from_usize(u8::MAX as usize) / (max - min);
        let mut data = Vec::with_capacity(num_subspaces * NUM_LEAVES);
        for row in &float_data {
            for &v in row {
                // Truncating conversion: the shifted value is non-negative,
                // so this is a floor.
                data.push(((v - min) * scale).as_u8());
            }
        }

        LookupTable {
            bias: min * F::from_usize(num_subspaces),
            scale,
            data,
        }
    }

    /// The quantized table bytes, row-major.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The byte at a flat `subspace * NUM_LEAVES + prototype` index.
    #[inline]
    pub fn lookup(&self, flat_index: u16) -> u8 {
        self.data[flat_index as usize]
    }

    /// De-quantize a sum of table bytes back to the approximate sum of the
    /// underlying dot products.
    #[inline]
    pub fn dequantize_sum(&self, sum: u32) -> F {
        F::from_usize(sum as usize) / self.scale + self.bias
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{TreeLevel, TREE_DEPTH};
    use crate::ops::vector::dot;

    /// A hash with fixed prototypes; the tree itself is irrelevant to the
    /// lookup-table path.
    fn hash_with_prototypes(prototypes: Vec<Vec<f32>>) -> Hash<f32> {
        let tree_levels = std::array::from_fn(|level| TreeLevel {
            split_index: 0,
            split_thresholds: vec![0.0; 1 << level],
        });
        assert_eq!(tree_levels.len(), TREE_DEPTH);
        Hash {
            tree_levels,
            prototypes,
        }
    }

    fn ramp_prototypes(base: f32) -> Vec<Vec<f32>> {
        (0..NUM_LEAVES)
            .map(|k| vec![base + k as f32, base - k as f32])
            .collect()
    }

    #[test]
    fn test_build_shape_and_extremes() {
        let hashes = vec![
            hash_with_prototypes(ramp_prototypes(1.0)),
            hash_with_prototypes(ramp_prototypes(-2.0)),
        ];
        let query = [1.0f32, 2.0, 3.0, 4.0];
        let lut = LookupTable::build(&query, &hashes, 2);

        assert_eq!(lut.data().len(), 2 * NUM_LEAVES);
        // The global extremes map to the ends of the byte range.
        assert!(lut.data().contains(&0));
        assert!(lut.data().contains(&255));
    }

    #[test]
    fn test_dequantized_entries_approximate_dot_products() {
        let hashes = vec![
            hash_with_prototypes(ramp_prototypes(0.0)),
            hash_with_prototypes(ramp_prototypes(5.0)),
        ];
        let query = [0.5f32, -1.5, 2.0, 1.0];
        let lut = LookupTable::build(&query, &hashes, 2);

        // Reconstructing a single entry: byte/scale + min. The per-entry
        // error is bounded by one quantization step.
        let min = lut.bias / 2.0;
        let step = 1.0 / lut.scale;
        for (s, hash) in hashes.iter().enumerate() {
            let sub_query = &query[s * 2..(s + 1) * 2];
            for (k, proto) in hash.prototypes.iter().enumerate() {
                let exact = dot(sub_query, proto);
                let byte = lut.lookup((s * NUM_LEAVES + k) as u16);
                let approx = byte as f32 / lut.scale + min;
                assert!(
                    (exact - approx).abs() <= step + 1e-4,
                    "subspace {s} proto {k}: exact {exact}, approx {approx}"
                );
            }
        }
    }

    #[test]
    fn test_dequantize_sum_inverts_quantization() {
        let hashes = vec![hash_with_prototypes(ramp_prototypes(3.0))];
        let query = [1.0f32, 1.0];
        let lut = LookupTable::build(&query, &hashes, 2);

        let byte = lut.lookup(0) as u32;
        let expected = byte as f32 / lut.scale + lut.bias;
        assert_eq!(lut.dequantize_sum(byte), expected);
    }
}
