//! Buckets: the row partitions flowing through one level of the tree.

use crate::hash::NUM_SPLIT_CANDIDATES;
use crate::ops::{vector, Matrix};
use crate::types::VectorElement;
use crate::utils::ArgMaxHeap;

/// A set of rows assigned to one node of the hashing tree during training.
///
/// `level` and `node_index` identify the node the bucket belongs to; they
/// feed logging and never influence the trained model. The root bucket sits
/// at level −1, so the four split levels are 0 through 3.
#[derive(Debug, Clone)]
pub struct Bucket<'a, F: VectorElement> {
    pub level: i32,
    pub node_index: usize,
    pub rows: Matrix<'a, F>,
}

/// Select the split candidates to evaluate for one tree level.
///
/// Sums the column-wise variances across all buckets and returns up to the
/// top four columns of the aggregate: the columns with the highest residual
/// variance across the current partition.
pub fn heuristic_select_indices<F: VectorElement>(buckets: &[Bucket<'_, F>]) -> Vec<usize> {
    let mut variance = buckets[0].rows.column_wise_variance();
    for bucket in &buckets[1..] {
        vector::add_assign(&mut variance, &bucket.rows.column_wise_variance());
    }
    ArgMaxHeap::new(&variance).first_args_max(NUM_SPLIT_CANDIDATES)
}

/// The prototype vector of every bucket: the column-wise mean of its rows.
pub fn prototypes<F: VectorElement>(buckets: &[Bucket<'_, F>]) -> Vec<Vec<F>> {
    buckets.iter().map(|b| b.rows.mean()).collect()
}
