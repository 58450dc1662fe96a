//! Learned hash functions: one balanced binary regression tree per subspace.
//!
//! Training grows a tree of fixed depth [`TREE_DEPTH`] over one subspace of
//! the example matrix. Every level shares a single split column across all
//! of its nodes and stores one threshold per node; the [`NUM_LEAVES`] leaf
//! buckets yield the prototype vectors. Encoding a sub-vector is a
//! heap-indexed walk down the thresholds.

pub mod bucket;

pub use bucket::{heuristic_select_indices, prototypes, Bucket};

use crate::ops::{Matrix, Row};
use crate::types::VectorElement;
use tracing::trace;

/// Depth of every hashing tree. Fixed: 4 bits per subspace is the design's
/// sweet spot between lookup-table row size and prototype resolution.
pub const TREE_DEPTH: usize = 4;

/// Number of leaves (and prototypes) per subspace: 2^[`TREE_DEPTH`].
pub const NUM_LEAVES: usize = 1 << TREE_DEPTH;

/// How many candidate split columns are evaluated per tree level.
pub(crate) const NUM_SPLIT_CANDIDATES: usize = 4;

/// One level of a trained hashing tree.
///
/// `split_index` is shared by every node on the level; `split_thresholds`
/// holds one threshold per node, `2^level` in total.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLevel<F: VectorElement> {
    pub split_index: usize,
    pub split_thresholds: Vec<F>,
}

/// A trained hash function for a single subspace: the balanced binary
/// regression tree plus the leaf prototype vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Hash<F: VectorElement> {
    pub tree_levels: [TreeLevel<F>; TREE_DEPTH],
    /// One prototype per leaf, each the mean of the leaf's training rows.
    pub prototypes: Vec<Vec<F>>,
}

impl<F: VectorElement> Hash<F> {
    /// Learn the hash function parameters from one subspace of examples.
    pub fn train(examples: Matrix<'_, F>) -> Self {
        let mut buckets = vec![Bucket {
            level: -1,
            node_index: 0,
            rows: examples,
        }];

        let tree_levels = std::array::from_fn(|_| {
            let (next, level) = next_tree_level(std::mem::take(&mut buckets));
            buckets = next;
            level
        });

        debug_assert_eq!(buckets.len(), NUM_LEAVES);
        Hash {
            tree_levels,
            prototypes: prototypes(&buckets),
        }
    }

    /// Map a sub-vector to its leaf index in `[0, NUM_LEAVES)`.
    #[inline]
    pub fn hash(&self, v: &[F]) -> u8 {
        let mut i: u8 = 1;
        for level in &self.tree_levels {
            let threshold = level.split_thresholds[(i - 1) as usize];
            i *= 2;
            if v[level.split_index] < threshold {
                i -= 1;
            }
        }
        i - 1
    }
}

/// Split every bucket of the current level, producing the next level's
/// buckets and the level parameters that were chosen.
fn next_tree_level<'a, F: VectorElement>(
    buckets: Vec<Bucket<'a, F>>,
) -> (Vec<Bucket<'a, F>>, TreeLevel<F>) {
    let candidates = heuristic_select_indices(&buckets);

    let mut best_loss = F::infinity();
    let mut best_index = 0;
    let mut best_thresholds: Vec<F> = Vec::new();

    for &split_index in &candidates {
        let mut loss = F::zero();
        let mut thresholds = Vec::with_capacity(buckets.len());
        for b in &buckets {
            let (t, l) = b.rows.optimal_split_threshold(split_index);
            thresholds.push(t);
            loss += l;
        }
        if loss < best_loss {
            best_loss = loss;
            best_index = split_index;
            best_thresholds = thresholds;
        }
    }

    let mut children = Vec::with_capacity(buckets.len() * 2);
    for (j, b) in buckets.into_iter().enumerate() {
        let (mut lt, mut gte) = b.rows.split_by_threshold(best_index, best_thresholds[j]);

        // Degenerate split: one side is empty when every row sits on the
        // same side of the threshold. Clone the boundary-most row of the
        // occupied side, nudge it one f32 ULP past the threshold column,
        // and let it stand in for the empty child. Every leaf stays
        // non-empty.
        if lt.is_empty() {
            trace!(level = b.level + 1, node = 2 * j, "repairing empty lt child");
            let mut row = boundary_row(&gte, best_index, false);
            row[best_index] = row[best_index].next_down32();
            lt = Matrix::from_owned(vec![row]);
        }
        if gte.is_empty() {
            trace!(level = b.level + 1, node = 2 * j + 1, "repairing empty gte child");
            let mut row = boundary_row(&lt, best_index, true);
            row[best_index] = row[best_index].next_up32();
            gte = Matrix::from_owned(vec![row]);
        }

        children.push(Bucket {
            level: b.level + 1,
            node_index: 2 * j,
            rows: lt,
        });
        children.push(Bucket {
            level: b.level + 1,
            node_index: 2 * j + 1,
            rows: gte,
        });
    }

    let level = TreeLevel {
        split_index: best_index,
        split_thresholds: best_thresholds,
    };
    (children, level)
}

/// An owned copy of the boundary-most row by `column`: the maximum-valued
/// row when `take_max`, otherwise the minimum-valued one. Ties resolve the
/// way a stable sort would order them: first occurrence for the minimum,
/// last occurrence for the maximum.
fn boundary_row<F: VectorElement>(m: &Matrix<'_, F>, column: usize, take_max: bool) -> Vec<F> {
    let rows: &[Row<'_, F>] = m.rows();
    let mut best = &rows[0];
    for row in &rows[1..] {
        let further = if take_max {
            row[column] >= best[column]
        } else {
            row[column] < best[column]
        };
        if further {
            best = row;
        }
    }
    best.to_vec()
}
