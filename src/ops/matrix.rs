//! Row-collection operations for hashing-tree training.
//!
//! A [`Matrix`] is an ordered collection of equal-length rows. During
//! training, rows borrow sub-slices of the caller's example storage; only
//! rows synthesised by the degenerate-split repair are owned. `Cow` rows
//! make both cases cheap to shuffle between buckets.

use crate::ops::vector;
use crate::types::VectorElement;
use std::borrow::Cow;
use std::cmp::Ordering;

/// A borrowed-or-owned matrix row.
pub type Row<'a, F> = Cow<'a, [F]>;

/// An N×M collection of rows: N vectors, each with M columns.
///
/// Row order is meaningful to the intermediate split and SSE computations,
/// but the trained model coming out of them does not depend on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<'a, F: VectorElement> {
    rows: Vec<Row<'a, F>>,
}

impl<'a, F: VectorElement> Matrix<'a, F> {
    /// Build a matrix of borrowed rows. No data is copied.
    pub fn from_slices<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a [F]>,
    {
        Self {
            rows: rows.into_iter().map(Cow::Borrowed).collect(),
        }
    }

    /// Build a matrix that owns its rows.
    pub fn from_owned(rows: Vec<Vec<F>>) -> Self {
        Self {
            rows: rows.into_iter().map(Cow::Owned).collect(),
        }
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The rows, in order.
    #[inline]
    pub fn rows(&self) -> &[Row<'a, F>] {
        &self.rows
    }

    /// Column-wise variance across all rows, computed with the two-pass
    /// sum / sum-of-squares formula `E[x²] − (E[x])²`.
    ///
    /// Divides by N (population variance). The result is consumed as a
    /// relative ranking, so the denominator convention is immaterial.
    pub fn column_wise_variance(&self) -> Vec<F> {
        let cols = self.rows[0].len();
        let mut sum = vec![F::zero(); cols];
        let mut sum_of_squares = vec![F::zero(); cols];

        for row in &self.rows {
            vector::add_assign(&mut sum, row);
            vector::add_squares(&mut sum_of_squares, row);
        }

        let n = F::from_usize(self.rows.len());
        // sum becomes the mean, then the squared mean.
        vector::div_scalar(&mut sum, n);
        vector::square(&mut sum);
        vector::div_scalar(&mut sum_of_squares, n);
        vector::sub_assign(&mut sum_of_squares, &sum);
        sum_of_squares
    }

    /// Stable ascending sort of the rows by the value at `index`.
    ///
    /// Stability matters: tied rows keep their pre-sort order, which keeps
    /// the downstream split evaluation independent of input row order.
    pub fn sort_by_column(&mut self, index: usize) {
        self.rows
            .sort_by(|a, b| a[index].partial_cmp(&b[index]).unwrap_or(Ordering::Equal));
    }

    /// Reverse the row order in place.
    pub fn reverse_rows(&mut self) {
        self.rows.reverse();
    }

    /// Partition the rows by comparing the value at `index` against
    /// `threshold`.
    ///
    /// Returns `(lt, gte)`: rows whose value is strictly lower than the
    /// threshold, and rows at or above it. Row order is preserved within
    /// each partition.
    pub fn split_by_threshold(&self, index: usize, threshold: F) -> (Self, Self) {
        let mut lt = Vec::new();
        let mut gte = Vec::new();
        for row in &self.rows {
            if row[index] < threshold {
                lt.push(row.clone());
            } else {
                gte.push(row.clone());
            }
        }
        (Self { rows: lt }, Self { rows: gte })
    }

    /// Cumulative error sum of squares over row prefixes.
    ///
    /// Element `i` of the result is the SSE of a single-mean fit to rows
    /// `[0..=i]`, summed across columns. Element 0 is zero by construction.
    pub fn cumulative_sse(&self) -> Vec<F> {
        let n = self.rows.len();
        let cols = self.rows[0].len();

        let mut out = vec![F::zero(); n];
        let mut sum = vec![F::zero(); cols];
        let mut sum_of_squares = vec![F::zero(); cols];

        for (j, &x) in self.rows[0].iter().enumerate() {
            sum[j] = x;
            sum_of_squares[j] = x * x;
        }

        for i in 1..n {
            let count = F::from_usize(i + 1);
            for (j, &x) in self.rows[i].iter().enumerate() {
                sum[j] += x;
                sum_of_squares[j] += x * x;
                out[i] += sum_of_squares[j] - sum[j] * sum[j] / count;
            }
        }

        out
    }

    /// Find the optimal split threshold for the values at `split_index`.
    ///
    /// Works on a sorted copy: the combined loss at candidate `i` is the SSE
    /// of rows `[0..=i]` plus the SSE of rows `[i+1..]`, and the candidate
    /// with the minimum combined loss wins (lowest index on ties). The
    /// threshold is the midpoint between the winning row and its successor.
    ///
    /// A single-row matrix is treated as if the row were duplicated; the
    /// resulting degenerate split is absorbed by the caller's repair step.
    pub fn optimal_split_threshold(&self, split_index: usize) -> (F, F) {
        let mut sorted = self.clone();
        sorted.sort_by_column(split_index);
        if sorted.rows.len() == 1 {
            let row = sorted.rows[0].clone();
            sorted.rows.push(row);
        }

        let mut losses = sorted.cumulative_sse();
        let mut reversed = sorted.clone();
        reversed.reverse_rows();
        let mut tail = reversed.cumulative_sse();
        tail.reverse();

        let last = losses.len() - 1;
        vector::add_assign(&mut losses[..last], &tail[1..]);

        let n = vector::argmin(&losses);
        let threshold = if n < sorted.rows.len() - 1 {
            (sorted.rows[n][split_index] + sorted.rows[n + 1][split_index]) / F::from_usize(2)
        } else {
            // Unreachable for well-formed inputs; the trainer's repair step
            // owns the consequences when it does happen.
            sorted.rows[n][split_index].next_up32()
        };
        (threshold, losses[n])
    }

    /// The column-wise mean row.
    pub fn mean(&self) -> Vec<F> {
        let mut sum = self.rows[0].to_vec();
        for row in &self.rows[1..] {
            vector::add_assign(&mut sum, row);
        }
        vector::div_scalar(&mut sum, F::from_usize(self.rows.len()));
        sum
    }
}
