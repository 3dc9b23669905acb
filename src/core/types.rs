//! Core type definitions for kernel matrix construction

use crate::core::{GramError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dense row-major matrix of kernel values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Create a zero-filled matrix with the given dimensions
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix from row-major data
    ///
    /// Fails with [`GramError::DimensionMismatch`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(GramError::DimensionMismatch {
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the value at (i, j)
    ///
    /// # Panics
    /// Panics if `i >= rows()` or `j >= cols()`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of range");
        self.data[i * self.cols + j]
    }

    /// Set the value at (i, j)
    ///
    /// # Panics
    /// Panics if `i >= rows()` or `j >= cols()`
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.rows && j < self.cols, "index ({i}, {j}) out of range");
        self.data[i * self.cols + j] = value;
    }

    /// Get row `i` as a slice
    ///
    /// # Panics
    /// Panics if `i >= rows()`
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.rows, "row index {i} out of range");
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row-major view of the underlying data
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Return the transpose as a new matrix
    pub fn transposed(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.set(j, i, self.get(i, j));
            }
        }
        out
    }

    /// Check whether the matrix is square
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }
}

/// Contiguous chunk of a dataset tagged with its zero-based block index
///
/// Produced by the block partitioner and consumed immediately by the
/// partitioned builders; borrows the underlying points.
#[derive(Debug)]
pub struct BlockGroup<'a, T> {
    /// Position of this group in the partition sequence
    pub index: usize,
    /// The points belonging to this group
    pub points: &'a [T],
}

// Groups are an index plus a borrowed slice, copyable regardless of T.
impl<T> Clone for BlockGroup<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for BlockGroup<'_, T> {}

impl<'a, T> BlockGroup<'a, T> {
    /// Number of points in this group
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the group is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Block-partitioned kernel matrix
///
/// A logical `rows x cols` matrix stored as a grid of dense blocks. For
/// symmetric matrices only blocks with `block_row >= block_col` are stored;
/// a missing upper-triangular block is understood to be the transpose of
/// its mirror.
///
/// Constructed once from a finite sequence of block entries and immutable
/// afterwards. How blocks are distributed or persisted beyond this in-memory
/// form is the storage layer's concern.
#[derive(Clone, Debug)]
pub struct PartitionedMatrix {
    rows: usize,
    cols: usize,
    num_row_blocks: usize,
    num_col_blocks: usize,
    blocks: BTreeMap<(usize, usize), DenseMatrix>,
}

impl PartitionedMatrix {
    /// Assemble a partitioned matrix from block entries
    ///
    /// Every entry's block index is validated against the declared grid;
    /// an out-of-range index fails with [`GramError::BlockIndexOutOfRange`].
    pub fn from_blocks<I>(
        rows: usize,
        cols: usize,
        num_row_blocks: usize,
        num_col_blocks: usize,
        blocks: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = ((usize, usize), DenseMatrix)>,
    {
        let mut stored = BTreeMap::new();
        for ((row, col), block) in blocks {
            if row >= num_row_blocks || col >= num_col_blocks {
                return Err(GramError::BlockIndexOutOfRange {
                    row,
                    col,
                    num_row_blocks,
                    num_col_blocks,
                });
            }
            stored.insert((row, col), block);
        }
        Ok(Self {
            rows,
            cols,
            num_row_blocks,
            num_col_blocks,
            blocks: stored,
        })
    }

    /// Total number of rows of the logical matrix
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of columns of the logical matrix
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of block rows in the grid
    pub fn num_row_blocks(&self) -> usize {
        self.num_row_blocks
    }

    /// Number of block columns in the grid
    pub fn num_col_blocks(&self) -> usize {
        self.num_col_blocks
    }

    /// Number of blocks actually stored
    pub fn num_stored_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Get a stored block, without mirror fallback
    pub fn block(&self, row: usize, col: usize) -> Option<&DenseMatrix> {
        self.blocks.get(&(row, col))
    }

    /// Resolve the block at (row, col), reconstructing a missing entry as
    /// the transpose of its mirror
    ///
    /// Fails with [`GramError::MissingBlock`] if neither the entry nor its
    /// mirror is stored.
    pub fn resolve_block(&self, row: usize, col: usize) -> Result<DenseMatrix> {
        if let Some(block) = self.blocks.get(&(row, col)) {
            return Ok(block.clone());
        }
        self.blocks
            .get(&(col, row))
            .map(DenseMatrix::transposed)
            .ok_or(GramError::MissingBlock { row, col })
    }

    /// Iterate over the stored block entries in deterministic (row-major) order
    pub fn entries(&self) -> impl Iterator<Item = (&(usize, usize), &DenseMatrix)> {
        self.blocks.iter()
    }

    /// Materialize the full dense matrix, reconstructing missing
    /// upper-triangular blocks as transposes of their mirrors
    ///
    /// Intended for matrices that fit in memory, e.g. when handing the
    /// result to a dense linear-algebra routine or comparing against a
    /// directly-built matrix.
    pub fn to_dense(&self) -> Result<DenseMatrix> {
        if self.num_row_blocks == 0 || self.num_col_blocks == 0 {
            return Ok(DenseMatrix::zeros(self.rows, self.cols));
        }

        // Block heights and widths, read off the first grid column and row.
        let mut row_offsets = Vec::with_capacity(self.num_row_blocks);
        let mut offset = 0;
        for i in 0..self.num_row_blocks {
            row_offsets.push(offset);
            offset += self.resolve_block(i, 0)?.rows();
        }
        if offset != self.rows {
            return Err(GramError::DimensionMismatch {
                expected: self.rows,
                actual: offset,
            });
        }

        let mut col_offsets = Vec::with_capacity(self.num_col_blocks);
        let mut offset = 0;
        for j in 0..self.num_col_blocks {
            col_offsets.push(offset);
            offset += self.resolve_block(0, j)?.cols();
        }
        if offset != self.cols {
            return Err(GramError::DimensionMismatch {
                expected: self.cols,
                actual: offset,
            });
        }

        let mut dense = DenseMatrix::zeros(self.rows, self.cols);
        for i in 0..self.num_row_blocks {
            for j in 0..self.num_col_blocks {
                let block = self.resolve_block(i, j)?;
                for bi in 0..block.rows() {
                    for bj in 0..block.cols() {
                        dense.set(row_offsets[i] + bi, col_offsets[j] + bj, block.get(bi, bj));
                    }
                }
            }
        }
        Ok(dense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_matrix_get_set() {
        let mut m = DenseMatrix::zeros(2, 3);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert!(!m.is_square());

        m.set(1, 2, 5.0);
        assert_eq!(m.get(1, 2), 5.0);
        assert_eq!(m.get(0, 0), 0.0);
    }

    #[test]
    fn test_dense_matrix_from_vec() {
        let m = DenseMatrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.get(1, 0), 3.0);
        assert_eq!(m.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn test_dense_matrix_from_vec_length_mismatch() {
        let result = DenseMatrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            result,
            Err(GramError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_dense_matrix_transposed() {
        let m = DenseMatrix::from_vec(1, 2, vec![2.0, 1.0]).unwrap();
        let t = m.transposed();
        assert_eq!(t.rows(), 2);
        assert_eq!(t.cols(), 1);
        assert_eq!(t.get(0, 0), 2.0);
        assert_eq!(t.get(1, 0), 1.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_dense_matrix_index_out_of_range() {
        let m = DenseMatrix::zeros(2, 2);
        m.get(2, 0);
    }

    #[test]
    fn test_block_group() {
        let points = [1.0, 2.0, 3.0];
        let group = BlockGroup {
            index: 0,
            points: &points,
        };
        assert_eq!(group.len(), 3);
        assert!(!group.is_empty());
    }

    #[test]
    fn test_partitioned_matrix_rejects_out_of_range_block() {
        let result = PartitionedMatrix::from_blocks(
            2,
            2,
            1,
            1,
            vec![((1, 0), DenseMatrix::zeros(1, 1))],
        );
        assert!(matches!(
            result,
            Err(GramError::BlockIndexOutOfRange { row: 1, col: 0, .. })
        ));
    }

    #[test]
    fn test_partitioned_matrix_resolve_mirror() {
        let lower = DenseMatrix::from_vec(1, 2, vec![2.0, 1.0]).unwrap();
        let pm = PartitionedMatrix::from_blocks(
            3,
            3,
            2,
            2,
            vec![
                ((0, 0), DenseMatrix::from_vec(2, 2, vec![0.0, 1.0, 1.0, 0.0]).unwrap()),
                ((1, 0), lower.clone()),
                ((1, 1), DenseMatrix::zeros(1, 1)),
            ],
        )
        .unwrap();

        assert_eq!(pm.num_stored_blocks(), 3);
        assert!(pm.block(0, 1).is_none());

        // The mirror of (1, 0) is its transpose.
        let mirror = pm.resolve_block(0, 1).unwrap();
        assert_eq!(mirror, lower.transposed());
    }

    #[test]
    fn test_partitioned_matrix_missing_block() {
        let pm = PartitionedMatrix::from_blocks(2, 2, 2, 2, Vec::new()).unwrap();
        assert!(matches!(
            pm.resolve_block(0, 1),
            Err(GramError::MissingBlock { row: 0, col: 1 })
        ));
    }

    #[test]
    fn test_partitioned_matrix_to_dense() {
        let pm = PartitionedMatrix::from_blocks(
            3,
            3,
            2,
            2,
            vec![
                ((0, 0), DenseMatrix::from_vec(2, 2, vec![0.0, 1.0, 1.0, 0.0]).unwrap()),
                ((1, 0), DenseMatrix::from_vec(1, 2, vec![2.0, 1.0]).unwrap()),
                ((1, 1), DenseMatrix::zeros(1, 1)),
            ],
        )
        .unwrap();

        let dense = pm.to_dense().unwrap();
        let expected =
            DenseMatrix::from_vec(3, 3, vec![0.0, 1.0, 2.0, 1.0, 0.0, 1.0, 2.0, 1.0, 0.0])
                .unwrap();
        assert_eq!(dense, expected);
    }

    #[test]
    fn test_partitioned_matrix_empty() {
        let pm = PartitionedMatrix::from_blocks(0, 0, 0, 0, Vec::new()).unwrap();
        let dense = pm.to_dense().unwrap();
        assert_eq!(dense.rows(), 0);
        assert_eq!(dense.cols(), 0);
    }
}
