//! Blockwise kernel matrix builders
//!
//! For datasets whose Gram matrix cannot be held as one dense allocation,
//! the matrix is built block by block over a grid of block-group pairs. The
//! symmetric builder walks only the lower-triangular block grid, computing
//! diagonal blocks with the deduplicating dense builder, so evaluator calls
//! stay proportional to the lower triangle of the full matrix.
//!
//! The `*_blocks` functions expose the block entries as a lazy iterator:
//! each entry is computed on demand and is independent of the others, so a
//! storage layer may drain the iterator one block at a time or fan the
//! entries out to parallel workers.

use crate::core::{BlockGroup, DenseMatrix, PartitionedMatrix, Result};
use crate::kernel::Kernel;
use crate::{dense, pairs, partition};
use log::{debug, trace};

/// Lazy sequence of lower-triangular block entries for a symmetric kernel matrix
///
/// Partitions `points` into groups of `block_size` and yields one
/// `((block_row, block_col), block)` entry per block pair with
/// `block_row >= block_col`. Diagonal entries are built with
/// [`dense::symmetric`], off-diagonal entries with [`dense::cross`].
pub fn symmetric_blocks<'a, T, K: Kernel<T>>(
    points: &'a [T],
    block_size: usize,
    kernel: &'a K,
) -> Result<impl Iterator<Item = ((usize, usize), DenseMatrix)> + 'a> {
    let groups = partition::block_groups(points, block_size)?;
    debug!(
        "partitioned {} points into {} row blocks of size {}",
        points.len(),
        groups.len(),
        block_size
    );

    let block_pairs: Vec<(BlockGroup<'a, T>, BlockGroup<'a, T>)> =
        pairs::lower_triangular(&groups)
            .map(|((_, row), (_, col))| (*row, *col))
            .collect();

    Ok(block_pairs.into_iter().map(move |(row, col)| {
        trace!("computing block ({}, {})", row.index, col.index);
        let block = if row.index == col.index {
            dense::symmetric(row.points, kernel)
        } else {
            dense::cross(row.points, col.points, kernel)
        };
        ((row.index, col.index), block)
    }))
}

/// Build a symmetric block-partitioned kernel matrix
///
/// The dataset is partitioned with `row_block_size`; the declared block grid
/// is `ceil(L / row_block_size) x ceil(L / col_block_size)` for a dataset of
/// length `L`. The two sizes are expected to be equal for a symmetric
/// matrix; a mismatch produces a grid that cannot index the computed
/// blocks and fails at assembly.
pub fn symmetric<T, K: Kernel<T>>(
    points: &[T],
    row_block_size: usize,
    col_block_size: usize,
    kernel: &K,
) -> Result<PartitionedMatrix> {
    let num_row_blocks = partition::num_blocks(points.len(), row_block_size)?;
    let num_col_blocks = partition::num_blocks(points.len(), col_block_size)?;

    let blocks = symmetric_blocks(points, row_block_size, kernel)?;
    PartitionedMatrix::from_blocks(
        points.len(),
        points.len(),
        num_row_blocks,
        num_col_blocks,
        blocks,
    )
}

/// Lazy sequence of block entries for a rectangular kernel matrix
///
/// Partitions each dataset independently and yields one entry per pair of
/// the full block grid; the datasets are distinct, so no triangular filter
/// applies.
pub fn cross_blocks<'a, T, K: Kernel<T>>(
    left: &'a [T],
    right: &'a [T],
    row_block_size: usize,
    col_block_size: usize,
    kernel: &'a K,
) -> Result<impl Iterator<Item = ((usize, usize), DenseMatrix)> + 'a> {
    let row_groups = partition::block_groups(left, row_block_size)?;
    let col_groups = partition::block_groups(right, col_block_size)?;
    debug!(
        "partitioned {}x{} points into a {}x{} block grid",
        left.len(),
        right.len(),
        row_groups.len(),
        col_groups.len()
    );

    let block_pairs: Vec<(BlockGroup<'a, T>, BlockGroup<'a, T>)> =
        pairs::cross(&row_groups, &col_groups)
            .map(|((_, row), (_, col))| (*row, *col))
            .collect();

    Ok(block_pairs.into_iter().map(move |(row, col)| {
        trace!("computing block ({}, {})", row.index, col.index);
        let block = dense::cross(row.points, col.points, kernel);
        ((row.index, col.index), block)
    }))
}

/// Build a rectangular block-partitioned kernel matrix between two datasets
pub fn cross<T, K: Kernel<T>>(
    left: &[T],
    right: &[T],
    row_block_size: usize,
    col_block_size: usize,
    kernel: &K,
) -> Result<PartitionedMatrix> {
    let num_row_blocks = partition::num_blocks(left.len(), row_block_size)?;
    let num_col_blocks = partition::num_blocks(right.len(), col_block_size)?;

    let blocks = cross_blocks(left, right, row_block_size, col_block_size, kernel)?;
    PartitionedMatrix::from_blocks(
        left.len(),
        right.len(),
        num_row_blocks,
        num_col_blocks,
        blocks,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GramError;
    use crate::kernel::FnKernel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn abs_diff() -> FnKernel<impl Fn(&f64, &f64) -> f64> {
        FnKernel::new(|a: &f64, b: &f64| (a - b).abs())
    }

    #[test]
    fn test_symmetric_block_layout() {
        let points = [1.0, 2.0, 3.0];
        let kernel = abs_diff();
        let matrix = symmetric(&points, 2, 2, &kernel).unwrap();

        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.cols(), 3);
        assert_eq!(matrix.num_row_blocks(), 2);
        assert_eq!(matrix.num_col_blocks(), 2);
        assert_eq!(matrix.num_stored_blocks(), 3);

        // Diagonal block over [1.0, 2.0]
        let block = matrix.block(0, 0).unwrap();
        assert_eq!(block, &DenseMatrix::from_vec(2, 2, vec![0.0, 1.0, 1.0, 0.0]).unwrap());

        // Off-diagonal block: [3.0] against [1.0, 2.0], shape 1x2
        let block = matrix.block(1, 0).unwrap();
        assert_eq!(block, &DenseMatrix::from_vec(1, 2, vec![2.0, 1.0]).unwrap());

        // Diagonal block over [3.0]
        let block = matrix.block(1, 1).unwrap();
        assert_eq!(block, &DenseMatrix::from_vec(1, 1, vec![0.0]).unwrap());

        // Upper-triangular entry is not stored, only derivable as a mirror.
        assert!(matrix.block(0, 1).is_none());
    }

    #[test]
    fn test_symmetric_matches_dense_builder() {
        let points: Vec<f64> = (0..11).map(|i| i as f64 * 0.7).collect();
        let kernel = abs_diff();
        let expected = dense::symmetric(&points, &kernel);

        // Block sizes that do and do not divide the dataset length.
        for block_size in [1, 2, 3, 4, 11, 20] {
            let matrix = symmetric(&points, block_size, block_size, &kernel).unwrap();
            assert_eq!(matrix.to_dense().unwrap(), expected, "block size {block_size}");
        }
    }

    #[test]
    fn test_symmetric_evaluation_count() {
        let calls = AtomicUsize::new(0);
        let kernel = FnKernel::new(|a: &f64, b: &f64| {
            calls.fetch_add(1, Ordering::Relaxed);
            (a - b).abs()
        });

        let points: Vec<f64> = (0..7).map(|i| i as f64).collect();
        symmetric(&points, 3, 3, &kernel).unwrap();

        // Lower-triangular block pairs with deduplicated diagonal blocks
        // cover exactly the lower triangle of the full matrix.
        assert_eq!(calls.load(Ordering::Relaxed), 7 * 8 / 2);
    }

    #[test]
    fn test_symmetric_blocks_are_lazy() {
        let calls = AtomicUsize::new(0);
        let kernel = FnKernel::new(|a: &f64, b: &f64| {
            calls.fetch_add(1, Ordering::Relaxed);
            a * b
        });

        let points = [1.0, 2.0, 3.0, 4.0];
        let iter = symmetric_blocks(&points, 2, &kernel).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 0);

        let entries: Vec<_> = iter.collect();
        assert_eq!(entries.len(), 3);
        assert!(calls.load(Ordering::Relaxed) > 0);
    }

    #[test]
    fn test_symmetric_mismatched_grid_fails() {
        let points = [1.0, 2.0, 3.0, 4.0, 5.0];
        let kernel = abs_diff();
        // A column grid declared from a larger block size cannot index the
        // blocks produced by the row partition.
        let result = symmetric(&points, 2, 5, &kernel);
        assert!(matches!(result, Err(GramError::BlockIndexOutOfRange { .. })));
    }

    #[test]
    fn test_cross_matches_dense_builder() {
        let left: Vec<f64> = (0..5).map(|i| i as f64).collect();
        let right: Vec<f64> = (0..8).map(|i| i as f64 * 1.3).collect();
        let kernel = abs_diff();
        let expected = dense::cross(&left, &right, &kernel);

        for (row_size, col_size) in [(1, 1), (2, 3), (3, 2), (5, 8), (7, 10)] {
            let matrix = cross(&left, &right, row_size, col_size, &kernel).unwrap();
            assert_eq!(matrix.rows(), 5);
            assert_eq!(matrix.cols(), 8);
            assert_eq!(matrix.num_row_blocks(), partition::num_blocks(5, row_size).unwrap());
            assert_eq!(matrix.num_col_blocks(), partition::num_blocks(8, col_size).unwrap());
            assert_eq!(
                matrix.to_dense().unwrap(),
                expected,
                "block sizes ({row_size}, {col_size})"
            );
        }
    }

    #[test]
    fn test_cross_stores_full_grid() {
        let left = [1.0, 2.0, 3.0];
        let right = [4.0, 5.0];
        let kernel = abs_diff();
        let matrix = cross(&left, &right, 2, 1, &kernel).unwrap();

        // No triangular filter: all grid entries are stored.
        assert_eq!(matrix.num_stored_blocks(), 2 * 2);
    }

    #[test]
    fn test_invalid_block_size() {
        let points = [1.0];
        let kernel = abs_diff();
        assert!(matches!(
            symmetric(&points, 0, 1, &kernel),
            Err(GramError::InvalidBlockSize(0))
        ));
        assert!(matches!(
            cross(&points, &points, 1, 0, &kernel),
            Err(GramError::InvalidBlockSize(0))
        ));
    }
}
