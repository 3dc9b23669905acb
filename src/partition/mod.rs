//! Block partitioning of datasets
//!
//! Splits a dataset into contiguous groups of a target size so that a
//! kernel matrix too large to hold as one dense allocation can be built
//! blockwise.

use crate::core::{BlockGroup, GramError, Result};

/// Split a slice into contiguous block groups of `block_size` points
///
/// Every group has `block_size` points except possibly the last, whose size
/// is the remainder. The block index of each group equals its position in
/// the returned sequence. Fails with [`GramError::InvalidBlockSize`] if
/// `block_size` is zero.
pub fn block_groups<T>(points: &[T], block_size: usize) -> Result<Vec<BlockGroup<'_, T>>> {
    if block_size == 0 {
        return Err(GramError::InvalidBlockSize(block_size));
    }
    Ok(points
        .chunks(block_size)
        .enumerate()
        .map(|(index, points)| BlockGroup { index, points })
        .collect())
}

/// Number of blocks a sequence of `len` points partitions into
///
/// `ceil(len / block_size)`; fails if `block_size` is zero.
pub fn num_blocks(len: usize, block_size: usize) -> Result<usize> {
    if block_size == 0 {
        return Err(GramError::InvalidBlockSize(block_size));
    }
    Ok(len.div_ceil(block_size))
}
