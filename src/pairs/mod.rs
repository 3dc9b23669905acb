//! Index-pair combination over one or two sequences
//!
//! Builders walk datasets as lazy cartesian products of `(index, element)`
//! pairs. For symmetric matrices the product is filtered to the lower
//! triangle (first index >= second index), which is the deduplication that
//! halves the work for a symmetric evaluator.

/// Lazy cartesian product of two sequences as `(index, element)` pairs
///
/// Pairs are produced in row-major order, so the sequence is deterministic
/// for fixed inputs.
pub fn cross<'a, A, B>(
    left: &'a [A],
    right: &'a [B],
) -> impl Iterator<Item = ((usize, &'a A), (usize, &'a B))> {
    left.iter().enumerate().flat_map(move |(i, a)| {
        right
            .iter()
            .enumerate()
            .map(move |(j, b)| ((i, a), (j, b)))
    })
}

/// Self cross product filtered to the lower triangle (`i >= j`)
///
/// Yields each unordered pair exactly once, diagonal included:
/// `n * (n + 1) / 2` pairs for a sequence of length `n`.
pub fn lower_triangular<T>(
    items: &[T],
) -> impl Iterator<Item = ((usize, &T), (usize, &T))> {
    cross(items, items).filter(|((i, _), (j, _))| i >= j)
}
