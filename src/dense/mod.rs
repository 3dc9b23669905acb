//! Dense kernel matrix builders
//!
//! Builds the full matrix of pairwise kernel evaluations over one dataset
//! (symmetric) or two datasets (rectangular). The symmetric builder
//! evaluates each unordered index pair exactly once and mirrors the stored
//! value, so `K[i][j]` and `K[j][i]` are the same double: exact numeric
//! symmetry even for evaluators whose floating-point result depends on
//! argument order.

use crate::core::DenseMatrix;
use crate::kernel::Kernel;
use crate::pairs;
use std::collections::HashMap;

/// Build the symmetric `n x n` kernel matrix over one dataset
///
/// Evaluator call count is exactly `n * (n + 1) / 2`: one pass over the
/// lower-triangular index pairs fills a map keyed by `(i, j), i >= j`, and a
/// second pass writes each stored value into its cell and its mirror cell.
pub fn symmetric<T, K: Kernel<T>>(points: &[T], kernel: &K) -> DenseMatrix {
    let n = points.len();
    let mut values = HashMap::with_capacity(n * (n + 1) / 2);

    for ((i, a), (j, b)) in pairs::lower_triangular(points) {
        values.insert((i, j), kernel.compute(a, b));
    }

    let mut matrix = DenseMatrix::zeros(n, n);
    for (&(i, j), &value) in &values {
        matrix.set(i, j, value);
        if i != j {
            matrix.set(j, i, value);
        }
    }
    matrix
}

/// Build the rectangular `n1 x n2` kernel matrix between two datasets
///
/// Every pair is evaluated independently (`n1 * n2` evaluator calls); no
/// symmetry is assumed since the datasets are in general distinct.
pub fn cross<T, K: Kernel<T>>(left: &[T], right: &[T], kernel: &K) -> DenseMatrix {
    let mut matrix = DenseMatrix::zeros(left.len(), right.len());
    for ((i, a), (j, b)) in pairs::cross(left, right) {
        matrix.set(i, j, kernel.compute(a, b));
    }
    matrix
}
