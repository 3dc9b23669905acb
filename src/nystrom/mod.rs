//! Nystrom approximate feature maps
//!
//! The Nystrom method projects a point into the eigenspace of a kernel
//! matrix computed over a fixed prototype set, yielding a finite-dimensional
//! feature embedding whose inner products approximate kernel values:
//!
//! φ(x)_i = (1 / √λ_i) * Σ_k K(p_k, x) * V[k][i]
//!
//! The eigendecomposition itself is an input; computing it is the job of a
//! linear-algebra backend, not this crate.

use crate::core::{DenseMatrix, GramError, Result};
use crate::kernel::Kernel;
use log::debug;

/// Eigendecomposition of a kernel matrix, supplied by the caller
///
/// `vectors` holds one eigenvector per column: row `k` corresponds to
/// prototype `k`, column `i` to eigenvalue `values[i]`.
#[derive(Clone, Debug)]
pub struct EigenDecomposition {
    values: Vec<f64>,
    vectors: DenseMatrix,
}

impl EigenDecomposition {
    /// Create an eigendecomposition from eigenvalues and an eigenvector matrix
    ///
    /// Fails with [`GramError::DimensionMismatch`] if the matrix does not
    /// have one column per eigenvalue.
    pub fn new(values: Vec<f64>, vectors: DenseMatrix) -> Result<Self> {
        if vectors.cols() != values.len() {
            return Err(GramError::DimensionMismatch {
                expected: values.len(),
                actual: vectors.cols(),
            });
        }
        Ok(Self { values, vectors })
    }

    /// The eigenvalues
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The eigenvector matrix (one eigenvector per column)
    pub fn vectors(&self) -> &DenseMatrix {
        &self.vectors
    }

    /// Number of eigenpairs, i.e. the dimension of the feature embedding
    pub fn dim(&self) -> usize {
        self.values.len()
    }
}

/// Approximate feature embedding derived from a sampled kernel matrix
///
/// Holds the kernel, the prototype set and the eigendecomposition of the
/// prototypes' kernel matrix. Construction validates all shape and
/// positivity preconditions, so `transform` itself cannot fail and never
/// produces non-finite output from the eigenvalue scaling.
pub struct NystromFeatureMap<T, K> {
    kernel: K,
    prototypes: Vec<T>,
    eigenvalues: Vec<f64>,
    eigenvectors: DenseMatrix,
    // Precomputed 1/sqrt(lambda_i) factors
    scale: Vec<f64>,
}

impl<T, K: Kernel<T>> NystromFeatureMap<T, K> {
    /// Build a feature map from a kernel, a prototype set and the
    /// eigendecomposition of the prototypes' kernel matrix
    ///
    /// Fails if the prototype set is empty, if the eigenvector matrix does
    /// not have one row per prototype, or if any eigenvalue is not strictly
    /// positive. Rejecting non-positive eigenvalues up front replaces the
    /// non-finite values that `1/√λ` would otherwise silently inject into
    /// every embedding; callers truncating a decomposition should drop
    /// non-positive eigenpairs before constructing the map.
    pub fn new(kernel: K, prototypes: Vec<T>, eigen: EigenDecomposition) -> Result<Self> {
        if prototypes.is_empty() {
            return Err(GramError::EmptyPrototypes);
        }

        let EigenDecomposition { values, vectors } = eigen;
        if vectors.rows() != prototypes.len() {
            return Err(GramError::EigenShapeMismatch {
                rows: vectors.rows(),
                cols: vectors.cols(),
                expected_rows: prototypes.len(),
                expected_cols: values.len(),
            });
        }

        for (index, &value) in values.iter().enumerate() {
            if value <= 0.0 {
                return Err(GramError::NonPositiveEigenvalue { index, value });
            }
        }

        let scale: Vec<f64> = values.iter().map(|v| 1.0 / v.sqrt()).collect();
        debug!(
            "fitted Nystrom feature map: {} prototypes -> {} dimensions",
            prototypes.len(),
            values.len()
        );

        Ok(Self {
            kernel,
            prototypes,
            eigenvalues: values,
            eigenvectors: vectors,
            scale,
        })
    }

    /// Dimension of the produced feature vectors
    pub fn dim(&self) -> usize {
        self.eigenvalues.len()
    }

    /// Number of prototypes
    pub fn prototype_count(&self) -> usize {
        self.prototypes.len()
    }

    /// The eigenvalues of the prototype kernel matrix
    pub fn eigenvalues(&self) -> &[f64] {
        &self.eigenvalues
    }

    /// The eigenvector matrix (one row per prototype)
    pub fn eigenvectors(&self) -> &DenseMatrix {
        &self.eigenvectors
    }

    /// The prototype set
    pub fn prototypes(&self) -> &[T] {
        &self.prototypes
    }

    /// The kernel
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Embed a point into the approximate feature space
    ///
    /// Evaluates the kernel row against the prototypes, projects it through
    /// the eigenvector columns and scales each coordinate by `1/√λ_i`.
    pub fn transform(&self, x: &T) -> Vec<f64> {
        let mut phi = vec![0.0; self.dim()];
        for (k, prototype) in self.prototypes.iter().enumerate() {
            let row_value = self.kernel.compute(prototype, x);
            for (i, coordinate) in phi.iter_mut().enumerate() {
                *coordinate += row_value * self.eigenvectors.get(k, i);
            }
        }
        for (coordinate, factor) in phi.iter_mut().zip(&self.scale) {
            *coordinate *= factor;
        }
        phi
    }

    /// Embed a batch of points
    pub fn transform_batch(&self, points: &[T]) -> Vec<Vec<f64>> {
        points.iter().map(|x| self.transform(x)).collect()
    }
}
