//! RBF (Radial Basis Function) kernel implementation
//!
//! The RBF kernel is defined as: K(x, y) = exp(-γ * ||x - y||²)
//! where γ (gamma) is a hyperparameter that controls the kernel width.

use crate::kernel::Kernel;

/// RBF (Radial Basis Function) kernel: K(x, y) = exp(-γ * ||x - y||²)
///
/// The gamma parameter controls the "reach" of each point:
/// - High gamma: only close points are similar (narrow kernel)
/// - Low gamma: distant points remain similar (wide kernel)
///
/// Common gamma values:
/// - 1.0 / n_features: good default starting point
/// - Manual tuning based on downstream validation performance
#[derive(Debug, Clone, Copy)]
pub struct RbfKernel {
    gamma: f64,
}

impl RbfKernel {
    /// Create a new RBF kernel with specified gamma parameter
    ///
    /// # Arguments
    /// * `gamma` - The gamma parameter (must be positive)
    ///
    /// # Panics
    /// Panics if gamma is not positive
    pub fn new(gamma: f64) -> Self {
        assert!(gamma > 0.0, "Gamma must be positive, got: {}", gamma);
        Self { gamma }
    }

    /// Create RBF kernel with gamma = 1.0 / n_features
    ///
    /// # Arguments
    /// * `n_features` - Number of features in the dataset
    ///
    /// # Panics
    /// Panics if `n_features` is zero
    pub fn with_auto_gamma(n_features: usize) -> Self {
        assert!(n_features > 0, "Number of features must be positive");
        Self::new(1.0 / n_features as f64)
    }

    /// Create RBF kernel with gamma = 1.0 (unit gamma)
    ///
    /// Useful for normalized data where feature variance is around 1.
    pub fn unit_gamma() -> Self {
        Self::new(1.0)
    }

    /// Get the gamma parameter
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for RbfKernel {
    /// Default RBF kernel with gamma = 1.0
    fn default() -> Self {
        Self::unit_gamma()
    }
}

impl<P: AsRef<[f64]>> Kernel<P> for RbfKernel {
    fn compute(&self, x: &P, y: &P) -> f64 {
        let squared_distance = squared_euclidean_distance(x.as_ref(), y.as_ref());
        (-self.gamma * squared_distance).exp()
    }
}

/// Squared Euclidean distance ||x - y||² between two dense vectors
pub(crate) fn squared_euclidean_distance(x: &[f64], y: &[f64]) -> f64 {
    x.iter()
        .zip(y.iter())
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum()
}
