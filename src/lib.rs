//! Rust implementation of kernel (Gram) matrix construction
//!
//! Builds the matrices used by kernel-based learning methods: dense
//! symmetric and rectangular kernel matrices, block-partitioned matrices
//! computed blockwise for datasets too large to hold as one allocation, and
//! Nystrom approximate feature maps derived from an eigendecomposition of a
//! sampled kernel matrix.

pub mod block;
pub mod core;
pub mod dense;
pub mod kernel;
pub mod nystrom;
pub mod pairs;
pub mod partition;
pub mod persistence;

// Re-export main types for convenience
pub use crate::core::error::{GramError, Result};
pub use crate::core::types::{BlockGroup, DenseMatrix, PartitionedMatrix};
pub use crate::kernel::{FnKernel, Kernel, LinearKernel, PolynomialKernel, RbfKernel};
pub use crate::nystrom::{EigenDecomposition, NystromFeatureMap};
pub use crate::persistence::{KernelSpec, SerializableNystromMap};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
