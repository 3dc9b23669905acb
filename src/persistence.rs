//! Feature-map serialization and persistence
//!
//! A fitted Nystrom feature map is a model: prototypes, eigenpairs and the
//! kernel they were computed with. This module saves and loads such models
//! as JSON so an embedding fitted once can be reused across processes.
//! Block-partitioned matrices are deliberately not serialized here: how
//! blocks are persisted is the storage layer's concern.

use crate::core::{DenseMatrix, GramError, Result};
use crate::kernel::{Kernel, LinearKernel, PolynomialKernel, RbfKernel};
use crate::nystrom::{EigenDecomposition, NystromFeatureMap};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable description of a kernel over dense real-vector points
///
/// Doubles as an evaluator: it implements [`Kernel`] by dispatching to the
/// concrete kernel it describes, so a loaded model is immediately usable.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KernelSpec {
    Linear,
    Rbf { gamma: f64 },
    Polynomial { gamma: f64, coef0: f64, degree: u32 },
}

impl KernelSpec {
    /// Kernel type identifier used in serialized form and summaries
    pub fn name(&self) -> &'static str {
        match self {
            KernelSpec::Linear => "linear",
            KernelSpec::Rbf { .. } => "rbf",
            KernelSpec::Polynomial { .. } => "polynomial",
        }
    }

    /// Check the parameters a deserialized spec carries
    fn validate(&self) -> Result<()> {
        match *self {
            KernelSpec::Linear => Ok(()),
            KernelSpec::Rbf { gamma } => {
                if gamma > 0.0 {
                    Ok(())
                } else {
                    Err(GramError::InvalidParameter(format!(
                        "RBF gamma must be positive, got {gamma}"
                    )))
                }
            }
            KernelSpec::Polynomial { gamma, degree, .. } => {
                if gamma > 0.0 && degree > 0 {
                    Ok(())
                } else {
                    Err(GramError::InvalidParameter(format!(
                        "Polynomial kernel needs positive gamma and degree, got gamma {gamma}, degree {degree}"
                    )))
                }
            }
        }
    }
}

impl Kernel<Vec<f64>> for KernelSpec {
    fn compute(&self, x: &Vec<f64>, y: &Vec<f64>) -> f64 {
        match *self {
            KernelSpec::Linear => LinearKernel::new().compute(x, y),
            KernelSpec::Rbf { gamma } => RbfKernel::new(gamma).compute(x, y),
            KernelSpec::Polynomial {
                gamma,
                coef0,
                degree,
            } => PolynomialKernel::new(degree, gamma, coef0).compute(x, y),
        }
    }
}

/// Serializable representation of a fitted Nystrom feature map
#[derive(Serialize, Deserialize)]
pub struct SerializableNystromMap {
    /// Prototype points
    pub prototypes: Vec<Vec<f64>>,
    /// Eigenvalues of the prototype kernel matrix
    pub eigenvalues: Vec<f64>,
    /// Eigenvector matrix, one row per prototype
    pub eigenvectors: DenseMatrix,
    /// Kernel the eigendecomposition was computed with
    pub kernel: KernelSpec,
    /// Model metadata
    pub metadata: MapMetadata,
}

/// Model metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct MapMetadata {
    /// Library version used to create the model
    pub library_version: String,
    /// Number of prototypes
    pub prototype_count: usize,
    /// Dimension of the feature embedding
    pub feature_dim: usize,
    /// Creation timestamp
    pub created_at: String,
}

impl SerializableNystromMap {
    /// Create a serializable model from a fitted feature map
    pub fn from_feature_map(map: &NystromFeatureMap<Vec<f64>, KernelSpec>) -> Self {
        Self {
            prototypes: map.prototypes().to_vec(),
            eigenvalues: map.eigenvalues().to_vec(),
            eigenvectors: map.eigenvectors().clone(),
            kernel: *map.kernel(),
            metadata: MapMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                prototype_count: map.prototype_count(),
                feature_dim: map.dim(),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save the model to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(GramError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| GramError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load a model from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(GramError::IoError)?;
        let reader = BufReader::new(file);
        let model = serde_json::from_reader(reader)
            .map_err(|e| GramError::SerializationError(e.to_string()))?;
        Ok(model)
    }

    /// Rebuild the usable feature map, revalidating everything a hand-edited
    /// or corrupted file could violate
    pub fn into_feature_map(self) -> Result<NystromFeatureMap<Vec<f64>, KernelSpec>> {
        self.kernel.validate()?;
        let eigen = EigenDecomposition::new(self.eigenvalues, self.eigenvectors)?;
        NystromFeatureMap::new(self.kernel, self.prototypes, eigen)
    }
}
