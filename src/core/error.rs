//! Error types for kernel matrix construction

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GramError {
    #[error("Invalid block size: {0} (must be positive)")]
    InvalidBlockSize(usize),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Block index ({row}, {col}) outside block grid {num_row_blocks}x{num_col_blocks}")]
    BlockIndexOutOfRange {
        row: usize,
        col: usize,
        num_row_blocks: usize,
        num_col_blocks: usize,
    },

    #[error("No block stored at ({row}, {col}) or its mirror")]
    MissingBlock { row: usize, col: usize },

    #[error(
        "Eigenvector matrix is {rows}x{cols}, expected {expected_rows} rows \
         (one per prototype) and {expected_cols} columns (one per eigenvalue)"
    )]
    EigenShapeMismatch {
        rows: usize,
        cols: usize,
        expected_rows: usize,
        expected_cols: usize,
    },

    #[error("Non-positive eigenvalue {value} at index {index}")]
    NonPositiveEigenvalue { index: usize, value: f64 },

    #[error("Empty prototype set")]
    EmptyPrototypes,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, GramError>;
