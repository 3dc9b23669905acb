//! Core types for kernel matrix construction

pub mod error;
pub mod types;

pub use self::error::*;
pub use self::types::*;
