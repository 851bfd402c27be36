//! Error type shared by the barcode pipeline, the pairwise distances and the
//! peripheral utilities.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TdaError {
    /// A distance queried during density conversion was never observed in the
    /// matrix the table was built from.
    #[error("distance value {value} not found in edge-density table")]
    ValueNotFound { value: f64 },

    #[error("incompatible shapes for feature `{key}`: expected length {expected}, found {found}")]
    ShapeMismatch {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("no trial provides a value for feature `{key}`")]
    EmptyStack { key: String },

    #[error("invalid matrix: {0}")]
    InvalidMatrix(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("trial {trial} has no barcode for dimension {dimension}")]
    MissingDimension { dimension: String, trial: usize },

    #[error("index {index} out of range for {len} trials")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("plot error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, TdaError>;
