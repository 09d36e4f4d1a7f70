//! Error types for refrax.
//!
//! All crates return `RefraxResult<T>` from fallible operations.
//! Every failure is terminal for a design run; nothing is retried.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for refrax.
#[derive(Debug, Error)]
pub enum RefraxError {
    /// Configuration value is missing, malformed or out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A density image could not be opened or decoded.
    #[error("Failed to load image {}: {reason}", path.display())]
    ImageLoad {
        path: PathBuf,
        reason: String,
    },

    /// A vector fell below the minimum norm during normalization.
    #[error("Degenerate geometry at sample {index}: {context}")]
    DegenerateGeometry {
        index: usize,
        context: String,
    },

    /// The transport or normal-integration solver failed.
    #[error("Solver error: {0}")]
    Solver(String),

    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RefraxError {
    /// Returns true for errors raised while reading input files.
    pub fn is_io(&self) -> bool {
        matches!(self, RefraxError::Io(_) | RefraxError::ImageLoad { .. })
    }
}

/// Convenience alias for `Result<T, RefraxError>`.
pub type RefraxResult<T> = Result<T, RefraxError>;
