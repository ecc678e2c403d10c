//! Core error types for liftstat.

use thiserror::Error;

/// Core error type for liftstat model operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid configuration (resort descriptors, aggregation rules).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Data that violates a model invariant.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A name pattern could not be compiled.
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
