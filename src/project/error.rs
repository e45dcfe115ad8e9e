//! Error types for project persistence.
//!
//! Geometry-layer issues never reach this taxonomy; they are recovered
//! locally by clamping. These errors cover the container only.

use thiserror::Error;

/// Errors that can occur while saving or loading a project container.
#[derive(Error, Debug)]
pub enum ProjectError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error from serde_json
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The file is not a markboard container (missing or garbled header,
    /// undecompressable payload)
    #[error("corrupt container: {0}")]
    Corrupt(String),

    /// The version tag was recognized as foreign and the body could not be
    /// salvaged even partially
    #[error("unsupported container version: {found}")]
    VersionMismatch { found: String },
}

/// Result type alias for persistence operations.
pub type ProjectResult<T> = Result<T, ProjectError>;
