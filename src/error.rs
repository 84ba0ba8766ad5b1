//! Error types for the workflow designer

use thiserror::Error;

/// Result type alias using DesignerError
pub type Result<T> = std::result::Result<T, DesignerError>;

/// Errors that can occur while designing or simulating a workflow
#[derive(Debug, Error)]
pub enum DesignerError {
    /// Workflow import failed
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Simulation backend failed
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while importing a workflow document.
///
/// Import is all-or-nothing: when one of these is returned, the existing
/// workflow has not been mutated.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Input is not valid JSON, or a node/edge record failed to parse
    #[error("Invalid workflow JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Input parsed but is not a workflow document
    #[error("Unexpected workflow shape: {0}")]
    Shape(String),
}

impl ImportError {
    /// Create a shape error with a message
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }
}

/// Errors raised by a simulation backend.
///
/// A failed simulation produces no partial trace, and the workflow that was
/// submitted remains valid and re-simulatable.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Backend or transport failure
    #[error("Simulation backend error: {0}")]
    Backend(String),

    /// Simulation was cancelled before a result was produced
    #[error("Simulation cancelled")]
    Cancelled,
}

impl SimulationError {
    /// Create a backend error with a message
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}
