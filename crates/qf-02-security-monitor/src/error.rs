//! Error types for the security monitor subsystem.

use thiserror::Error;

/// Security validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SecurityError {
    #[error("invalid signature from node {node}")]
    InvalidSignature { node: String },

    #[error("replayed submission from node {node}")]
    ReplayDetected { node: String },

    #[error("system paused at threat level {threat_level}")]
    SystemPaused { threat_level: u8 },
}

/// Result type for security operations.
pub type SecurityResult<T> = Result<T, SecurityError>;
