//! Error types for the node registry subsystem.

use shared_types::NodeId;
use thiserror::Error;

/// Registry error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("node already registered: {0}")]
    AlreadyRegistered(String),

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("invalid transition for node {node}: {from} -> {to}")]
    InvalidTransition {
        node: String,
        from: &'static str,
        to: &'static str,
    },

    #[error("rotation not due for another {remaining_secs}s")]
    RotationNotDue { remaining_secs: u64 },

    #[error("no backup node available for promotion")]
    NoBackupAvailable,

    #[error("replayed nonce from {node}: expected {expected}, got {got}")]
    ReplayedNonce {
        node: String,
        expected: u64,
        got: u64,
    },

    #[error("no active validator available to rotate to")]
    NoValidatorAvailable,
}

impl RegistryError {
    pub(crate) fn unknown(node: &NodeId) -> Self {
        Self::UnknownNode(shared_types::short_id(node))
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
