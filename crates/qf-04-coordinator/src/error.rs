//! Unified error taxonomy exposed by the coordinator.

use qf_01_node_registry::RegistryError;
use qf_02_security_monitor::SecurityError;
use qf_03_round_manager::RoundError;
use thiserror::Error;

/// Coordinator-level errors.
///
/// All variants are recoverable, typed failures returned to the caller; none
/// crash the coordinator. A failed round is not an error at all: it
/// surfaces as [`crate::ConsensusOutcome::Failed`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("node not authorized to submit: {node}")]
    NodeNotAuthorized { node: String },

    #[error("system is paused")]
    SystemPaused,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("no feed result published yet")]
    FeedUnavailable,

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Round(#[from] RoundError),
}

/// Result type for coordinator operations.
pub type OracleResult<T> = Result<T, OracleError>;
