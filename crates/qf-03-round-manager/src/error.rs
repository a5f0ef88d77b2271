//! Error types for the round manager subsystem.

use shared_types::FeeBps;
use thiserror::Error;

/// Round submission errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("submission window closed for round {round_id}")]
    SubmissionWindowClosed { round_id: u64 },

    #[error("duplicate submission from node {node} in round {round_id}")]
    DuplicateSubmission { node: String, round_id: u64 },

    #[error("invalid fee data: {reason}")]
    InvalidDataSubmission { reason: String },
}

impl RoundError {
    pub(crate) fn out_of_range(value: FeeBps) -> Self {
        Self::InvalidDataSubmission {
            reason: format!("fee value {value} exceeds 10000 bps"),
        }
    }

    pub(crate) fn empty_vector(which: &str) -> Self {
        Self::InvalidDataSubmission {
            reason: format!("{which} fee vector is empty"),
        }
    }
}

/// Result type for round operations.
pub type RoundResult<T> = Result<T, RoundError>;
