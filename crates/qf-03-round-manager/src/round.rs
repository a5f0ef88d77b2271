//! Round domain entities.

use serde::{Deserialize, Serialize};
use shared_types::{FeeBps, FeedResult, NodeId};
use std::collections::BTreeMap;

/// Lifecycle phase of a consensus round.
///
/// `Finalized` and `Failed` are terminal; the round becomes immutable and
/// the coordinator opens a successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Accepting submissions until quorum or the deadline.
    Open,
    /// Window elapsed or quorum reached; no new submissions.
    Closed,
    /// Result computed and published.
    Finalized,
    /// Quorum not met by the deadline. Expected outcome, not an error.
    Failed,
}

impl RoundPhase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Finalized => "Finalized",
            Self::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Failed)
    }
}

/// One node's fee report for a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub node_id: NodeId,
    /// CEX trading fees in basis points, exchange order preserved.
    pub cex_fees: Vec<FeeBps>,
    /// DEX trading fees in basis points, venue order preserved.
    pub dex_fees: Vec<FeeBps>,
    pub signature: Vec<u8>,
    pub nonce: u64,
    pub submitted_at: u64,
}

/// One consensus round.
///
/// Uses a `BTreeMap` keyed by node id so iteration (and therefore result
/// computation) is deterministic across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub round_id: u64,
    pub started_at: u64,
    /// `started_at + submission_window`.
    pub deadline: u64,
    pub phase: RoundPhase,
    pub submissions: BTreeMap<NodeId, Submission>,
    pub result: Option<FeedResult>,
}

impl Round {
    pub fn open(round_id: u64, started_at: u64, submission_window_secs: u64) -> Self {
        Self {
            round_id,
            started_at,
            deadline: started_at + submission_window_secs,
            phase: RoundPhase::Open,
            submissions: BTreeMap::new(),
            result: None,
        }
    }

    pub fn consensus_reached(&self) -> bool {
        self.phase == RoundPhase::Finalized
    }

    /// Read-only snapshot for the coordinator's status API.
    pub fn info(&self) -> RoundInfo {
        RoundInfo {
            round_id: self.round_id,
            started_at: self.started_at,
            deadline: self.deadline,
            phase: self.phase,
            submissions: self.submissions.len() as u32,
        }
    }
}

/// Committed snapshot of round status, safe to hand out to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundInfo {
    pub round_id: u64,
    pub started_at: u64,
    pub deadline: u64,
    pub phase: RoundPhase,
    pub submissions: u32,
}
