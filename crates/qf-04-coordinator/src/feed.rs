//! Read-side views: legacy feed encoding, health, and freshness.

use serde::{Deserialize, Serialize};

/// Legacy price-feed-compatible view of the latest published result.
///
/// `answer` is the combined CEX+DEX fee at a fixed 8-decimal scale so
/// existing feed consumers can ingest it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestRoundData {
    pub round_id: u64,
    pub answer: i128,
    pub started_at: u64,
    pub updated_at: u64,
    pub answered_in_round: u64,
}

/// Snapshot of overall oracle health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleHealth {
    /// False when paused or when the active+backup pool can no longer reach
    /// the consensus threshold. A standing failure here is the signal that
    /// quorum must be regained by re-registering nodes; it is never a crash.
    pub is_healthy: bool,
    /// Whether the most recent terminal round reached consensus.
    pub consensus_reached: bool,
    pub active_nodes: u32,
    pub last_consensus_time: u64,
}

/// Snapshot of feed freshness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFreshness {
    pub is_fresh: bool,
    pub last_update_time: u64,
    pub staleness_threshold_secs: u64,
}
