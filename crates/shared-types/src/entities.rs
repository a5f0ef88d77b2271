//! # Core Domain Entities
//!
//! Identifiers, fee units, and the published feed entity shared by all
//! oracle subsystems.

use serde::{Deserialize, Serialize};

/// A 32-byte hash (Keccak-256 over the canonical submission encoding).
pub type Hash = [u8; 32];

/// Unique identifier for a reporting node (public-key hash).
pub type NodeId = [u8; 32];

/// Identifier for a downstream protocol consuming the feed.
pub type ProtocolId = [u8; 32];

/// Fee value in basis points (1 bps = 0.01%).
pub type FeeBps = u32;

/// Upper bound for any reported fee value: 10,000 bps = 100%.
pub const MAX_FEE_BPS: FeeBps = 10_000;

/// Decimal places used by the legacy feed `answer` encoding.
pub const ANSWER_DECIMALS: u32 = 8;

/// Render a node id as a short hex prefix for logging.
pub fn short_id(id: &NodeId) -> String {
    hex::encode(&id[..4])
}

/// The authoritative agreed fee value for one finalized round.
///
/// Immutable once published; each new round's result supersedes (never
/// overwrites) the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedResult {
    /// Round that produced this result.
    pub round_id: u64,
    /// Equal-weight median of the nodes' reported CEX fees (bps).
    pub weighted_median_cex_fee: FeeBps,
    /// Equal-weight median of the nodes' reported DEX fees (bps).
    pub weighted_median_dex_fee: FeeBps,
    /// Number of distinct nodes whose submissions entered the median.
    pub participating_nodes: u32,
    /// Publication timestamp (unix seconds), strictly increasing across
    /// published results.
    pub timestamp: u64,
}

impl FeedResult {
    /// Combined CEX+DEX fee rescaled from 4-decimal basis points to the
    /// fixed legacy feed scale.
    pub fn combined_answer(&self) -> i128 {
        let combined = self.weighted_median_cex_fee as i128 + self.weighted_median_dex_fee as i128;
        combined * 10i128.pow(ANSWER_DECIMALS - 4)
    }
}
