//! # Oracle Event Taxonomy
//!
//! Events emitted by the coordinator for dashboards and loggers. Delivery is
//! fire-and-forget: the core never waits on a consumer.

use crate::entities::{FeedResult, NodeId};
use serde::{Deserialize, Serialize};

/// Events published through the [`crate::ports::EventSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleEvent {
    /// A submission was accepted into the current round.
    DataSubmitted { node_id: NodeId, round_id: u64 },
    /// A round reached quorum and published a result.
    ConsensusReached { result: FeedResult },
    /// A round missed quorum at its deadline. Expected outcome, not an error.
    ConsensusFailed { round_id: u64, submissions: u32 },
    /// A backup node was promoted into the active validator set.
    BackupNodeActivated { node_id: NodeId },
    /// Manual incident-response pause engaged.
    EmergencyPaused,
    /// Manual pause lifted.
    EmergencyUnpaused,
    /// An admin-tunable parameter changed.
    ConfigurationUpdated { parameter: String },
}
