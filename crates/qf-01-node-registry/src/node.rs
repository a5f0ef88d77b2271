//! Node domain entities: lifecycle states and per-node bookkeeping.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_types::NodeId;

/// Lifecycle state of a reporting node.
///
/// Unregistered is modelled as absence from the registry. Exactly one node
/// holds `ActiveSubmitter` among the active set; the rest of the active set
/// is `ActiveValidator`. Backups are registered but do not participate until
/// promoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeState {
    /// Registered but not yet assigned a role.
    Registered,
    /// The one node currently allowed to lead submissions.
    ActiveSubmitter,
    /// Active participant validating and submitting fee data.
    ActiveValidator,
    /// Held in reserve; promoted when active capacity is lost.
    Backup,
    /// Temporarily excluded after misbehavior; may be reinstated.
    Suspended,
    /// Permanently excluded after repeated suspensions; removal only.
    Jailed,
}

impl NodeState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "Registered",
            Self::ActiveSubmitter => "ActiveSubmitter",
            Self::ActiveValidator => "ActiveValidator",
            Self::Backup => "Backup",
            Self::Suspended => "Suspended",
            Self::Jailed => "Jailed",
        }
    }

    /// Whether a node in this state may submit fee data.
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::ActiveSubmitter | Self::ActiveValidator)
    }
}

/// Role requested when activating a registered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveRole {
    Submitter,
    Validator,
    Backup,
}

/// Why a node was suspended. Fed into the event log and used to decide
/// jailing on repeat offenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuspensionReason {
    ReplayAttack,
    Flooding,
    StaleData,
    Manual,
}

/// Operator-supplied registration metadata.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    /// Human-readable operator name.
    pub name: String,
    /// Reporting endpoint, informational only.
    pub endpoint: String,
    /// Registered verification key bytes (algorithm-agnostic; interpreted by
    /// the injected signature verifier).
    #[serde_as(as = "Bytes")]
    pub public_key: [u8; 32],
}

/// Per-node registry record.
///
/// Created on registration, mutated only by the registry, logically
/// destroyed by permanent removal. Round processing never touches it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub state: NodeState,
    pub metadata: NodeMetadata,
    /// Unix timestamp of registration; defines rotation order.
    pub registered_at: u64,
    /// Highest nonce accepted from this node. Next expected is `+ 1`.
    pub last_nonce: u64,
    /// How many times this node has been suspended.
    pub suspension_count: u32,
}

impl NodeRecord {
    pub fn new(id: NodeId, metadata: NodeMetadata, registered_at: u64) -> Self {
        Self {
            id,
            state: NodeState::Registered,
            metadata,
            registered_at,
            last_nonce: 0,
            suspension_count: 0,
        }
    }

    /// Next nonce this node must use.
    pub fn next_nonce(&self) -> u64 {
        self.last_nonce + 1
    }
}
