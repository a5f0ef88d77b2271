//! The node registry: authoritative node state, rotation, and nonce ledger.

use crate::error::{RegistryError, RegistryResult};
use crate::node::{ActiveRole, NodeMetadata, NodeRecord, NodeState, SuspensionReason};
use serde::{Deserialize, Serialize};
use shared_types::{short_id, NodeId};
use std::collections::HashMap;
use tracing::{info, warn};

/// Registry tuning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Minimum seconds between voluntary submitter rotations.
    pub rotation_interval_secs: u64,
    /// Suspensions after which a node is jailed permanently.
    pub jail_threshold: u32,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            rotation_interval_secs: 3600,
            jail_threshold: 3,
        }
    }
}

/// Authoritative source of node identity and lifecycle state.
///
/// Enforces the single-submitter invariant: at most one node holds
/// `ActiveSubmitter` in any reachable state. Rotation is deterministic
/// round-robin over the active validators in registration order.
#[derive(Debug)]
pub struct NodeRegistry {
    config: RegistryConfig,
    nodes: HashMap<NodeId, NodeRecord>,
    /// Registration order; defines the rotation sequence.
    registration_order: Vec<NodeId>,
    current_submitter: Option<NodeId>,
    last_rotation: u64,
}

impl NodeRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            nodes: HashMap::new(),
            registration_order: Vec::new(),
            current_submitter: None,
            last_rotation: 0,
        }
    }

    // === LIFECYCLE ===

    /// Register a new node in `Registered` state.
    pub fn register(
        &mut self,
        node_id: NodeId,
        metadata: NodeMetadata,
        now: u64,
    ) -> RegistryResult<()> {
        if self.nodes.contains_key(&node_id) {
            return Err(RegistryError::AlreadyRegistered(short_id(&node_id)));
        }

        self.nodes
            .insert(node_id, NodeRecord::new(node_id, metadata, now));
        self.registration_order.push(node_id);
        info!(node = %short_id(&node_id), "node registered");
        Ok(())
    }

    /// Transition a `Registered` node into an active or backup role.
    pub fn activate(&mut self, node_id: NodeId, role: ActiveRole, now: u64) -> RegistryResult<()> {
        let target = match role {
            ActiveRole::Submitter => NodeState::ActiveSubmitter,
            ActiveRole::Validator => NodeState::ActiveValidator,
            ActiveRole::Backup => NodeState::Backup,
        };

        // Single-submitter invariant: reject a second submitter outright.
        if role == ActiveRole::Submitter && self.current_submitter.is_some() {
            let record = self
                .nodes
                .get(&node_id)
                .ok_or_else(|| RegistryError::unknown(&node_id))?;
            return Err(RegistryError::InvalidTransition {
                node: short_id(&node_id),
                from: record.state.as_str(),
                to: target.as_str(),
            });
        }

        let record = self
            .nodes
            .get_mut(&node_id)
            .ok_or_else(|| RegistryError::unknown(&node_id))?;

        if record.state != NodeState::Registered {
            return Err(RegistryError::InvalidTransition {
                node: short_id(&node_id),
                from: record.state.as_str(),
                to: target.as_str(),
            });
        }

        record.state = target;
        if role == ActiveRole::Submitter {
            self.current_submitter = Some(node_id);
            self.last_rotation = now;
        }
        info!(node = %short_id(&node_id), state = target.as_str(), "node activated");
        Ok(())
    }

    /// Rotate the submitter role round-robin; fails with `RotationNotDue`
    /// before `rotation_interval_secs` have elapsed since the last rotation.
    pub fn rotate_submitter(&mut self, now: u64) -> RegistryResult<NodeId> {
        let due_at = self.last_rotation + self.config.rotation_interval_secs;
        if now < due_at {
            return Err(RegistryError::RotationNotDue {
                remaining_secs: due_at - now,
            });
        }
        self.force_rotate(self.current_submitter, now)
    }

    /// Whether enough time has passed for a voluntary rotation.
    pub fn rotation_due(&self, now: u64) -> bool {
        now >= self.last_rotation + self.config.rotation_interval_secs
    }

    /// Rotate immediately, bypassing the interval check. `after` anchors the
    /// round-robin scan; used when the current submitter is suspended or
    /// removed and can no longer anchor it itself.
    fn force_rotate(&mut self, after: Option<NodeId>, now: u64) -> RegistryResult<NodeId> {
        let previous = self.current_submitter;
        let next = self
            .next_validator_after(after.as_ref())
            .ok_or(RegistryError::NoValidatorAvailable)?;

        if let Some(prev_id) = previous {
            if let Some(record) = self.nodes.get_mut(&prev_id) {
                if record.state == NodeState::ActiveSubmitter {
                    record.state = NodeState::ActiveValidator;
                }
            }
        }

        if let Some(record) = self.nodes.get_mut(&next) {
            record.state = NodeState::ActiveSubmitter;
        }
        self.current_submitter = Some(next);
        self.last_rotation = now;
        info!(node = %short_id(&next), "submitter rotated");
        Ok(next)
    }

    /// Suspend an active node. Suspending the current submitter immediately
    /// rotates the role to the next validator (or clears it when none
    /// remain). A node suspended `jail_threshold` times is jailed.
    pub fn suspend(
        &mut self,
        node_id: NodeId,
        reason: SuspensionReason,
        now: u64,
    ) -> RegistryResult<()> {
        let jail_threshold = self.config.jail_threshold;
        let record = self
            .nodes
            .get_mut(&node_id)
            .ok_or_else(|| RegistryError::unknown(&node_id))?;

        if !matches!(
            record.state,
            NodeState::ActiveSubmitter | NodeState::ActiveValidator
        ) {
            return Err(RegistryError::InvalidTransition {
                node: short_id(&node_id),
                from: record.state.as_str(),
                to: NodeState::Suspended.as_str(),
            });
        }

        let was_submitter = record.state == NodeState::ActiveSubmitter;
        record.suspension_count += 1;
        record.state = if record.suspension_count >= jail_threshold {
            NodeState::Jailed
        } else {
            NodeState::Suspended
        };
        warn!(
            node = %short_id(&node_id),
            ?reason,
            state = record.state.as_str(),
            "node suspended"
        );

        if was_submitter {
            self.current_submitter = None;
            if self.force_rotate(Some(node_id), now).is_err() {
                // No validator left; the health check surfaces this.
                warn!("submitter suspended with no validator to rotate to");
            }
        }
        Ok(())
    }

    /// Promote a `Backup` node to `ActiveValidator` to replace lost
    /// capacity.
    pub fn activate_backup(&mut self, node_id: NodeId) -> RegistryResult<()> {
        if !self
            .nodes
            .values()
            .any(|record| record.state == NodeState::Backup)
        {
            return Err(RegistryError::NoBackupAvailable);
        }

        let record = self
            .nodes
            .get_mut(&node_id)
            .ok_or_else(|| RegistryError::unknown(&node_id))?;

        if record.state != NodeState::Backup {
            return Err(RegistryError::InvalidTransition {
                node: short_id(&node_id),
                from: record.state.as_str(),
                to: NodeState::ActiveValidator.as_str(),
            });
        }

        record.state = NodeState::ActiveValidator;
        info!(node = %short_id(&node_id), "backup promoted to validator");
        Ok(())
    }

    /// Return a suspended node to `Registered`; it must be re-activated
    /// before participating again. Jailed nodes cannot be reinstated.
    pub fn reinstate(&mut self, node_id: NodeId) -> RegistryResult<()> {
        let record = self
            .nodes
            .get_mut(&node_id)
            .ok_or_else(|| RegistryError::unknown(&node_id))?;

        if record.state != NodeState::Suspended {
            return Err(RegistryError::InvalidTransition {
                node: short_id(&node_id),
                from: record.state.as_str(),
                to: NodeState::Registered.as_str(),
            });
        }

        record.state = NodeState::Registered;
        Ok(())
    }

    /// Permanently remove a node from the registry.
    pub fn remove(&mut self, node_id: NodeId, now: u64) -> RegistryResult<()> {
        let record = self
            .nodes
            .remove(&node_id)
            .ok_or_else(|| RegistryError::unknown(&node_id))?;
        self.registration_order.retain(|id| id != &node_id);

        if self.current_submitter == Some(node_id) {
            self.current_submitter = None;
            let _ = self.force_rotate(None, now);
        }
        info!(node = %short_id(&node_id), state = record.state.as_str(), "node removed");
        Ok(())
    }

    // === NONCE LEDGER ===

    /// Next nonce expected from a node.
    pub fn next_nonce(&self, node_id: &NodeId) -> RegistryResult<u64> {
        self.nodes
            .get(node_id)
            .map(NodeRecord::next_nonce)
            .ok_or_else(|| RegistryError::unknown(node_id))
    }

    /// Record a consumed nonce. Exactly `last + 1` is accepted: reuse and
    /// gaps are both rejected, so a rejected submission's nonce can never be
    /// replayed later.
    pub fn record_nonce(&mut self, node_id: &NodeId, nonce: u64) -> RegistryResult<()> {
        let record = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| RegistryError::unknown(node_id))?;

        let expected = record.next_nonce();
        if nonce != expected {
            return Err(RegistryError::ReplayedNonce {
                node: short_id(node_id),
                expected,
                got: nonce,
            });
        }

        record.last_nonce = nonce;
        Ok(())
    }

    // === QUERIES ===

    pub fn current_submitter(&self) -> Option<NodeId> {
        self.current_submitter
    }

    pub fn state_of(&self, node_id: &NodeId) -> Option<NodeState> {
        self.nodes.get(node_id).map(|record| record.state)
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&NodeRecord> {
        self.nodes.get(node_id)
    }

    /// Whether a node may currently submit fee data.
    pub fn is_authorized(&self, node_id: &NodeId) -> bool {
        self.state_of(node_id)
            .map(|state| state.is_authorized())
            .unwrap_or(false)
    }

    /// Active validators in registration order (excludes the submitter).
    pub fn active_validators(&self) -> Vec<NodeId> {
        self.registration_order
            .iter()
            .filter(|id| self.state_of(id) == Some(NodeState::ActiveValidator))
            .copied()
            .collect()
    }

    /// Submitter plus active validators.
    pub fn active_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|record| record.state.is_authorized())
            .count()
    }

    pub fn backup_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|record| record.state == NodeState::Backup)
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.nodes.len()
    }

    /// First node in backup pool by registration order, if any.
    pub fn first_backup(&self) -> Option<NodeId> {
        self.registration_order
            .iter()
            .find(|id| self.state_of(id) == Some(NodeState::Backup))
            .copied()
    }

    /// Next `ActiveValidator` in registration order strictly after `after`,
    /// wrapping around. `None` when the validator set is empty.
    fn next_validator_after(&self, after: Option<&NodeId>) -> Option<NodeId> {
        if self.registration_order.is_empty() {
            return None;
        }

        let start = after
            .and_then(|id| self.registration_order.iter().position(|other| other == id))
            .map(|idx| idx + 1)
            .unwrap_or(0);

        let len = self.registration_order.len();
        (0..len)
            .map(|offset| self.registration_order[(start + offset) % len])
            .find(|id| self.state_of(id) == Some(NodeState::ActiveValidator))
    }
}
