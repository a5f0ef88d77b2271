//! Threat-level state machine and submission validation gate.

use crate::error::{SecurityError, SecurityResult};
use crate::replay::ReplayCache;
use serde::{Deserialize, Serialize};
use shared_types::{short_id, Hash, NodeId, SignatureVerifier};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, warn};

/// Threat level at which the system pauses.
pub const MAX_THREAT_LEVEL: u8 = 5;

/// Security tuning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// How long a seen `(node, payload)` pair blocks replays.
    pub replay_retention_secs: u64,
    /// Hard cap on tracked submissions.
    pub max_tracked_submissions: usize,
    /// Threat level at which `is_under_attack` reports true.
    pub alert_threshold: u8,
    /// Unauthorized attempts from one node before the level escalates.
    pub unauthorized_escalation_after: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            replay_retention_secs: 600,
            max_tracked_submissions: 4096,
            alert_threshold: 3,
            unauthorized_escalation_after: 3,
        }
    }
}

/// Gatekeeper for submission validity and system-wide anomaly response.
///
/// Process-wide state: created at startup, mutated here only, never
/// destroyed. Invariant: `threat_level == 5` implies `paused`.
pub struct SecurityMonitor {
    config: SecurityConfig,
    threat_level: u8,
    paused: bool,
    replay: ReplayCache,
    verifier: Arc<dyn SignatureVerifier>,
    /// Per-node count of rejected unauthorized attempts. Bounded like the
    /// replay cache: at most `max_tracked_submissions` nodes tracked, oldest
    /// evicted first.
    unauthorized_attempts: HashMap<NodeId, u32>,
    /// Insertion order of tracked nodes; drives eviction.
    unauthorized_order: VecDeque<NodeId>,
}

impl SecurityMonitor {
    pub fn new(config: SecurityConfig, verifier: Arc<dyn SignatureVerifier>) -> Self {
        let replay = ReplayCache::new(config.replay_retention_secs, config.max_tracked_submissions);
        Self {
            config,
            threat_level: 0,
            paused: false,
            replay,
            verifier,
            unauthorized_attempts: HashMap::new(),
            unauthorized_order: VecDeque::new(),
        }
    }

    /// Validate a submission's authenticity and freshness.
    ///
    /// Signature first, then replay dedupe. Both failure paths escalate the
    /// threat level by one before returning: repeated failures are the
    /// anomaly signal.
    pub fn validate_submission(
        &mut self,
        node_id: &NodeId,
        payload_hash: &Hash,
        signature: &[u8],
        now: u64,
    ) -> SecurityResult<()> {
        if self.paused {
            return Err(SecurityError::SystemPaused {
                threat_level: self.threat_level,
            });
        }

        if !self.verifier.verify(node_id, payload_hash, signature) {
            self.escalate(1);
            return Err(SecurityError::InvalidSignature {
                node: short_id(node_id),
            });
        }

        if !self.replay.insert(*node_id, *payload_hash, now) {
            warn!(node = %short_id(node_id), "replayed submission detected");
            self.escalate(1);
            return Err(SecurityError::ReplayDetected {
                node: short_id(node_id),
            });
        }

        debug!(node = %short_id(node_id), "submission validated");
        Ok(())
    }

    /// Raise the threat level, clamped to [0, 5]. Crossing into 5 pauses the
    /// system until an explicit admin reset.
    pub fn escalate(&mut self, amount: u8) {
        let previous = self.threat_level;
        self.threat_level = self.threat_level.saturating_add(amount).min(MAX_THREAT_LEVEL);
        if self.threat_level != previous {
            warn!(
                from = previous,
                to = self.threat_level,
                "threat level escalated"
            );
        }
        if self.threat_level == MAX_THREAT_LEVEL && !self.paused {
            self.paused = true;
            warn!("maximum threat level reached, system paused");
        }
    }

    /// Lower the threat level, clamped to [0, 5]. Does not lift a pause;
    /// that requires `reset_threat_level` or the emergency override.
    pub fn deescalate(&mut self, amount: u8) {
        self.threat_level = self.threat_level.saturating_sub(amount);
    }

    /// Whether the level has reached the configured alert threshold.
    pub fn is_under_attack(&self) -> bool {
        self.threat_level >= self.config.alert_threshold
    }

    pub fn threat_level(&self) -> u8 {
        self.threat_level
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Admin-gated full reset: level back to 0, pause lifted.
    pub fn reset_threat_level(&mut self) {
        self.threat_level = 0;
        self.paused = false;
        self.unauthorized_attempts.clear();
        self.unauthorized_order.clear();
        warn!("threat level reset by admin");
    }

    /// Manual incident-response pause, independent of the threat level.
    pub fn force_pause(&mut self) {
        self.paused = true;
    }

    /// Lift a pause. Caps the level at 4 so the level-5-implies-paused
    /// invariant keeps holding.
    pub fn force_unpause(&mut self) {
        self.paused = false;
        self.threat_level = self.threat_level.min(MAX_THREAT_LEVEL - 1);
    }

    /// Note a rejected unauthorized submission attempt. Every
    /// `unauthorized_escalation_after`-th attempt from the same node raises
    /// the threat level by one.
    pub fn record_unauthorized(&mut self, node_id: &NodeId) {
        if !self.unauthorized_attempts.contains_key(node_id) {
            while self.unauthorized_attempts.len() >= self.config.max_tracked_submissions {
                match self.unauthorized_order.pop_front() {
                    Some(evicted) => {
                        self.unauthorized_attempts.remove(&evicted);
                    }
                    None => break,
                }
            }
            self.unauthorized_order.push_back(*node_id);
        }
        let count = self.unauthorized_attempts.entry(*node_id).or_insert(0);
        *count += 1;
        if *count % self.config.unauthorized_escalation_after == 0 {
            warn!(
                node = %short_id(node_id),
                attempts = *count,
                "repeated unauthorized attempts"
            );
            self.escalate(1);
        }
    }
}
