//! The oracle coordinator: submission pipeline, consensus driver, read API.

use crate::config::OracleConfig;
use crate::error::{OracleError, OracleResult};
use crate::feed::{DataFreshness, LatestRoundData, OracleHealth};
use crate::hash::submission_hash;
use crate::protocol::{FeeParams, FeeType, HealthCheckConfig, ProtocolRegistration};
use parking_lot::RwLock;
use qf_01_node_registry::{ActiveRole, NodeMetadata, NodeRegistry, NodeState, SuspensionReason};
use qf_02_security_monitor::SecurityMonitor;
use qf_03_round_manager::{RoundInfo, RoundManager, RoundOutcome, Submission};
use shared_types::{
    short_id, Clock, EventSink, FeeBps, FeedResult, NodeId, OracleEvent, ProtocolId,
    SignatureVerifier,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of one `process_consensus` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusOutcome {
    /// Current round still open; nothing published.
    Pending,
    /// Quorum reached; the contained result was published.
    Finalized(FeedResult),
    /// Deadline missed below quorum; nothing published, next round opened.
    Failed { round_id: u64, submissions: u32 },
}

/// Everything behind the writer lock. Mutations commit as a unit; readers
/// never see a partially applied transition.
struct CoordinatorState {
    registry: NodeRegistry,
    security: SecurityMonitor,
    rounds: RoundManager,
    latest_result: Option<FeedResult>,
    /// `started_at` of the round that produced `latest_result`.
    latest_round_started_at: u64,
    /// Whether the most recent terminal round reached consensus.
    last_round_reached_consensus: bool,
    protocols: HashMap<ProtocolId, ProtocolRegistration>,
    config: OracleConfig,
}

/// Top-level entry point composing registry, security, and rounds.
///
/// Constructed once at startup and injected into dependents; there are no
/// ambient singletons.
pub struct OracleCoordinator {
    state: RwLock<CoordinatorState>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
}

impl OracleCoordinator {
    pub fn new(
        config: OracleConfig,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn SignatureVerifier>,
        events: Arc<dyn EventSink>,
    ) -> OracleResult<Self> {
        config.validate()?;
        let now = clock.now();
        let state = CoordinatorState {
            registry: NodeRegistry::new(config.registry()),
            security: SecurityMonitor::new(config.security(), verifier),
            rounds: RoundManager::new(config.rounds(), now),
            latest_result: None,
            latest_round_started_at: 0,
            last_round_reached_consensus: false,
            protocols: HashMap::new(),
            config,
        };
        Ok(Self {
            state: RwLock::new(state),
            clock,
            events,
        })
    }

    // === SUBMISSION PIPELINE ===

    /// Submit fee data into the current round.
    ///
    /// Check order is fixed: authorization, pause flag, signature/replay,
    /// nonce, round accumulation. A nonce consumed by a submission that the
    /// round later rejects is not rolled back, so it can never be replayed.
    pub fn submit_data(
        &self,
        node_id: NodeId,
        cex_fees: Vec<FeeBps>,
        dex_fees: Vec<FeeBps>,
        nonce: u64,
        signature: Vec<u8>,
    ) -> OracleResult<u64> {
        let now = self.clock.now();
        let mut state = self.state.write();

        if !state.registry.is_authorized(&node_id) {
            state.security.record_unauthorized(&node_id);
            warn!(node = %short_id(&node_id), "unauthorized submission rejected");
            return Err(OracleError::NodeNotAuthorized {
                node: short_id(&node_id),
            });
        }

        if state.security.is_paused() {
            return Err(OracleError::SystemPaused);
        }

        let payload_hash = submission_hash(&node_id, &cex_fees, &dex_fees, nonce);
        state
            .security
            .validate_submission(&node_id, &payload_hash, &signature, now)?;

        state.registry.record_nonce(&node_id, nonce)?;

        let submission = Submission {
            node_id,
            cex_fees,
            dex_fees,
            signature,
            nonce,
            submitted_at: now,
        };
        state.rounds.submit(submission, now)?;
        let round_id = state.rounds.current_round().round_id;

        drop(state);
        self.events
            .emit(OracleEvent::DataSubmitted { node_id, round_id });
        Ok(round_id)
    }

    // === CONSENSUS DRIVER ===

    /// Drive the current round to a terminal state if it is ready.
    ///
    /// Invoked by the periodic trigger or eagerly after a submission. On
    /// `Finalized` the result is published and a due rotation applied; on
    /// `Failed` nothing is published. Both terminal paths open a fresh
    /// round. Calling this against an already-processed round is a no-op
    /// and re-emits nothing.
    pub fn process_consensus(&self) -> ConsensusOutcome {
        let now = self.clock.now();
        let mut state = self.state.write();

        match state.rounds.try_finalize(now) {
            RoundOutcome::Finalized(mut result) => {
                // Published timestamps are strictly monotonic even if the
                // clock stalls between rounds.
                if let Some(previous) = &state.latest_result {
                    if result.timestamp <= previous.timestamp {
                        result.timestamp = previous.timestamp + 1;
                    }
                }
                state.latest_round_started_at = state.rounds.current_round().started_at;
                state.latest_result = Some(result.clone());
                state.last_round_reached_consensus = true;

                // Rotation only ever happens here, between rounds, so the
                // active set never changes while submissions are counted.
                if state.registry.rotation_due(now) {
                    match state.registry.rotate_submitter(now) {
                        Ok(next) => info!(node = %short_id(&next), "submitter rotation applied"),
                        Err(err) => warn!(%err, "rotation skipped"),
                    }
                }

                state.rounds.start_new_round(now);
                drop(state);
                self.events.emit(OracleEvent::ConsensusReached {
                    result: result.clone(),
                });
                ConsensusOutcome::Finalized(result)
            }
            RoundOutcome::Failed {
                round_id,
                submissions,
            } => {
                state.last_round_reached_consensus = false;
                state.rounds.start_new_round(now);
                drop(state);
                self.events.emit(OracleEvent::ConsensusFailed {
                    round_id,
                    submissions,
                });
                ConsensusOutcome::Failed {
                    round_id,
                    submissions,
                }
            }
            RoundOutcome::Pending => ConsensusOutcome::Pending,
        }
    }

    // === EMERGENCY CONTROLS ===

    /// Manual incident-response pause, regardless of threat level.
    pub fn emergency_pause(&self) {
        self.state.write().security.force_pause();
        warn!("emergency pause engaged");
        self.events.emit(OracleEvent::EmergencyPaused);
    }

    /// Lift a pause (manual or threat-driven).
    pub fn emergency_unpause(&self) {
        self.state.write().security.force_unpause();
        info!("emergency pause lifted");
        self.events.emit(OracleEvent::EmergencyUnpaused);
    }

    /// Admin-gated threat-level reset; also lifts an automatic pause.
    pub fn reset_threat_level(&self) {
        self.state.write().security.reset_threat_level();
    }

    // === NODE ADMINISTRATION ===

    /// Register a node and immediately assign its role.
    pub fn add_node(
        &self,
        node_id: NodeId,
        metadata: NodeMetadata,
        role: ActiveRole,
    ) -> OracleResult<()> {
        let now = self.clock.now();
        let mut state = self.state.write();
        state.registry.register(node_id, metadata, now)?;
        state.registry.activate(node_id, role, now)?;
        Ok(())
    }

    /// Assign a role to a node already in `Registered` state, typically
    /// after reinstatement.
    pub fn activate_node(&self, node_id: NodeId, role: ActiveRole) -> OracleResult<()> {
        let now = self.clock.now();
        self.state.write().registry.activate(node_id, role, now)?;
        Ok(())
    }

    /// Permanently remove a node.
    pub fn remove_node(&self, node_id: NodeId) -> OracleResult<()> {
        let now = self.clock.now();
        self.state.write().registry.remove(node_id, now)?;
        Ok(())
    }

    /// Suspend a misbehaving node; suspending the submitter rotates the
    /// role immediately.
    pub fn suspend_node(&self, node_id: NodeId, reason: SuspensionReason) -> OracleResult<()> {
        let now = self.clock.now();
        self.state.write().registry.suspend(node_id, reason, now)?;
        Ok(())
    }

    /// Return a suspended node to `Registered`.
    pub fn reinstate_node(&self, node_id: NodeId) -> OracleResult<()> {
        self.state.write().registry.reinstate(node_id)?;
        Ok(())
    }

    /// Promote a backup node to replace lost validator capacity.
    pub fn promote_backup(&self, node_id: NodeId) -> OracleResult<()> {
        self.state.write().registry.activate_backup(node_id)?;
        self.events
            .emit(OracleEvent::BackupNodeActivated { node_id });
        Ok(())
    }

    // === CONFIGURATION ===

    /// Update the consensus threshold; valid range is `[1, total_nodes]`.
    pub fn update_consensus_threshold(&self, threshold: usize) -> OracleResult<()> {
        let mut state = self.state.write();
        let total = state.registry.total_count();
        if threshold == 0 || threshold > total {
            return Err(OracleError::InvalidConfiguration(format!(
                "consensus threshold {threshold} outside [1, {total}]"
            )));
        }
        state.rounds.set_consensus_threshold(threshold);
        state.config.consensus_threshold = threshold;
        drop(state);
        info!(threshold, "consensus threshold updated");
        self.events.emit(OracleEvent::ConfigurationUpdated {
            parameter: "consensus_threshold".into(),
        });
        Ok(())
    }

    /// The submission window is fixed at construction; updating it always
    /// fails.
    pub fn update_submission_window(&self, _window_secs: u64) -> OracleResult<()> {
        Err(OracleError::InvalidConfiguration(
            "submission window is immutable once running".into(),
        ))
    }

    // === PROTOCOL FEE INTEGRATION ===

    /// Register a downstream protocol's fee schedule and health policy.
    pub fn register_protocol(
        &self,
        id: ProtocolId,
        fee_params: FeeParams,
        health_check: HealthCheckConfig,
    ) -> OracleResult<()> {
        fee_params.validate()?;
        let mut state = self.state.write();
        if state.protocols.contains_key(&id) {
            return Err(OracleError::InvalidConfiguration(format!(
                "protocol {} already registered",
                short_id(&id)
            )));
        }
        state.protocols.insert(
            id,
            ProtocolRegistration {
                id,
                fee_params,
                health_check,
            },
        );
        Ok(())
    }

    /// Price a protocol fee from the latest published medians. Returns
    /// `(total_fee, oracle_component)`.
    pub fn calculate_fee(
        &self,
        id: &ProtocolId,
        amount: u128,
        fee_type: FeeType,
    ) -> OracleResult<(u128, u128)> {
        let state = self.state.read();
        let protocol = state
            .protocols
            .get(id)
            .ok_or_else(|| OracleError::UnknownProtocol(short_id(id)))?;
        let feed = state
            .latest_result
            .as_ref()
            .ok_or(OracleError::FeedUnavailable)?;
        Ok(protocol.calculate_fee(amount, fee_type, feed))
    }

    /// Evaluate a protocol's own health requirements against the feed.
    pub fn perform_health_check(&self, id: &ProtocolId) -> OracleResult<(bool, String)> {
        let now = self.clock.now();
        let state = self.state.read();
        let protocol = state
            .protocols
            .get(id)
            .ok_or_else(|| OracleError::UnknownProtocol(short_id(id)))?;

        if state.security.is_paused() {
            return Ok((false, "oracle is paused".into()));
        }
        let Some(feed) = &state.latest_result else {
            return Ok((false, "no feed result published yet".into()));
        };
        if protocol.health_check.require_consensus && !state.last_round_reached_consensus {
            return Ok((false, "latest round failed consensus".into()));
        }
        let age = now.saturating_sub(feed.timestamp);
        if age > protocol.health_check.max_staleness_secs {
            return Ok((false, format!("feed stale: {age}s old")));
        }
        Ok((true, "ok".into()))
    }

    // === READ API ===

    /// Latest published result, if any round has finalized yet.
    pub fn latest_feed_result(&self) -> Option<FeedResult> {
        self.state.read().latest_result.clone()
    }

    /// Committed snapshot of the current round.
    pub fn current_round(&self) -> RoundInfo {
        self.state.read().rounds.current_info()
    }

    pub fn is_submission_window_open(&self) -> bool {
        self.state.read().rounds.is_window_open(self.clock.now())
    }

    pub fn current_submitter(&self) -> Option<NodeId> {
        self.state.read().registry.current_submitter()
    }

    pub fn node_state(&self, node_id: &NodeId) -> Option<NodeState> {
        self.state.read().registry.state_of(node_id)
    }

    pub fn threat_level(&self) -> u8 {
        self.state.read().security.threat_level()
    }

    pub fn is_paused(&self) -> bool {
        self.state.read().security.is_paused()
    }

    pub fn is_under_attack(&self) -> bool {
        self.state.read().security.is_under_attack()
    }

    /// Next nonce expected from a node.
    pub fn next_nonce(&self, node_id: &NodeId) -> OracleResult<u64> {
        Ok(self.state.read().registry.next_nonce(node_id)?)
    }

    /// Legacy price-feed-compatible view of the latest result.
    pub fn latest_round_data(&self) -> OracleResult<LatestRoundData> {
        let state = self.state.read();
        let result = state
            .latest_result
            .as_ref()
            .ok_or(OracleError::FeedUnavailable)?;
        Ok(LatestRoundData {
            round_id: result.round_id,
            answer: result.combined_answer(),
            started_at: state.latest_round_started_at,
            updated_at: result.timestamp,
            answered_in_round: result.round_id,
        })
    }

    /// Overall oracle health.
    ///
    /// The pool dropping below the consensus threshold is a standing health
    /// failure, never a crash: quorum can be regained by re-registering
    /// nodes.
    pub fn oracle_health(&self) -> OracleHealth {
        let state = self.state.read();
        let active = state.registry.active_count();
        let pool = active + state.registry.backup_count();
        OracleHealth {
            is_healthy: !state.security.is_paused()
                && pool >= state.rounds.consensus_threshold(),
            consensus_reached: state.last_round_reached_consensus,
            active_nodes: active as u32,
            last_consensus_time: state
                .latest_result
                .as_ref()
                .map(|result| result.timestamp)
                .unwrap_or(0),
        }
    }

    /// Feed freshness against the configured staleness threshold.
    pub fn data_freshness(&self) -> DataFreshness {
        let now = self.clock.now();
        let state = self.state.read();
        let threshold = state.config.staleness_threshold_secs;
        match &state.latest_result {
            Some(result) => DataFreshness {
                is_fresh: now.saturating_sub(result.timestamp) <= threshold,
                last_update_time: result.timestamp,
                staleness_threshold_secs: threshold,
            },
            None => DataFreshness {
                is_fresh: false,
                last_update_time: 0,
                staleness_threshold_secs: threshold,
            },
        }
    }
}
