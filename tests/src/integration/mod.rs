//! Cross-subsystem integration scenarios.

pub mod scenarios;
pub mod signed_flow;

use qf_01_node_registry::{ActiveRole, NodeMetadata};
use qf_04_coordinator::{AcceptAllVerifier, OracleConfig, OracleCoordinator, RecordingEventSink};
use shared_types::{ManualClock, NodeId};
use std::sync::Arc;

pub const START: u64 = 1_000;
pub const WINDOW: u64 = 300;
pub const ROTATION: u64 = 3_600;

pub fn node(id: u8) -> NodeId {
    [id; 32]
}

/// Shared fixture: coordinator, manual clock, recording sink.
pub struct Fixture {
    pub coordinator: OracleCoordinator,
    pub clock: Arc<ManualClock>,
    pub events: Arc<RecordingEventSink>,
}

impl Fixture {
    /// `count` active nodes (node 1 submitter, rest validators) with the
    /// given consensus threshold and an accept-all verifier.
    pub fn active(count: u8, threshold: usize) -> Self {
        let clock = Arc::new(ManualClock::new(START));
        let events = Arc::new(RecordingEventSink::new());
        let config = OracleConfig {
            consensus_threshold: threshold,
            submission_window_secs: WINDOW,
            rotation_interval_secs: ROTATION,
            ..OracleConfig::default()
        };
        let coordinator = OracleCoordinator::new(
            config,
            clock.clone(),
            Arc::new(AcceptAllVerifier),
            events.clone(),
        )
        .expect("valid config");

        for id in 1..=count {
            let role = if id == 1 {
                ActiveRole::Submitter
            } else {
                ActiveRole::Validator
            };
            coordinator
                .add_node(node(id), NodeMetadata::default(), role)
                .expect("fresh node");
        }
        Self {
            coordinator,
            clock,
            events,
        }
    }

    /// Submit a small per-node offset over a `[100, 150, 120]`-style base.
    pub fn submit(&self, id: u8, nonce: u64) -> Result<u64, qf_04_coordinator::OracleError> {
        let offset = id as u32;
        self.coordinator.submit_data(
            node(id),
            vec![100 + offset, 150 + offset, 120 + offset],
            vec![30 + offset, 25 + offset],
            nonce,
            vec![id],
        )
    }
}
