//! Port adapters for deterministic testing.

use parking_lot::RwLock;
use shared_types::{EventSink, Hash, NodeId, OracleEvent, SignatureVerifier};

/// Verifier that accepts every signature. Test wiring only.
pub struct AcceptAllVerifier;

impl SignatureVerifier for AcceptAllVerifier {
    fn verify(&self, _node_id: &NodeId, _payload_hash: &Hash, _signature: &[u8]) -> bool {
        true
    }
}

/// Verifier that rejects every signature. Test wiring only.
pub struct RejectAllVerifier;

impl SignatureVerifier for RejectAllVerifier {
    fn verify(&self, _node_id: &NodeId, _payload_hash: &Hash, _signature: &[u8]) -> bool {
        false
    }
}

/// Sink that records every emitted event for later inspection.
#[derive(Default)]
pub struct RecordingEventSink {
    events: RwLock<Vec<OracleEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<OracleEvent> {
        self.events.read().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    /// Count of events matching a predicate.
    pub fn count_matching(&self, predicate: impl Fn(&OracleEvent) -> bool) -> usize {
        self.events.read().iter().filter(|e| predicate(e)).count()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: OracleEvent) {
        self.events.write().push(event);
    }
}
