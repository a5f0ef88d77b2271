//! Concrete port adapters for the running node.

use anyhow::{Context, Result};
use ed25519_dalek::{Signature, VerifyingKey};
use parking_lot::RwLock;
use shared_types::{short_id, EventSink, Hash, NodeId, OracleEvent, SignatureVerifier};
use std::collections::HashMap;
use tracing::{info, warn};

/// Ed25519 signature verifier backed by an in-memory key store.
///
/// Keys are registered when nodes are added; verification itself is a pure
/// function call, as the coordinator requires.
#[derive(Default)]
pub struct Ed25519Verifier {
    keys: RwLock<HashMap<NodeId, VerifyingKey>>,
}

impl Ed25519Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a node's verifying key.
    pub fn register_key(&self, node_id: NodeId, key_bytes: &[u8; 32]) -> Result<()> {
        let key = VerifyingKey::from_bytes(key_bytes).context("invalid Ed25519 key")?;
        self.keys.write().insert(node_id, key);
        Ok(())
    }

    pub fn remove_key(&self, node_id: &NodeId) {
        self.keys.write().remove(node_id);
    }
}

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, node_id: &NodeId, payload_hash: &Hash, signature: &[u8]) -> bool {
        let keys = self.keys.read();
        let Some(key) = keys.get(node_id) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        key.verify_strict(payload_hash, &signature).is_ok()
    }
}

/// Event sink that forwards every oracle event to the tracing log.
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: OracleEvent) {
        match event {
            OracleEvent::DataSubmitted { node_id, round_id } => {
                info!(node = %short_id(&node_id), round = round_id, "data submitted");
            }
            OracleEvent::ConsensusReached { result } => {
                info!(
                    round = result.round_id,
                    cex = result.weighted_median_cex_fee,
                    dex = result.weighted_median_dex_fee,
                    nodes = result.participating_nodes,
                    "consensus reached"
                );
            }
            OracleEvent::ConsensusFailed {
                round_id,
                submissions,
            } => {
                warn!(round = round_id, submissions, "consensus failed");
            }
            OracleEvent::BackupNodeActivated { node_id } => {
                info!(node = %short_id(&node_id), "backup node activated");
            }
            OracleEvent::EmergencyPaused => warn!("emergency pause engaged"),
            OracleEvent::EmergencyUnpaused => info!("emergency pause lifted"),
            OracleEvent::ConfigurationUpdated { parameter } => {
                info!(%parameter, "configuration updated");
            }
        }
    }
}
