//! # Capability Ports
//!
//! Injected dependencies of the oracle core. Time, signature verification,
//! and event emission cross these seams so the core stays deterministic and
//! free of I/O.

use crate::entities::{Hash, NodeId};
use crate::events::OracleEvent;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic time source, injected for testability.
pub trait Clock: Send + Sync {
    /// Current unix timestamp in seconds.
    fn now(&self) -> u64;
}

/// Default clock backed by system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Deterministic clock for tests: set or advance explicitly.
#[derive(Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Signature verification boundary.
///
/// The core makes no assumption about the algorithm; the runtime wires in a
/// concrete verifier holding each node's registered key. Verification is a
/// pure function call, never a remote round trip.
pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over `payload_hash` against the key registered for
    /// `node_id`.
    fn verify(&self, node_id: &NodeId, payload_hash: &Hash, signature: &[u8]) -> bool;
}

/// Fire-and-forget event emission toward dashboards/loggers.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: OracleEvent);
}

/// Sink that drops every event.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: OracleEvent) {}
}
