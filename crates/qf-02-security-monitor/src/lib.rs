//! # qf-02-security-monitor
//!
//! Submission gatekeeper and anomaly-response subsystem for Quorum-Feed.
//!
//! Every inbound submission passes through here before it can touch a round:
//! signature verification (delegated to the injected verifier), then replay
//! dedupe over a bounded record of recently seen `(node, payload)` pairs.
//!
//! The monitor also runs the system-wide threat-level state machine
//! (0..=5). Validation failures escalate the level rather than being
//! silently dropped, because repeated failed attempts are themselves the
//! signal being monitored. Reaching level 5 pauses the whole system until an
//! explicit admin reset.

mod error;
mod monitor;
mod replay;

pub use error::{SecurityError, SecurityResult};
pub use monitor::{SecurityConfig, SecurityMonitor, MAX_THREAT_LEVEL};
pub use replay::ReplayCache;
