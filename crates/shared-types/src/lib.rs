//! # Shared Types Crate
//!
//! Domain entities, the oracle event taxonomy, and the injected capability
//! ports (`Clock`, `SignatureVerifier`, `EventSink`) shared by every
//! subsystem crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-subsystem types live here.
//! - **Capability Injection**: time, signature verification, and event
//!   emission are trait objects wired in by the runtime, never ambient
//!   globals. Deterministic test adapters ship alongside the defaults.

pub mod entities;
pub mod events;
pub mod ports;

pub use entities::*;
pub use events::OracleEvent;
pub use ports::{Clock, EventSink, ManualClock, NullEventSink, SignatureVerifier, SystemClock};
