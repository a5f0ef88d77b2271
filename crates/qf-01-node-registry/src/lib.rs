//! # qf-01-node-registry
//!
//! Node identity and lifecycle subsystem for Quorum-Feed.
//!
//! The registry is the authoritative source of every reporting node's state.
//! It enforces the single-submitter invariant (at most one node holds the
//! `ActiveSubmitter` role at any instant), drives deterministic round-robin
//! rotation over the active validator set, and owns the per-node nonce
//! ledger used for replay protection.
//!
//! All operations are synchronous state mutations with no external I/O; the
//! coordinator serializes access.

mod error;
mod node;
mod registry;

pub use error::{RegistryError, RegistryResult};
pub use node::{ActiveRole, NodeMetadata, NodeRecord, NodeState, SuspensionReason};
pub use registry::{NodeRegistry, RegistryConfig};
