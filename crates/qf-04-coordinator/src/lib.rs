//! # qf-04-coordinator
//!
//! Top-level orchestrator for Quorum-Feed.
//!
//! The coordinator composes the node registry, security monitor, and round
//! manager behind a single writer lock, preserving the serial-transaction
//! guarantee of the original execution environment: every state-mutating
//! operation runs one at a time against one committed snapshot, while reads
//! run concurrently and only ever observe committed state.
//!
//! ## Submission pipeline
//!
//! `submit_data` applies four checks in a fixed order so that unauthorized
//! or malformed submissions can never poison nonce or security state:
//! authorization, pause flag, signature/replay validation, nonce ledger;
//! only then does the submission reach the current round.

mod adapters;
mod config;
mod coordinator;
mod error;
mod feed;
mod hash;
mod protocol;

pub use adapters::{AcceptAllVerifier, RecordingEventSink, RejectAllVerifier};
pub use config::OracleConfig;
pub use coordinator::{ConsensusOutcome, OracleCoordinator};
pub use error::{OracleError, OracleResult};
pub use feed::{DataFreshness, LatestRoundData, OracleHealth};
pub use hash::submission_hash;
pub use protocol::{FeeParams, FeeType, HealthCheckConfig, ProtocolRegistration};
