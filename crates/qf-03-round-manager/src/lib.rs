//! # qf-03-round-manager
//!
//! Consensus round lifecycle and result computation for Quorum-Feed.
//!
//! Exactly one round is current at any time. A round moves
//! `Open -> Closed -> Finalized` once quorum is reached, or `Open -> Failed`
//! when the submission deadline passes below quorum. `Failed` is an expected
//! outcome, not an error: the coordinator opens a fresh round either way.
//!
//! The agreed value per category is the equal-weight median across
//! submitting nodes, with the lower of the two middle values on even counts
//! so the result is deterministic.

mod error;
mod manager;
mod median;
mod round;

pub use error::{RoundError, RoundResult};
pub use manager::{RoundConfig, RoundManager, RoundOutcome};
pub use median::{lower_median, weighted_median};
pub use round::{Round, RoundInfo, RoundPhase, Submission};
