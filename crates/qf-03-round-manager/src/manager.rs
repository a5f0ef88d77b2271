//! Round manager: submission accumulation, quorum finalization, rollover.

use crate::error::{RoundError, RoundResult};
use crate::median::{lower_median, weighted_median};
use crate::round::{Round, RoundInfo, RoundPhase, Submission};
use serde::{Deserialize, Serialize};
use shared_types::{short_id, FeeBps, FeedResult, MAX_FEE_BPS};
use tracing::{debug, info};

/// Round tuning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Length of each round's submission window.
    pub submission_window_secs: u64,
    /// Minimum distinct submissions to finalize a round.
    pub consensus_threshold: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            submission_window_secs: 300,
            consensus_threshold: 3,
        }
    }
}

/// Outcome of a finalization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Round still open: quorum not yet reached, deadline not yet passed.
    Pending,
    /// Quorum reached; result computed.
    Finalized(FeedResult),
    /// Deadline passed below quorum. The round is abandoned, not retried.
    Failed { round_id: u64, submissions: u32 },
}

/// Owns the current round and its lifecycle.
#[derive(Debug)]
pub struct RoundManager {
    config: RoundConfig,
    current: Round,
}

impl RoundManager {
    /// Create the manager with round 1 open at `now`.
    pub fn new(config: RoundConfig, now: u64) -> Self {
        let current = Round::open(1, now, config.submission_window_secs);
        Self { config, current }
    }

    /// Accept a submission into the current round.
    pub fn submit(&mut self, submission: Submission, now: u64) -> RoundResult<()> {
        let round = &mut self.current;

        if round.phase != RoundPhase::Open || now > round.deadline {
            return Err(RoundError::SubmissionWindowClosed {
                round_id: round.round_id,
            });
        }

        if round.submissions.contains_key(&submission.node_id) {
            return Err(RoundError::DuplicateSubmission {
                node: short_id(&submission.node_id),
                round_id: round.round_id,
            });
        }

        validate_fees(&submission.cex_fees, "cex")?;
        validate_fees(&submission.dex_fees, "dex")?;

        debug!(
            node = %short_id(&submission.node_id),
            round = round.round_id,
            "submission accepted"
        );
        round.submissions.insert(submission.node_id, submission);
        Ok(())
    }

    /// Attempt to finalize the current round.
    ///
    /// Quorum closes and finalizes the round immediately; a missed deadline
    /// below quorum fails it. Calling this on an already-terminal round
    /// returns `Pending` without re-emitting anything, which makes the
    /// coordinator's consensus processing idempotent.
    pub fn try_finalize(&mut self, now: u64) -> RoundOutcome {
        let round = &mut self.current;
        if round.phase != RoundPhase::Open {
            return RoundOutcome::Pending;
        }

        if round.submissions.len() >= self.config.consensus_threshold {
            round.phase = RoundPhase::Closed;
            let result = compute_result(round, now);
            round.result = Some(result.clone());
            round.phase = RoundPhase::Finalized;
            info!(
                round = round.round_id,
                nodes = result.participating_nodes,
                cex = result.weighted_median_cex_fee,
                dex = result.weighted_median_dex_fee,
                "consensus reached"
            );
            return RoundOutcome::Finalized(result);
        }

        if now > round.deadline {
            round.phase = RoundPhase::Failed;
            info!(
                round = round.round_id,
                submissions = round.submissions.len(),
                required = self.config.consensus_threshold,
                "consensus failed, quorum not met by deadline"
            );
            return RoundOutcome::Failed {
                round_id: round.round_id,
                submissions: round.submissions.len() as u32,
            };
        }

        RoundOutcome::Pending
    }

    /// Open the next round. Called exactly once per terminal transition.
    pub fn start_new_round(&mut self, now: u64) {
        let next_id = self.current.round_id + 1;
        self.current = Round::open(next_id, now, self.config.submission_window_secs);
        debug!(round = next_id, "new round opened");
    }

    pub fn set_consensus_threshold(&mut self, threshold: usize) {
        self.config.consensus_threshold = threshold;
    }

    pub fn consensus_threshold(&self) -> usize {
        self.config.consensus_threshold
    }

    pub fn current_round(&self) -> &Round {
        &self.current
    }

    pub fn current_info(&self) -> RoundInfo {
        self.current.info()
    }

    pub fn is_window_open(&self, now: u64) -> bool {
        self.current.phase == RoundPhase::Open && now <= self.current.deadline
    }
}

fn validate_fees(fees: &[FeeBps], which: &str) -> RoundResult<()> {
    if fees.is_empty() {
        return Err(RoundError::empty_vector(which));
    }
    for &value in fees {
        if value > MAX_FEE_BPS {
            return Err(RoundError::out_of_range(value));
        }
    }
    Ok(())
}

/// Compute the agreed result for a closed round.
///
/// Each node's fee vector collapses to its own lower median, then the
/// equal-weight weighted median across nodes is taken, independently for
/// CEX and DEX.
fn compute_result(round: &Round, now: u64) -> FeedResult {
    let cex_samples: Vec<(FeeBps, u64)> = round
        .submissions
        .values()
        .filter_map(|s| lower_median(&s.cex_fees))
        .map(|value| (value, 1))
        .collect();
    let dex_samples: Vec<(FeeBps, u64)> = round
        .submissions
        .values()
        .filter_map(|s| lower_median(&s.dex_fees))
        .map(|value| (value, 1))
        .collect();

    FeedResult {
        round_id: round.round_id,
        // Submissions are pre-validated non-empty, so the medians exist.
        weighted_median_cex_fee: weighted_median(&cex_samples).unwrap_or(0),
        weighted_median_dex_fee: weighted_median(&dex_samples).unwrap_or(0),
        participating_nodes: round.submissions.len() as u32,
        timestamp: now,
    }
}
