//! Oracle-wide configuration, validated at construction.

use crate::error::{OracleError, OracleResult};
use qf_01_node_registry::RegistryConfig;
use qf_02_security_monitor::SecurityConfig;
use qf_03_round_manager::RoundConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration for the oracle core.
///
/// The submission window is fixed for the lifetime of the coordinator;
/// the consensus threshold is the only round parameter tunable at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Minimum distinct submissions to finalize a round.
    pub consensus_threshold: usize,
    /// Length of each round's submission window, immutable once running.
    pub submission_window_secs: u64,
    /// Minimum seconds between voluntary submitter rotations.
    pub rotation_interval_secs: u64,
    /// Feed age beyond which `data_freshness` reports stale.
    pub staleness_threshold_secs: u64,
    /// Replay-cache retention window.
    pub replay_retention_secs: u64,
    /// Replay-cache capacity cap.
    pub max_tracked_submissions: usize,
    /// Threat level at which `is_under_attack` reports true.
    pub alert_threshold: u8,
    /// Suspensions after which a node is jailed.
    pub jail_threshold: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            consensus_threshold: 3,
            submission_window_secs: 300,
            rotation_interval_secs: 3600,
            staleness_threshold_secs: 600,
            replay_retention_secs: 600,
            max_tracked_submissions: 4096,
            alert_threshold: 3,
            jail_threshold: 3,
        }
    }
}

impl OracleConfig {
    pub fn validate(&self) -> OracleResult<()> {
        if self.consensus_threshold == 0 {
            return Err(OracleError::InvalidConfiguration(
                "consensus threshold must be at least 1".into(),
            ));
        }
        if self.submission_window_secs == 0 {
            return Err(OracleError::InvalidConfiguration(
                "submission window must be non-zero".into(),
            ));
        }
        if self.alert_threshold as u32 > 5 {
            return Err(OracleError::InvalidConfiguration(
                "alert threshold must be within [0, 5]".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn registry(&self) -> RegistryConfig {
        RegistryConfig {
            rotation_interval_secs: self.rotation_interval_secs,
            jail_threshold: self.jail_threshold,
        }
    }

    pub(crate) fn security(&self) -> SecurityConfig {
        SecurityConfig {
            replay_retention_secs: self.replay_retention_secs,
            max_tracked_submissions: self.max_tracked_submissions,
            alert_threshold: self.alert_threshold,
            ..SecurityConfig::default()
        }
    }

    pub(crate) fn rounds(&self) -> RoundConfig {
        RoundConfig {
            submission_window_secs: self.submission_window_secs,
            consensus_threshold: self.consensus_threshold,
        }
    }
}
