//! Downstream protocol fee integration.
//!
//! Protocols register a fee schedule and a health-check policy; the oracle
//! then prices their fees from the latest published medians.

use crate::error::{OracleError, OracleResult};
use serde::{Deserialize, Serialize};
use shared_types::{FeeBps, FeedResult, ProtocolId, MAX_FEE_BPS};

/// Which feed component a protocol fee draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeType {
    Cex,
    Dex,
}

/// A protocol's static fee schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeParams {
    /// Protocol's own base fee in basis points, applied on top of the
    /// oracle component.
    pub base_fee_bps: FeeBps,
}

impl FeeParams {
    pub fn validate(&self) -> OracleResult<()> {
        if self.base_fee_bps > MAX_FEE_BPS {
            return Err(OracleError::InvalidConfiguration(format!(
                "base fee {} exceeds 10000 bps",
                self.base_fee_bps
            )));
        }
        Ok(())
    }
}

/// Per-protocol health requirements checked by `perform_health_check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckConfig {
    /// Maximum acceptable feed age for this protocol.
    pub max_staleness_secs: u64,
    /// Whether the protocol requires the most recent round to have reached
    /// consensus.
    pub require_consensus: bool,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            max_staleness_secs: 600,
            require_consensus: true,
        }
    }
}

/// A registered downstream protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolRegistration {
    pub id: ProtocolId,
    pub fee_params: FeeParams,
    pub health_check: HealthCheckConfig,
}

impl ProtocolRegistration {
    /// Price a fee for `amount` using the published medians.
    ///
    /// Returns `(total_fee, oracle_component)` where the oracle component is
    /// the amount priced at the relevant median and the total adds the
    /// protocol's base fee.
    pub fn calculate_fee(&self, amount: u128, fee_type: FeeType, feed: &FeedResult) -> (u128, u128) {
        let median = match fee_type {
            FeeType::Cex => feed.weighted_median_cex_fee,
            FeeType::Dex => feed.weighted_median_dex_fee,
        };
        let oracle_component = amount * median as u128 / MAX_FEE_BPS as u128;
        let base = amount * self.fee_params.base_fee_bps as u128 / MAX_FEE_BPS as u128;
        (base + oracle_component, oracle_component)
    }
}
