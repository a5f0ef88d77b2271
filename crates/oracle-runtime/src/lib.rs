//! # Quorum-Feed Oracle Runtime
//!
//! The main entry point for the oracle node.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (JSON file path from `QF_CONFIG` or first CLI arg,
//!    defaults otherwise)
//! 2. Build the coordinator with its concrete adapters (system clock,
//!    Ed25519 verifier, tracing event sink)
//! 3. Register and activate the configured nodes and their keys
//! 4. Drive the periodic consensus tick until Ctrl-C

pub mod adapters;
pub mod config;

use crate::adapters::{Ed25519Verifier, TracingEventSink};
use crate::config::{NodeEntry, RuntimeConfig};
use anyhow::{Context, Result};
use qf_04_coordinator::{ConsensusOutcome, OracleCoordinator};
use shared_types::SystemClock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// The oracle node runtime: coordinator plus its wiring.
pub struct OracleRuntime {
    coordinator: Arc<OracleCoordinator>,
    verifier: Arc<Ed25519Verifier>,
    tick_interval: Duration,
}

impl OracleRuntime {
    /// Build the coordinator from config and register the configured nodes.
    pub fn new(config: RuntimeConfig) -> Result<Self> {
        let verifier = Arc::new(Ed25519Verifier::new());
        let coordinator = Arc::new(
            OracleCoordinator::new(
                config.oracle.clone(),
                Arc::new(SystemClock),
                verifier.clone(),
                Arc::new(TracingEventSink),
            )
            .context("failed to construct coordinator")?,
        );

        let runtime = Self {
            coordinator,
            verifier,
            tick_interval: Duration::from_secs(config.tick_interval_secs.max(1)),
        };
        for entry in &config.nodes {
            runtime.add_node(entry)?;
        }
        Ok(runtime)
    }

    /// Register one configured node with the coordinator and the verifier.
    pub fn add_node(&self, entry: &NodeEntry) -> Result<()> {
        let node_id = entry.node_id()?;
        let metadata = entry.metadata()?;
        self.verifier
            .register_key(node_id, &metadata.public_key)
            .context("invalid node public key")?;
        self.coordinator
            .add_node(node_id, metadata, entry.role()?)
            .with_context(|| format!("failed to add node {}", entry.name))?;
        Ok(())
    }

    pub fn coordinator(&self) -> Arc<OracleCoordinator> {
        self.coordinator.clone()
    }

    /// Periodic consensus tick until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        info!(
            tick_secs = self.tick_interval.as_secs(),
            "oracle runtime started"
        );
        let mut interval = tokio::time::interval(self.tick_interval);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match self.coordinator.process_consensus() {
                        ConsensusOutcome::Finalized(result) => {
                            info!(
                                round = result.round_id,
                                cex = result.weighted_median_cex_fee,
                                dex = result.weighted_median_dex_fee,
                                nodes = result.participating_nodes,
                                "feed result published"
                            );
                        }
                        ConsensusOutcome::Failed { round_id, submissions } => {
                            info!(round = round_id, submissions, "round failed, reopened");
                        }
                        ConsensusOutcome::Pending => {
                            debug!("round still pending");
                        }
                    }
                }
                result = &mut shutdown => {
                    result.context("failed to listen for shutdown signal")?;
                    info!("shutdown signal received");
                    return Ok(());
                }
            }
        }
    }
}
