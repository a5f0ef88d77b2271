//! Oracle node entry point.

use anyhow::Result;
use oracle_runtime::config::RuntimeConfig;
use oracle_runtime::OracleRuntime;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = RuntimeConfig::from_env()?;
    info!(
        threshold = config.oracle.consensus_threshold,
        window_secs = config.oracle.submission_window_secs,
        nodes = config.nodes.len(),
        "starting quorum-feed oracle"
    );

    let runtime = OracleRuntime::new(config)?;
    runtime.run().await
}
