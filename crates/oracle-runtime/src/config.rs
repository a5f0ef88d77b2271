//! Runtime configuration loading.

use anyhow::{bail, Context, Result};
use qf_01_node_registry::{ActiveRole, NodeMetadata};
use qf_04_coordinator::OracleConfig;
use serde::{Deserialize, Serialize};
use shared_types::NodeId;
use std::path::Path;

/// One pre-configured reporting node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeEntry {
    /// 32-byte node id, hex encoded.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub endpoint: String,
    /// 32-byte Ed25519 verifying key, hex encoded.
    pub public_key: String,
    /// "submitter", "validator", or "backup".
    pub role: String,
}

impl NodeEntry {
    pub fn node_id(&self) -> Result<NodeId> {
        decode_32(&self.id).with_context(|| format!("invalid node id for {}", self.name))
    }

    pub fn metadata(&self) -> Result<NodeMetadata> {
        Ok(NodeMetadata {
            name: self.name.clone(),
            endpoint: self.endpoint.clone(),
            public_key: decode_32(&self.public_key)
                .with_context(|| format!("invalid public key for {}", self.name))?,
        })
    }

    pub fn role(&self) -> Result<ActiveRole> {
        match self.role.as_str() {
            "submitter" => Ok(ActiveRole::Submitter),
            "validator" => Ok(ActiveRole::Validator),
            "backup" => Ok(ActiveRole::Backup),
            other => bail!("unknown role {other:?} for node {}", self.name),
        }
    }
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Seconds between consensus ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
}

fn default_tick_interval() -> u64 {
    1
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            oracle: OracleConfig::default(),
            tick_interval_secs: default_tick_interval(),
            nodes: Vec::new(),
        }
    }
}

impl RuntimeConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Resolve the config path from `QF_CONFIG` or the first CLI argument;
    /// defaults apply when neither is set.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var("QF_CONFIG")
            .ok()
            .or_else(|| std::env::args().nth(1));
        match path {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}

fn decode_32(input: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(input).context("not valid hex")?;
    let array: [u8; 32] = bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected 32 bytes"))?;
    Ok(array)
}
