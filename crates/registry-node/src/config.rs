//! Node configuration, loaded from the environment.

use crate::errors::NodeError;
use registry_contract::config::ContractConfig;
use registry_contract::domain::entities::SeedUser;
use registry_telemetry::TelemetryConfig;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything the node needs to start.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Contract policies and seed data.
    pub contract: ContractConfig,
    /// Logging and metrics.
    pub telemetry: TelemetryConfig,
    /// Ledger snapshot read on start and written on shutdown.
    pub snapshot_path: Option<PathBuf>,
}

/// Load configuration from environment and files.
///
/// # Environment Variables
///
/// - `REGISTRY_SNAPSHOT_PATH`: JSON ledger snapshot (default: none, state is discarded on exit)
/// - `REGISTRY_SEED_FILE`: JSON array of seed users replacing the built-in pair
/// - plus the variables read by `ContractConfig::from_env` and `TelemetryConfig::from_env`
pub fn load_config() -> Result<NodeConfig, NodeError> {
    let mut contract = ContractConfig::from_env()?;

    if let Ok(path) = env::var("REGISTRY_SEED_FILE") {
        let seeds = read_seed_file(Path::new(&path))?;
        info!(path = %path, count = seeds.len(), "Loaded seed users from file");
        contract = contract.with_seed_users(seeds);
        contract.validate()?;
    }

    Ok(NodeConfig {
        contract,
        telemetry: TelemetryConfig::from_env(),
        snapshot_path: env::var("REGISTRY_SNAPSHOT_PATH").ok().map(PathBuf::from),
    })
}

/// Parses a JSON array of seed users.
pub fn read_seed_file(path: &Path) -> Result<Vec<SeedUser>, NodeError> {
    let bytes = std::fs::read(path).map_err(|source| NodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| NodeError::InvalidFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
