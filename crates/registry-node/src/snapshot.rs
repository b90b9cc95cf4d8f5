//! Ledger snapshot persistence.
//!
//! The snapshot is a JSON object mapping each key to its hex-encoded value.

use crate::errors::NodeError;
use registry_contract::adapters::InMemoryLedger;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Restores `ledger` from `path`. A missing file leaves the ledger empty.
///
/// Returns the number of keys loaded.
pub async fn load_snapshot(path: &Path, ledger: &InMemoryLedger) -> Result<usize, NodeError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No snapshot found, starting empty");
            return Ok(0);
        }
        Err(source) => {
            return Err(NodeError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let snapshot: BTreeMap<String, String> =
        serde_json::from_slice(&bytes).map_err(|e| NodeError::InvalidFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    let count = snapshot.len();
    ledger.restore(snapshot)?;

    info!(path = %path.display(), keys = count, "Snapshot loaded");
    Ok(count)
}

/// Writes the whole ledger to `path`, replacing the previous snapshot.
pub async fn save_snapshot(path: &Path, ledger: &InMemoryLedger) -> Result<usize, NodeError> {
    let snapshot = ledger.snapshot()?;
    let count = snapshot.len();
    let bytes = serde_json::to_vec_pretty(&snapshot)?;

    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| NodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), keys = count, "Snapshot saved");
    Ok(count)
}
