//! # Registry Node Library
//!
//! Wiring for the local invoke gateway: configuration, the line gateway and
//! ledger snapshot persistence. The entry point is the `main.rs` binary.
//!
//! ## Lifecycle
//!
//! 1. Load configuration from the environment
//! 2. Initialize logging and metrics
//! 3. Restore the ledger snapshot, if configured
//! 4. Serve invocation lines until EOF or Ctrl+C
//! 5. Persist the snapshot, also after an input stream failure

#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod errors;
pub mod gateway;
pub mod snapshot;

pub use config::{load_config, NodeConfig};
pub use errors::NodeError;
pub use gateway::{Gateway, InvocationRequest, InvocationResponse};

use registry_contract::adapters::{InMemoryLedger, InvocationHandler};
use registry_contract::identity::IdentityResolver;
use registry_contract::service::RegistryContract;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{error, info};

/// The node: one in-memory ledger behind one gateway.
pub struct RegistryNode {
    ledger: Arc<InMemoryLedger>,
    gateway: Gateway<InMemoryLedger>,
    snapshot_path: Option<PathBuf>,
}

impl RegistryNode {
    pub fn new(config: &NodeConfig) -> Self {
        info!("Creating registry node");

        let ledger = Arc::new(InMemoryLedger::new());
        let contract = RegistryContract::new(Arc::clone(&ledger), config.contract.clone());
        let resolver = IdentityResolver::new(config.contract.role_attribute.clone());
        let gateway = Gateway::new(InvocationHandler::new(Arc::new(contract), resolver));

        Self {
            ledger,
            gateway,
            snapshot_path: config.snapshot_path.clone(),
        }
    }

    pub fn gateway(&self) -> &Gateway<InMemoryLedger> {
        &self.gateway
    }

    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    /// Loads the configured snapshot. No-op without a snapshot path.
    pub async fn restore(&self) -> Result<(), NodeError> {
        if let Some(path) = &self.snapshot_path {
            snapshot::load_snapshot(path, &self.ledger).await?;
        }
        Ok(())
    }

    /// Serves invocations, then persists the snapshot.
    ///
    /// The snapshot is written even when the input stream fails, so that
    /// writes accepted before the failure are kept. The stream error is
    /// returned after persisting.
    pub async fn run<R, W, S>(&self, reader: R, writer: W, shutdown: S) -> Result<usize, NodeError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        let served = self.gateway.serve(reader, writer, shutdown).await;
        match &served {
            Ok(handled) => info!(handled, "Gateway stopped"),
            Err(e) => error!(error = %e, "Gateway stopped on stream failure"),
        }
        self.persist().await?;
        served
    }

    /// Writes the configured snapshot. No-op without a snapshot path.
    pub async fn persist(&self) -> Result<(), NodeError> {
        if let Some(path) = &self.snapshot_path {
            snapshot::save_snapshot(path, &self.ledger).await?;
        }
        Ok(())
    }
}
