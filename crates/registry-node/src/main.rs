//! # Registry Node
//!
//! Local invoke gateway for the identity registry contract.
//!
//! Reads one JSON invocation per line on stdin and writes one JSON response
//! per line on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use registry_node::{load_config, RegistryNode};
use registry_telemetry::init_telemetry;
use tokio::io::BufReader;
use tracing::{info, warn};

/// Resolves on Ctrl+C. If the signal handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = load_config().context("invalid node configuration")?;

    // Initialize logging and metrics
    let _telemetry =
        init_telemetry(config.telemetry.clone()).context("failed to initialize telemetry")?;

    let node = RegistryNode::new(&config);
    node.restore().await.context("failed to restore ledger snapshot")?;

    info!(
        registry_contract = registry_contract::VERSION,
        "Registry node ready. Reading invocations from stdin."
    );
    let handled = node
        .run(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            shutdown_signal(),
        )
        .await
        .context("gateway stopped on failure")?;
    info!(handled, "Registry node exiting");

    Ok(())
}
