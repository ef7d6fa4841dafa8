//! # Airbyte Provider Entry Point
//!
//! Loads configuration, initialises logging and verifies the configured Airbyte API is
//! reachable, then lists the resource and data source types it serves.

use airbyte_provider::{Provider, config::ConfigLoader, telemetry};
use anyhow::Context;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .load()
        .context("failed to load provider configuration")?;
    telemetry::init_tracing(&config)?;

    info!(profile = %config.profile, config = %config.redacted_json()?, "loaded configuration");

    let provider = Provider::configure(config)
        .await
        .context("failed to configure provider")?;

    for name in provider.registry().resource_type_names() {
        info!(kind = "resource", name = %name, "serving type");
    }
    for name in provider.registry().data_source_type_names() {
        info!(kind = "data_source", name = %name, "serving type");
    }
    Ok(())
}
