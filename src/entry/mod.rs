//! Startup entry point
//!
//! Gates the bootstrap run on the persisted `initialize_on_awake` flag.
//! When the flag is off nothing is instantiated; call
//! [`ServiceRegistry::initialize`] manually instead.

use crate::config::{ConfigStore, CoreConfig};
use crate::error::Result;
use crate::registry::{BootstrapReport, ServiceRegistry};
use std::path::Path;

/// Bootstrap `registry` if `config` enables it
///
/// Returns `Ok(None)` when automatic bootstrap is disabled.
pub async fn auto_initialize(
    registry: &ServiceRegistry,
    config: &CoreConfig,
) -> Result<Option<BootstrapReport>> {
    if !config.initialize_on_awake {
        tracing::info!("Automatic bootstrap disabled, skipping");
        return Ok(None);
    }

    registry.initialize().await.map(Some)
}

/// Load the configuration asset at `path` (plus environment overrides) and
/// bootstrap `registry` if it enables it
pub async fn auto_initialize_from(
    registry: &ServiceRegistry,
    path: impl AsRef<Path>,
) -> Result<Option<BootstrapReport>> {
    let config = ConfigStore::load(path)?.config().with_env_overrides();
    auto_initialize(registry, &config).await
}
