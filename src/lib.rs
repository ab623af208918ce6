//! # Corestrap
//!
//! Priority-ordered service bootstrap for game-engine hosts.
//!
//! At startup Corestrap instantiates every registered service, runs
//! before-initialize hooks, initializes the services one at a time in
//! ascending priority order, runs after-initialize hooks, and then serves
//! lookups by type for the rest of the application.
//!
//! ## Features
//!
//! - **Explicit registration**: services are listed in a [`ServiceCatalog`], no runtime type scanning
//! - **Declarative priority**: `#[derive(Describe)]` with `#[service(priority = N)]`
//! - **Deterministic order**: stable sort, ties keep registration order
//! - **Fail closed**: every misdeclared service is reported before anything runs
//! - **Trait Object Lookup**: expose a service as `Arc<dyn Trait>`
//! - **Startup gating**: a persisted `initialize_on_awake` flag
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use corestrap::prelude::*;
//!
//! pub trait Mixer: Send + Sync {
//!     fn volume(&self) -> f32;
//! }
//!
//! #[derive(Default, Describe)]
//! #[service(priority = 1)]
//! pub struct AudioService;
//!
//! impl Mixer for AudioService {
//!     fn volume(&self) -> f32 {
//!         0.8
//!     }
//! }
//!
//! #[async_trait]
//! impl CoreService for AudioService {
//!     async fn initialize(&self, _services: &ServiceSet) -> anyhow::Result<()> {
//!         tracing::info!("Audio ready");
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> corestrap::Result<()> {
//!     let mut catalog = ServiceCatalog::new();
//!     catalog
//!         .register::<AudioService>()
//!         .expose::<dyn Mixer>(|s| s as Arc<dyn Mixer>);
//!
//!     let registry = ServiceRegistry::new(catalog);
//!     corestrap::entry::auto_initialize_from(&registry, corestrap::config::DEFAULT_CONFIG_PATH)
//!         .await?;
//!
//!     if let Some(mixer) = registry.get::<dyn Mixer>() {
//!         println!("volume = {}", mixer.volume());
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod entry;
pub mod error;
pub mod hooks;
pub mod registry;
pub mod service;

// Re-export core types
pub use catalog::{Registration, ServiceCatalog, ServiceEntry};
pub use config::{ConfigStore, CoreConfig};
pub use error::{BootstrapError, DiscoveryIssue, HookPhase, Result};
pub use hooks::HookId;
pub use registry::{BootstrapReport, BootstrapState, ServiceInfo, ServiceRegistry, ServiceSet};
pub use service::{CoreService, Describe, ServiceDescriptor};

// Re-export macros
pub use corestrap_macro::Describe as DeriveDescribe;

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;

/// Prelude module for convenient imports
///
/// ```
/// use corestrap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::DeriveDescribe as Describe;
    pub use crate::catalog::{Registration, ServiceCatalog};
    pub use crate::config::{ConfigStore, CoreConfig};
    pub use crate::error::{BootstrapError, DiscoveryIssue, Result};
    pub use crate::hooks::HookId;
    pub use crate::registry::{BootstrapReport, BootstrapState, ServiceRegistry, ServiceSet};
    pub use crate::service::{CoreService, Describe, ServiceDescriptor};
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
