//! The service capability
//!
//! A service is any type the registry can construct without arguments and
//! initialize once per bootstrap run.

use crate::registry::ServiceSet;
use async_trait::async_trait;
use std::any::Any;

/// A type that is instantiated and initialized by the bootstrap sequence
///
/// `initialize` runs once per bootstrap run, strictly after every service with
/// a lower priority has finished initializing and after all before-initialize
/// hooks. The registry never runs two initializations concurrently, so a
/// service may rely on earlier services being ready.
///
/// `services` is the generation being bootstrapped. Every instance in it has
/// already been constructed, so lookups succeed even for services that have
/// not been initialized yet.
///
/// Instances are shared (`Arc`) once constructed; keep mutable state behind
/// interior mutability.
///
/// # Example
///
/// ```rust,ignore
/// use corestrap::prelude::*;
/// use tokio::sync::RwLock;
///
/// #[derive(Default, Describe)]
/// #[service(priority = 1)]
/// pub struct SaveGameService {
///     slots: RwLock<Vec<String>>,
/// }
///
/// #[async_trait]
/// impl CoreService for SaveGameService {
///     async fn initialize(&self, _services: &ServiceSet) -> anyhow::Result<()> {
///         self.slots.write().await.push("autosave".into());
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait CoreService: Any + Send + Sync {
    /// Called once after every service in the run has been constructed
    async fn initialize(&self, services: &ServiceSet) -> anyhow::Result<()>;
}
