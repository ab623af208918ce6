//! Service Registry
//!
//! Runs the bootstrap sequence over a [`ServiceCatalog`] and serves lookups
//! against the services it produced.
//!
//! # Bootstrap Sequence
//!
//! ```text
//! 1. Discover + validate registered types   (fail closed)
//!    ↓
//! 2. Order by ascending priority            (stable)
//!    ↓
//! 3. Instantiate every service
//!    ↓
//! 4. Before-initialize hooks                (registration order)
//!    ↓
//! 5. CoreService::initialize (each service, one at a time)
//!    ↓
//! 6. After-initialize hooks                 (registration order)
//!    ↓
//! 7. Publish for lookup
//! ```

mod report;
mod set;
mod state;

pub use report::{BootstrapReport, ServiceInfo};
pub use set::ServiceSet;
pub use state::BootstrapState;

use crate::catalog::ServiceCatalog;
use crate::error::{BootstrapError, HookPhase, Result};
use crate::hooks::{Hook, HookId, HookSet};
use chrono::Utc;
use set::ServiceSlot;
use std::any::TypeId;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use uuid::Uuid;

/// Owns a catalog, its hooks, and the services of the latest run
///
/// Each call to [`initialize`](Self::initialize) is a fresh bootstrap run.
/// The previous generation of services is dropped when the run starts, and
/// the new one becomes visible to lookups only once the run reaches
/// [`BootstrapState::Ready`]. Until then, and after a failed run, every
/// lookup returns `None`.
///
/// # Example
///
/// ```rust,ignore
/// use corestrap::prelude::*;
///
/// let mut catalog = ServiceCatalog::new();
/// catalog.register::<AudioService>();
/// catalog.register::<SaveGameService>();
///
/// let registry = ServiceRegistry::new(catalog);
/// registry.add_after_initialize_action(|| {
///     tracing::info!("All services ready");
///     Ok(())
/// });
///
/// registry.initialize().await?;
/// let audio = registry.get::<AudioService>().expect("registered above");
/// ```
pub struct ServiceRegistry {
    catalog: ServiceCatalog,
    before_initialize: HookSet,
    after_initialize: HookSet,
    state: Mutex<BootstrapState>,
    current: RwLock<Option<Arc<ServiceSet>>>,
    run_lock: tokio::sync::Mutex<()>,
}

impl ServiceRegistry {
    pub fn new(catalog: ServiceCatalog) -> Self {
        Self {
            catalog,
            before_initialize: HookSet::new(HookPhase::Before),
            after_initialize: HookSet::new(HookPhase::After),
            state: Mutex::new(BootstrapState::Uninitialized),
            current: RwLock::new(None),
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn state(&self) -> BootstrapState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_ready(&self) -> bool {
        self.state() == BootstrapState::Ready
    }

    /// Run the full bootstrap sequence
    ///
    /// Runs on the same registry are serialized. Hooks are captured when the
    /// run starts; hooks added or removed while it is in progress only affect
    /// later runs.
    ///
    /// # Errors
    ///
    /// Discovery and instantiation errors abort before any hook or service
    /// runs. A failing hook or service aborts the rest of the run; work that
    /// already completed is not rolled back.
    pub async fn initialize(&self) -> Result<BootstrapReport> {
        let _run = self.run_lock.lock().await;

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        self.reset();

        tracing::info!("Starting bootstrap run {}...", run_id);

        let before = self.before_initialize.snapshot();
        let after = self.after_initialize.snapshot();

        match self.run(run_id, &before, &after).await {
            Ok(services) => {
                let report = BootstrapReport {
                    run_id,
                    started_at,
                    finished_at: Utc::now(),
                    services: services.iter().collect(),
                    before_hooks: before.len(),
                    after_hooks: after.len(),
                };
                *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(services);
                self.set_state(BootstrapState::Ready);

                tracing::info!(
                    "Bootstrap run {} complete ({} services initialized)",
                    run_id,
                    report.services.len()
                );
                Ok(report)
            }
            Err(e) => {
                self.set_state(BootstrapState::Failed);
                tracing::error!("Bootstrap run {} failed: {}", run_id, e);
                Err(e)
            }
        }
    }

    /// Run the bootstrap sequence to completion on the calling thread
    ///
    /// Drives [`initialize`](Self::initialize) on a private current-thread
    /// runtime, so it must not be called from inside an async context.
    pub fn initialize_blocking(&self) -> Result<BootstrapReport> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(BootstrapError::BlockingInRuntime);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BootstrapError::Internal(format!("Failed to build runtime: {}", e)))?;
        runtime.block_on(self.initialize())
    }

    async fn run(&self, run_id: Uuid, before: &[Hook], after: &[Hook]) -> Result<Arc<ServiceSet>> {
        self.set_state(BootstrapState::Discovering);
        tracing::debug!("Discovered {} registered services", self.catalog.len());

        self.set_state(BootstrapState::Validating);
        self.catalog.ensure_valid()?;

        self.set_state(BootstrapState::Ordering);
        let ordered = self.catalog.order();

        self.set_state(BootstrapState::Instantiating);
        let mut slots = Vec::with_capacity(ordered.len());
        for entry in ordered {
            let instance = entry.instantiate().map_err(|source| {
                tracing::error!("Instantiation failed for {}: {}", entry.type_name(), source);
                BootstrapError::InstantiationFailed {
                    type_name: entry.type_name(),
                    source,
                }
            })?;
            slots.push(ServiceSlot::new(entry, instance));
        }
        let services = Arc::new(ServiceSet::new(run_id, slots));

        self.set_state(BootstrapState::RunningPreHooks);
        run_hooks(HookPhase::Before, before).await?;

        self.set_state(BootstrapState::InitializingServices);
        tracing::info!("Initializing {} services...", services.len());
        for slot in services.slots() {
            tracing::debug!("Initializing: {}", slot.type_name());
            slot.service()
                .initialize(&services)
                .await
                .map_err(|source| {
                    tracing::error!("Initialization failed for {}: {}", slot.type_name(), source);
                    BootstrapError::ServiceInitFailed {
                        type_name: slot.type_name(),
                        source,
                    }
                })?;
            tracing::debug!("Initialized: {}", slot.type_name());
        }

        self.set_state(BootstrapState::RunningPostHooks);
        run_hooks(HookPhase::After, after).await?;

        Ok(services)
    }

    fn reset(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.set_state(BootstrapState::Uninitialized);
    }

    fn set_state(&self, state: BootstrapState) {
        tracing::trace!("Bootstrap state: {}", state);
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Services of the last successful run
    pub fn services(&self) -> Option<Arc<ServiceSet>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look up a service of the last successful run
    ///
    /// Returns `None` before the first run completes, after a failed run, or
    /// when no instance is assignable to `T`.
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.services()?.get::<T>()
    }

    /// Type-erased variant of [`get`](Self::get)
    pub fn get_service(&self, type_id: TypeId) -> Option<Arc<dyn crate::service::CoreService>> {
        self.services()?.get_service(type_id)
    }

    /// Add an async hook that runs before any service initializes
    pub fn add_before_initialize_task<F, Fut>(&self, hook: F) -> HookId
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.before_initialize.add(hook)
    }

    /// Add an async hook that runs after every service has initialized
    pub fn add_after_initialize_task<F, Fut>(&self, hook: F) -> HookId
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.after_initialize.add(hook)
    }

    /// Synchronous variant of [`add_before_initialize_task`](Self::add_before_initialize_task)
    pub fn add_before_initialize_action<F>(&self, action: F) -> HookId
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.before_initialize.add_action(action)
    }

    /// Synchronous variant of [`add_after_initialize_task`](Self::add_after_initialize_task)
    pub fn add_after_initialize_action<F>(&self, action: F) -> HookId
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.after_initialize.add_action(action)
    }

    pub fn remove_before_initialize_task(&self, id: HookId) -> bool {
        self.before_initialize.remove(id)
    }

    pub fn remove_after_initialize_task(&self, id: HookId) -> bool {
        self.after_initialize.remove(id)
    }

    pub fn before_initialize_hook_count(&self) -> usize {
        self.before_initialize.len()
    }

    pub fn after_initialize_hook_count(&self) -> usize {
        self.after_initialize.len()
    }
}

async fn run_hooks(phase: HookPhase, hooks: &[Hook]) -> Result<()> {
    tracing::info!("Calling {} hooks...", phase);

    for (index, hook) in hooks.iter().enumerate() {
        tracing::debug!("Running {} hook #{}", phase, index);
        hook().await.map_err(|source| {
            tracing::error!("{} hook #{} failed: {}", phase, index, source);
            BootstrapError::HookFailed {
                phase,
                index,
                source,
            }
        })?;
    }

    tracing::info!("{} hooks complete ({} hooks executed)", phase, hooks.len());
    Ok(())
}
