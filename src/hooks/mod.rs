//! Before/after initialization hooks
//!
//! Hooks let code outside the catalog run work strictly before any service
//! is initialized, or strictly after all of them have finished.

use crate::error::HookPhase;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub type HookFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A no-argument callback run by the bootstrap sequence
pub type Hook = Arc<dyn Fn() -> HookFuture + Send + Sync>;

/// Identity of a registered hook, used to remove it again
///
/// Ids carry the phase they were issued for, so an id from one list never
/// matches a hook in the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId {
    phase: HookPhase,
    seq: u64,
}

impl HookId {
    pub fn phase(&self) -> HookPhase {
        self.phase
    }
}

/// Ordered list of hooks for one phase
pub struct HookSet {
    phase: HookPhase,
    hooks: Mutex<Vec<(HookId, Hook)>>,
    next_id: AtomicU64,
}

impl HookSet {
    pub fn new(phase: HookPhase) -> Self {
        Self {
            phase,
            hooks: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub fn phase(&self) -> HookPhase {
        self.phase
    }

    /// Append an async hook
    pub fn add<F, Fut>(&self, hook: F) -> HookId
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let hook: Hook = Arc::new(move || Box::pin(hook()) as HookFuture);
        self.push(hook)
    }

    /// Append a synchronous hook
    pub fn add_action<F>(&self, action: F) -> HookId
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let action = Arc::new(action);
        let hook: Hook = Arc::new(move || {
            let action = Arc::clone(&action);
            Box::pin(async move { action() }) as HookFuture
        });
        self.push(hook)
    }

    fn push(&self, hook: Hook) -> HookId {
        let id = HookId {
            phase: self.phase,
            seq: self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        self.lock().push((id, hook));
        id
    }

    /// Remove a previously added hook
    ///
    /// Returns `false` if it was not present, including ids issued by a set
    /// for the other phase.
    pub fn remove(&self, id: HookId) -> bool {
        if id.phase != self.phase {
            tracing::warn!("Ignoring removal of a {} hook from the {} hooks", id.phase, self.phase);
            return false;
        }
        let mut hooks = self.lock();
        match hooks.iter().position(|(hook_id, _)| *hook_id == id) {
            Some(index) => {
                hooks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Hooks in registration order, as of now
    ///
    /// Later additions or removals do not affect the returned list.
    pub fn snapshot(&self) -> Vec<Hook> {
        self.lock().iter().map(|(_, hook)| Arc::clone(hook)).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(HookId, Hook)>> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
