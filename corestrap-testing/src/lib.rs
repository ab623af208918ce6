//! Test fixtures for code built on Corestrap.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

/// The future type returned by [`CallLog::task`] hooks
pub type TaskFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// Shared, ordered record of events
///
/// Clones share the same log, so one can be handed to every service and hook
/// taking part in a bootstrap run and inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// A synchronous hook that appends `label`
    pub fn action(
        &self,
        label: &str,
    ) -> impl Fn() -> anyhow::Result<()> + Send + Sync + 'static + use<> {
        let log = self.clone();
        let label = label.to_string();
        move || {
            log.push(label.clone());
            Ok(())
        }
    }

    /// An async hook that yields once, then appends `label`
    pub fn task(
        &self,
        label: &str,
    ) -> impl Fn() -> TaskFuture + Send + Sync + 'static + use<> {
        let log = self.clone();
        let label = label.to_string();
        move || {
            let log = log.clone();
            let label = label.clone();
            Box::pin(async move {
                tokio::task::yield_now().await;
                log.push(label);
                Ok(())
            }) as TaskFuture
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let log = CallLog::new();
        let other = log.clone();
        other.push("a");
        (log.action("b"))().unwrap();
        assert_eq!(log.entries(), vec!["a", "b"]);
    }
}
