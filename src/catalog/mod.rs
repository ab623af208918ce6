//! Service Catalog
//!
//! The explicit registration table the registry discovers services from.
//! Registration order is the discovery order, which breaks priority ties.

mod registration;

pub use registration::{Registration, ServiceEntry};
pub(crate) use registration::{CasterFn, Instance};

use crate::error::{BootstrapError, DiscoveryIssue, Result};
use crate::service::{CoreService, Describe, ServiceDescriptor};
use std::any::TypeId;
use std::collections::HashSet;

/// Ordered table of service types known to a registry
///
/// # Example
///
/// ```rust,ignore
/// use corestrap::prelude::*;
///
/// let mut catalog = ServiceCatalog::new();
/// catalog.register::<AudioService>().expose::<dyn Mixer>(|s| s as Arc<dyn Mixer>);
/// catalog.register_with_priority::<InputService>(-5);
///
/// let registry = ServiceRegistry::new(catalog);
/// ```
#[derive(Default)]
pub struct ServiceCatalog {
    entries: Vec<ServiceEntry>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type whose descriptors come from `#[derive(Describe)]`
    pub fn register<T>(&mut self) -> Registration<'_, T>
    where
        T: CoreService + Describe + Default,
    {
        self.register_with::<T, _>(|| Ok(T::default()))
    }

    /// Register a type built by a fallible factory
    ///
    /// A factory error aborts the bootstrap run with
    /// [`BootstrapError::InstantiationFailed`].
    pub fn register_with<T, F>(&mut self, factory: F) -> Registration<'_, T>
    where
        T: CoreService + Describe,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        self.push(ServiceEntry::new::<T, F>(T::descriptors().to_vec(), factory))
    }

    /// Register a type with its priority given at the call site
    pub fn register_with_priority<T>(&mut self, priority: i32) -> Registration<'_, T>
    where
        T: CoreService + Default,
    {
        self.push(ServiceEntry::new::<T, _>(
            vec![ServiceDescriptor::new(priority)],
            || Ok(T::default()),
        ))
    }

    fn push<T: CoreService>(&mut self, entry: ServiceEntry) -> Registration<'_, T> {
        tracing::debug!("Registered service: {}", entry.type_name());
        self.entries.push(entry);
        let index = self.entries.len() - 1;
        Registration::new(&mut self.entries[index])
    }

    /// Registered entries in discovery order
    pub fn entries(&self) -> &[ServiceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.entries.iter().any(|entry| entry.type_id() == type_id)
    }

    /// Collect every problem that prevents a bootstrap run
    ///
    /// All entries are checked; the result is empty when the catalog is valid.
    pub fn validate(&self) -> Vec<DiscoveryIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        let mut duplicated = HashSet::new();

        for entry in &self.entries {
            if !seen.insert(entry.type_id()) {
                if duplicated.insert(entry.type_id()) {
                    issues.push(DiscoveryIssue::DuplicateRegistration {
                        type_name: entry.type_name(),
                    });
                }
                continue;
            }

            match entry.descriptors().len() {
                1 => {}
                0 => issues.push(DiscoveryIssue::MissingDescriptor {
                    type_name: entry.type_name(),
                }),
                count => issues.push(DiscoveryIssue::MultipleDescriptors {
                    type_name: entry.type_name(),
                    count,
                }),
            }
        }

        issues
    }

    /// Entries sorted by ascending priority, ties kept in discovery order
    ///
    /// Only meaningful for a catalog that passed [`validate`](Self::validate).
    pub fn order(&self) -> Vec<&ServiceEntry> {
        let mut ordered: Vec<&ServiceEntry> = self.entries.iter().collect();
        // sort_by_key is stable
        ordered.sort_by_key(|entry| entry.priority());
        ordered
    }

    /// Validate and order in one step
    ///
    /// Fails closed: if any entry is invalid no order is produced, and the
    /// error lists every offending type.
    pub fn discover(&self) -> Result<Vec<&ServiceEntry>> {
        self.ensure_valid()?;
        Ok(self.order())
    }

    /// [`validate`](Self::validate), logging and returning every issue as one error
    pub fn ensure_valid(&self) -> Result<()> {
        let issues = self.validate();
        if issues.is_empty() {
            return Ok(());
        }

        for issue in &issues {
            tracing::error!("Discovery failed for {}: {}", issue.type_name(), issue);
        }
        Err(BootstrapError::Discovery { issues })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ServiceSet;
    use async_trait::async_trait;

    macro_rules! noop_service {
        ($name:ident) => {
            #[derive(Default)]
            struct $name;

            #[async_trait]
            impl CoreService for $name {
                async fn initialize(&self, _services: &ServiceSet) -> anyhow::Result<()> {
                    Ok(())
                }
            }
        };
    }

    noop_service!(Alpha);
    noop_service!(Beta);
    noop_service!(Gamma);
    noop_service!(Undescribed);
    noop_service!(Twice);

    impl Describe for Undescribed {
        fn descriptors() -> &'static [ServiceDescriptor] {
            &[]
        }
    }

    impl Describe for Twice {
        fn descriptors() -> &'static [ServiceDescriptor] {
            const DESCRIPTORS: &[ServiceDescriptor] =
                &[ServiceDescriptor::new(1), ServiceDescriptor::new(2)];
            DESCRIPTORS
        }
    }

    fn names(entries: &[&ServiceEntry]) -> Vec<&'static str> {
        entries
            .iter()
            .map(|entry| entry.type_name().rsplit("::").next().unwrap())
            .collect()
    }

    #[test]
    fn test_orders_by_ascending_priority() {
        let mut catalog = ServiceCatalog::new();
        catalog.register_with_priority::<Gamma>(3);
        catalog.register_with_priority::<Alpha>(1);
        catalog.register_with_priority::<Beta>(2);

        let ordered = catalog.discover().unwrap();
        assert_eq!(names(&ordered), vec!["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut catalog = ServiceCatalog::new();
        catalog.register_with_priority::<Gamma>(0);
        catalog.register_with_priority::<Alpha>(0);
        catalog.register_with_priority::<Beta>(-1);

        for _ in 0..3 {
            let ordered = catalog.discover().unwrap();
            assert_eq!(names(&ordered), vec!["Beta", "Gamma", "Alpha"]);
        }
    }

    #[test]
    fn test_reports_every_invalid_entry() {
        let mut catalog = ServiceCatalog::new();
        catalog.register::<Undescribed>();
        catalog.register_with_priority::<Alpha>(0);
        catalog.register::<Twice>();

        let err = catalog.discover().unwrap_err();
        match err {
            BootstrapError::Discovery { issues } => {
                assert_eq!(issues.len(), 2);
                assert!(matches!(issues[0], DiscoveryIssue::MissingDescriptor { .. }));
                assert!(matches!(
                    issues[1],
                    DiscoveryIssue::MultipleDescriptors { count: 2, .. }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_registration_reported_once() {
        let mut catalog = ServiceCatalog::new();
        catalog.register_with_priority::<Alpha>(0);
        catalog.register_with_priority::<Alpha>(1);
        catalog.register_with_priority::<Alpha>(2);

        let issues = catalog.validate();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0],
            DiscoveryIssue::DuplicateRegistration { .. }
        ));
    }

    #[test]
    fn test_contains() {
        let mut catalog = ServiceCatalog::new();
        assert!(catalog.is_empty());
        catalog.register_with_priority::<Alpha>(0);
        assert!(catalog.contains::<Alpha>());
        assert!(!catalog.contains::<Beta>());
        assert_eq!(catalog.len(), 1);
    }
}
