use super::ServiceInfo;
use crate::catalog::{CasterFn, Instance, ServiceEntry};
use crate::service::CoreService;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub(crate) struct ServiceSlot {
    type_name: &'static str,
    priority: i32,
    any: Arc<dyn Any + Send + Sync>,
    service: Arc<dyn CoreService>,
    casters: HashMap<TypeId, CasterFn>,
}

impl ServiceSlot {
    pub(crate) fn new(entry: &ServiceEntry, instance: Instance) -> Self {
        Self {
            type_name: entry.type_name(),
            priority: entry.priority(),
            any: instance.any,
            service: instance.service,
            casters: entry.casters().clone(),
        }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn service(&self) -> &Arc<dyn CoreService> {
        &self.service
    }
}

/// The services instantiated by one bootstrap run
///
/// Instances are held in initialization order. Lookups resolve the first
/// instance assignable to the requested type and remember the answer, so
/// repeated lookups return the same instance.
pub struct ServiceSet {
    run_id: Uuid,
    slots: Vec<ServiceSlot>,
    cache: DashMap<TypeId, usize>,
}

impl ServiceSet {
    pub(crate) fn new(run_id: Uuid, slots: Vec<ServiceSlot>) -> Self {
        Self {
            run_id,
            slots,
            cache: DashMap::new(),
        }
    }

    /// Identifier of the run that produced this set
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Resolve a service by concrete type or by an exposed type
    ///
    /// Returns `None` when no instance is assignable to `T`.
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let type_id = TypeId::of::<T>();
        let slot = &self.slots[self.resolve(type_id)?];
        let caster = slot.casters.get(&type_id)?;

        // The caster returns an Arc<dyn Any> holding an Arc<T>
        let wrapper = caster(Arc::clone(&slot.any))?;
        let wrapper = wrapper.downcast::<Arc<T>>().ok()?;
        Some(wrapper.as_ref().clone())
    }

    /// Resolve a service by `TypeId`, type-erased
    pub fn get_service(&self, type_id: TypeId) -> Option<Arc<dyn CoreService>> {
        self.resolve(type_id)
            .map(|index| Arc::clone(&self.slots[index].service))
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.resolve(TypeId::of::<T>()).is_some()
    }

    fn resolve(&self, type_id: TypeId) -> Option<usize> {
        if let Some(index) = self.cache.get(&type_id) {
            return Some(*index);
        }

        let index = self
            .slots
            .iter()
            .position(|slot| slot.casters.contains_key(&type_id))?;
        self.cache.insert(type_id, index);
        Some(index)
    }

    /// Services in initialization order
    pub fn iter(&self) -> impl Iterator<Item = ServiceInfo> + '_ {
        self.slots.iter().map(|slot| ServiceInfo {
            type_name: slot.type_name,
            priority: slot.priority,
        })
    }

    pub(crate) fn slots(&self) -> &[ServiceSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl std::fmt::Debug for ServiceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceSet")
            .field("run_id", &self.run_id)
            .field("services", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}
