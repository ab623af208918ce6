use crate::service::{CoreService, ServiceDescriptor};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Casts a type-erased instance into an `Arc<Arc<I>>` wrapped as `Arc<dyn Any>`.
/// Returns `None` when the instance is not the implementation the caster was built for.
pub(crate) type CasterFn =
    Arc<dyn Fn(Arc<dyn Any + Send + Sync>) -> Option<Arc<dyn Any + Send + Sync>> + Send + Sync>;

type FactoryFn = Arc<dyn Fn() -> anyhow::Result<Instance> + Send + Sync>;

/// A freshly constructed service, viewed both as `Any` (for casting) and as
/// `CoreService` (for initialization). Both point at the same allocation.
pub(crate) struct Instance {
    pub(crate) any: Arc<dyn Any + Send + Sync>,
    pub(crate) service: Arc<dyn CoreService>,
}

/// One registered service type
pub struct ServiceEntry {
    type_id: TypeId,
    type_name: &'static str,
    descriptors: Vec<ServiceDescriptor>,
    factory: FactoryFn,
    casters: HashMap<TypeId, CasterFn>,
}

impl ServiceEntry {
    pub(crate) fn new<T, F>(descriptors: Vec<ServiceDescriptor>, factory: F) -> Self
    where
        T: CoreService,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let factory: FactoryFn = Arc::new(move || {
            let concrete = Arc::new(factory()?);
            Ok(Instance {
                any: concrete.clone(),
                service: concrete,
            })
        });

        let mut casters: HashMap<TypeId, CasterFn> = HashMap::new();
        casters.insert(
            TypeId::of::<T>(),
            Arc::new(|instance: Arc<dyn Any + Send + Sync>| {
                let concrete = instance.downcast::<T>().ok()?;
                Some(Arc::new(concrete) as Arc<dyn Any + Send + Sync>)
            }),
        );
        casters.insert(
            TypeId::of::<dyn CoreService>(),
            Arc::new(|instance: Arc<dyn Any + Send + Sync>| {
                let concrete = instance.downcast::<T>().ok()?;
                let service: Arc<dyn CoreService> = concrete;
                Some(Arc::new(service) as Arc<dyn Any + Send + Sync>)
            }),
        );

        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            descriptors,
            factory,
            casters,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    /// Priority of the first descriptor, or the default when none is declared
    pub fn priority(&self) -> i32 {
        self.descriptors
            .first()
            .copied()
            .unwrap_or_default()
            .priority()
    }

    /// Whether instances of this entry can be resolved as `type_id`
    pub fn is_assignable_to(&self, type_id: TypeId) -> bool {
        self.casters.contains_key(&type_id)
    }

    pub(crate) fn instantiate(&self) -> anyhow::Result<Instance> {
        (self.factory)()
    }

    pub(crate) fn casters(&self) -> &HashMap<TypeId, CasterFn> {
        &self.casters
    }
}

impl std::fmt::Debug for ServiceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEntry")
            .field("type_name", &self.type_name)
            .field("descriptors", &self.descriptors)
            .field("exposed_as", &self.casters.len())
            .finish()
    }
}

/// Handle returned by the catalog's `register*` methods
///
/// Use it to declare additional types the instance resolves as.
pub struct Registration<'a, T> {
    entry: &'a mut ServiceEntry,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T: CoreService> Registration<'a, T> {
    pub(crate) fn new(entry: &'a mut ServiceEntry) -> Self {
        Self {
            entry,
            _marker: PhantomData,
        }
    }

    /// Make the instance resolvable as `I`, usually a trait object
    ///
    /// When several services expose the same `I`, lookups return the one that
    /// initializes first.
    pub fn expose<I>(self, caster: fn(Arc<T>) -> Arc<I>) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let caster: CasterFn = Arc::new(move |instance: Arc<dyn Any + Send + Sync>| {
            let concrete = instance.downcast::<T>().ok()?;
            let exposed: Arc<I> = caster(concrete);
            Some(Arc::new(exposed) as Arc<dyn Any + Send + Sync>)
        });
        self.entry.casters.insert(TypeId::of::<I>(), caster);
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.entry.type_name
    }
}
