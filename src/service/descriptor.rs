use serde::{Deserialize, Serialize};

/// Declares that a type takes part in bootstrap, and when.
///
/// Lower priorities initialize earlier. Services sharing a priority
/// initialize in registration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub priority: i32,
}

impl ServiceDescriptor {
    pub const fn new(priority: i32) -> Self {
        Self { priority }
    }

    pub const fn priority(&self) -> i32 {
        self.priority
    }
}

/// Descriptors declared on a service type
///
/// This trait is typically implemented via `#[derive(Describe)]`, which emits
/// one descriptor per `#[service(...)]` attribute. A well-formed service declares
/// exactly one; anything else is reported when the catalog is discovered.
///
/// # Example
/// ```
/// use corestrap::prelude::*;
///
/// #[derive(Default, Describe)]
/// #[service(priority = 10)]
/// pub struct AudioService;
///
/// assert_eq!(AudioService::descriptors(), &[ServiceDescriptor::new(10)]);
/// ```
pub trait Describe {
    fn descriptors() -> &'static [ServiceDescriptor];
}
