use proc_macro::TokenStream;

mod describe;

/// Derive macro declaring a service's bootstrap descriptor
///
/// Each `#[service(...)]` attribute becomes one `ServiceDescriptor`. `priority`
/// defaults to `0`; lower priorities initialize earlier.
///
/// A type should carry exactly one `#[service]` attribute. Types with none or
/// several still compile, and are reported when the catalog is discovered.
///
/// # Example
/// ```ignore
/// use corestrap::prelude::*;
///
/// #[derive(Default, Describe)]
/// #[service(priority = -10)]
/// pub struct InputService;
/// ```
#[proc_macro_derive(Describe, attributes(service))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    describe::derive_describe(input)
}
