//! Service capability and descriptor metadata.

mod descriptor;
mod traits;

pub use descriptor::{Describe, ServiceDescriptor};
pub use traits::CoreService;
