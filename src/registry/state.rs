use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Progress of the most recent bootstrap run
///
/// A run walks the phases in declaration order, from `Uninitialized` to
/// `Ready`. Any failure stops the run in `Failed`. Starting a new run resets
/// the state to `Uninitialized`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum BootstrapState {
    #[default]
    Uninitialized,
    Discovering,
    Validating,
    Ordering,
    Instantiating,
    RunningPreHooks,
    InitializingServices,
    RunningPostHooks,
    Ready,
    Failed,
}

impl BootstrapState {
    /// `Ready` or `Failed`: nothing further happens until the next run
    pub fn is_terminal(self) -> bool {
        matches!(self, BootstrapState::Ready | BootstrapState::Failed)
    }
}
