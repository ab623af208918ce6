use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, BootstrapError>;

/// A single problem found while validating the registered services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryIssue {
    /// The type declares no `#[service]` descriptor.
    MissingDescriptor { type_name: &'static str },

    /// The type declares more than one descriptor.
    MultipleDescriptors { type_name: &'static str, count: usize },

    /// The same concrete type was registered more than once.
    DuplicateRegistration { type_name: &'static str },
}

impl DiscoveryIssue {
    pub fn type_name(&self) -> &'static str {
        match self {
            DiscoveryIssue::MissingDescriptor { type_name }
            | DiscoveryIssue::MultipleDescriptors { type_name, .. }
            | DiscoveryIssue::DuplicateRegistration { type_name } => type_name,
        }
    }
}

impl fmt::Display for DiscoveryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryIssue::MissingDescriptor { type_name } => write!(
                f,
                "{type_name} implements CoreService but has no ServiceDescriptor"
            ),
            DiscoveryIssue::MultipleDescriptors { type_name, count } => write!(
                f,
                "{type_name} declares {count} ServiceDescriptors, expected exactly one"
            ),
            DiscoveryIssue::DuplicateRegistration { type_name } => {
                write!(f, "{type_name} is registered more than once")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Service discovery failed: {}", join_issues(.issues))]
    Discovery { issues: Vec<DiscoveryIssue> },

    #[error("Failed to instantiate {type_name}: {source}")]
    InstantiationFailed {
        type_name: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Initialization failed for {type_name}: {source}")]
    ServiceInitFailed {
        type_name: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("{phase} hook #{index} failed: {source}")]
    HookFailed {
        phase: HookPhase,
        index: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("Blocking bootstrap cannot run inside an async runtime")]
    BlockingInRuntime,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Which hook list a failing hook belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum HookPhase {
    #[strum(to_string = "before-initialize")]
    Before,
    #[strum(to_string = "after-initialize")]
    After,
}

fn join_issues(issues: &[DiscoveryIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_error_lists_every_issue() {
        let err = BootstrapError::Discovery {
            issues: vec![
                DiscoveryIssue::MissingDescriptor { type_name: "a::Audio" },
                DiscoveryIssue::MultipleDescriptors {
                    type_name: "b::Input",
                    count: 2,
                },
            ],
        };
        let message = err.to_string();
        assert!(message.contains("a::Audio implements CoreService but has no ServiceDescriptor"));
        assert!(message.contains("b::Input declares 2 ServiceDescriptors"));
    }

    #[test]
    fn hook_phase_display() {
        assert_eq!(HookPhase::Before.to_string(), "before-initialize");
        assert_eq!(HookPhase::After.to_string(), "after-initialize");
    }
}
