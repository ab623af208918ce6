use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A service as it was placed in initialization order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceInfo {
    pub type_name: &'static str,
    pub priority: i32,
}

/// Summary of a successful bootstrap run
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// In initialization order
    pub services: Vec<ServiceInfo>,
    pub before_hooks: usize,
    pub after_hooks: usize,
}

impl BootstrapReport {
    pub fn elapsed(&self) -> chrono::TimeDelta {
        self.finished_at - self.started_at
    }
}
