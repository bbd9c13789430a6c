//! This module defines the `TaskDescriptor` structure, the per-task view of the
//! monitoring configuration consumed by the topology builders.

use serde::{Deserialize, Serialize};

/// Where a monitoring task is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskLocation {
    /// The task runs on specific machines close to the data, one producer per
    /// machine.
    Local,
    /// The task runs centrally in the aggregation stage.
    Remote,
}

impl TaskLocation {
    /// Parses the configuration spelling of a location.
    ///
    /// Returns `None` for anything other than `"local"` or `"remote"`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "local" => Some(TaskLocation::Local),
            "remote" => Some(TaskLocation::Remote),
            _ => None,
        }
    }
}

/// A monitoring task as declared in configuration.
///
/// Read-only input to the topology builders; ownership of the underlying
/// configuration stays with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDescriptor {
    /// Name of the task, unique within the configuration.
    pub name: String,

    /// Whether the task takes part in topology generation at all.
    #[serde(default = "default_active")]
    pub active: bool,

    /// Deployment location of the task.
    pub location: TaskLocation,

    /// Ordered list of machines the task is deployed on.
    ///
    /// Meaningful only for [`TaskLocation::Local`] tasks; empty when the
    /// configuration does not list any machines.
    #[serde(default)]
    pub machines: Vec<String>,
}

/// Tasks with no explicit `active` flag take part in generation.
fn default_active() -> bool {
    true
}
