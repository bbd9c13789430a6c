//! The topology compiler.
//!
//! Given a configuration tree describing monitoring tasks, the builders in
//! this module produce the ordered list of processing nodes (producers,
//! mergers, checkers) an external execution runtime will run. Generation is
//! synchronous and side-effect-free apart from the returned node list; it is
//! executed once at startup from a configuration snapshot.

pub mod local;
pub mod remote;
pub mod subspec;

use thiserror::Error;

pub use local::LocalTopologyBuilder;
pub use remote::RemoteTopologyBuilder;

use crate::{
    config::ConfigView,
    models::{TaskDescriptor, TaskLocation},
};

/// Configuration key the task collection lives under.
pub const TASKS_KEY: &str = "tasks";

/// Fatal configuration errors encountered during topology generation.
///
/// Any of these aborts generation for the whole configuration; no partial
/// topology is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    /// A task declaration has no `location` field.
    #[error("task '{task}' is missing the required 'location' field")]
    MissingLocation {
        /// Name of the offending task.
        task: String,
    },

    /// A task declaration carries an unrecognized `location` value.
    #[error("task '{task}' has an unrecognized location '{value}' (expected 'local' or 'remote')")]
    InvalidLocation {
        /// Name of the offending task.
        task: String,
        /// The unrecognized value.
        value: String,
    },
}

/// Reads every task declaration under [`TASKS_KEY`], in declaration order.
///
/// All tasks are parsed eagerly, active or not, so a structurally broken
/// declaration aborts generation before any node is emitted.
pub(crate) fn read_tasks<C: ConfigView>(config: &C) -> Result<Vec<TaskDescriptor>, TopologyError> {
    config
        .children(TASKS_KEY)
        .into_iter()
        .map(|(name, task)| read_task(name, &task))
        .collect()
}

/// Parses one task declaration.
fn read_task<C: ConfigView>(name: String, task: &C) -> Result<TaskDescriptor, TopologyError> {
    let active = task.get_bool("active").unwrap_or(true);
    let raw_location = task
        .get_string("location")
        .ok_or_else(|| TopologyError::MissingLocation { task: name.clone() })?;
    let location = TaskLocation::parse(&raw_location).ok_or_else(|| {
        TopologyError::InvalidLocation { task: name.clone(), value: raw_location.clone() }
    })?;
    let machines = task.get_string_list("machines").unwrap_or_default();

    Ok(TaskDescriptor { name, active, location, machines })
}
