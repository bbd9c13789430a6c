//! Builds the producer-side node set for a single deployment host.

use super::{read_tasks, subspec, TopologyError};
use crate::{
    config::ConfigView,
    models::{NodeDescriptor, TaskLocation},
};

/// Builds the node set one deployment unit runs: one producer per local task
/// deployed on the given host, or one aggregated producer per local task when
/// no host filter is given.
///
/// Mergers and checkers are never produced here; they belong to the
/// aggregation stage built by
/// [`RemoteTopologyBuilder`](super::RemoteTopologyBuilder).
pub struct LocalTopologyBuilder;

impl LocalTopologyBuilder {
    /// Generates the producer nodes for `host`, in task declaration order.
    ///
    /// With `host` set, a task whose machine list does not contain the host
    /// contributes nothing; that is a routine deployment situation, not an
    /// error. Structural configuration errors abort the whole generation.
    pub fn build<C: ConfigView>(
        config: &C,
        host: Option<&str>,
    ) -> Result<Vec<NodeDescriptor>, TopologyError> {
        let mut nodes = Vec::new();
        Self::build_into(&mut nodes, config, host)?;
        Ok(nodes)
    }

    /// Appends the producer nodes for `host` to an existing node list.
    pub fn build_into<C: ConfigView>(
        nodes: &mut Vec<NodeDescriptor>,
        config: &C,
        host: Option<&str>,
    ) -> Result<(), TopologyError> {
        for task in read_tasks(config)? {
            if !task.active || task.location != TaskLocation::Local {
                continue;
            }

            match subspec::assign(&task.machines, host) {
                Some(id) => {
                    tracing::debug!(task = %task.name, subspec = %id, "emitting producer node");
                    nodes.push(NodeDescriptor::task(&task.name, id));
                }
                None => {
                    tracing::debug!(
                        task = %task.name,
                        host = host.unwrap_or(""),
                        "host not in task's machine list, skipping"
                    );
                }
            }
        }
        Ok(())
    }
}
