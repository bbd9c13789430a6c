//! Builds the aggregation and checking stage of the pipeline.

use super::{read_tasks, TopologyError};
use crate::{
    config::ConfigView,
    models::{NodeDescriptor, SubspecId, TaskLocation},
};

/// Builds the node set of the central stage: mergers for multi-machine local
/// tasks, producers for remote tasks, and one checker per active task.
pub struct RemoteTopologyBuilder;

impl RemoteTopologyBuilder {
    /// Generates the aggregation-stage nodes, in task declaration order.
    ///
    /// For every active task:
    /// - a local task deployed on more than one machine gets a merger whose
    ///   inputs are the per-origin streams `1..=machines.len()`;
    /// - a local task with at most one producer needs no merge stage, its
    ///   direct stream feeds the checker as-is;
    /// - a remote task gets its producer node here, on the direct stream;
    /// - every task gets exactly one checker consuming the task's resulting
    ///   stream, appended right after the task's merger or producer node.
    pub fn build<C: ConfigView>(config: &C) -> Result<Vec<NodeDescriptor>, TopologyError> {
        let mut nodes = Vec::new();
        Self::build_into(&mut nodes, config)?;
        Ok(nodes)
    }

    /// Appends the aggregation-stage nodes to an existing node list.
    pub fn build_into<C: ConfigView>(
        nodes: &mut Vec<NodeDescriptor>,
        config: &C,
    ) -> Result<(), TopologyError> {
        for task in read_tasks(config)? {
            if !task.active {
                tracing::debug!(task = %task.name, "task inactive, skipping");
                continue;
            }

            match task.location {
                TaskLocation::Local => {
                    if task.machines.len() > 1 {
                        tracing::debug!(
                            task = %task.name,
                            producers = task.machines.len(),
                            "emitting merger node"
                        );
                        nodes.push(NodeDescriptor::merger(&task.name, task.machines.len()));
                    }
                }
                TaskLocation::Remote => {
                    tracing::debug!(task = %task.name, "emitting remote producer node");
                    nodes.push(NodeDescriptor::task(&task.name, SubspecId::DIRECT));
                }
            }

            nodes.push(NodeDescriptor::checker(&task.name));
        }
        Ok(())
    }
}
