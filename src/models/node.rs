//! Node and stream descriptors, the output contract handed to the external
//! execution runtime.
//!
//! The runtime keeps its own graph representation; these types only carry the
//! logical content each node must declare: its kind, name, which streams it
//! consumes and which stream it publishes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Routing tag distinguishing multiple producers of the same logical task
/// stream, so a merger can tell its inputs apart by origin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct SubspecId(pub u32);

impl SubspecId {
    /// Tag of a stream with a single producer, where no merge stage is
    /// involved. Values ≥ 1 are 1-based positions within a multi-machine
    /// task's machine list.
    pub const DIRECT: SubspecId = SubspecId(0);

    /// Whether this is the direct, unmerged stream tag.
    pub fn is_direct(&self) -> bool {
        *self == Self::DIRECT
    }
}

impl fmt::Display for SubspecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role a processing node plays in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A producer running the monitoring computation itself.
    Task,
    /// A node combining several same-task producer streams into one.
    Merger,
    /// A node evaluating the quality of a task's (possibly merged) output.
    Checker,
}

/// Selects one input stream of a node by logical stream name and origin tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSelector {
    /// Logical stream name, named after the producing task.
    pub stream: String,
    /// Origin tag of the producer to consume.
    pub subspec: SubspecId,
}

/// Describes the single stream a node publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Logical stream name.
    pub stream: String,
    /// Tag the stream is published under.
    pub subspec: SubspecId,
}

/// One processing node of the generated topology.
///
/// Created by the topology builders and consumed, not owned, by the external
/// runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// The node's role.
    pub kind: NodeKind,
    /// Unique node name within the generated topology.
    pub name: String,
    /// Streams the node consumes, in fan-in order.
    pub inputs: Vec<StreamSelector>,
    /// The stream the node publishes.
    pub output: StreamDescriptor,
}

impl NodeDescriptor {
    /// A producer node for `task`, publishing the task stream under `subspec`.
    pub fn task(task: &str, subspec: SubspecId) -> Self {
        Self {
            kind: NodeKind::Task,
            name: task.to_string(),
            inputs: Vec::new(),
            output: StreamDescriptor { stream: task.to_string(), subspec },
        }
    }

    /// A merger combining `producers` same-task streams, tagged `1..=producers`,
    /// into the task stream published under [`SubspecId::DIRECT`].
    pub fn merger(task: &str, producers: usize) -> Self {
        let inputs = (1..=producers as u32)
            .map(|id| StreamSelector { stream: task.to_string(), subspec: SubspecId(id) })
            .collect();
        Self {
            kind: NodeKind::Merger,
            name: format!("{task}-merger"),
            inputs,
            output: StreamDescriptor { stream: task.to_string(), subspec: SubspecId::DIRECT },
        }
    }

    /// A checker evaluating the task's resulting stream and publishing its own
    /// quality stream.
    pub fn checker(task: &str) -> Self {
        let name = format!("{task}-checker");
        Self {
            kind: NodeKind::Checker,
            name: name.clone(),
            inputs: vec![StreamSelector {
                stream: task.to_string(),
                subspec: SubspecId::DIRECT,
            }],
            output: StreamDescriptor { stream: name, subspec: SubspecId::DIRECT },
        }
    }
}
