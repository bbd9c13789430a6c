//! Data model shared between the topology compiler and the trigger scheduler.

pub mod node;
pub mod task;
pub mod trigger;

pub use node::{NodeDescriptor, NodeKind, StreamDescriptor, StreamSelector, SubspecId};
pub use task::{TaskDescriptor, TaskLocation};
pub use trigger::Trigger;
