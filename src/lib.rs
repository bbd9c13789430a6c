#![warn(missing_docs)]
//! Panoptes is the planning core of a distributed data-quality monitoring
//! pipeline. It compiles a declarative description of monitoring tasks into the
//! concrete set of processing nodes an external runtime executes, and decides
//! when post-processing tasks should run through a family of pollable triggers.

pub mod config;
pub mod models;
pub mod topology;
pub mod triggers;
