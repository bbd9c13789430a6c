//! Pollable triggers deciding *when* post-processing tasks run.
//!
//! Each trigger kind is a small stateful object exposing [`TriggerFn::poll`];
//! its internal fields (timestamps, flags, last-seen versions) are plain data,
//! so state machines can be unit-tested and inspected directly. Instances are
//! created once per registration and polled for the lifetime of the owning
//! [`TriggerScheduler`]; state is never shared across instances.

pub mod activity;
pub mod kinds;
pub mod object;
pub mod scheduler;

use std::{
    sync::{atomic::AtomicBool, Arc},
    time::Duration,
};

use async_trait::async_trait;
use thiserror::Error;

pub use activity::{ActivityEdge, ActivitySource, ActivityState, ActivityTransitionTrigger};
pub use kinds::{AlwaysTrigger, OnceTrigger, PeriodicTrigger, UserExitTrigger};
pub use object::{NewObjectTrigger, ObjectVersionSource};
pub use scheduler::{InvocationError, TaskInvoker, TriggerScheduler};

use crate::models::Trigger;

/// How long a trigger waits on an external source before degrading the poll to
/// a [`Trigger::No`] verdict.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors reported by external sources queried inside a poll.
///
/// These never propagate past the trigger boundary: the poll logs the failure
/// and yields [`Trigger::No`] for the cycle.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The source could not be reached or refused the query.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The source answered with something the trigger cannot interpret.
    #[error("malformed response from source: {0}")]
    Malformed(String),
}

/// A pollable producer of scheduling verdicts.
///
/// Every call may update internal state, but a poll must not block beyond a
/// bounded timeout, and repeated polling with no external state change must
/// not produce spurious firings.
#[async_trait]
pub trait TriggerFn: Send {
    /// Evaluates the trigger condition once.
    async fn poll(&mut self) -> Trigger;
}

/// A trigger firing only the first time it is polled.
pub fn once() -> OnceTrigger {
    OnceTrigger::new()
}

/// A trigger firing on every poll.
pub fn always() -> AlwaysTrigger {
    AlwaysTrigger::new()
}

/// A trigger firing whenever `seconds` of wall-clock time have elapsed since
/// construction or the last firing.
pub fn periodic(seconds: f64) -> PeriodicTrigger {
    PeriodicTrigger::new(seconds)
}

/// A trigger firing when the named repository object's version changes.
pub fn new_object(
    name: impl Into<String>,
    source: Arc<dyn ObjectVersionSource>,
) -> NewObjectTrigger {
    NewObjectTrigger::new(name, source)
}

/// A trigger firing when a start of run is observed during its uptime.
pub fn start_of_run(source: Arc<dyn ActivitySource>) -> ActivityTransitionTrigger {
    ActivityTransitionTrigger::new(ActivityEdge::StartOfRun, source)
}

/// A trigger firing when an end of run is observed during its uptime.
pub fn end_of_run(source: Arc<dyn ActivitySource>) -> ActivityTransitionTrigger {
    ActivityTransitionTrigger::new(ActivityEdge::EndOfRun, source)
}

/// A trigger firing when a start of fill is observed during its uptime.
pub fn start_of_fill(source: Arc<dyn ActivitySource>) -> ActivityTransitionTrigger {
    ActivityTransitionTrigger::new(ActivityEdge::StartOfFill, source)
}

/// A trigger firing when an end of fill is observed during its uptime.
pub fn end_of_fill(source: Arc<dyn ActivitySource>) -> ActivityTransitionTrigger {
    ActivityTransitionTrigger::new(ActivityEdge::EndOfFill, source)
}

/// A trigger firing once the process-wide exit flag has been observed set.
///
/// The flag is written at most once by an external signal-delivery mechanism
/// and read lock-free by every poll.
pub fn user_exit(flag: Arc<AtomicBool>) -> UserExitTrigger {
    UserExitTrigger::new(flag)
}
