//! Edge-triggered scheduling on accelerator run and fill transitions.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::{SourceError, TriggerFn, DEFAULT_SOURCE_TIMEOUT};
use crate::models::Trigger;

/// Snapshot of the accelerator operation status as seen by one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityState {
    /// Whether a run is ongoing.
    pub run_active: bool,
    /// Whether a fill is ongoing.
    pub fill_active: bool,
}

/// External source of the current run/fill status.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Returns the current run/fill status.
    async fn current(&self) -> Result<ActivityState, SourceError>;
}

/// The status transition a trigger waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEdge {
    /// Run status went from inactive to active.
    StartOfRun,
    /// Run status went from active to inactive.
    EndOfRun,
    /// Fill status went from inactive to active.
    StartOfFill,
    /// Fill status went from active to inactive.
    EndOfFill,
}

impl ActivityEdge {
    /// The verdict this edge reports when crossed.
    fn verdict(&self) -> Trigger {
        match self {
            ActivityEdge::StartOfRun => Trigger::StartOfRun,
            ActivityEdge::EndOfRun => Trigger::EndOfRun,
            ActivityEdge::StartOfFill => Trigger::StartOfFill,
            ActivityEdge::EndOfFill => Trigger::EndOfFill,
        }
    }

    /// Whether the status crossed this edge between two observations.
    fn crossed(&self, previous: ActivityState, current: ActivityState) -> bool {
        match self {
            ActivityEdge::StartOfRun => !previous.run_active && current.run_active,
            ActivityEdge::EndOfRun => previous.run_active && !current.run_active,
            ActivityEdge::StartOfFill => !previous.fill_active && current.fill_active,
            ActivityEdge::EndOfFill => previous.fill_active && !current.fill_active,
        }
    }
}

/// Fires when the observed run/fill status transitions across the configured
/// edge between two polls.
///
/// The first successful poll only records a baseline; each qualifying
/// transition afterwards fires at most once. Source failures and timeouts
/// leave the recorded state untouched and yield no verdict for the cycle.
pub struct ActivityTransitionTrigger {
    edge: ActivityEdge,
    source: Arc<dyn ActivitySource>,
    timeout: Duration,
    last: Option<ActivityState>,
}

impl ActivityTransitionTrigger {
    /// Creates an edge trigger reading status from `source`.
    pub fn new(edge: ActivityEdge, source: Arc<dyn ActivitySource>) -> Self {
        Self { edge, source, timeout: DEFAULT_SOURCE_TIMEOUT, last: None }
    }

    /// Overrides the bounded source query timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TriggerFn for ActivityTransitionTrigger {
    async fn poll(&mut self) -> Trigger {
        let current = match tokio::time::timeout(self.timeout, self.source.current()).await {
            Ok(Ok(state)) => state,
            Ok(Err(error)) => {
                tracing::warn!(%error, "activity source query failed, no verdict this cycle");
                return Trigger::No;
            }
            Err(_) => {
                tracing::warn!(
                    timeout = ?self.timeout,
                    "activity source query timed out, no verdict this cycle"
                );
                return Trigger::No;
            }
        };

        let verdict = match self.last {
            Some(previous) if self.edge.crossed(previous, current) => self.edge.verdict(),
            _ => Trigger::No,
        };
        self.last = Some(current);
        verdict
    }
}
