//! Detects version changes of a named object in the monitoring repository.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;

use super::{SourceError, TriggerFn, DEFAULT_SOURCE_TIMEOUT};
use crate::models::Trigger;

/// Read access to the version history of repository objects.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectVersionSource: Send + Sync {
    /// Returns the last-modified timestamp of the named object, or `None`
    /// when no such object exists yet.
    async fn last_modified(&self, name: &str) -> Result<Option<DateTime<Utc>>, SourceError>;
}

/// Fires when the watched object's version changes between two polls.
///
/// The first successful poll records a baseline without firing. Afterwards a
/// poll fires when it observes a version different from the last one, which
/// covers both a first appearance and an update; a disappearing object does
/// not fire. Query failures and timeouts leave the recorded state untouched
/// and yield no verdict for the cycle.
pub struct NewObjectTrigger {
    name: String,
    source: Arc<dyn ObjectVersionSource>,
    timeout: Duration,
    baseline_taken: bool,
    last_seen: Option<DateTime<Utc>>,
}

impl NewObjectTrigger {
    /// Creates a trigger watching the object at `name`.
    ///
    /// An empty name leaves the trigger malformed: every poll reports
    /// [`Trigger::Invalid`] instead of querying the source.
    pub fn new(name: impl Into<String>, source: Arc<dyn ObjectVersionSource>) -> Self {
        let name = name.into();
        if name.is_empty() {
            tracing::warn!("object trigger created with an empty object name");
        }
        Self { name, source, timeout: DEFAULT_SOURCE_TIMEOUT, baseline_taken: false, last_seen: None }
    }

    /// Overrides the bounded source query timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl TriggerFn for NewObjectTrigger {
    async fn poll(&mut self) -> Trigger {
        if self.name.is_empty() {
            return Trigger::Invalid;
        }

        let current =
            match tokio::time::timeout(self.timeout, self.source.last_modified(&self.name)).await {
                Ok(Ok(version)) => version,
                Ok(Err(error)) => {
                    tracing::warn!(
                        object = %self.name,
                        %error,
                        "object version query failed, no verdict this cycle"
                    );
                    return Trigger::No;
                }
                Err(_) => {
                    tracing::warn!(
                        object = %self.name,
                        timeout = ?self.timeout,
                        "object version query timed out, no verdict this cycle"
                    );
                    return Trigger::No;
                }
            };

        let verdict = if !self.baseline_taken {
            self.baseline_taken = true;
            Trigger::No
        } else if current.is_some() && current != self.last_seen {
            Trigger::NewObject
        } else {
            Trigger::No
        };
        self.last_seen = current;
        verdict
    }
}
