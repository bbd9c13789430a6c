//! The `Trigger` verdict, the reason a post-processing task is asked to run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A scheduling verdict produced by polling a trigger.
///
/// [`Trigger::No`] is the false-like member of the set: it never causes an
/// invocation. Every other verdict means "run now, for this reason", except
/// [`Trigger::Invalid`], which is non-firing but reported separately so a
/// malformed trigger is visible in diagnostics instead of blending into `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// No condition holds; nothing to do this cycle.
    No,
    /// First poll of a one-shot trigger.
    Once,
    /// Fires on every poll.
    Always,
    /// The run status transitioned to active since the previous poll.
    StartOfRun,
    /// The run status transitioned to inactive since the previous poll.
    EndOfRun,
    /// The fill status transitioned to active since the previous poll.
    StartOfFill,
    /// The fill status transitioned to inactive since the previous poll.
    EndOfFill,
    /// The configured period elapsed since the last firing.
    Periodic,
    /// A watched object's version changed since the last poll.
    NewObject,
    /// The process-wide exit flag was observed set.
    UserExit,
    /// The trigger is malformed or uninitialized and cannot produce a verdict.
    Invalid,
}

impl Trigger {
    /// Whether this verdict should cause a task invocation.
    ///
    /// `No` and `Invalid` are non-firing; everything else fires.
    pub fn fires(&self) -> bool {
        !matches!(self, Trigger::No | Trigger::Invalid)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::No => "no",
            Trigger::Once => "once",
            Trigger::Always => "always",
            Trigger::StartOfRun => "start_of_run",
            Trigger::EndOfRun => "end_of_run",
            Trigger::StartOfFill => "start_of_fill",
            Trigger::EndOfFill => "end_of_fill",
            Trigger::Periodic => "periodic",
            Trigger::NewObject => "new_object",
            Trigger::UserExit => "user_exit",
            Trigger::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_no_and_invalid_are_non_firing() {
        let firing = [
            Trigger::Once,
            Trigger::Always,
            Trigger::StartOfRun,
            Trigger::EndOfRun,
            Trigger::StartOfFill,
            Trigger::EndOfFill,
            Trigger::Periodic,
            Trigger::NewObject,
            Trigger::UserExit,
        ];
        for verdict in firing {
            assert!(verdict.fires(), "{verdict} should fire");
        }
        assert!(!Trigger::No.fires());
        assert!(!Trigger::Invalid.fires());
    }
}
