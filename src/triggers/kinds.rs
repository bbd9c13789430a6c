//! Trigger kinds whose state is purely local: one-shot, unconditional,
//! periodic and exit-flag triggers.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;

use super::TriggerFn;
use crate::models::Trigger;

/// Fires exactly once, on the first poll.
#[derive(Debug, Default)]
pub struct OnceTrigger {
    fired: bool,
}

impl OnceTrigger {
    /// Creates a one-shot trigger that has not fired yet.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TriggerFn for OnceTrigger {
    async fn poll(&mut self) -> Trigger {
        if self.fired {
            Trigger::No
        } else {
            self.fired = true;
            Trigger::Once
        }
    }
}

/// Fires on every poll.
#[derive(Debug, Default)]
pub struct AlwaysTrigger;

impl AlwaysTrigger {
    /// Creates an unconditional trigger.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TriggerFn for AlwaysTrigger {
    async fn poll(&mut self) -> Trigger {
        Trigger::Always
    }
}

/// Fires when the configured wall-clock period has elapsed since construction
/// or the last firing.
#[derive(Debug)]
pub struct PeriodicTrigger {
    state: Option<PeriodicState>,
}

#[derive(Debug)]
struct PeriodicState {
    period: Duration,
    deadline: Instant,
}

impl PeriodicTrigger {
    /// Creates a periodic trigger from a period in seconds.
    ///
    /// A non-finite or non-positive period leaves the trigger malformed: every
    /// poll reports [`Trigger::Invalid`] instead of a verdict.
    pub fn new(seconds: f64) -> Self {
        if seconds.is_finite() && seconds > 0.0 {
            let period = Duration::from_secs_f64(seconds);
            Self { state: Some(PeriodicState { period, deadline: Instant::now() + period }) }
        } else {
            tracing::warn!(seconds, "rejecting trigger period, must be a positive number");
            Self { state: None }
        }
    }
}

#[async_trait]
impl TriggerFn for PeriodicTrigger {
    async fn poll(&mut self) -> Trigger {
        let Some(state) = &mut self.state else {
            return Trigger::Invalid;
        };

        let now = Instant::now();
        if now >= state.deadline {
            // The clock restarts at the firing, not at the previous deadline.
            state.deadline = now + state.period;
            Trigger::Periodic
        } else {
            Trigger::No
        }
    }
}

/// Reports the process-wide exit request once it has been observed.
#[derive(Debug)]
pub struct UserExitTrigger {
    flag: Arc<AtomicBool>,
}

impl UserExitTrigger {
    /// Creates an exit trigger reading the given shared flag.
    ///
    /// The flag is monotonic: the external signal mechanism only ever flips it
    /// to `true`, so polls read it without synchronization beyond the atomic.
    pub fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }
}

#[async_trait]
impl TriggerFn for UserExitTrigger {
    async fn poll(&mut self) -> Trigger {
        if self.flag.load(Ordering::Relaxed) {
            Trigger::UserExit
        } else {
            Trigger::No
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;

    #[tokio::test]
    async fn test_once_fires_on_first_poll_only() {
        let mut trigger = OnceTrigger::new();

        assert_eq!(trigger.poll().await, Trigger::Once);
        assert_eq!(trigger.poll().await, Trigger::No);
        assert_eq!(trigger.poll().await, Trigger::No);
    }

    #[tokio::test]
    async fn test_always_fires_on_every_poll() {
        let mut trigger = AlwaysTrigger::new();

        for _ in 0..5 {
            assert_eq!(trigger.poll().await, Trigger::Always);
        }
    }

    #[tokio::test]
    async fn test_periodic_fires_after_period_and_resets() {
        let mut trigger = PeriodicTrigger::new(0.05);

        assert_eq!(trigger.poll().await, Trigger::No);

        sleep(Duration::from_millis(70)).await;
        assert_eq!(trigger.poll().await, Trigger::Periodic);

        // The clock was reset on firing.
        assert_eq!(trigger.poll().await, Trigger::No);

        sleep(Duration::from_millis(70)).await;
        assert_eq!(trigger.poll().await, Trigger::Periodic);
    }

    #[tokio::test]
    async fn test_periodic_rejects_malformed_periods() {
        for seconds in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut trigger = PeriodicTrigger::new(seconds);
            assert_eq!(trigger.poll().await, Trigger::Invalid);
            assert_eq!(trigger.poll().await, Trigger::Invalid);
        }
    }

    #[tokio::test]
    async fn test_user_exit_reflects_the_shared_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut trigger = UserExitTrigger::new(Arc::clone(&flag));

        assert_eq!(trigger.poll().await, Trigger::No);
        assert_eq!(trigger.poll().await, Trigger::No);

        flag.store(true, Ordering::Relaxed);
        assert_eq!(trigger.poll().await, Trigger::UserExit);
        assert_eq!(trigger.poll().await, Trigger::UserExit);
    }
}
