//! Drives registered triggers on a fixed cadence and hands firing verdicts to
//! the external task-invocation mechanism.

use std::{collections::HashSet, sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::TriggerFn;
use crate::models::Trigger;

/// Error reported by the external task-invocation mechanism.
///
/// Invocation failures are logged and never stop the poll loop.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvocationError(String);

impl InvocationError {
    /// Creates an invocation error carrying a display-friendly message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// The external mechanism executing a post-processing task.
#[async_trait]
pub trait TaskInvoker: Send + Sync {
    /// Runs the named task once, with the verdict that caused it as reason.
    async fn invoke(&self, task: &str, reason: Trigger) -> Result<(), InvocationError>;
}

/// One registered (task, trigger) pair.
struct Registration {
    task: String,
    trigger: Box<dyn TriggerFn>,
}

/// Outcome of one sweep over all registrations.
#[derive(Debug, PartialEq, Eq)]
enum SweepOutcome {
    Continue,
    Exit,
}

/// Polls registered triggers on a fixed cadence and invokes tasks on firing
/// verdicts.
///
/// Each cycle performs one sequential sweep over all registrations in
/// registration order; polls are never concurrent with each other. A task is
/// invoked at most once per cycle even when several of its triggers fire. The
/// loop runs until its cancellation token is cancelled or a
/// [`Trigger::UserExit`] verdict is observed; in-flight invocations are not
/// interrupted, only subsequent cycles are suppressed.
pub struct TriggerScheduler {
    invoker: Arc<dyn TaskInvoker>,
    cadence: Duration,
    registrations: Vec<Registration>,
    cancellation_token: CancellationToken,
}

impl TriggerScheduler {
    /// Creates a scheduler polling at the given cadence.
    pub fn new(invoker: Arc<dyn TaskInvoker>, cadence: Duration) -> Self {
        Self {
            invoker,
            cadence,
            registrations: Vec::new(),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Registers a trigger for a task.
    ///
    /// A task may carry several triggers; they are polled in registration
    /// order and the task still runs at most once per cycle.
    pub fn register(&mut self, task: impl Into<String>, trigger: impl TriggerFn + 'static) {
        self.registrations.push(Registration { task: task.into(), trigger: Box::new(trigger) });
    }

    /// A token that stops the poll loop when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Runs the poll loop until cancellation or a user exit.
    pub async fn run(mut self) {
        tracing::info!(
            registrations = self.registrations.len(),
            cadence = ?self.cadence,
            "trigger scheduler started"
        );

        let mut cycle = tokio::time::interval(self.cadence);
        cycle.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("trigger scheduler stop requested");
                    break;
                }
                _ = cycle.tick() => {
                    if self.sweep().await == SweepOutcome::Exit {
                        tracing::info!("user exit observed, suppressing further trigger cycles");
                        self.cancellation_token.cancel();
                        break;
                    }
                }
            }
        }

        tracing::info!("trigger scheduler shut down");
    }

    /// One sequential pass over all registrations.
    async fn sweep(&mut self) -> SweepOutcome {
        let mut invoked: HashSet<String> = HashSet::new();

        for index in 0..self.registrations.len() {
            let verdict = self.registrations[index].trigger.poll().await;
            let task = self.registrations[index].task.clone();

            match verdict {
                Trigger::No => {}
                Trigger::Invalid => {
                    tracing::warn!(task = %task, "trigger is in an invalid state, not firing");
                }
                verdict => {
                    if invoked.insert(task.clone()) {
                        tracing::debug!(task = %task, reason = %verdict, "invoking post-processing task");
                        if let Err(error) = self.invoker.invoke(&task, verdict).await {
                            tracing::error!(task = %task, %error, "post-processing invocation failed");
                        }
                    } else {
                        tracing::debug!(task = %task, reason = %verdict, "task already invoked this cycle");
                    }

                    if verdict == Trigger::UserExit {
                        return SweepOutcome::Exit;
                    }
                }
            }
        }

        SweepOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    };

    use tokio::time::timeout;

    use super::*;
    use crate::triggers::{self, SourceError};

    /// Records every invocation it receives.
    #[derive(Default)]
    struct RecordingInvoker {
        calls: Mutex<Vec<(String, Trigger)>>,
    }

    impl RecordingInvoker {
        fn calls(&self) -> Vec<(String, Trigger)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TaskInvoker for RecordingInvoker {
        async fn invoke(&self, task: &str, reason: Trigger) -> Result<(), InvocationError> {
            self.calls.lock().unwrap().push((task.to_string(), reason));
            Ok(())
        }
    }

    /// Rejects every invocation.
    struct FailingInvoker;

    #[async_trait]
    impl TaskInvoker for FailingInvoker {
        async fn invoke(&self, _task: &str, _reason: Trigger) -> Result<(), InvocationError> {
            Err(InvocationError::new("executor rejected the task"))
        }
    }

    fn make_scheduler(invoker: Arc<dyn TaskInvoker>) -> TriggerScheduler {
        TriggerScheduler::new(invoker, Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_sweep_invokes_on_firing_verdicts_only() {
        let invoker = Arc::new(RecordingInvoker::default());
        let mut scheduler = make_scheduler(Arc::clone(&invoker) as Arc<dyn TaskInvoker>);
        scheduler.register("trending", triggers::once());
        scheduler.register("summary", triggers::always());

        assert_eq!(scheduler.sweep().await, SweepOutcome::Continue);
        assert_eq!(
            invoker.calls(),
            vec![
                ("trending".to_string(), Trigger::Once),
                ("summary".to_string(), Trigger::Always)
            ]
        );

        // The one-shot trigger is spent, only the unconditional one fires.
        assert_eq!(scheduler.sweep().await, SweepOutcome::Continue);
        assert_eq!(invoker.calls().len(), 3);
        assert_eq!(invoker.calls()[2], ("summary".to_string(), Trigger::Always));
    }

    #[tokio::test]
    async fn test_task_runs_at_most_once_per_cycle() {
        let invoker = Arc::new(RecordingInvoker::default());
        let mut scheduler = make_scheduler(Arc::clone(&invoker) as Arc<dyn TaskInvoker>);
        scheduler.register("trending", triggers::always());
        scheduler.register("trending", triggers::once());

        scheduler.sweep().await;
        assert_eq!(invoker.calls(), vec![("trending".to_string(), Trigger::Always)]);

        scheduler.sweep().await;
        assert_eq!(invoker.calls().len(), 2, "next cycle invokes again");
    }

    #[tokio::test]
    async fn test_invalid_trigger_never_invokes() {
        let invoker = Arc::new(RecordingInvoker::default());
        let mut scheduler = make_scheduler(Arc::clone(&invoker) as Arc<dyn TaskInvoker>);
        scheduler.register("trending", triggers::periodic(-1.0));

        scheduler.sweep().await;
        scheduler.sweep().await;
        assert!(invoker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invocation_failure_does_not_stop_the_sweep() {
        let mut scheduler =
            TriggerScheduler::new(Arc::new(FailingInvoker), Duration::from_millis(10));
        scheduler.register("trending", triggers::always());
        scheduler.register("summary", triggers::always());

        assert_eq!(scheduler.sweep().await, SweepOutcome::Continue);
        assert_eq!(scheduler.sweep().await, SweepOutcome::Continue);
    }

    #[tokio::test]
    async fn test_user_exit_ends_the_sweep_after_a_final_invocation() {
        let invoker = Arc::new(RecordingInvoker::default());
        let flag = Arc::new(AtomicBool::new(true));

        let mut scheduler = make_scheduler(Arc::clone(&invoker) as Arc<dyn TaskInvoker>);
        scheduler.register("trending", triggers::user_exit(Arc::clone(&flag)));
        scheduler.register("summary", triggers::always());

        assert_eq!(scheduler.sweep().await, SweepOutcome::Exit);

        // The exiting task got its final invocation; the sweep stopped there.
        assert_eq!(invoker.calls(), vec![("trending".to_string(), Trigger::UserExit)]);
    }

    #[tokio::test]
    async fn test_run_terminates_on_user_exit_flag() {
        let invoker = Arc::new(RecordingInvoker::default());
        let flag = Arc::new(AtomicBool::new(false));

        let mut scheduler = make_scheduler(Arc::clone(&invoker) as Arc<dyn TaskInvoker>);
        scheduler.register("trending", triggers::user_exit(Arc::clone(&flag)));
        let token = scheduler.cancellation_token();

        let handle = tokio::spawn(scheduler.run());
        tokio::time::sleep(Duration::from_millis(30)).await;
        flag.store(true, Ordering::Relaxed);

        timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler must stop after user exit")
            .unwrap();
        assert!(token.is_cancelled(), "user exit must cancel the scheduler token");
        assert_eq!(invoker.calls(), vec![("trending".to_string(), Trigger::UserExit)]);
    }

    #[tokio::test]
    async fn test_run_stops_on_external_cancellation() {
        let invoker = Arc::new(RecordingInvoker::default());
        let mut scheduler = make_scheduler(Arc::clone(&invoker) as Arc<dyn TaskInvoker>);
        scheduler.register("summary", triggers::always());
        let token = scheduler.cancellation_token();

        let handle = tokio::spawn(scheduler.run());
        tokio::time::sleep(Duration::from_millis(35)).await;
        token.cancel();

        timeout(Duration::from_secs(1), handle)
            .await
            .expect("scheduler must stop after cancellation")
            .unwrap();
        assert!(!invoker.calls().is_empty(), "the unconditional trigger fired while running");
    }

    #[tokio::test]
    async fn test_source_errors_keep_the_loop_alive() {
        struct BrokenSource;

        #[async_trait]
        impl crate::triggers::ActivitySource for BrokenSource {
            async fn current(
                &self,
            ) -> Result<crate::triggers::ActivityState, SourceError> {
                Err(SourceError::Unavailable("no run control".to_string()))
            }
        }

        let invoker = Arc::new(RecordingInvoker::default());
        let mut scheduler = make_scheduler(Arc::clone(&invoker) as Arc<dyn TaskInvoker>);
        scheduler.register("trending", triggers::start_of_run(Arc::new(BrokenSource)));
        scheduler.register("summary", triggers::once());

        assert_eq!(scheduler.sweep().await, SweepOutcome::Continue);
        assert_eq!(
            invoker.calls(),
            vec![("summary".to_string(), Trigger::Once)],
            "the broken trigger degrades to no verdict, the rest of the sweep proceeds"
        );
    }
}
