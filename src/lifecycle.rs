//! Task lifecycle state machine.
//!
//! ```text
//!   INIT ──(provisioning delay)──▶ RUNNING ◀──start── STOPPED
//!                                   │  ▲  ──stop──▶     │
//!                        train ─────┘  └──(training      │
//!                          ▼               delay)        │
//!                       TRAINING ◀────────train──────────┘
//!   any ──fail──▶ ERROR
//! ```
//!
//! The two delayed edges are scheduled jobs; the owner polls them and must
//! drop the job when the task no longer exists.

use std::time::Duration;

use web_time::Instant;

use crate::curation::SampleStore;
use crate::error::LifecycleError;
use crate::model::{Task, TaskId, TaskStatus};
use crate::scheduler::{DueJob, Scheduler};

/// Inputs that drive a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCommand {
    /// Provisioning delay elapsed
    Provisioned,
    Start,
    Stop,
    StartTraining,
    /// Training delay elapsed
    TrainingFinished,
    /// Unrecoverable failure signal
    Fail,
}

impl LifecycleCommand {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleCommand::Provisioned => "provision",
            LifecycleCommand::Start => "start",
            LifecycleCommand::Stop => "stop",
            LifecycleCommand::StartTraining => "start training for",
            LifecycleCommand::TrainingFinished => "finish training for",
            LifecycleCommand::Fail => "fail",
        }
    }
}

/// Transition table.
pub fn next_status(from: TaskStatus, command: LifecycleCommand) -> Result<TaskStatus, LifecycleError> {
    use LifecycleCommand as C;
    use TaskStatus as S;

    match (from, command) {
        (S::Init, C::Provisioned) => Ok(S::Running),
        (S::Running, C::Stop) => Ok(S::Stopped),
        (S::Stopped, C::Start) => Ok(S::Running),
        (S::Running | S::Stopped, C::StartTraining) => Ok(S::Training),
        (S::Training, C::TrainingFinished) => Ok(S::Running),
        (_, C::Fail) => Ok(S::Error),
        (from, command) => Err(LifecycleError::InvalidTransition {
            from,
            command: command.name(),
        }),
    }
}

/// Delayed transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTransition {
    Provisioning,
    TrainingCompletion,
}

impl ScheduledTransition {
    pub fn command(&self) -> LifecycleCommand {
        match self {
            ScheduledTransition::Provisioning => LifecycleCommand::Provisioned,
            ScheduledTransition::TrainingCompletion => LifecycleCommand::TrainingFinished,
        }
    }
}

/// Delays for the simulated asynchronous edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleTimings {
    pub provisioning: Duration,
    pub training: Duration,
}

impl Default for LifecycleTimings {
    fn default() -> Self {
        Self {
            provisioning: Duration::from_millis(crate::constants::DEFAULT_PROVISIONING_DELAY_MS),
            training: Duration::from_millis(crate::constants::DEFAULT_TRAINING_DELAY_MS),
        }
    }
}

/// Applies lifecycle commands to tasks and owns their delayed transitions.
#[derive(Debug, Clone, Default)]
pub struct LifecycleManager {
    scheduler: Scheduler<ScheduledTransition>,
    timings: LifecycleTimings,
}

impl LifecycleManager {
    pub fn new(timings: LifecycleTimings) -> Self {
        Self {
            scheduler: Scheduler::new(),
            timings,
        }
    }

    pub fn timings(&self) -> LifecycleTimings {
        self.timings
    }

    fn apply(task: &mut Task, command: LifecycleCommand) -> Result<TaskStatus, LifecycleError> {
        let from = task.status();
        let next = next_status(from, command).inspect_err(|e| {
            log::warn!("{}: {}", task.id, e);
        })?;
        task.set_status(next);
        log::info!("🔁 {}: {} -> {}", task.id, from, next);
        Ok(next)
    }

    /// Schedule provisioning for a freshly created task.
    pub fn register(&mut self, task: &Task, now: Instant) {
        self.scheduler.schedule(
            task.id,
            now + self.timings.provisioning,
            ScheduledTransition::Provisioning,
        );
    }

    /// STOPPED -> RUNNING.
    pub fn start(&mut self, task: &mut Task) -> Result<TaskStatus, LifecycleError> {
        Self::apply(task, LifecycleCommand::Start)
    }

    /// RUNNING -> STOPPED.
    pub fn stop(&mut self, task: &mut Task) -> Result<TaskStatus, LifecycleError> {
        Self::apply(task, LifecycleCommand::Stop)
    }

    /// Whether the training action should be enabled.
    pub fn can_start_training(&self, task: &Task, samples: &SampleStore) -> bool {
        next_status(task.status(), LifecycleCommand::StartTraining).is_ok()
            && samples.can_train(&task.counters())
    }

    /// RUNNING/STOPPED -> TRAINING, gated on both sample thresholds.
    ///
    /// On success the labeled positive+negative count is committed to the
    /// task's `observed_total` and returned.
    pub fn start_training(
        &mut self,
        task: &mut Task,
        samples: &SampleStore,
        now: Instant,
    ) -> Result<usize, LifecycleError> {
        next_status(task.status(), LifecycleCommand::StartTraining)?;

        let counters = task.counters();
        let counts = samples.counts();
        if !samples.can_train(&counters) {
            return Err(LifecycleError::ThresholdNotMet {
                positive: counts.positive,
                positive_threshold: counters.positive_threshold,
                negative: counts.negative,
                negative_threshold: counters.negative_threshold,
            });
        }

        let observed = counts.positive + counts.negative;
        Self::apply(task, LifecycleCommand::StartTraining)?;
        task.set_observed_total(observed);
        self.scheduler.schedule(
            task.id,
            now + self.timings.training,
            ScheduledTransition::TrainingCompletion,
        );
        log::info!("🎓 {}: training on {} samples", task.id, observed);
        Ok(observed)
    }

    /// Any -> ERROR. Pending delayed transitions are dropped.
    pub fn fail(&mut self, task: &mut Task, reason: &str) -> TaskStatus {
        self.scheduler.cancel_task(task.id);
        task.set_error_reason(reason);
        log::warn!("💥 {} failed: {}", task.id, reason);
        // Fail is accepted from every state
        Self::apply(task, LifecycleCommand::Fail).unwrap_or(TaskStatus::Error)
    }

    /// Apply a job that came due to its task.
    pub fn apply_due(
        &mut self,
        task: &mut Task,
        transition: ScheduledTransition,
    ) -> Result<TaskStatus, LifecycleError> {
        Self::apply(task, transition.command())
    }

    /// Drop every pending job for a task.
    pub fn forget(&mut self, task_id: TaskId) -> usize {
        self.scheduler.cancel_task(task_id)
    }

    pub fn is_pending(&self, task_id: TaskId) -> bool {
        self.scheduler.is_pending(task_id)
    }

    /// Jobs due at or before `now`, in due order.
    pub fn poll(&mut self, now: Instant) -> Vec<DueJob<ScheduledTransition>> {
        self.scheduler.take_due(now)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }
}
