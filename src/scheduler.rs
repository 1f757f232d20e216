//! Cancellable time-scheduled callbacks keyed by task.
//!
//! Nothing here sleeps or spawns. The owner polls [`Scheduler::take_due`]
//! from its tick loop and applies whatever came due; cancelling a task's
//! jobs guarantees they never fire.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use web_time::Instant;

use crate::model::TaskId;

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Handle for one scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

#[derive(Debug, Clone)]
struct ScheduledJob<A> {
    id: JobId,
    task_id: TaskId,
    due: Instant,
    action: A,
}

/// A job that came due.
#[derive(Debug, Clone, PartialEq)]
pub struct DueJob<A> {
    pub job: JobId,
    pub task_id: TaskId,
    pub action: A,
}

/// Pending jobs, fired in due-time order (ties in scheduling order).
#[derive(Debug, Clone)]
pub struct Scheduler<A> {
    jobs: Vec<ScheduledJob<A>>,
    next_id: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            next_id: 1,
        }
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an action for a task at an absolute time.
    pub fn schedule(&mut self, task_id: TaskId, due: Instant, action: A) -> JobId {
        let id = JobId(self.next_id);
        self.next_id += 1;
        self.jobs.push(ScheduledJob {
            id,
            task_id,
            due,
            action,
        });
        log::debug!("⏲️ Scheduled job {:?} for {}", id, task_id);
        id
    }

    /// Cancel one job. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, job: JobId) -> bool {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != job);
        self.jobs.len() != before
    }

    /// Cancel every job for a task. Returns how many were dropped.
    pub fn cancel_task(&mut self, task_id: TaskId) -> usize {
        let before = self.jobs.len();
        self.jobs.retain(|j| j.task_id != task_id);
        let dropped = before - self.jobs.len();
        if dropped > 0 {
            log::debug!("⏲️ Cancelled {} job(s) for {}", dropped, task_id);
        }
        dropped
    }

    /// Whether any job is pending for the task.
    pub fn is_pending(&self, task_id: TaskId) -> bool {
        self.jobs.iter().any(|j| j.task_id == task_id)
    }

    /// Remove and return every job due at or before `now`.
    pub fn take_due(&mut self, now: Instant) -> Vec<DueJob<A>> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.jobs.drain(..).partition(|j| j.due <= now);
        self.jobs = pending;
        due.sort_by_key(|j| (j.due, j.id));
        due.into_iter()
            .map(|j| DueJob {
                job: j.id,
                task_id: j.task_id,
                action: j.action,
            })
            .collect()
    }

    /// Earliest pending due time.
    pub fn next_due(&self) -> Option<Instant> {
        self.jobs.iter().map(|j| j.due).min()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
