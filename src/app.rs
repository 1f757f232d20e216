//! Application state.
//!
//! [`AppState`] owns every piece of mutable engine state: the saved tasks,
//! their sample stores, the active draft and the scheduled lifecycle jobs.
//! All changes go through its commands.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use roistudio_overlay::Overlay;

use crate::builder::{TaskBuilder, today};
use crate::config::AppConfig;
use crate::confirm::{ConfirmToken, Confirmations};
use crate::curation::SampleStore;
use crate::error::{AppError, LifecycleError};
use crate::handlers::{CanvasOutcome, handle_canvas, handle_draft};
use crate::lifecycle::LifecycleManager;
use crate::message::{Message, TaskMessage};
use crate::model::{
    CameraDirectory, Sample, SampleId, SampleLabel, Task, TaskDraft, TaskId, TaskStatus,
};
use crate::render::render_canvas;
use crate::rules::{RuleParser, SimulatedRuleParser};
use crate::scheduler::{Clock, SystemClock};

/// Integration points for the host. All methods default to no-ops.
pub trait TaskHooks {
    /// A draft passed validation and is about to become a task.
    fn on_save(&mut self, _draft: &TaskDraft) {}

    /// A task changed status.
    fn on_update_status(&mut self, _task_id: TaskId, _status: TaskStatus) {}

    /// Training committed a new observed sample total.
    fn on_update_sample_count(&mut self, _task_id: TaskId, _observed_total: usize) {}
}

/// Hooks that ignore every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl TaskHooks for NoHooks {}

/// The engine's single owned state object.
pub struct AppState {
    config: AppConfig,
    clock: Box<dyn Clock>,
    cameras: Box<dyn CameraDirectory>,
    parser: Box<dyn RuleParser>,
    hooks: Box<dyn TaskHooks>,

    tasks: BTreeMap<TaskId, Task>,
    samples: BTreeMap<TaskId, SampleStore>,
    draft: Option<TaskBuilder>,
    lifecycle: LifecycleManager,
    deletions: Confirmations<TaskId>,
    next_task_id: u64,
}

impl AppState {
    /// Create state backed by the wall clock and the local rule parser.
    pub fn new(config: AppConfig, cameras: impl CameraDirectory + 'static) -> Self {
        let lifecycle = LifecycleManager::new(config.lifecycle.timings());
        let parser = SimulatedRuleParser {
            default_duration: config.draft.duration_secs,
        };
        Self {
            config,
            clock: Box::new(SystemClock),
            cameras: Box::new(cameras),
            parser: Box::new(parser),
            hooks: Box::new(NoHooks),
            tasks: BTreeMap::new(),
            samples: BTreeMap::new(),
            draft: None,
            lifecycle,
            deletions: Confirmations::new(),
            next_task_id: 1,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_parser(mut self, parser: impl RuleParser + 'static) -> Self {
        self.parser = Box::new(parser);
        self
    }

    pub fn with_hooks(mut self, hooks: impl TaskHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cameras(&self) -> &dyn CameraDirectory {
        self.cameras.as_ref()
    }

    // ========================================================================
    // Draft commands
    // ========================================================================

    /// Open a fresh draft, replacing any existing one.
    pub fn begin_draft(&mut self) -> &mut TaskBuilder {
        self.begin_draft_on(today())
    }

    /// Open a fresh draft whose auto-filled name uses `date`.
    pub fn begin_draft_on(&mut self, date: NaiveDate) -> &mut TaskBuilder {
        if self.draft.is_some() {
            log::debug!("📝 Replacing active draft");
        }
        self.draft
            .insert(TaskBuilder::new(self.config.draft_defaults(), date))
    }

    pub fn draft(&self) -> Option<&TaskBuilder> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Result<&mut TaskBuilder, AppError> {
        self.draft.as_mut().ok_or(AppError::NoActiveDraft)
    }

    /// Validate the draft and create an INIT task from it.
    ///
    /// On failure the draft stays open for correction.
    pub fn save_draft(&mut self) -> Result<TaskId, AppError> {
        let draft = self
            .draft
            .as_ref()
            .ok_or(AppError::NoActiveDraft)?
            .build()
            .inspect_err(|e| log::warn!("Draft rejected: {}", e))?;

        self.hooks.on_save(&draft);

        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        let task = Task::from_draft(id, draft);
        self.lifecycle.register(&task, self.clock.now());
        log::info!(
            "💾 Saved {} '{}' on {} camera(s), {} ROI point(s)",
            id,
            task.name,
            task.camera_ids.len(),
            task.roi.len()
        );
        self.tasks.insert(id, task);
        self.samples.insert(id, SampleStore::default());
        self.draft = None;
        Ok(id)
    }

    pub fn discard_draft(&mut self) {
        if self.draft.take().is_some() {
            log::debug!("🗑️ Draft discarded");
        }
    }

    /// Overlay of the draft's ROI canvas.
    pub fn draft_overlay(&self) -> Option<Overlay> {
        self.draft.as_ref().map(|d| render_canvas(d.canvas()))
    }

    // ========================================================================
    // Task lifecycle commands
    // ========================================================================

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Saved tasks in creation order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn start_task(&mut self, id: TaskId) -> Result<TaskStatus, AppError> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or(LifecycleError::TaskNotFound(id))?;
        let status = self.lifecycle.start(task)?;
        self.hooks.on_update_status(id, status);
        Ok(status)
    }

    pub fn stop_task(&mut self, id: TaskId) -> Result<TaskStatus, AppError> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or(LifecycleError::TaskNotFound(id))?;
        let status = self.lifecycle.stop(task)?;
        self.hooks.on_update_status(id, status);
        Ok(status)
    }

    /// Whether the training action is enabled for a task.
    pub fn can_start_training(&self, id: TaskId) -> bool {
        match (self.tasks.get(&id), self.samples.get(&id)) {
            (Some(task), Some(samples)) => self.lifecycle.can_start_training(task, samples),
            _ => false,
        }
    }

    /// Start training. Returns the observed sample total committed to the task.
    pub fn start_training(&mut self, id: TaskId) -> Result<usize, AppError> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or(LifecycleError::TaskNotFound(id))?;
        let empty = SampleStore::default();
        let samples = self.samples.get(&id).unwrap_or(&empty);
        let observed = self
            .lifecycle
            .start_training(task, samples, self.clock.now())?;
        self.hooks.on_update_status(id, task.status());
        self.hooks.on_update_sample_count(id, observed);
        Ok(observed)
    }

    /// Move a task to ERROR.
    pub fn fail_task(&mut self, id: TaskId, reason: &str) -> Result<TaskStatus, AppError> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or(LifecycleError::TaskNotFound(id))?;
        let status = self.lifecycle.fail(task, reason);
        self.hooks.on_update_status(id, status);
        Ok(status)
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// First half of deletion: park the request under a token. A second
    /// request for the same task returns the token already waiting.
    pub fn propose_delete(&mut self, id: TaskId) -> Result<ConfirmToken, AppError> {
        if !self.tasks.contains_key(&id) {
            return Err(LifecycleError::TaskNotFound(id).into());
        }
        let token = self.deletions.propose_or_reuse(id);
        log::debug!("❓ Delete of {} awaiting confirmation {}", id, token);
        Ok(token)
    }

    /// Token of the deletion waiting on this task, if any.
    pub fn pending_delete(&self, id: TaskId) -> Option<ConfirmToken> {
        self.deletions.find(|pending| *pending == id)
    }

    /// Second half of deletion: remove the task and cancel its scheduled jobs.
    pub fn confirm_delete(&mut self, token: ConfirmToken) -> Result<Task, AppError> {
        let id = self.deletions.confirm(token)?;
        self.deletions.cancel_where(|pending| *pending == id);
        let task = self
            .tasks
            .remove(&id)
            .ok_or(LifecycleError::TaskNotFound(id))?;
        let cancelled = self.lifecycle.forget(id);
        self.samples.remove(&id);
        log::info!(
            "🗑️ Deleted {} '{}' ({} pending job(s) cancelled)",
            id,
            task.name,
            cancelled
        );
        Ok(task)
    }

    pub fn cancel_delete(&mut self, token: ConfirmToken) -> bool {
        self.deletions.cancel(token).is_some()
    }

    // ========================================================================
    // Sample curation
    // ========================================================================

    /// Append pre-scored samples to a task's store. IDs the store already
    /// holds are skipped. Returns the store size afterwards.
    pub fn load_samples(
        &mut self,
        id: TaskId,
        samples: impl IntoIterator<Item = Sample>,
    ) -> Result<usize, AppError> {
        let store = self
            .samples
            .get_mut(&id)
            .ok_or(LifecycleError::TaskNotFound(id))?;
        let added = store.extend(samples);
        log::debug!(
            "📥 {} took {} new sample(s), now holds {}",
            id,
            added,
            store.len()
        );
        Ok(store.len())
    }

    /// Relabel a sample. Returns false if the sample is unknown.
    pub fn label_sample(
        &mut self,
        id: TaskId,
        sample: SampleId,
        label: SampleLabel,
    ) -> Result<bool, AppError> {
        let store = self
            .samples
            .get_mut(&id)
            .ok_or(LifecycleError::TaskNotFound(id))?;
        Ok(store.label(sample, label))
    }

    pub fn samples(&self, id: TaskId) -> Option<&SampleStore> {
        self.samples.get(&id)
    }

    // ========================================================================
    // Scheduling
    // ========================================================================

    /// Apply every scheduled transition that has come due.
    ///
    /// Jobs whose task has been deleted are dropped without effect.
    pub fn tick(&mut self) -> Vec<(TaskId, TaskStatus)> {
        let mut applied = Vec::new();
        for job in self.lifecycle.poll(self.clock.now()) {
            let Some(task) = self.tasks.get_mut(&job.task_id) else {
                log::debug!("⏲️ Dropping job for removed {}", job.task_id);
                continue;
            };
            match self.lifecycle.apply_due(task, job.action) {
                Ok(status) => {
                    self.hooks.on_update_status(job.task_id, status);
                    applied.push((job.task_id, status));
                }
                Err(e) => log::warn!("Scheduled transition skipped: {}", e),
            }
        }
        applied
    }

    /// Whether any scheduled transition is waiting.
    pub fn has_pending_jobs(&self) -> bool {
        self.lifecycle.next_due().is_some()
    }

    // ========================================================================
    // Message dispatch
    // ========================================================================

    pub fn update(&mut self, message: Message) -> Result<(), AppError> {
        match message {
            Message::Canvas(msg) => {
                let draft = self.draft_mut()?;
                if let CanvasOutcome::Committed(primitive) =
                    handle_canvas(msg, draft.canvas_mut())
                {
                    log::debug!("✏️ Draft ROI now has primitive {}", primitive.id);
                }
            }
            Message::Draft(msg) => {
                let builder = self.draft.as_mut().ok_or(AppError::NoActiveDraft)?;
                handle_draft(msg, builder, self.cameras.as_ref(), self.parser.as_ref())?;
            }
            Message::Task(msg) => self.handle_task(msg)?,
            Message::NewDraft => {
                self.begin_draft();
            }
            Message::SaveDraft => {
                self.save_draft()?;
            }
            Message::DiscardDraft => self.discard_draft(),
            Message::Tick => {
                self.tick();
            }
        }
        Ok(())
    }

    fn handle_task(&mut self, msg: TaskMessage) -> Result<(), AppError> {
        match msg {
            TaskMessage::Start(id) => {
                self.start_task(id)?;
            }
            TaskMessage::Stop(id) => {
                self.stop_task(id)?;
            }
            TaskMessage::StartTraining(id) => {
                self.start_training(id)?;
            }
            TaskMessage::DeleteRequested(id) => {
                self.propose_delete(id)?;
            }
            TaskMessage::DeleteConfirmed(token) => {
                self.confirm_delete(token)?;
            }
            TaskMessage::DeleteCancelled(token) => {
                self.cancel_delete(token);
            }
            TaskMessage::LabelSample {
                task,
                sample,
                label,
            } => {
                self.label_sample(task, sample, label)?;
            }
        }
        Ok(())
    }
}
