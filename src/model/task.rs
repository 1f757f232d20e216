//! Detection task entity.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Algorithm, CameraId, Coordinate};

/// Unique identifier for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Init,
    Running,
    Stopped,
    Training,
    Error,
}

impl TaskStatus {
    pub fn name(&self) -> &'static str {
        match self {
            TaskStatus::Init => "INIT",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Stopped => "STOPPED",
            TaskStatus::Training => "TRAINING",
            TaskStatus::Error => "ERROR",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Alarm severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlarmLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl AlarmLevel {
    pub fn name(&self) -> &'static str {
        match self {
            AlarmLevel::High => "HIGH",
            AlarmLevel::Medium => "MEDIUM",
            AlarmLevel::Low => "LOW",
        }
    }
}

/// Training gate thresholds plus the count committed by the last training start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SampleCounters {
    pub positive_threshold: usize,
    pub negative_threshold: usize,
    pub observed_total: usize,
}

impl SampleCounters {
    pub fn new(positive_threshold: usize, negative_threshold: usize) -> Self {
        Self {
            positive_threshold,
            negative_threshold,
            observed_total: 0,
        }
    }
}

/// Validated output of the task wizard, handed to `on_save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub camera_ids: BTreeSet<CameraId>,
    /// Every committed primitive's points in commit order. Empty means full frame.
    pub roi: Vec<Coordinate>,
    pub algorithm: Algorithm,
    pub augmentation: Option<String>,
    pub duration_secs: u32,
    pub alarm_level: AlarmLevel,
    pub positive_threshold: usize,
    pub negative_threshold: usize,
}

/// A saved detection task.
///
/// Status and counters are only writable from inside the crate so that every
/// change goes through the lifecycle manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub camera_ids: BTreeSet<CameraId>,
    pub roi: Vec<Coordinate>,
    pub algorithm: Algorithm,
    pub augmentation: Option<String>,
    pub duration_secs: u32,
    pub alarm_level: AlarmLevel,
    status: TaskStatus,
    counters: SampleCounters,
    error_reason: Option<String>,
}

impl Task {
    /// Create a task in the INIT state from a validated draft.
    pub(crate) fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            name: draft.name,
            camera_ids: draft.camera_ids,
            roi: draft.roi,
            algorithm: draft.algorithm,
            augmentation: draft.augmentation,
            duration_secs: draft.duration_secs,
            alarm_level: draft.alarm_level,
            status: TaskStatus::Init,
            counters: SampleCounters::new(draft.positive_threshold, draft.negative_threshold),
            error_reason: None,
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn counters(&self) -> SampleCounters {
        self.counters
    }

    /// Reason recorded when the task entered ERROR.
    pub fn error_reason(&self) -> Option<&str> {
        self.error_reason.as_deref()
    }

    /// Whether detection covers the whole frame.
    pub fn is_full_frame(&self) -> bool {
        self.roi.is_empty()
    }

    pub(crate) fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub(crate) fn set_observed_total(&mut self, total: usize) {
        self.counters.observed_total = total;
    }

    pub(crate) fn set_error_reason(&mut self, reason: impl Into<String>) {
        self.error_reason = Some(reason.into());
    }
}
