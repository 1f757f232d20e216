//! Input events for the roistudio engine.
//!
//! Every user action is a message; the application state routes each
//! category to its handler.

use crate::annotation::CanvasRect;
use crate::confirm::ConfirmToken;
use crate::model::{AlarmLevel, Algorithm, PrimitiveKind, SampleId, SampleLabel, TaskId};

/// Drawing-surface events. Pointer positions are in pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasMessage {
    PointerDown(f32, f32),
    PointerMove(f32, f32),
    PointerUp,
    /// Pointer left the drawing surface mid-stroke
    PointerLeave,
    /// Drawing surface moved or resized
    Resized(CanvasRect),
    ToolSelected(PrimitiveKind),
    Undo,
    Redo,
    Clear,
}

/// Task wizard edits.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftMessage {
    NameChanged(String),
    CameraToggled(String),
    AlgorithmSelected(Algorithm),
    /// Free-text rule submitted for parsing
    AugmentationSubmitted(String),
    AugmentationCleared,
    DurationChanged(u32),
    AlarmLevelChanged(AlarmLevel),
    ThresholdsChanged { positive: usize, negative: usize },
    /// Open the full-frame prompt; its token is read back through
    /// `TaskBuilder::pending_full_frame`
    FullFrameRequested,
    FullFrameConfirmed(ConfirmToken),
    FullFrameDeclined,
}

/// Commands on saved tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskMessage {
    Start(TaskId),
    Stop(TaskId),
    StartTraining(TaskId),
    /// Park a deletion; its token is read back through `AppState::pending_delete`
    DeleteRequested(TaskId),
    DeleteConfirmed(ConfirmToken),
    DeleteCancelled(ConfirmToken),
    LabelSample {
        task: TaskId,
        sample: SampleId,
        label: SampleLabel,
    },
}

/// Top-level message.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Canvas(CanvasMessage),
    Draft(DraftMessage),
    Task(TaskMessage),
    /// Open a new task draft
    NewDraft,
    SaveDraft,
    DiscardDraft,
    /// Run scheduled transitions that came due
    Tick,
}
