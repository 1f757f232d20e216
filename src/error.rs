//! Error types for the roistudio engine.
//!
//! Every condition here is recoverable: drafts are corrected and resubmitted,
//! lifecycle commands are retried once their precondition holds.

use thiserror::Error;

use crate::model::{TaskId, TaskStatus};

/// Problems with a task draft. Blocks saving until corrected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// No camera selected
    #[error("Select at least one camera")]
    NoCameras,

    /// Camera ID not present in the directory
    #[error("Unknown camera: {id}")]
    UnknownCamera {
        /// The unrecognized camera ID
        id: String,
    },

    /// No base algorithm selected
    #[error("Select a preset algorithm")]
    NoAlgorithm,

    /// A non-preset algorithm was offered as the base
    #[error("Algorithm '{name}' is not a preset and cannot be used as a base")]
    NotPreset {
        /// Name of the rejected algorithm
        name: String,
    },

    /// Augmentation text submitted before a preset was chosen
    #[error("Choose a preset algorithm before adding a rule description")]
    AugmentationWithoutPreset,

    /// Augmentation text was rejected by the rule parser
    #[error("Rule description was not accepted: {reason}")]
    InvalidAugmentation {
        /// Reason reported by the rule parser
        reason: String,
    },

    /// Task name empty after auto-fill
    #[error("Task name must not be empty")]
    EmptyName,

    /// Duration of zero seconds
    #[error("Alarm duration must be at least one second")]
    ZeroDuration,

    /// No ROI drawn and full-frame detection not confirmed
    #[error("No region drawn; confirm that detection should cover the full frame")]
    FullFrameUnconfirmed,
}

/// The rule-parsing collaborator failed or rejected the text.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason}")]
pub struct CollaboratorFailure {
    /// Collaborator-supplied reason, or the generic fallback
    pub reason: String,
}

impl CollaboratorFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Lifecycle commands that cannot run in the task's current state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    /// Command not allowed from the current status
    #[error("Cannot {command} a task in state {from}")]
    InvalidTransition {
        /// Status the task was in
        from: TaskStatus,
        /// Human-readable command name
        command: &'static str,
    },

    /// Training requested before both sample thresholds are met
    #[error(
        "Not enough labeled samples: {positive}/{positive_threshold} positive, {negative}/{negative_threshold} negative"
    )]
    ThresholdNotMet {
        positive: usize,
        positive_threshold: usize,
        negative: usize,
        negative_threshold: usize,
    },

    /// Task ID not known
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),
}

/// Confirmation token could not be redeemed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfirmError {
    /// Token never issued, already used, or cancelled
    #[error("Confirmation token {0} is not pending")]
    UnknownToken(u64),
}

/// Errors surfaced by the application state facade.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorFailure),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Confirm(#[from] ConfirmError),

    /// A draft command was issued with no wizard session open
    #[error("No task draft is open")]
    NoActiveDraft,
}
