//! Message handlers.
//!
//! Each handler processes one category of messages so that
//! `AppState::update` stays a flat dispatch.

use crate::annotation::AnnotationCanvas;
use crate::builder::TaskBuilder;
use crate::error::AppError;
use crate::message::{CanvasMessage, DraftMessage};
use crate::model::{CameraDirectory, Primitive};
use crate::rules::RuleParser;

/// What a canvas message produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CanvasOutcome {
    #[default]
    Nothing,
    Committed(Primitive),
    Removed(Primitive),
    Restored(Primitive),
    Cleared,
}

/// Handle drawing-surface messages.
pub fn handle_canvas(msg: CanvasMessage, canvas: &mut AnnotationCanvas) -> CanvasOutcome {
    match msg {
        CanvasMessage::PointerDown(x, y) => {
            canvas.pointer_down(x, y);
            CanvasOutcome::Nothing
        }
        CanvasMessage::PointerMove(x, y) => {
            canvas.pointer_move(x, y);
            CanvasOutcome::Nothing
        }
        CanvasMessage::PointerUp => canvas
            .pointer_up()
            .map_or(CanvasOutcome::Nothing, CanvasOutcome::Committed),
        CanvasMessage::PointerLeave => canvas
            .pointer_leave()
            .map_or(CanvasOutcome::Nothing, CanvasOutcome::Committed),
        CanvasMessage::Resized(rect) => {
            canvas.set_rect(rect);
            CanvasOutcome::Nothing
        }
        CanvasMessage::ToolSelected(kind) => {
            log::debug!("🛠️ Tool selected: {}", kind.name());
            canvas.set_tool(kind);
            CanvasOutcome::Nothing
        }
        CanvasMessage::Undo => canvas
            .undo_last()
            .map_or(CanvasOutcome::Nothing, CanvasOutcome::Removed),
        CanvasMessage::Redo => canvas
            .redo_last()
            .map_or(CanvasOutcome::Nothing, CanvasOutcome::Restored),
        CanvasMessage::Clear => {
            canvas.clear();
            CanvasOutcome::Cleared
        }
    }
}

/// Handle wizard edits.
///
/// The full-frame prompt is answered through [`DraftMessage::FullFrameConfirmed`]
/// with the token from [`TaskBuilder::pending_full_frame`].
pub fn handle_draft(
    msg: DraftMessage,
    builder: &mut TaskBuilder,
    directory: &dyn CameraDirectory,
    parser: &dyn RuleParser,
) -> Result<(), AppError> {
    match msg {
        DraftMessage::NameChanged(name) => builder.set_name(name),
        DraftMessage::CameraToggled(id) => {
            let selected = builder.toggle_camera(directory, &id)?;
            log::debug!("📷 Camera {} {}", id, if selected { "selected" } else { "removed" });
        }
        DraftMessage::AlgorithmSelected(algorithm) => builder.select_algorithm(algorithm)?,
        DraftMessage::AugmentationSubmitted(text) => {
            builder.submit_augmentation(parser, &text)?;
        }
        DraftMessage::AugmentationCleared => builder.clear_augmentation(),
        DraftMessage::DurationChanged(secs) => builder.set_duration_secs(secs),
        DraftMessage::AlarmLevelChanged(level) => builder.set_alarm_level(level),
        DraftMessage::ThresholdsChanged { positive, negative } => {
            builder.set_thresholds(positive, negative)
        }
        DraftMessage::FullFrameRequested => {
            let token = builder.propose_full_frame();
            log::debug!("🖼️ Full-frame prompt {}", token);
        }
        DraftMessage::FullFrameConfirmed(token) => builder.confirm_full_frame(token)?,
        DraftMessage::FullFrameDeclined => {
            if builder.decline_full_frame() {
                log::debug!("🖼️ Full-frame prompt declined");
            }
        }
    }
    Ok(())
}
