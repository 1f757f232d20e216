//! Drafting and saving tasks.

use roistudio_overlay::OverlayShape;

use super::{HookEvent, cameras, draw, harness, save_polygon_task, test_date};
use crate::error::{AppError, ValidationError};
use crate::message::{CanvasMessage, DraftMessage, Message};
use crate::model::{AlarmLevel, Coordinate, PrimitiveKind, TaskStatus, default_presets};

#[test]
fn test_polygon_roi_saved_in_order_and_rendered_closed() {
    let (mut state, _, recorder) = harness();
    let directory = cameras();
    let draft = state.begin_draft_on(test_date());
    draft.select_camera(&directory, "cam-1").unwrap();
    draft.select_algorithm(default_presets()[0].clone()).unwrap();
    draw(
        &mut state,
        PrimitiveKind::Polygon,
        &[(0.1, 0.1), (0.4, 0.1), (0.4, 0.4), (0.1, 0.4)],
    );

    let overlay = state.draft_overlay().unwrap();
    let outline = overlay.items[0].shape.outline();
    assert!(overlay.items[0].shape.is_closed());
    assert_eq!(outline.first(), outline.last());
    assert!((outline[0].0 - 10.0).abs() < 1e-4 && (outline[0].1 - 10.0).abs() < 1e-4);

    let id = state.save_draft().unwrap();
    let expected = vec![
        Coordinate::new(0.1, 0.1),
        Coordinate::new(0.4, 0.1),
        Coordinate::new(0.4, 0.4),
        Coordinate::new(0.1, 0.4),
    ];
    assert_eq!(state.task(id).unwrap().roi, expected);

    let events = recorder.events();
    assert_eq!(events.len(), 1);
    let HookEvent::Saved(saved) = &events[0] else {
        panic!("expected on_save first");
    };
    assert_eq!(saved.roi, expected);
    assert_eq!(saved.name, "Area Intrusion 2024-05-17");
    assert_eq!((saved.positive_threshold, saved.negative_threshold), (3, 2));
}

#[test]
fn test_roi_concatenates_primitives_in_commit_order() {
    let (mut state, _, _) = harness();
    let directory = cameras();
    let draft = state.begin_draft_on(test_date());
    draft.select_camera(&directory, "cam-2").unwrap();
    draft.select_algorithm(default_presets()[2].clone()).unwrap();
    draw(&mut state, PrimitiveKind::Arrow, &[(0.2, 0.2), (0.5, 0.5), (0.8, 0.2)]);
    draw(&mut state, PrimitiveKind::Curve, &[(0.1, 0.9), (0.2, 0.8), (0.3, 0.9)]);

    let overlay = state.draft_overlay().unwrap();
    assert!(matches!(overlay.items[1].shape, OverlayShape::Triangle { .. }));

    let id = state.save_draft().unwrap();
    let roi = &state.task(id).unwrap().roi;
    assert_eq!(roi.len(), 5);
    assert_eq!(roi[0], Coordinate::new(0.2, 0.2));
    assert_eq!(roi[1], Coordinate::new(0.8, 0.2));
    assert_eq!(roi[4], Coordinate::new(0.3, 0.9));
}

#[test]
fn test_undo_everything_falls_back_to_full_frame_prompt() {
    let (mut state, _, _) = harness();
    let directory = cameras();
    let draft = state.begin_draft_on(test_date());
    draft.select_camera(&directory, "cam-1").unwrap();
    draft.select_algorithm(default_presets()[1].clone()).unwrap();
    draw(&mut state, PrimitiveKind::Segment, &[(0.1, 0.1), (0.9, 0.9)]);
    draw(&mut state, PrimitiveKind::Polygon, &[(0.1, 0.1), (0.2, 0.1), (0.2, 0.2)]);

    let canvas = state.draft_mut().unwrap().canvas_mut();
    assert!(canvas.undo_last().is_some());
    assert!(canvas.undo_last().is_some());
    assert!(canvas.undo_last().is_none());

    assert_eq!(
        state.save_draft(),
        Err(AppError::Validation(ValidationError::FullFrameUnconfirmed))
    );

    state.update(Message::Draft(DraftMessage::FullFrameRequested)).unwrap();
    let token = state.draft().unwrap().pending_full_frame().unwrap();
    state
        .update(Message::Draft(DraftMessage::FullFrameConfirmed(token)))
        .unwrap();
    let id = state.save_draft().unwrap();
    assert!(state.task(id).unwrap().is_full_frame());
}

#[test]
fn test_augmentation_through_messages() {
    let (mut state, _, _) = harness();
    state.begin_draft_on(test_date());

    let early = state.update(Message::Draft(DraftMessage::AugmentationSubmitted(
        "person at gate".to_string(),
    )));
    assert_eq!(
        early,
        Err(AppError::Validation(ValidationError::AugmentationWithoutPreset))
    );

    for msg in [
        DraftMessage::CameraToggled("cam-1".to_string()),
        DraftMessage::AlgorithmSelected(default_presets()[0].clone()),
        DraftMessage::NameChanged("Gate climbers".to_string()),
        DraftMessage::AugmentationSubmitted("urgent person climbing fence 15 seconds".to_string()),
    ] {
        state.update(Message::Draft(msg)).unwrap();
    }
    draw(&mut state, PrimitiveKind::Polygon, &[(0.1, 0.1), (0.5, 0.1), (0.5, 0.5)]);

    let id = state.save_draft().unwrap();
    let task = state.task(id).unwrap();
    assert_eq!(task.name, "Gate climbers");
    assert_eq!(task.duration_secs, 15);
    assert_eq!(task.alarm_level, AlarmLevel::High);
    assert!(task.augmentation.as_deref().is_some_and(|t| t.contains("climbing")));
    assert_eq!(task.status(), TaskStatus::Init);
}

#[test]
fn test_rejected_augmentation_blocks_save_until_cleared() {
    let (mut state, _, recorder) = harness();
    let id_before = save_polygon_task(&mut state);

    state.begin_draft_on(test_date());
    for msg in [
        DraftMessage::CameraToggled("cam-1".to_string()),
        DraftMessage::AlgorithmSelected(default_presets()[0].clone()),
    ] {
        state.update(Message::Draft(msg)).unwrap();
    }
    draw(&mut state, PrimitiveKind::Polygon, &[(0.1, 0.1), (0.5, 0.1), (0.5, 0.5)]);

    let err = state
        .update(Message::Draft(DraftMessage::AugmentationSubmitted(
            "something strange".to_string(),
        )))
        .unwrap_err();
    assert!(matches!(err, AppError::Collaborator(_)));
    assert!(matches!(
        state.save_draft(),
        Err(AppError::Validation(ValidationError::InvalidAugmentation { .. }))
    ));

    state
        .update(Message::Draft(DraftMessage::AugmentationCleared))
        .unwrap();
    let id = state.save_draft().unwrap();
    assert_ne!(id, id_before);

    let saves = recorder
        .events()
        .into_iter()
        .filter(|e| matches!(e, HookEvent::Saved(_)))
        .count();
    assert_eq!(saves, 2);
}

#[test]
fn test_full_frame_task_saved_through_messages_only() {
    let (mut state, _, recorder) = harness();
    for msg in [
        Message::NewDraft,
        Message::Draft(DraftMessage::CameraToggled("cam-1".to_string())),
        Message::Draft(DraftMessage::AlgorithmSelected(default_presets()[0].clone())),
        Message::Draft(DraftMessage::FullFrameRequested),
        Message::Draft(DraftMessage::FullFrameRequested),
    ] {
        state.update(msg).unwrap();
    }
    let token = state.draft().unwrap().pending_full_frame().unwrap();
    state
        .update(Message::Draft(DraftMessage::FullFrameConfirmed(token)))
        .unwrap();
    assert_eq!(state.draft().unwrap().pending_full_frame(), None);

    // Drawing then clearing withdraws the confirmation
    for msg in [
        CanvasMessage::ToolSelected(PrimitiveKind::Segment),
        CanvasMessage::PointerDown(0.1, 0.1),
        CanvasMessage::PointerMove(0.6, 0.6),
        CanvasMessage::PointerUp,
        CanvasMessage::Clear,
    ] {
        state.update(Message::Canvas(msg)).unwrap();
    }
    assert_eq!(
        state.update(Message::SaveDraft),
        Err(AppError::Validation(ValidationError::FullFrameUnconfirmed))
    );

    state.update(Message::Draft(DraftMessage::FullFrameRequested)).unwrap();
    let token = state.draft().unwrap().pending_full_frame().unwrap();
    state
        .update(Message::Draft(DraftMessage::FullFrameConfirmed(token)))
        .unwrap();
    state.update(Message::SaveDraft).unwrap();

    assert_eq!(state.tasks().count(), 1);
    assert!(state.tasks().all(|t| t.is_full_frame()));
    assert!(
        recorder
            .events()
            .iter()
            .any(|e| matches!(e, HookEvent::Saved(draft) if draft.roi.is_empty()))
    );
}

#[test]
fn test_declined_full_frame_prompt_is_closed() {
    let (mut state, _, _) = harness();
    state.update(Message::NewDraft).unwrap();
    state.update(Message::Draft(DraftMessage::FullFrameRequested)).unwrap();
    let token = state.draft().unwrap().pending_full_frame().unwrap();

    state.update(Message::Draft(DraftMessage::FullFrameDeclined)).unwrap();
    assert_eq!(state.draft().unwrap().pending_full_frame(), None);
    assert!(
        state
            .update(Message::Draft(DraftMessage::FullFrameConfirmed(token)))
            .is_err()
    );
    assert!(!state.draft().unwrap().is_full_frame_confirmed());
}
