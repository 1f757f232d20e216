//! Sample curation and the training gate.

use super::{HookEvent, harness, provision, save_polygon_task};
use crate::curation::SampleFilter;
use crate::error::{AppError, LifecycleError};
use crate::message::{Message, TaskMessage};
use crate::model::{Sample, SampleLabel, TaskStatus};

fn label(state: &mut crate::AppState, task: crate::model::TaskId, sample: u64, label: SampleLabel) {
    state
        .update(Message::Task(TaskMessage::LabelSample {
            task,
            sample,
            label,
        }))
        .unwrap();
}

#[test]
fn test_three_positive_two_negative_unlocks_training() {
    let (mut state, clock, recorder) = harness();
    let id = save_polygon_task(&mut state);
    provision(&mut state, &clock);
    state
        .load_samples(id, (0..10).map(|i| Sample::new(i, 0.8)))
        .unwrap();

    for sample in 0..3 {
        label(&mut state, id, sample, SampleLabel::Positive);
    }
    label(&mut state, id, 3, SampleLabel::Negative);
    assert!(!state.can_start_training(id));
    assert!(matches!(
        state.start_training(id),
        Err(AppError::Lifecycle(LifecycleError::ThresholdNotMet {
            positive: 3,
            negative: 1,
            ..
        }))
    ));
    assert_eq!(state.task(id).unwrap().status(), TaskStatus::Running);

    label(&mut state, id, 4, SampleLabel::Negative);
    assert!(state.can_start_training(id));

    assert_eq!(state.start_training(id), Ok(5));
    let task = state.task(id).unwrap();
    assert_eq!(task.status(), TaskStatus::Training);
    assert_eq!(task.counters().observed_total, 5);

    let events = recorder.events();
    assert!(events.contains(&HookEvent::Status(id, TaskStatus::Training)));
    assert!(events.contains(&HookEvent::SampleCount(id, 5)));

    clock.advance(state.config().lifecycle.timings().training);
    assert_eq!(state.tick(), vec![(id, TaskStatus::Running)]);
}

#[test]
fn test_positive_only_never_unlocks() {
    let (mut state, clock, _) = harness();
    let id = save_polygon_task(&mut state);
    provision(&mut state, &clock);
    state
        .load_samples(id, (0..5).map(|i| Sample::new(i, 0.8)))
        .unwrap();
    for sample in 0..5 {
        label(&mut state, id, sample, SampleLabel::Positive);
        assert!(!state.can_start_training(id));
    }
}

#[test]
fn test_gate_is_monotonic_while_labeling() {
    let (mut state, clock, _) = harness();
    let id = save_polygon_task(&mut state);
    provision(&mut state, &clock);
    state
        .load_samples(id, (0..8).map(|i| Sample::new(i, 0.6)))
        .unwrap();

    let order = [
        SampleLabel::Negative,
        SampleLabel::Positive,
        SampleLabel::Negative,
        SampleLabel::Positive,
        SampleLabel::Positive,
        SampleLabel::Negative,
        SampleLabel::Positive,
    ];
    let mut unlocked = false;
    for (sample, l) in order.into_iter().enumerate() {
        label(&mut state, id, sample as u64, l);
        let now = state.can_start_training(id);
        assert!(now || !unlocked, "gate closed again after sample {}", sample);
        unlocked = now;
    }
    assert!(unlocked);
}

#[test]
fn test_ignored_samples_hidden_but_retained() {
    let (mut state, clock, _) = harness();
    let id = save_polygon_task(&mut state);
    provision(&mut state, &clock);
    state
        .load_samples(id, (0..6).map(|i| Sample::new(i, 0.5)))
        .unwrap();
    label(&mut state, id, 0, SampleLabel::Positive);
    label(&mut state, id, 1, SampleLabel::Ignored);
    label(&mut state, id, 2, SampleLabel::Negative);
    label(&mut state, id, 2, SampleLabel::Ignored);

    let store = state.samples(id).unwrap();
    let counts = store.counts();
    assert_eq!((counts.unlabeled, counts.positive, counts.negative), (3, 1, 0));
    assert_eq!(store.len(), 6);
    assert_eq!(store.ignored_count(), 2);
    let visible: Vec<u64> = store.visible().map(|s| s.id).collect();
    assert_eq!(visible, vec![0, 3, 4, 5]);
    assert_eq!(store.filtered(SampleFilter::Unlabeled).count(), 3);
    assert_eq!(
        store.get(1).map(|s| s.label),
        Some(SampleLabel::Ignored)
    );

    // Unknown samples are reported, not fatal
    assert_eq!(state.label_sample(id, 99, SampleLabel::Positive), Ok(false));
}

#[test]
fn test_training_from_stopped_returns_to_running() {
    let (mut state, clock, _) = harness();
    let id = save_polygon_task(&mut state);
    provision(&mut state, &clock);
    state.stop_task(id).unwrap();
    state
        .load_samples(id, (0..5).map(|i| Sample::new(i, 0.9)))
        .unwrap();
    for sample in 0..3 {
        label(&mut state, id, sample, SampleLabel::Positive);
    }
    for sample in 3..5 {
        label(&mut state, id, sample, SampleLabel::Negative);
    }

    state
        .update(Message::Task(TaskMessage::StartTraining(id)))
        .unwrap();
    assert!(state.stop_task(id).is_err());
    assert!(!state.can_start_training(id));

    clock.advance(state.config().lifecycle.timings().training);
    state.update(Message::Tick).unwrap();
    assert_eq!(state.task(id).unwrap().status(), TaskStatus::Running);
}
