//! Cross-module scenario tests.
//!
//! These drive [`crate::AppState`] the way a host would: drafting a task on
//! the canvas, saving it, advancing a manual clock and curating samples.

mod curation_tests;
mod wizard_tests;

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::app::{AppState, TaskHooks};
use crate::config::AppConfig;
use crate::model::{
    Camera, Coordinate, PrimitiveKind, StaticCameraDirectory, TaskDraft, TaskId, TaskStatus,
    default_presets,
};
use crate::scheduler::ManualClock;

/// Host callback as recorded by [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
enum HookEvent {
    Saved(TaskDraft),
    Status(TaskId, TaskStatus),
    SampleCount(TaskId, usize),
}

/// Hooks that append every callback to a shared log.
#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<HookEvent>>>);

impl Recorder {
    fn events(&self) -> Vec<HookEvent> {
        self.0.borrow().clone()
    }
}

impl TaskHooks for Recorder {
    fn on_save(&mut self, draft: &TaskDraft) {
        self.0.borrow_mut().push(HookEvent::Saved(draft.clone()));
    }

    fn on_update_status(&mut self, task_id: TaskId, status: TaskStatus) {
        self.0.borrow_mut().push(HookEvent::Status(task_id, status));
    }

    fn on_update_sample_count(&mut self, task_id: TaskId, observed_total: usize) {
        self.0
            .borrow_mut()
            .push(HookEvent::SampleCount(task_id, observed_total));
    }
}

fn cameras() -> StaticCameraDirectory {
    StaticCameraDirectory::new(vec![
        Camera::new("cam-1", "North Gate", "Perimeter", true),
        Camera::new("cam-2", "Loading Dock", "Warehouse", false),
    ])
}

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()
}

/// State with a manual clock, recording hooks and thresholds 3/2.
fn harness() -> (AppState, ManualClock, Recorder) {
    let clock = ManualClock::new();
    let recorder = Recorder::default();
    let mut config = AppConfig::default();
    config.curation.positive_threshold = 3;
    config.curation.negative_threshold = 2;
    let state = AppState::new(config, cameras())
        .with_clock(clock.clone())
        .with_hooks(recorder.clone());
    (state, clock, recorder)
}

/// Draw one stroke through `points` with the given tool on the draft canvas.
fn draw(state: &mut AppState, kind: PrimitiveKind, points: &[(f32, f32)]) {
    let canvas = state.draft_mut().unwrap().canvas_mut();
    canvas.set_tool(kind);
    let mut iter = points.iter();
    if let Some(&(x, y)) = iter.next() {
        canvas.begin(Coordinate::new(x, y));
    }
    for &(x, y) in iter {
        canvas.extend(Coordinate::new(x, y));
    }
    canvas.end();
}

/// Save a task with one polygon ROI on cam-1.
fn save_polygon_task(state: &mut AppState) -> TaskId {
    let directory = cameras();
    let draft = state.begin_draft_on(test_date());
    draft.select_camera(&directory, "cam-1").unwrap();
    draft.select_algorithm(default_presets()[0].clone()).unwrap();
    draw(
        state,
        PrimitiveKind::Polygon,
        &[(0.1, 0.1), (0.4, 0.1), (0.4, 0.4), (0.1, 0.4)],
    );
    state.save_draft().unwrap()
}

/// Advance past the provisioning delay and run due jobs.
fn provision(state: &mut AppState, clock: &ManualClock) {
    clock.advance(state.config().lifecycle.timings().provisioning);
    state.tick();
}
