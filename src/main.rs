//! Scripted demo session for the roistudio engine.

use std::thread;
use std::time::Duration;

use roistudio::AppConfig;
use roistudio::AppState;
use roistudio::app::TaskHooks;
use roistudio::message::{CanvasMessage, DraftMessage, Message, TaskMessage};
use roistudio::model::{
    Camera, PrimitiveKind, Sample, SampleLabel, StaticCameraDirectory, TaskDraft, TaskId,
    TaskStatus, default_presets,
};

/// Logs every host callback.
struct LoggingHooks;

impl TaskHooks for LoggingHooks {
    fn on_save(&mut self, draft: &TaskDraft) {
        log::info!(
            "📨 on_save: '{}' with {} ROI point(s)",
            draft.name,
            draft.roi.len()
        );
    }

    fn on_update_status(&mut self, task_id: TaskId, status: TaskStatus) {
        log::info!("📨 on_update_status: {} -> {}", task_id, status);
    }

    fn on_update_sample_count(&mut self, task_id: TaskId, observed_total: usize) {
        log::info!("📨 on_update_sample_count: {} = {}", task_id, observed_total);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> AppConfig {
    AppConfig::load_from_default_path().unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> AppConfig {
    AppConfig::default()
}

fn demo_config(mut config: AppConfig) -> AppConfig {
    // Keep the scripted session short
    config.lifecycle.provisioning_delay_ms = config.lifecycle.provisioning_delay_ms.min(500);
    config.lifecycle.training_delay_ms = config.lifecycle.training_delay_ms.min(500);
    config.curation.positive_threshold = 3;
    config.curation.negative_threshold = 2;
    config
}

fn wait_for(state: &mut AppState, target: TaskStatus, id: TaskId) {
    while state.task(id).is_some_and(|t| t.status() != target) && state.has_pending_jobs() {
        thread::sleep(Duration::from_millis(50));
        state.tick();
    }
}

fn run(config: AppConfig) -> Result<(), roistudio::AppError> {
    let config = demo_config(config);
    let cameras = StaticCameraDirectory::new(vec![
        Camera::new("cam-1", "North Gate", "Perimeter", true),
        Camera::new("cam-2", "Loading Dock", "Warehouse", false),
    ]);
    let mut state = AppState::new(config, cameras).with_hooks(LoggingHooks);

    state.update(Message::NewDraft)?;
    for msg in [
        DraftMessage::CameraToggled("cam-1".to_string()),
        DraftMessage::AlgorithmSelected(default_presets()[0].clone()),
        DraftMessage::AugmentationSubmitted("urgent person climbing the fence for 8 seconds".to_string()),
    ] {
        state.update(Message::Draft(msg))?;
    }

    let polygon = [(0.1, 0.1), (0.4, 0.1), (0.4, 0.4), (0.1, 0.4)];
    let arrow = [(0.2, 0.6), (0.8, 0.6)];
    for (kind, points) in [
        (PrimitiveKind::Polygon, &polygon[..]),
        (PrimitiveKind::Arrow, &arrow[..]),
    ] {
        state.update(Message::Canvas(CanvasMessage::ToolSelected(kind)))?;
        let mut points = points.iter();
        if let Some(&(x, y)) = points.next() {
            state.update(Message::Canvas(CanvasMessage::PointerDown(x, y)))?;
        }
        for &(x, y) in points {
            state.update(Message::Canvas(CanvasMessage::PointerMove(x, y)))?;
        }
        state.update(Message::Canvas(CanvasMessage::PointerUp))?;
    }

    if let Some(overlay) = state.draft_overlay() {
        log::info!("🖼️ ROI overlay:\n{}", overlay.to_svg());
    }

    let id = state.save_draft()?;
    wait_for(&mut state, TaskStatus::Running, id);

    state.load_samples(id, (0..8).map(|i| Sample::new(i, 0.5 + i as f32 / 20.0)))?;
    let labels = [
        SampleLabel::Positive,
        SampleLabel::Positive,
        SampleLabel::Ignored,
        SampleLabel::Positive,
        SampleLabel::Negative,
    ];
    for (sample, label) in labels.into_iter().enumerate() {
        state.update(Message::Task(TaskMessage::LabelSample {
            task: id,
            sample: sample as u64,
            label,
        }))?;
        log::info!("🎯 Training available: {}", state.can_start_training(id));
    }
    state.label_sample(id, 5, SampleLabel::Negative)?;
    log::info!("🎯 Training available: {}", state.can_start_training(id));

    state.start_training(id)?;
    wait_for(&mut state, TaskStatus::Running, id);

    state.stop_task(id)?;
    state.start_task(id)?;

    state.update(Message::Task(TaskMessage::DeleteRequested(id)))?;
    if let Some(token) = state.pending_delete(id) {
        state.update(Message::Task(TaskMessage::DeleteConfirmed(token)))?;
    }
    log::info!("✅ Demo session finished with {} task(s)", state.tasks().count());
    Ok(())
}

fn main() {
    let config = load_config();

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    if let Err(e) = run(config) {
        log::error!("Demo session failed: {}", e);
        std::process::exit(1);
    }
}
