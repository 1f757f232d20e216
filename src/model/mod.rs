//! Data models for the roistudio engine.

mod algorithm;
mod camera;
mod primitive;
mod sample;
mod task;

pub use algorithm::{Algorithm, AlgorithmKind, default_presets};
pub use camera::{Camera, CameraDirectory, CameraId, StaticCameraDirectory};
pub use primitive::{Coordinate, Primitive, PrimitiveId, PrimitiveKind, Shape};
pub use sample::{Sample, SampleId, SampleLabel};
pub use task::{AlarmLevel, SampleCounters, Task, TaskDraft, TaskId, TaskStatus};
