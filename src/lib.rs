//! roistudio - ROI drawing and detection task engine
//!
//! Draws regions of interest on a camera frame, turns them into validated
//! detection tasks, and drives each task through provisioning, curation and
//! training.

pub mod annotation;
pub mod app;
pub mod builder;
pub mod config;
pub mod confirm;
pub mod constants;
pub mod curation;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod message;
pub mod model;
pub mod render;
pub mod rules;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use annotation::{AnnotationCanvas, AnnotationSet, CanvasRect};
pub use app::{AppState, NoHooks, TaskHooks};
pub use builder::TaskBuilder;
pub use config::AppConfig;
pub use error::AppError;
pub use roistudio_overlay::Overlay;
