//! Read-only camera directory.

use serde::{Deserialize, Serialize};

/// Camera identifier as issued by the directory.
pub type CameraId = String;

/// A camera entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    pub id: CameraId,
    pub name: String,
    pub location: String,
    pub online: bool,
}

impl Camera {
    pub fn new(
        id: impl Into<CameraId>,
        name: impl Into<String>,
        location: impl Into<String>,
        online: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            online,
        }
    }
}

/// Source of camera entries.
pub trait CameraDirectory {
    /// All cameras, in directory order.
    fn cameras(&self) -> Vec<Camera>;

    /// Look up a camera by ID.
    fn get(&self, id: &str) -> Option<Camera> {
        self.cameras().into_iter().find(|c| c.id == id)
    }
}

/// In-memory camera directory.
#[derive(Debug, Clone, Default)]
pub struct StaticCameraDirectory {
    cameras: Vec<Camera>,
}

impl StaticCameraDirectory {
    pub fn new(cameras: Vec<Camera>) -> Self {
        Self { cameras }
    }
}

impl CameraDirectory for StaticCameraDirectory {
    fn cameras(&self) -> Vec<Camera> {
        self.cameras.clone()
    }

    fn get(&self, id: &str) -> Option<Camera> {
        self.cameras.iter().find(|c| c.id == id).cloned()
    }
}
