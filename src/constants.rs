//! Global constants for the roistudio engine

/// Scale from normalized canvas coordinates to overlay units.
pub const OVERLAY_SCALE: f32 = 100.0;

/// Arrow head length in overlay units.
pub const ARROW_HEAD_LENGTH: f32 = 2.0;

/// Half-angle between the arrow shaft and each head edge, in degrees.
pub const ARROW_HEAD_ANGLE_DEG: f32 = 30.0;

/// Minimum number of recorded points for a stroke to become a primitive.
pub const MIN_STROKE_POINTS: usize = 2;

/// Maximum number of undone primitives kept for redo.
pub const MAX_REDO_HISTORY: usize = 50;

/// Fill alpha for polygon regions.
pub const POLYGON_FILL_ALPHA: f32 = 0.25;

/// Default delay before a freshly saved task starts running.
pub const DEFAULT_PROVISIONING_DELAY_MS: u64 = 2_000;

/// Default delay before a training run reports completion.
pub const DEFAULT_TRAINING_DELAY_MS: u64 = 3_000;

/// Default minimum number of positive samples before training.
pub const DEFAULT_POSITIVE_THRESHOLD: usize = 10;

/// Default minimum number of negative samples before training.
pub const DEFAULT_NEGATIVE_THRESHOLD: usize = 10;

/// Default alarm duration for a new task, in seconds.
pub const DEFAULT_TASK_DURATION_SECS: u32 = 5;

/// Reason reported when the rule-parsing collaborator gives no reason of its own.
pub const GENERIC_RULE_FAILURE: &str = "Rule parsing service unavailable, please try again";
