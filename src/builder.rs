//! Task definition builder.
//!
//! Collects the wizard inputs (cameras, ROI, algorithm, rule text, alarm
//! settings) and validates them into a [`TaskDraft`]. The annotation canvas
//! belongs to the builder, so switching the selected cameras never touches
//! the drawn regions.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::annotation::AnnotationCanvas;
use crate::confirm::{ConfirmToken, Confirmations};
use crate::error::{AppError, ConfirmError, ValidationError};
use crate::model::{AlarmLevel, Algorithm, CameraDirectory, CameraId, TaskDraft};
use crate::rules::{ParsedRule, RuleParser, resolve_rule};

/// Values a fresh draft starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftDefaults {
    pub duration_secs: u32,
    pub alarm_level: AlarmLevel,
    pub positive_threshold: usize,
    pub negative_threshold: usize,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            duration_secs: crate::constants::DEFAULT_TASK_DURATION_SECS,
            alarm_level: AlarmLevel::default(),
            positive_threshold: crate::constants::DEFAULT_POSITIVE_THRESHOLD,
            negative_threshold: crate::constants::DEFAULT_NEGATIVE_THRESHOLD,
        }
    }
}

/// Free-text rule attached to the base preset.
#[derive(Debug, Clone, PartialEq)]
pub enum Augmentation {
    /// Accepted by the rule parser
    Accepted { text: String, rule: ParsedRule },
    /// Rejected; blocks saving until cleared or resubmitted
    Rejected { text: String, reason: String },
}

impl Augmentation {
    pub fn text(&self) -> &str {
        match self {
            Augmentation::Accepted { text, .. } | Augmentation::Rejected { text, .. } => text,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Augmentation::Accepted { .. })
    }
}

/// Name derived from the algorithm and a date.
pub fn auto_task_name(algorithm: &Algorithm, date: NaiveDate) -> String {
    format!("{} {}", algorithm.name, date.format("%Y-%m-%d"))
}

/// Today's local date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Wizard state for one task draft.
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    name: String,
    /// Set once the user types a non-empty name; stops auto-fill
    name_edited: bool,
    camera_ids: BTreeSet<CameraId>,
    canvas: AnnotationCanvas,
    algorithm: Option<Algorithm>,
    augmentation: Option<Augmentation>,
    duration_secs: u32,
    alarm_level: AlarmLevel,
    positive_threshold: usize,
    negative_threshold: usize,
    /// Canvas revision the full-frame confirmation was given against
    full_frame_confirmed_at: Option<u64>,
    full_frame_prompts: Confirmations<()>,
    date: NaiveDate,
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new(DraftDefaults::default(), today())
    }
}

impl TaskBuilder {
    /// Start a draft. `date` feeds the auto-filled name.
    pub fn new(defaults: DraftDefaults, date: NaiveDate) -> Self {
        Self {
            name: String::new(),
            name_edited: false,
            camera_ids: BTreeSet::new(),
            canvas: AnnotationCanvas::new(),
            algorithm: None,
            augmentation: None,
            duration_secs: defaults.duration_secs,
            alarm_level: defaults.alarm_level,
            positive_threshold: defaults.positive_threshold,
            negative_threshold: defaults.negative_threshold,
            full_frame_confirmed_at: None,
            full_frame_prompts: Confirmations::new(),
            date,
        }
    }

    // ========================================================================
    // Name
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    /// User edit of the name field. Clearing it re-enables auto-fill.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.name_edited = !self.name.trim().is_empty();
        if !self.name_edited {
            self.autofill_name();
        }
    }

    fn autofill_name(&mut self) {
        if self.name_edited {
            return;
        }
        if let Some(algorithm) = &self.algorithm {
            self.name = auto_task_name(algorithm, self.date);
            log::debug!("📝 Auto-filled task name: {}", self.name);
        }
    }

    // ========================================================================
    // Cameras
    // ========================================================================

    pub fn camera_ids(&self) -> &BTreeSet<CameraId> {
        &self.camera_ids
    }

    /// Add a camera known to the directory. Returns false if already selected.
    pub fn select_camera(
        &mut self,
        directory: &dyn CameraDirectory,
        id: &str,
    ) -> Result<bool, ValidationError> {
        let camera = directory
            .get(id)
            .ok_or_else(|| ValidationError::UnknownCamera { id: id.to_string() })?;
        if !camera.online {
            log::warn!("Camera '{}' ({}) is offline", camera.name, camera.id);
        }
        Ok(self.camera_ids.insert(camera.id))
    }

    /// Remove a camera. Returns false if it was not selected.
    pub fn deselect_camera(&mut self, id: &str) -> bool {
        self.camera_ids.remove(id)
    }

    /// Flip a camera's selection. Returns whether it is now selected.
    pub fn toggle_camera(
        &mut self,
        directory: &dyn CameraDirectory,
        id: &str,
    ) -> Result<bool, ValidationError> {
        if self.deselect_camera(id) {
            Ok(false)
        } else {
            self.select_camera(directory, id).map(|_| true)
        }
    }

    // ========================================================================
    // Region of interest
    // ========================================================================

    pub fn canvas(&self) -> &AnnotationCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut AnnotationCanvas {
        &mut self.canvas
    }

    /// Ask for confirmation that an empty ROI means full frame. While a
    /// prompt is open, asking again returns the same token.
    pub fn propose_full_frame(&mut self) -> ConfirmToken {
        self.full_frame_prompts.propose_or_reuse(())
    }

    /// Token of the open full-frame prompt, if any.
    pub fn pending_full_frame(&self) -> Option<ConfirmToken> {
        self.full_frame_prompts.find(|_| true)
    }

    pub fn confirm_full_frame(&mut self, token: ConfirmToken) -> Result<(), ConfirmError> {
        self.full_frame_prompts.confirm(token)?;
        self.full_frame_confirmed_at = Some(self.canvas.revision());
        log::debug!("🖼️ Full-frame detection confirmed");
        Ok(())
    }

    /// Close the open prompt without confirming.
    pub fn decline_full_frame(&mut self) -> bool {
        let open = !self.full_frame_prompts.is_empty();
        self.full_frame_prompts.cancel_where(|_| true);
        open
    }

    /// True while the canvas is unchanged since the confirmation. Any later
    /// commit, undo, redo or clear asks for a fresh prompt.
    pub fn is_full_frame_confirmed(&self) -> bool {
        self.full_frame_confirmed_at == Some(self.canvas.revision())
    }

    // ========================================================================
    // Algorithm and rule text
    // ========================================================================

    pub fn algorithm(&self) -> Option<&Algorithm> {
        self.algorithm.as_ref()
    }

    /// Choose the base preset. A different preset drops the attached rule.
    pub fn select_algorithm(&mut self, algorithm: Algorithm) -> Result<(), ValidationError> {
        if !algorithm.is_preset() {
            return Err(ValidationError::NotPreset {
                name: algorithm.name,
            });
        }
        let changed = self.algorithm.as_ref().is_none_or(|a| a.id != algorithm.id);
        if changed && self.augmentation.take().is_some() {
            log::debug!("📝 Base preset changed, dropping rule description");
        }
        log::debug!("🧩 Selected algorithm: {}", algorithm.name);
        self.algorithm = Some(algorithm);
        self.autofill_name();
        Ok(())
    }

    pub fn augmentation(&self) -> Option<&Augmentation> {
        self.augmentation.as_ref()
    }

    /// Submit free-text rule text to the parser.
    ///
    /// On success the suggested duration and alarm level replace the current
    /// values. On failure the text is kept as rejected and saving is blocked.
    pub fn submit_augmentation(
        &mut self,
        parser: &dyn RuleParser,
        text: &str,
    ) -> Result<ParsedRule, AppError> {
        if self.algorithm.is_none() {
            return Err(ValidationError::AugmentationWithoutPreset.into());
        }
        match resolve_rule(parser, text) {
            Ok(rule) => {
                if rule.suggested_duration > 0 {
                    self.duration_secs = rule.suggested_duration;
                }
                self.alarm_level = rule.suggested_level;
                self.augmentation = Some(Augmentation::Accepted {
                    text: text.to_string(),
                    rule: rule.clone(),
                });
                Ok(rule)
            }
            Err(failure) => {
                self.augmentation = Some(Augmentation::Rejected {
                    text: text.to_string(),
                    reason: failure.reason.clone(),
                });
                Err(failure.into())
            }
        }
    }

    pub fn clear_augmentation(&mut self) {
        self.augmentation = None;
    }

    // ========================================================================
    // Alarm settings and thresholds
    // ========================================================================

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn set_duration_secs(&mut self, secs: u32) {
        self.duration_secs = secs;
    }

    pub fn alarm_level(&self) -> AlarmLevel {
        self.alarm_level
    }

    pub fn set_alarm_level(&mut self, level: AlarmLevel) {
        self.alarm_level = level;
    }

    pub fn thresholds(&self) -> (usize, usize) {
        (self.positive_threshold, self.negative_threshold)
    }

    pub fn set_thresholds(&mut self, positive: usize, negative: usize) {
        self.positive_threshold = positive;
        self.negative_threshold = negative;
    }

    // ========================================================================
    // Validation
    // ========================================================================

    fn effective_name(&self) -> String {
        let trimmed = self.name.trim();
        match (&self.algorithm, trimmed.is_empty()) {
            (Some(algorithm), true) => auto_task_name(algorithm, self.date),
            _ => trimmed.to_string(),
        }
    }

    /// First problem blocking save, if any.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.camera_ids.is_empty() {
            return Err(ValidationError::NoCameras);
        }
        if self.algorithm.is_none() {
            return Err(ValidationError::NoAlgorithm);
        }
        if let Some(Augmentation::Rejected { reason, .. }) = &self.augmentation {
            return Err(ValidationError::InvalidAugmentation {
                reason: reason.clone(),
            });
        }
        if self.effective_name().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.duration_secs == 0 {
            return Err(ValidationError::ZeroDuration);
        }
        if self.canvas.is_empty() && !self.is_full_frame_confirmed() {
            return Err(ValidationError::FullFrameUnconfirmed);
        }
        Ok(())
    }

    /// Produce the validated draft. The builder is left untouched.
    pub fn build(&self) -> Result<TaskDraft, ValidationError> {
        self.validate()?;
        let algorithm = self.algorithm.clone().ok_or(ValidationError::NoAlgorithm)?;
        Ok(TaskDraft {
            name: self.effective_name(),
            camera_ids: self.camera_ids.clone(),
            roi: self.canvas.flattened_points(),
            algorithm,
            augmentation: self.augmentation.as_ref().map(|a| a.text().to_string()),
            duration_secs: self.duration_secs,
            alarm_level: self.alarm_level,
            positive_threshold: self.positive_threshold,
            negative_threshold: self.negative_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Camera, Coordinate, PrimitiveKind, StaticCameraDirectory, default_presets};
    use crate::rules::SimulatedRuleParser;

    fn directory() -> StaticCameraDirectory {
        StaticCameraDirectory::new(vec![
            Camera::new("cam-1", "Gate", "North", true),
            Camera::new("cam-2", "Dock", "East", false),
        ])
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn builder() -> TaskBuilder {
        TaskBuilder::new(DraftDefaults::default(), date())
    }

    fn draw_square(builder: &mut TaskBuilder) {
        let canvas = builder.canvas_mut();
        canvas.set_tool(PrimitiveKind::Polygon);
        canvas.begin(Coordinate::new(0.1, 0.1));
        canvas.extend(Coordinate::new(0.4, 0.1));
        canvas.extend(Coordinate::new(0.4, 0.4));
        canvas.extend(Coordinate::new(0.1, 0.4));
        canvas.end();
    }

    fn ready() -> TaskBuilder {
        let mut b = builder();
        b.select_camera(&directory(), "cam-1").unwrap();
        b.select_algorithm(default_presets()[0].clone()).unwrap();
        draw_square(&mut b);
        b
    }

    #[test]
    fn test_requires_camera_then_algorithm() {
        let mut b = builder();
        assert_eq!(b.build(), Err(ValidationError::NoCameras));
        b.select_camera(&directory(), "cam-1").unwrap();
        assert_eq!(b.build(), Err(ValidationError::NoAlgorithm));
    }

    #[test]
    fn test_unknown_camera_rejected() {
        let mut b = builder();
        assert_eq!(
            b.select_camera(&directory(), "cam-9"),
            Err(ValidationError::UnknownCamera {
                id: "cam-9".to_string()
            })
        );
        assert!(b.camera_ids().is_empty());
    }

    #[test]
    fn test_offline_camera_selectable_and_toggle() {
        let mut b = builder();
        assert_eq!(b.toggle_camera(&directory(), "cam-2"), Ok(true));
        assert_eq!(b.select_camera(&directory(), "cam-2"), Ok(false));
        assert_eq!(b.toggle_camera(&directory(), "cam-2"), Ok(false));
        assert!(b.camera_ids().is_empty());
    }

    #[test]
    fn test_roi_survives_camera_changes() {
        let mut b = ready();
        b.toggle_camera(&directory(), "cam-2").unwrap();
        b.deselect_camera("cam-1");
        assert_eq!(b.canvas().flattened_points().len(), 4);
    }

    #[test]
    fn test_generated_algorithm_not_a_base() {
        let mut b = builder();
        let err = b
            .select_algorithm(Algorithm::generated("g-1", "Custom"))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotPreset {
                name: "Custom".to_string()
            }
        );
        assert!(b.algorithm().is_none());
    }

    #[test]
    fn test_name_autofill_until_edited() {
        let mut b = builder();
        let presets = default_presets();
        b.select_algorithm(presets[0].clone()).unwrap();
        assert_eq!(b.name(), "Area Intrusion 2024-03-09");

        b.select_algorithm(presets[1].clone()).unwrap();
        assert_eq!(b.name(), "Loitering 2024-03-09");

        b.set_name("North gate");
        b.select_algorithm(presets[0].clone()).unwrap();
        assert_eq!(b.name(), "North gate");

        b.set_name("");
        assert_eq!(b.name(), "Area Intrusion 2024-03-09");
    }

    #[test]
    fn test_blank_name_derived_at_build() {
        let mut b = ready();
        b.set_name("   ");
        assert_eq!(b.build().unwrap().name, "Area Intrusion 2024-03-09");
    }

    #[test]
    fn test_full_frame_requires_confirmation() {
        let mut b = builder();
        b.select_camera(&directory(), "cam-1").unwrap();
        b.select_algorithm(default_presets()[0].clone()).unwrap();
        assert_eq!(b.build(), Err(ValidationError::FullFrameUnconfirmed));

        let token = b.propose_full_frame();
        assert!(!b.is_full_frame_confirmed());
        b.confirm_full_frame(token).unwrap();
        assert!(b.confirm_full_frame(token).is_err());

        let draft = b.build().unwrap();
        assert!(draft.roi.is_empty());
    }

    #[test]
    fn test_polygon_roi_in_draft() {
        let b = ready();
        let draft = b.build().unwrap();
        assert_eq!(
            draft.roi,
            vec![
                Coordinate::new(0.1, 0.1),
                Coordinate::new(0.4, 0.1),
                Coordinate::new(0.4, 0.4),
                Coordinate::new(0.1, 0.4),
            ]
        );
        assert_eq!(draft.positive_threshold, crate::constants::DEFAULT_POSITIVE_THRESHOLD);
        assert!(draft.augmentation.is_none());
    }

    #[test]
    fn test_augmentation_requires_preset() {
        let mut b = builder();
        let err = b
            .submit_augmentation(&SimulatedRuleParser::default(), "person at gate")
            .unwrap_err();
        assert_eq!(err, AppError::Validation(ValidationError::AugmentationWithoutPreset));
    }

    #[test]
    fn test_augmentation_applies_suggestions() {
        let mut b = ready();
        let text = "urgent person climbing fence for 12 seconds";
        let rule = b
            .submit_augmentation(&SimulatedRuleParser::default(), text)
            .unwrap();
        assert_eq!(rule.object_name, "person");
        assert_eq!(b.duration_secs(), 12);
        assert_eq!(b.alarm_level(), AlarmLevel::High);
        assert_eq!(b.build().unwrap().augmentation.as_deref(), Some(text));
    }

    #[test]
    fn test_rejected_augmentation_blocks_save() {
        let mut b = ready();
        let before = b.duration_secs();
        let err = b
            .submit_augmentation(&SimulatedRuleParser::default(), "something odd")
            .unwrap_err();
        assert!(matches!(err, AppError::Collaborator(_)));
        assert_eq!(b.duration_secs(), before);
        assert!(matches!(
            b.build(),
            Err(ValidationError::InvalidAugmentation { .. })
        ));

        b.clear_augmentation();
        assert!(b.build().is_ok());
    }

    #[test]
    fn test_changing_preset_drops_augmentation() {
        let mut b = ready();
        b.submit_augmentation(&SimulatedRuleParser::default(), "car parked")
            .unwrap();
        b.select_algorithm(default_presets()[0].clone()).unwrap();
        assert!(b.augmentation().is_some());
        b.select_algorithm(default_presets()[2].clone()).unwrap();
        assert!(b.augmentation().is_none());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut b = ready();
        b.set_duration_secs(0);
        assert_eq!(b.build(), Err(ValidationError::ZeroDuration));
    }

    #[test]
    fn test_full_frame_confirmation_lapses_after_drawing() {
        let mut b = builder();
        b.select_camera(&directory(), "cam-1").unwrap();
        b.select_algorithm(default_presets()[0].clone()).unwrap();
        let token = b.propose_full_frame();
        b.confirm_full_frame(token).unwrap();
        assert!(b.build().is_ok());

        draw_square(&mut b);
        b.canvas_mut().clear();
        assert!(b.canvas().is_empty());
        assert!(!b.is_full_frame_confirmed());
        assert_eq!(b.build(), Err(ValidationError::FullFrameUnconfirmed));

        let token = b.propose_full_frame();
        b.confirm_full_frame(token).unwrap();
        assert!(b.build().unwrap().roi.is_empty());
    }

    #[test]
    fn test_full_frame_prompt_is_reachable_and_reused() {
        let mut b = builder();
        assert_eq!(b.pending_full_frame(), None);
        let token = b.propose_full_frame();
        assert_eq!(b.propose_full_frame(), token);
        assert_eq!(b.pending_full_frame(), Some(token));

        assert!(b.decline_full_frame());
        assert_eq!(b.pending_full_frame(), None);
        assert!(b.confirm_full_frame(token).is_err());
        assert!(!b.decline_full_frame());
    }
}
