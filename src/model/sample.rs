//! Pre-scored samples awaiting curation.

use serde::{Deserialize, Serialize};

/// Unique identifier for a sample.
pub type SampleId = u64;

/// Curation label for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleLabel {
    #[default]
    Unlabeled,
    Positive,
    Negative,
    /// Hidden from curation views and counters, but never deleted
    Ignored,
}

impl SampleLabel {
    pub fn name(&self) -> &'static str {
        match self {
            SampleLabel::Unlabeled => "Unlabeled",
            SampleLabel::Positive => "Positive",
            SampleLabel::Negative => "Negative",
            SampleLabel::Ignored => "Ignored",
        }
    }
}

/// A detection sample with its model confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: SampleId,
    /// Model confidence in [0, 1]
    pub confidence: f32,
    pub label: SampleLabel,
}

impl Sample {
    /// Create an unlabeled sample. Confidence is clamped into [0, 1].
    pub fn new(id: SampleId, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            id,
            confidence,
            label: SampleLabel::Unlabeled,
        }
    }

    pub fn with_label(mut self, label: SampleLabel) -> Self {
        self.label = label;
        self
    }
}
