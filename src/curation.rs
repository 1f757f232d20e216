//! Sample curation store.
//!
//! Holds the pre-scored samples of one task and answers the dual-threshold
//! training gate. Counts are recomputed from the labels on every call.

use serde::Serialize;

use crate::model::{Sample, SampleCounters, SampleId, SampleLabel};

/// Label tallies over the visible samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LabelCounts {
    pub unlabeled: usize,
    pub positive: usize,
    pub negative: usize,
}

/// Progress of one counter toward its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdProgress {
    pub count: usize,
    pub required: usize,
}

impl ThresholdProgress {
    pub fn is_met(&self) -> bool {
        self.count >= self.required
    }

    /// Fraction of the threshold reached, clamped to 1. A zero threshold is always complete.
    pub fn ratio(&self) -> f32 {
        if self.required == 0 {
            1.0
        } else {
            (self.count as f32 / self.required as f32).min(1.0)
        }
    }
}

/// Progress of both counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurationProgress {
    pub positive: ThresholdProgress,
    pub negative: ThresholdProgress,
}

impl CurationProgress {
    pub fn is_met(&self) -> bool {
        self.positive.is_met() && self.negative.is_met()
    }
}

/// View filter for the curation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleFilter {
    #[default]
    All,
    Unlabeled,
    Positive,
    Negative,
}

impl SampleFilter {
    fn accepts(&self, label: SampleLabel) -> bool {
        match self {
            SampleFilter::All => label != SampleLabel::Ignored,
            SampleFilter::Unlabeled => label == SampleLabel::Unlabeled,
            SampleFilter::Positive => label == SampleLabel::Positive,
            SampleFilter::Negative => label == SampleLabel::Negative,
        }
    }
}

/// Ordered samples for one task.
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    samples: Vec<Sample>,
}

impl SampleStore {
    pub fn new(samples: Vec<Sample>) -> Self {
        let mut store = Self::default();
        store.extend(samples);
        store
    }

    /// Append samples, keeping arrival order. A sample whose ID is already
    /// held is skipped so its label survives redelivery. Returns how many
    /// samples were added.
    pub fn extend(&mut self, samples: impl IntoIterator<Item = Sample>) -> usize {
        let before = self.samples.len();
        for sample in samples {
            if self.get(sample.id).is_some() {
                log::warn!("Duplicate sample {} skipped", sample.id);
                continue;
            }
            self.samples.push(sample);
        }
        self.samples.len() - before
    }

    /// Reassign a sample's label. Returns false if the ID is unknown.
    pub fn label(&mut self, id: SampleId, label: SampleLabel) -> bool {
        match self.samples.iter_mut().find(|s| s.id == id) {
            Some(sample) => {
                if sample.label != label {
                    log::debug!(
                        "🏷️ Sample {}: {} -> {}",
                        id,
                        sample.label.name(),
                        label.name()
                    );
                }
                sample.label = label;
                true
            }
            None => {
                log::warn!("Label request for unknown sample {}", id);
                false
            }
        }
    }

    /// Tally the current labels. Ignored samples are excluded.
    pub fn counts(&self) -> LabelCounts {
        self.samples
            .iter()
            .fold(LabelCounts::default(), |mut counts, sample| {
                match sample.label {
                    SampleLabel::Unlabeled => counts.unlabeled += 1,
                    SampleLabel::Positive => counts.positive += 1,
                    SampleLabel::Negative => counts.negative += 1,
                    SampleLabel::Ignored => {}
                }
                counts
            })
    }

    /// Progress of each counter against the task's thresholds.
    pub fn progress(&self, counters: &SampleCounters) -> CurationProgress {
        let counts = self.counts();
        CurationProgress {
            positive: ThresholdProgress {
                count: counts.positive,
                required: counters.positive_threshold,
            },
            negative: ThresholdProgress {
                count: counts.negative,
                required: counters.negative_threshold,
            },
        }
    }

    /// Both thresholds met at once.
    pub fn can_train(&self, counters: &SampleCounters) -> bool {
        self.progress(counters).is_met()
    }

    /// Non-ignored samples in original order.
    pub fn visible(&self) -> impl Iterator<Item = &Sample> {
        self.filtered(SampleFilter::All)
    }

    /// Samples accepted by the filter, in original order.
    pub fn filtered(&self, filter: SampleFilter) -> impl Iterator<Item = &Sample> {
        self.samples.iter().filter(move |s| filter.accepts(s.label))
    }

    pub fn get(&self, id: SampleId) -> Option<&Sample> {
        self.samples.iter().find(|s| s.id == id)
    }

    /// Samples hidden by an ignore label.
    pub fn ignored_count(&self) -> usize {
        self.samples
            .iter()
            .filter(|s| s.label == SampleLabel::Ignored)
            .count()
    }

    /// Every sample, including ignored ones.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
