//! Detection algorithm catalog entries.

use serde::{Deserialize, Serialize};

/// Where an algorithm identity comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    /// Fixed, catalog-selected model
    Preset,
    /// Produced from a free-text rule
    Generated,
}

/// A detection algorithm identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Algorithm {
    pub id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    pub kind: AlgorithmKind,
}

impl Algorithm {
    /// Create a preset algorithm.
    pub fn preset(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            version: version.into(),
            kind: AlgorithmKind::Preset,
        }
    }

    /// Create a generated algorithm.
    pub fn generated(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            version: "0.1".to_string(),
            kind: AlgorithmKind::Generated,
        }
    }

    pub fn is_preset(&self) -> bool {
        self.kind == AlgorithmKind::Preset
    }
}

/// Built-in preset catalog.
pub fn default_presets() -> Vec<Algorithm> {
    vec![
        Algorithm::preset(
            "intrusion",
            "Area Intrusion",
            "Person or vehicle entering a restricted region",
            "2.1",
        ),
        Algorithm::preset(
            "loitering",
            "Loitering",
            "Person staying inside a region longer than the alarm duration",
            "1.4",
        ),
        Algorithm::preset(
            "line-crossing",
            "Line Crossing",
            "Object crossing a drawn line in the arrow direction",
            "1.8",
        ),
        Algorithm::preset(
            "fire-smoke",
            "Fire & Smoke",
            "Open flame or smoke plume in frame",
            "3.0",
        ),
        Algorithm::preset(
            "ppe-helmet",
            "Helmet Compliance",
            "Worker without a safety helmet",
            "2.3",
        ),
    ]
}
