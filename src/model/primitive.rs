//! Annotation primitive types and data structures.

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_STROKE_POINTS, OVERLAY_SCALE};

/// Unique identifier for a committed primitive.
pub type PrimitiveId = u32;

/// A point in normalized canvas space, relative to the canvas's own bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f32,
    pub y: f32,
}

impl Coordinate {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a coordinate clamped into the unit square. NaN maps to 0.
    pub fn clamped(x: f32, y: f32) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }

    /// Calculate distance to another coordinate.
    pub fn distance_to(&self, other: &Coordinate) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Position in overlay units (0..100).
    pub fn to_percent(&self) -> (f32, f32) {
        (self.x * OVERLAY_SCALE, self.y * OVERLAY_SCALE)
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Drawing tools, one per primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Straight line between two points
    Segment,
    /// Freehand open path
    Curve,
    /// Freehand closed region
    #[default]
    Polygon,
    /// Directed line with a head at the end point
    Arrow,
}

impl PrimitiveKind {
    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Segment => "Line",
            PrimitiveKind::Curve => "Curve",
            PrimitiveKind::Polygon => "Region",
            PrimitiveKind::Arrow => "Arrow",
        }
    }

    /// Get all primitive kinds.
    pub fn all() -> &'static [PrimitiveKind] {
        &[
            PrimitiveKind::Segment,
            PrimitiveKind::Curve,
            PrimitiveKind::Polygon,
            PrimitiveKind::Arrow,
        ]
    }

    /// Segments and arrows only ever keep their first and latest point.
    pub fn is_two_point(&self) -> bool {
        matches!(self, PrimitiveKind::Segment | PrimitiveKind::Arrow)
    }
}

/// Geometry of a committed primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Segment { start: Coordinate, end: Coordinate },
    Curve { points: Vec<Coordinate> },
    Polygon { vertices: Vec<Coordinate> },
    Arrow { tail: Coordinate, head: Coordinate },
}

impl Shape {
    /// Build a shape from a recorded stroke.
    /// Returns None if the stroke has fewer than two points.
    pub fn from_stroke(kind: PrimitiveKind, points: &[Coordinate]) -> Option<Self> {
        if points.len() < MIN_STROKE_POINTS {
            return None;
        }
        let first = points[0];
        let last = points[points.len() - 1];
        Some(match kind {
            PrimitiveKind::Segment => Shape::Segment {
                start: first,
                end: last,
            },
            PrimitiveKind::Arrow => Shape::Arrow {
                tail: first,
                head: last,
            },
            PrimitiveKind::Curve => Shape::Curve {
                points: points.to_vec(),
            },
            PrimitiveKind::Polygon => Shape::Polygon {
                vertices: points.to_vec(),
            },
        })
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Shape::Segment { .. } => PrimitiveKind::Segment,
            Shape::Curve { .. } => PrimitiveKind::Curve,
            Shape::Polygon { .. } => PrimitiveKind::Polygon,
            Shape::Arrow { .. } => PrimitiveKind::Arrow,
        }
    }

    /// Ordered point list as recorded.
    pub fn points(&self) -> Vec<Coordinate> {
        match self {
            Shape::Segment { start, end } => vec![*start, *end],
            Shape::Arrow { tail, head } => vec![*tail, *head],
            Shape::Curve { points } => points.clone(),
            Shape::Polygon { vertices } => vertices.clone(),
        }
    }

    pub fn point_count(&self) -> usize {
        match self {
            Shape::Segment { .. } | Shape::Arrow { .. } => 2,
            Shape::Curve { points } => points.len(),
            Shape::Polygon { vertices } => vertices.len(),
        }
    }
}

/// One committed annotation object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub id: PrimitiveId,
    pub shape: Shape,
}

impl Primitive {
    pub fn new(id: PrimitiveId, shape: Shape) -> Self {
        Self { id, shape }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.shape.kind()
    }

    pub fn points(&self) -> Vec<Coordinate> {
        self.shape.points()
    }
}
