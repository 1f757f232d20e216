//! Overlay shapes for rendering on top of a camera frame.
//!
//! This module provides simple shape types that can be drawn as overlays.
//! These are decoupled from application-specific annotation types.

use crate::Color;

/// Width and height of the overlay coordinate space.
pub const OVERLAY_EXTENT: f32 = 100.0;

/// A shape that can be drawn as an overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayShape {
    /// An open or closed path through the given points.
    Polyline {
        /// Points in overlay units
        points: Vec<(f32, f32)>,
        /// Whether the last point connects back to the first
        closed: bool,
    },
    /// A line segment.
    Line {
        /// Start X in overlay units
        x1: f32,
        /// Start Y in overlay units
        y1: f32,
        /// End X in overlay units
        x2: f32,
        /// End Y in overlay units
        y2: f32,
    },
    /// A triangle, always drawn closed.
    Triangle {
        /// Vertices in overlay units
        vertices: [(f32, f32); 3],
    },
}

impl OverlayShape {
    /// Vertices as drawn, repeating the first point at the end when the shape is closed.
    pub fn outline(&self) -> Vec<(f32, f32)> {
        match self {
            OverlayShape::Polyline { points, closed } => {
                let mut out = points.clone();
                if *closed {
                    if let Some(first) = points.first() {
                        out.push(*first);
                    }
                }
                out
            }
            OverlayShape::Line { x1, y1, x2, y2 } => vec![(*x1, *y1), (*x2, *y2)],
            OverlayShape::Triangle { vertices } => {
                let mut out = vertices.to_vec();
                out.push(vertices[0]);
                out
            }
        }
    }

    /// Whether the shape encloses an area.
    pub fn is_closed(&self) -> bool {
        match self {
            OverlayShape::Polyline { closed, .. } => *closed,
            OverlayShape::Line { .. } => false,
            OverlayShape::Triangle { .. } => true,
        }
    }
}

/// An overlay item with shape and styling.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayItem {
    /// The shape to draw
    pub shape: OverlayShape,
    /// Stroke color
    pub color: Color,
    /// Fill color for closed shapes
    pub fill: Option<Color>,
    /// Stroke width in overlay units
    pub stroke_width: f32,
    /// Whether this item shows a stroke still being drawn
    pub preview: bool,
}

impl OverlayItem {
    /// Create a new overlay item with a default stroke width.
    pub fn new(shape: OverlayShape, color: Color) -> Self {
        Self {
            shape,
            color,
            fill: None,
            stroke_width: 0.5,
            preview: false,
        }
    }

    /// Fill the shape with the given color.
    pub fn filled(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Set the stroke width.
    pub fn stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    /// Mark this item as a preview of an in-progress stroke.
    pub fn preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }
}

/// A collection of overlay items to render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// Items to render, in paint order
    pub items: Vec<OverlayItem>,
    /// Preview items for the stroke in progress, painted last
    pub preview: Vec<OverlayItem>,
}

impl Overlay {
    /// Create a new empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item to the overlay.
    pub fn push(&mut self, item: OverlayItem) {
        self.items.push(item);
    }

    /// Add a preview item.
    pub fn push_preview(&mut self, item: OverlayItem) {
        self.preview.push(item.preview(true));
    }

    /// All items in paint order.
    pub fn iter(&self) -> impl Iterator<Item = &OverlayItem> {
        self.items.iter().chain(self.preview.iter())
    }

    /// Check if the overlay is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.preview.is_empty()
    }
}
