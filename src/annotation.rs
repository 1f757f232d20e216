//! Annotation canvas engine.
//!
//! Turns pointer gestures into normalized geometric primitives:
//! - [`CanvasRect`] maps pixel positions into the unit square
//! - [`DrawingState`] holds the single pending stroke
//! - [`AnnotationSet`] holds committed primitives with LIFO undo and redo
//! - [`AnnotationCanvas`] ties them together for one drawing session

use std::collections::VecDeque;

use crate::constants::{MAX_REDO_HISTORY, MIN_STROKE_POINTS};
use crate::model::{Coordinate, Primitive, PrimitiveId, PrimitiveKind, Shape};

// ============================================================================
// Canvas Bounds
// ============================================================================

/// Screen-space rectangle occupied by the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rect whose pixel space already is the unit square.
    pub fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Convert a pixel position into a clamped normalized coordinate.
    /// A degenerate rect maps every position to the origin.
    pub fn normalize(&self, px: f32, py: f32) -> Coordinate {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Coordinate::new(0.0, 0.0);
        }
        Coordinate::clamped((px - self.left) / self.width, (py - self.top) / self.height)
    }
}

impl Default for CanvasRect {
    fn default() -> Self {
        Self::unit()
    }
}

// ============================================================================
// Pending Stroke
// ============================================================================

/// A stroke still being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Kind captured when the stroke began
    pub kind: PrimitiveKind,
    /// Recorded points; two at most for segments and arrows
    pub points: Vec<Coordinate>,
}

/// State for the current drawing operation.
#[derive(Debug, Clone, Default)]
pub struct DrawingState {
    /// The active tool.
    pub tool: PrimitiveKind,
    pending: Option<Stroke>,
}

impl DrawingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new stroke, replacing any stroke still pending.
    pub fn begin(&mut self, point: Coordinate) {
        let point = Coordinate::clamped(point.x, point.y);
        if self.pending.is_some() {
            log::debug!("✏️ New stroke replaces unfinished one");
        }
        self.pending = Some(Stroke {
            kind: self.tool,
            points: vec![point],
        });
    }

    /// Record a movement. Returns false if no stroke is pending.
    pub fn extend(&mut self, point: Coordinate) -> bool {
        let Some(stroke) = self.pending.as_mut() else {
            return false;
        };
        let point = Coordinate::clamped(point.x, point.y);
        if stroke.kind.is_two_point() {
            if stroke.points.len() < 2 {
                stroke.points.push(point);
            } else {
                stroke.points[1] = point;
            }
        } else {
            stroke.points.push(point);
        }
        true
    }

    /// Take the pending stroke, leaving nothing pending.
    pub fn take(&mut self) -> Option<Stroke> {
        self.pending.take()
    }

    /// Drop the pending stroke.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&Stroke> {
        self.pending.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.pending.is_some()
    }
}

// ============================================================================
// Committed Primitives
// ============================================================================

/// Ordered committed primitives plus the redo history.
#[derive(Debug, Clone)]
pub struct AnnotationSet {
    primitives: Vec<Primitive>,
    /// Undone primitives, most recent at the back
    redo_stack: VecDeque<Primitive>,
    next_id: PrimitiveId,
    /// Bumped on every change to the committed set
    revision: u64,
}

impl Default for AnnotationSet {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self {
            primitives: Vec::new(),
            redo_stack: VecDeque::new(),
            next_id: 1,
            revision: 0,
        }
    }

    /// Commit a shape under a fresh ID. Drops the redo history.
    pub fn commit(&mut self, shape: Shape) -> Primitive {
        let primitive = Primitive::new(self.next_id, shape);
        self.next_id += 1;
        self.redo_stack.clear();
        self.primitives.push(primitive.clone());
        self.revision += 1;
        primitive
    }

    /// Remove the most recently committed primitive.
    pub fn undo_last(&mut self) -> Option<Primitive> {
        let primitive = self.primitives.pop()?;
        log::debug!("⏪ Undo: removed {} {}", primitive.kind().name(), primitive.id);
        self.redo_stack.push_back(primitive.clone());
        if self.redo_stack.len() > MAX_REDO_HISTORY {
            self.redo_stack.pop_front();
        }
        self.revision += 1;
        Some(primitive)
    }

    /// Re-commit the most recently undone primitive with its original ID.
    pub fn redo_last(&mut self) -> Option<Primitive> {
        let primitive = self.redo_stack.pop_back()?;
        log::debug!("⏩ Redo: restored {} {}", primitive.kind().name(), primitive.id);
        self.primitives.push(primitive.clone());
        self.revision += 1;
        Some(primitive)
    }

    /// Discard every primitive and the redo history.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.redo_stack.clear();
        self.revision += 1;
    }

    pub fn can_undo(&self) -> bool {
        !self.primitives.is_empty()
    }

    /// Change counter; differs whenever commit, undo, redo or clear ran in between.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.iter().find(|p| p.id == id)
    }

    /// Committed primitives in commit order.
    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Every primitive's points, concatenated in commit order.
    pub fn flattened_points(&self) -> Vec<Coordinate> {
        self.primitives.iter().flat_map(|p| p.points()).collect()
    }
}

// ============================================================================
// Drawing Session
// ============================================================================

/// One drawing session: the committed set plus the single pending stroke.
///
/// The session outlives camera-selection changes in the wizard; only
/// [`AnnotationCanvas::undo_last`] and [`AnnotationCanvas::clear`] remove
/// committed primitives.
#[derive(Debug, Clone, Default)]
pub struct AnnotationCanvas {
    set: AnnotationSet,
    drawing: DrawingState,
    rect: CanvasRect,
}

impl AnnotationCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a canvas occupying the given screen rectangle.
    pub fn with_rect(rect: CanvasRect) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    /// Update the screen rectangle, e.g. after a resize.
    pub fn set_rect(&mut self, rect: CanvasRect) {
        self.rect = rect;
    }

    pub fn rect(&self) -> CanvasRect {
        self.rect
    }

    pub fn tool(&self) -> PrimitiveKind {
        self.drawing.tool
    }

    /// Switch tools. Any pending stroke is cancelled.
    pub fn set_tool(&mut self, tool: PrimitiveKind) {
        self.drawing.tool = tool;
        self.drawing.cancel();
        log::debug!("🖌️ Drawing tool: {}", tool.name());
    }

    /// Start a stroke at a normalized point (clamped into the unit square).
    pub fn begin(&mut self, point: Coordinate) {
        self.drawing.begin(point);
        if let Some(start) = self.drawing.pending().and_then(|s| s.points.first()) {
            log::debug!(
                "✏️ Started {} at ({:.3}, {:.3})",
                self.drawing.tool.name(),
                start.x,
                start.y
            );
        }
    }

    /// Record a movement of the pending stroke. Ignored when nothing is pending.
    pub fn extend(&mut self, point: Coordinate) {
        self.drawing.extend(point);
    }

    /// Finish the pending stroke.
    ///
    /// Strokes with fewer than two points are dropped silently; otherwise the
    /// stroke is committed and returned.
    pub fn end(&mut self) -> Option<Primitive> {
        let stroke = self.drawing.take()?;
        let Some(shape) = Shape::from_stroke(stroke.kind, &stroke.points) else {
            log::debug!(
                "📝 Discarded {} stroke with {} point(s), need {}",
                stroke.kind.name(),
                stroke.points.len(),
                MIN_STROKE_POINTS
            );
            return None;
        };
        let primitive = self.set.commit(shape);
        log::info!(
            "✅ Committed {} {} ({} points)",
            primitive.kind().name(),
            primitive.id,
            primitive.shape.point_count()
        );
        Some(primitive)
    }

    /// Remove the most recently committed primitive. No-op on an empty set.
    pub fn undo_last(&mut self) -> Option<Primitive> {
        self.set.undo_last()
    }

    /// Restore the most recently undone primitive.
    pub fn redo_last(&mut self) -> Option<Primitive> {
        self.set.redo_last()
    }

    /// Discard every committed primitive and any pending stroke.
    pub fn clear(&mut self) {
        let count = self.set.len();
        self.set.clear();
        self.drawing.cancel();
        log::info!("🗑️ Cleared {} primitives", count);
    }

    /// Pointer pressed at a pixel position.
    pub fn pointer_down(&mut self, px: f32, py: f32) {
        let point = self.rect.normalize(px, py);
        self.begin(point);
    }

    /// Pointer moved to a pixel position.
    pub fn pointer_move(&mut self, px: f32, py: f32) {
        if self.drawing.is_drawing() {
            let point = self.rect.normalize(px, py);
            self.extend(point);
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) -> Option<Primitive> {
        self.end()
    }

    /// Pointer left the canvas. Completes the stroke exactly like a release.
    pub fn pointer_leave(&mut self) -> Option<Primitive> {
        self.end()
    }

    /// Committed primitives.
    pub fn annotations(&self) -> &AnnotationSet {
        &self.set
    }

    /// Stroke still being drawn, if any.
    pub fn pending(&self) -> Option<&Stroke> {
        self.drawing.pending()
    }

    /// Snapshot of every committed point, in commit order.
    pub fn flattened_points(&self) -> Vec<Coordinate> {
        self.set.flattened_points()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// See [`AnnotationSet::revision`].
    pub fn revision(&self) -> u64 {
        self.set.revision()
    }
}

// ============================================================================
// Tests
// ============================================================================
