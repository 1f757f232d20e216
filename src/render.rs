//! Primitive renderer.
//!
//! Turns committed primitives (plus the stroke in progress) into a
//! [`roistudio_overlay::Overlay`] in overlay units. Freehand point lists are
//! thinned for display only; the recorded points are never modified.

use roistudio_overlay::{Color, Overlay, OverlayItem, OverlayShape};

use crate::annotation::{AnnotationCanvas, AnnotationSet, Stroke};
use crate::constants::{ARROW_HEAD_ANGLE_DEG, ARROW_HEAD_LENGTH, POLYGON_FILL_ALPHA};
use crate::model::{Coordinate, Primitive, Shape};

/// Colors used for each primitive family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub region: Color,
    pub line: Color,
    pub arrow: Color,
    pub preview: Color,
    pub stroke_width: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            region: Color::CYAN,
            line: Color::YELLOW,
            arrow: Color::RED,
            preview: Color::WHITE,
            stroke_width: 0.5,
        }
    }
}

/// Keep every second sample plus the final point.
pub fn simplify_for_display(points: &[Coordinate]) -> Vec<Coordinate> {
    let mut out: Vec<Coordinate> = points.iter().step_by(2).copied().collect();
    if points.len() % 2 == 0 {
        if let Some(last) = points.last() {
            out.push(*last);
        }
    }
    out
}

/// The two head points of an arrow from `tail` to `head`, in overlay units.
///
/// The shaft angle is taken in normalized space; each head point sits
/// [`ARROW_HEAD_LENGTH`] back from the tip at ±[`ARROW_HEAD_ANGLE_DEG`].
pub fn arrow_head(tail: Coordinate, head: Coordinate) -> [(f32, f32); 2] {
    let theta = (head.y - tail.y).atan2(head.x - tail.x);
    let spread = ARROW_HEAD_ANGLE_DEG.to_radians();
    let (hx, hy) = head.to_percent();
    let barb = |angle: f32| {
        (
            hx - ARROW_HEAD_LENGTH * angle.cos(),
            hy - ARROW_HEAD_LENGTH * angle.sin(),
        )
    };
    [barb(theta - spread), barb(theta + spread)]
}

fn percent_points(points: &[Coordinate]) -> Vec<(f32, f32)> {
    points.iter().map(Coordinate::to_percent).collect()
}

fn line(a: Coordinate, b: Coordinate) -> OverlayShape {
    let (x1, y1) = a.to_percent();
    let (x2, y2) = b.to_percent();
    OverlayShape::Line { x1, y1, x2, y2 }
}

/// Overlay items for one shape.
pub fn render_shape(shape: &Shape, style: &RenderStyle) -> Vec<OverlayItem> {
    match shape {
        Shape::Segment { start, end } => {
            vec![OverlayItem::new(line(*start, *end), style.line).stroke_width(style.stroke_width)]
        }
        Shape::Arrow { tail, head } => {
            let [left, right] = arrow_head(*tail, *head);
            let tip = OverlayShape::Triangle {
                vertices: [head.to_percent(), left, right],
            };
            vec![
                OverlayItem::new(line(*tail, *head), style.arrow).stroke_width(style.stroke_width),
                OverlayItem::new(tip, style.arrow)
                    .filled(style.arrow)
                    .stroke_width(style.stroke_width),
            ]
        }
        Shape::Curve { points } => {
            let shape = OverlayShape::Polyline {
                points: percent_points(&simplify_for_display(points)),
                closed: false,
            };
            vec![OverlayItem::new(shape, style.line).stroke_width(style.stroke_width)]
        }
        Shape::Polygon { vertices } => {
            let shape = OverlayShape::Polyline {
                points: percent_points(&simplify_for_display(vertices)),
                closed: true,
            };
            vec![
                OverlayItem::new(shape, style.region)
                    .filled(style.region.with_alpha(POLYGON_FILL_ALPHA))
                    .stroke_width(style.stroke_width),
            ]
        }
    }
}

/// Overlay items for a committed primitive.
pub fn render_primitive(primitive: &Primitive, style: &RenderStyle) -> Vec<OverlayItem> {
    render_shape(&primitive.shape, style)
}

/// Build the overlay for a committed set and an optional in-progress stroke.
pub fn render(set: &AnnotationSet, pending: Option<&Stroke>, style: &RenderStyle) -> Overlay {
    let mut overlay = Overlay::new();
    for primitive in set.iter() {
        for item in render_primitive(primitive, style) {
            overlay.push(item);
        }
    }
    if let Some(stroke) = pending {
        // A single-point stroke has nothing to draw yet
        if let Some(shape) = Shape::from_stroke(stroke.kind, &stroke.points) {
            let preview_style = RenderStyle {
                region: style.preview,
                line: style.preview,
                arrow: style.preview,
                ..*style
            };
            for item in render_shape(&shape, &preview_style) {
                overlay.push_preview(item);
            }
        }
    }
    overlay
}

/// Build the overlay for a drawing session with the default style.
pub fn render_canvas(canvas: &AnnotationCanvas) -> Overlay {
    render(canvas.annotations(), canvas.pending(), &RenderStyle::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrimitiveKind;

    fn c(x: f32, y: f32) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_simplify_keeps_every_second_and_last() {
        let pts: Vec<Coordinate> = (0..6).map(|i| c(i as f32 / 10.0, 0.0)).collect();
        let out = simplify_for_display(&pts);
        assert_eq!(out, vec![pts[0], pts[2], pts[4], pts[5]]);

        let odd: Vec<Coordinate> = (0..5).map(|i| c(i as f32 / 10.0, 0.0)).collect();
        assert_eq!(simplify_for_display(&odd), vec![odd[0], odd[2], odd[4]]);
    }

    #[test]
    fn test_simplify_small_inputs() {
        assert!(simplify_for_display(&[]).is_empty());
        assert_eq!(simplify_for_display(&[c(0.1, 0.1)]), vec![c(0.1, 0.1)]);
        let two = [c(0.1, 0.1), c(0.2, 0.2)];
        assert_eq!(simplify_for_display(&two), two.to_vec());
    }

    #[test]
    fn test_horizontal_arrow_head() {
        let [a, b] = arrow_head(c(0.2, 0.2), c(0.8, 0.2));
        for (x, y) in [a, b] {
            let dist = ((x - 80.0).powi(2) + (y - 20.0).powi(2)).sqrt();
            assert!(approx(dist, ARROW_HEAD_LENGTH));
            assert!(x < 80.0, "head points sit behind the tip");
            let angle = (20.0 - y).atan2(80.0 - x).to_degrees().abs();
            assert!(approx(angle, 30.0));
        }
        assert!((a.1 - 20.0) * (b.1 - 20.0) < 0.0);
    }

    #[test]
    fn test_sloped_arrow_heads_follow_shaft() {
        for (tail, head) in [
            (c(0.1, 0.1), c(0.7, 0.5)),
            (c(0.9, 0.8), c(0.3, 0.2)),
            (c(0.5, 0.1), c(0.5, 0.9)),
            (c(0.5, 0.9), c(0.5, 0.1)),
        ] {
            let (hx, hy) = head.to_percent();
            let (tx, ty) = tail.to_percent();
            let shaft = (hx - tx, hy - ty);
            let shaft_len = (shaft.0.powi(2) + shaft.1.powi(2)).sqrt();

            let mut sides = Vec::new();
            for (x, y) in arrow_head(tail, head) {
                let barb = (hx - x, hy - y);
                let dist = (barb.0.powi(2) + barb.1.powi(2)).sqrt();
                assert!(approx(dist, ARROW_HEAD_LENGTH));
                let cos = (barb.0 * shaft.0 + barb.1 * shaft.1) / (dist * shaft_len);
                let angle = cos.clamp(-1.0, 1.0).acos().to_degrees();
                assert!((angle - ARROW_HEAD_ANGLE_DEG).abs() < 1e-2, "angle {angle}");
                sides.push(shaft.0 * barb.1 - shaft.1 * barb.0);
            }
            // One barb on each side of the shaft
            assert!(sides[0] * sides[1] < 0.0);
        }
    }

    #[test]
    fn test_polygon_renders_closed_and_filled() {
        let mut set = AnnotationSet::new();
        set.commit(Shape::Polygon {
            vertices: vec![c(0.1, 0.1), c(0.4, 0.1), c(0.4, 0.4), c(0.1, 0.4)],
        });
        let overlay = render(&set, None, &RenderStyle::default());
        assert_eq!(overlay.items.len(), 1);
        let item = &overlay.items[0];
        assert!(item.shape.is_closed());
        assert!(item.fill.is_some_and(|f| f.is_translucent()));
        let outline = item.shape.outline();
        let first = outline[0];
        let last = outline[outline.len() - 1];
        assert!(approx(first.0, 10.0) && approx(first.1, 10.0));
        assert_eq!(first, last);
        assert!(item.shape.svg_path().ends_with('Z'));
    }

    #[test]
    fn test_curve_renders_open() {
        let shape = Shape::Curve {
            points: vec![c(0.1, 0.1), c(0.2, 0.3), c(0.5, 0.5)],
        };
        let items = render_shape(&shape, &RenderStyle::default());
        assert_eq!(items.len(), 1);
        assert!(!items[0].shape.is_closed());
        assert!(items[0].fill.is_none());
    }

    #[test]
    fn test_arrow_has_line_and_head() {
        let shape = Shape::Arrow {
            tail: c(0.2, 0.2),
            head: c(0.8, 0.2),
        };
        let items = render_shape(&shape, &RenderStyle::default());
        assert_eq!(items.len(), 2);
        assert!(matches!(items[0].shape, OverlayShape::Line { .. }));
        assert!(matches!(items[1].shape, OverlayShape::Triangle { .. }));
        assert!(items[1].fill.is_some());
    }

    #[test]
    fn test_segment_is_single_line() {
        let shape = Shape::Segment {
            start: c(0.0, 0.0),
            end: c(0.5, 0.5),
        };
        let items = render_shape(&shape, &RenderStyle::default());
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].shape,
            OverlayShape::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 50.0,
                y2: 50.0
            }
        );
    }

    #[test]
    fn test_pending_stroke_is_preview() {
        let mut canvas = AnnotationCanvas::new();
        canvas.set_tool(PrimitiveKind::Curve);
        canvas.begin(c(0.1, 0.1));
        assert!(render_canvas(&canvas).is_empty());

        canvas.extend(c(0.2, 0.2));
        let overlay = render_canvas(&canvas);
        assert!(overlay.items.is_empty());
        assert_eq!(overlay.preview.len(), 1);
        assert!(overlay.preview[0].preview);
    }

    #[test]
    fn test_display_thinning_leaves_record_intact() {
        let mut canvas = AnnotationCanvas::new();
        canvas.set_tool(PrimitiveKind::Curve);
        canvas.begin(c(0.0, 0.0));
        for i in 1..10 {
            canvas.extend(c(i as f32 / 10.0, 0.5));
        }
        canvas.end();
        let overlay = render_canvas(&canvas);
        let OverlayShape::Polyline { points, .. } = &overlay.items[0].shape else {
            panic!("expected polyline");
        };
        assert_eq!(points.len(), 6);
        assert_eq!(canvas.flattened_points().len(), 10);
    }
}
