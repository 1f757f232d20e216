//! SVG emission for overlays.

use std::fmt::Write;

use crate::{Overlay, OverlayItem, OverlayShape, OVERLAY_EXTENT};

/// Format a coordinate with at most three decimals and no trailing zeros.
pub fn format_coord(v: f32) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

impl OverlayShape {
    /// SVG path data (`M x y L x y ... [Z]`).
    pub fn svg_path(&self) -> String {
        let points = match self {
            OverlayShape::Polyline { points, .. } => points.clone(),
            OverlayShape::Line { x1, y1, x2, y2 } => vec![(*x1, *y1), (*x2, *y2)],
            OverlayShape::Triangle { vertices } => vertices.to_vec(),
        };

        let mut d = String::new();
        for (i, (x, y)) in points.iter().enumerate() {
            if i > 0 {
                d.push(' ');
            }
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{} {} {}", cmd, format_coord(*x), format_coord(*y));
        }
        if self.is_closed() && !points.is_empty() {
            d.push_str(" Z");
        }
        d
    }
}

fn svg_element(item: &OverlayItem) -> String {
    let fill = match (item.fill, item.shape.is_closed()) {
        (Some(fill), true) => format!(
            "fill=\"{}\" fill-opacity=\"{}\"",
            fill.to_css_rgb(),
            format_coord(fill.a)
        ),
        _ => "fill=\"none\"".to_string(),
    };
    let dash = if item.preview {
        " stroke-dasharray=\"1 1\""
    } else {
        ""
    };
    format!(
        "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" {}{}/>",
        item.shape.svg_path(),
        item.color.to_css_rgb(),
        format_coord(item.stroke_width),
        fill,
        dash
    )
}

impl Overlay {
    /// Render the overlay as a standalone SVG document scaled to the overlay extent.
    pub fn to_svg(&self) -> String {
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {e} {e}\" preserveAspectRatio=\"none\">",
            e = format_coord(OVERLAY_EXTENT)
        );
        for item in self.iter() {
            out.push_str(&svg_element(item));
        }
        out.push_str("</svg>");
        log::trace!("Rendered overlay with {} items to SVG", self.items.len());
        out
    }
}
