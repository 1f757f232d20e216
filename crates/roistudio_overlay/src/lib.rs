//! roistudio_overlay - vector overlay vocabulary for annotation rendering
//!
//! Shapes here are expressed in overlay units (0..100 on both axes) and know
//! nothing about the annotation types that produced them. Hosts either walk the
//! [`Overlay`] items directly or emit SVG through [`Overlay::to_svg`].

mod color;
mod overlay;
mod svg;

pub use color::Color;
pub use overlay::{Overlay, OverlayItem, OverlayShape, OVERLAY_EXTENT};
pub use svg::format_coord;
