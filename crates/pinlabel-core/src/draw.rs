//! Drawable components for pinout rendering
//!
//! All drawable components implement the [`Drawable`] trait, which provides a consistent
//! interface for rendering to layered SVG output and calculating size.
//!
//! # Layer-Based Rendering
//!
//! Drawables render to one or more [`RenderLayer`]s, which are ordered during final SVG
//! generation so that row lines sit behind label boxes and text sits on top.
mod label_box;
mod layer;
mod line;
mod stroke;
mod text;

pub use label_box::{LabelBox, LabelBoxDefinition};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use line::Line;
pub use stroke::{StrokeCap, StrokeDefinition};
pub use text::{Text, TextAnchor, TextDefinition};

use crate::geometry::{Point, Size};

/// Trait for pinout elements that can be rendered to SVG layers.
pub trait Drawable: std::fmt::Debug {
    /// Renders this drawable centered on `position`.
    ///
    /// Simple drawables emit to a single layer, composite ones spread their
    /// nodes across several layers for z-ordering.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Returns the size of this drawable.
    fn size(&self) -> Size;
}
