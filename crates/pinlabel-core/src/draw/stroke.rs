//! Strokes for label box outlines and the row lines behind them.
//!
//! ```
//! use pinlabel_core::draw::{StrokeCap, StrokeDefinition};
//! use pinlabel_core::color::Color;
//! use svg::node::element as svg_element;
//!
//! let mut row = StrokeDefinition::new(Color::new("#8C8C8C").unwrap(), 0.7);
//! row.set_cap(StrokeCap::Round);
//!
//! let line = svg_element::Line::new().set("x1", 0).set("x2", 40);
//! let line = pinlabel_core::apply_stroke!(line, &row);
//! ```

use crate::color::Color;

/// Line ending, the SVG `stroke-linecap`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCap {
    #[default]
    Butt,
    /// Extends past each end by half the width. Row lines use it so they
    /// tuck under the first and last box.
    Round,
}

impl StrokeCap {
    pub fn to_svg_value(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    cap: StrokeCap,
}

impl StrokeDefinition {
    /// A butt-capped stroke.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            cap: StrokeCap::default(),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn cap(&self) -> StrokeCap {
        self.cap
    }

    pub fn set_cap(&mut self, cap: StrokeCap) {
        self.cap = cap;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::new(Color::default(), 1.0)
    }
}

/// Sets `stroke`, `stroke-opacity`, `stroke-width` and `stroke-linecap` on
/// an SVG element.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width())
            .set("stroke-linecap", $stroke.cap().to_svg_value())
    }};
}
