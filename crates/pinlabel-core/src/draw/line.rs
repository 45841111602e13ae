//! Horizontal row lines drawn behind a pin's label boxes.

use svg::node::element as svg_element;

use crate::{
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition},
    geometry::{Point, Size},
};

/// A horizontal line of a given length, centered on its render position.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    stroke: &'a StrokeDefinition,
    length: f32,
}

impl<'a> Line<'a> {
    pub fn new(stroke: &'a StrokeDefinition, length: f32) -> Self {
        Self {
            stroke,
            length: length.abs(),
        }
    }

    /// Creates the line spanning `x1..x2`; returns it with its center.
    pub fn between(stroke: &'a StrokeDefinition, x1: f32, x2: f32, y: f32) -> (Self, Point) {
        (Self::new(stroke, x2 - x1), Point::new((x1 + x2) / 2.0, y))
    }

    pub fn length(&self) -> f32 {
        self.length
    }
}

impl Drawable for Line<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let half = self.length / 2.0;
        let line = svg_element::Line::new()
            .set("x1", position.x() - half)
            .set("y1", position.y())
            .set("x2", position.x() + half)
            .set("y2", position.y());
        let line = crate::apply_stroke!(line, self.stroke);

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Rows, Box::new(line));
        output
    }

    fn size(&self) -> Size {
        Size::new(self.length, self.stroke.width())
    }
}
