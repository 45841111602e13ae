//! Themed, rounded label boxes.

use svg::node::element as svg_element;

use crate::{
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::{Insets, Point, Size},
    theme::LabelTheme,
};

/// Shared geometry and font settings of every label box in a drawing.
#[derive(Debug, Clone)]
pub struct LabelBoxDefinition {
    inset: f32,
    stroke_width: f32,
    corner_radius: f32,
    text: TextDefinition,
}

impl LabelBoxDefinition {
    pub fn new(text: TextDefinition) -> Self {
        Self {
            text,
            ..Self::default()
        }
    }

    /// Gap kept between a box and its cell on every side.
    pub fn set_inset(&mut self, inset: f32) {
        self.inset = inset;
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width;
    }

    pub fn set_corner_radius(&mut self, radius: f32) {
        self.corner_radius = radius;
    }

    pub fn inset(&self) -> f32 {
        self.inset
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn corner_radius(&self) -> f32 {
        self.corner_radius
    }

    pub fn text(&self) -> &TextDefinition {
        &self.text
    }
}

impl Default for LabelBoxDefinition {
    fn default() -> Self {
        // 0.2mm inset, 0.125mm stroke, 0.4mm radius at 72 units per inch
        let mm = 72.0 / 25.4;
        Self {
            inset: 0.2 * mm,
            stroke_width: 0.125 * mm,
            corner_radius: 0.4 * mm,
            text: TextDefinition::default(),
        }
    }
}

/// One cell of a label row: a filled rounded rectangle and optional text.
#[derive(Debug, Clone)]
pub struct LabelBox<'a> {
    definition: &'a LabelBoxDefinition,
    theme: LabelTheme,
    text: Option<&'a str>,
    size: Size,
}

impl<'a> LabelBox<'a> {
    /// Creates a box filling a cell of `size`.
    pub fn new(
        definition: &'a LabelBoxDefinition,
        theme: LabelTheme,
        text: Option<&'a str>,
        size: Size,
    ) -> Self {
        Self {
            definition,
            theme,
            text,
            size,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text
    }

    fn text_definition(&self) -> TextDefinition {
        let mut def = self.definition.text().clone();
        def.set_color(Some(self.theme.text_color()));
        def.set_font_weight(Some(self.theme.font_weight()));
        def
    }
}

impl Drawable for LabelBox<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let mut inset = self.definition.inset();
        if self.theme.outline().is_some() {
            // Keep the outer edge of the stroke aligned with unstroked boxes
            inset += self.definition.stroke_width() * 0.5;
        }
        let cell = position.to_bounds(self.size);
        let shrunk = cell.add_padding(Insets::uniform(-inset));
        let min = shrunk.min_point();

        let radius = self.definition.corner_radius();
        let mut rect = svg_element::Rectangle::new()
            .set("x", min.x())
            .set("y", min.y())
            .set("width", shrunk.width().max(0.0))
            .set("height", shrunk.height().max(0.0))
            .set("rx", radius)
            .set("ry", radius)
            .set("fill", &self.theme.fill());
        if let Some(outline) = self.theme.outline() {
            let stroke = StrokeDefinition::new(outline, self.definition.stroke_width());
            rect = crate::apply_stroke!(rect, &stroke);
        }
        output.add_to_layer(RenderLayer::Boxes, Box::new(rect));

        if let Some(content) = self.text {
            let def = self.text_definition();
            output.merge(Text::new(&def, content).render_to_layers(position));
        }

        output
    }

    fn size(&self) -> Size {
        self.size
    }
}
