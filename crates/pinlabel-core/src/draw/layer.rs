//! Layer-based rendering system for SVG output.
//!
//! Drawables tag each SVG node with the [`RenderLayer`] it belongs to and
//! [`LayeredOutput`] emits the nodes grouped by layer, bottom to top.
//!
//! # Example
//!
//! ```
//! # use pinlabel_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::{Line, Rectangle};
//!
//! let mut output = LayeredOutput::new();
//!
//! // Boxes are added before the row line but render above it
//! output.add_to_layer(RenderLayer::Boxes, Box::new(Rectangle::new()));
//! output.add_to_layer(RenderLayer::Rows, Box::new(Line::new()));
//!
//! let svg_nodes = output.render();
//! assert_eq!(svg_nodes.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// The embedded breadboard artwork
    Artwork,
    /// Gray lines running behind each label row
    Rows,
    /// Filled label boxes
    Boxes,
    /// Label and legend text
    Text,
}

impl RenderLayer {
    /// Returns the value of the `data-layer` attribute for this layer.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Artwork => "artwork",
            Self::Rows => "rows",
            Self::Boxes => "boxes",
            Self::Text => "text",
        }
    }
}

/// SVG nodes grouped by rendering layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    ///
    /// Nodes keep their insertion order within a layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Appends all nodes of another output.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of nodes on one layer.
    pub fn len_of(&self, layer: RenderLayer) -> usize {
        self.items.iter().filter(|(l, _)| *l == layer).count()
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes a `<g data-layer="...">` element. Empty
    /// layers are skipped.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable: keeps insertion order inside a layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);

                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::element::{Line, Rectangle};

    #[test]
    fn test_layered_output_new() {
        let output = LayeredOutput::new();
        assert!(output.is_empty());
    }

    #[test]
    fn test_layered_output_merge() {
        let mut output1 = LayeredOutput::new();
        output1.add_to_layer(RenderLayer::Boxes, Box::new(Rectangle::new()));

        let mut output2 = LayeredOutput::new();
        output2.add_to_layer(RenderLayer::Rows, Box::new(Line::new()));

        output1.merge(output2);
        assert_eq!(output1.len_of(RenderLayer::Boxes), 1);
        assert_eq!(output1.len_of(RenderLayer::Rows), 1);

        let nodes = output1.render();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_layered_output_render_orders_layers() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Text, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Boxes, Box::new(Rectangle::new()));
        output.add_to_layer(RenderLayer::Rows, Box::new(Line::new()));

        let rendered: Vec<String> = output.render().iter().map(|n| n.to_string()).collect();

        assert_eq!(rendered.len(), 3);
        assert!(rendered[0].contains("data-layer=\"rows\""));
        assert!(rendered[1].contains("data-layer=\"boxes\""));
        assert!(rendered[2].contains("data-layer=\"text\""));
    }

    #[test]
    fn test_layered_output_merge_same_layer() {
        let mut output1 = LayeredOutput::new();
        output1.add_to_layer(RenderLayer::Boxes, Box::new(Rectangle::new()));

        let mut output2 = LayeredOutput::new();
        output2.add_to_layer(RenderLayer::Boxes, Box::new(Rectangle::new()));

        output1.merge(output2);

        let nodes = output1.render();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_layered_output_empty_renders_nothing() {
        assert!(LayeredOutput::new().render().is_empty());
    }
}
