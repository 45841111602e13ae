//! Pin identities and the merged per-pin record.
//!
//! A board pin is known under several identities: the connector in the part
//! file ([`PhysicalPin`]), the pad drawn on the breadboard artwork ([`Pad`]),
//! firmware names ([`LogicalName`]) and the chip functions listed in the
//! pinout table ([`PinFunction`]). [`PinRecord`] joins them into the single
//! value the exporters draw.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Point};

/// A connector declared in the part file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicalPin {
    connector_id: String,
    name: String,
}

impl PhysicalPin {
    pub fn new(connector_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            connector_id: connector_id.into(),
            name: name.into(),
        }
    }

    /// The part-unique connector id, e.g. `connector12`.
    pub fn connector_id(&self) -> &str {
        &self.connector_id
    }

    /// The connector name after alias cleanup, e.g. `SCL`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PhysicalPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.connector_id)
    }
}

/// Where a logical name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameSource {
    #[serde(alias = "cp")]
    CircuitPython,
    Arduino,
}

impl fmt::Display for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CircuitPython => write!(f, "circuitpython"),
            Self::Arduino => write!(f, "arduino"),
        }
    }
}

/// A firmware-facing name bound to a pin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalName {
    name: String,
    source: NameSource,
}

impl LogicalName {
    pub fn new(name: impl Into<String>, source: NameSource) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> NameSource {
        self.source
    }
}

/// Shape of the SVG element a pad is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadShape {
    Circle,
    Ellipse,
    Rect,
}

impl PadShape {
    /// Maps an SVG element name to a pad shape.
    pub fn from_element(tag: &str) -> Option<Self> {
        match tag {
            "circle" => Some(Self::Circle),
            "ellipse" => Some(Self::Ellipse),
            "rect" => Some(Self::Rect),
            _ => None,
        }
    }
}

impl fmt::Display for PadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Circle => write!(f, "circle"),
            Self::Ellipse => write!(f, "ellipse"),
            Self::Rect => write!(f, "rect"),
        }
    }
}

/// A pad element found in the breadboard artwork.
///
/// `center` is `None` when the element carries no usable geometry
/// (missing or unparsable `cx`/`cy`/`x`/`y`).
#[derive(Debug, Clone, PartialEq)]
pub struct Pad {
    svg_id: String,
    shape: PadShape,
    center: Option<Point>,
}

impl Pad {
    pub fn new(svg_id: impl Into<String>, shape: PadShape, center: Option<Point>) -> Self {
        Self {
            svg_id: svg_id.into(),
            shape,
            center,
        }
    }

    pub fn svg_id(&self) -> &str {
        &self.svg_id
    }

    pub fn shape(&self) -> PadShape {
        self.shape
    }

    pub fn center(&self) -> Option<Point> {
        self.center
    }
}

/// One non-key cell of a pinout table row, e.g. column `SPI`, value `SCK`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PinFunction {
    column: String,
    value: String,
}

impl PinFunction {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true for an empty cell in a sparse table.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// The board edge a pin sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
    Unknown,
}

impl Side {
    /// Distance from a canvas edge within which a pad counts as on that edge.
    pub const EDGE_MARGIN: f32 = 10.0;

    /// Classifies a pad position against the artwork's view box.
    ///
    /// Top and bottom win over left and right for corner pads.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pinlabel_core::geometry::{Bounds, Point, Size};
    /// # use pinlabel_core::pin::Side;
    /// let view_box = Bounds::new_from_top_left(Point::default(), Size::new(100.0, 50.0));
    /// assert_eq!(Side::classify(Point::new(30.0, 4.0), view_box), Side::Top);
    /// assert_eq!(Side::classify(Point::new(95.0, 25.0), view_box), Side::Right);
    /// assert_eq!(Side::classify(Point::new(50.0, 25.0), view_box), Side::Unknown);
    /// ```
    pub fn classify(position: Point, view_box: Bounds) -> Self {
        let margin = Self::EDGE_MARGIN;
        if position.y() < view_box.min_y() + margin {
            Self::Top
        } else if position.y() > view_box.max_y() - margin {
            Self::Bottom
        } else if position.x() > view_box.max_x() - margin {
            Self::Right
        } else if position.x() < view_box.min_x() + margin {
            Self::Left
        } else {
            Self::Unknown
        }
    }

    /// Returns true when label rows for this side grow towards negative x.
    pub fn extends_left(self) -> bool {
        matches!(self, Self::Bottom | Self::Left)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Everything known about one physical pin after merging all sources.
///
/// Records are built by the resolver and never change once the board
/// document holding them is assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct PinRecord {
    physical: PhysicalPin,
    position: Point,
    pad_shape: PadShape,
    side: Side,
    port: String,
    logical_names: Vec<LogicalName>,
    functions: Vec<PinFunction>,
    label: String,
    display_label: Option<String>,
}

impl PinRecord {
    /// Creates a record whose label defaults to the connector name.
    pub fn new(
        physical: PhysicalPin,
        position: Point,
        pad_shape: PadShape,
        port: impl Into<String>,
    ) -> Self {
        let label = physical.name().to_string();
        Self {
            physical,
            position,
            pad_shape,
            side: Side::Unknown,
            port: port.into(),
            logical_names: Vec::new(),
            functions: Vec::new(),
            label,
            display_label: None,
        }
    }

    /// Creates a record for a chip pin no connector leads to, such as an
    /// on-board LED. It has no connector id and no position.
    pub fn internal(name: impl Into<String>, port: impl Into<String>) -> Self {
        Self::new(
            PhysicalPin::new("", name),
            Point::default(),
            PadShape::Circle,
            port,
        )
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_logical_names(mut self, names: Vec<LogicalName>) -> Self {
        self.logical_names = names;
        self
    }

    pub fn with_functions(mut self, functions: Vec<PinFunction>) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the rewritten label. A display label equal to the base label is
    /// not stored.
    pub fn with_display_label(mut self, display_label: impl Into<String>) -> Self {
        let display_label = display_label.into();
        self.display_label = (display_label != self.label).then_some(display_label);
        self
    }

    /// Returns true for a record built by [`PinRecord::internal`].
    pub fn is_internal(&self) -> bool {
        self.physical.connector_id().is_empty()
    }

    pub fn physical(&self) -> &PhysicalPin {
        &self.physical
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn pad_shape(&self) -> PadShape {
        self.pad_shape
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// The chip pin name used to join the connector with its pinout row.
    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn logical_names(&self) -> &[LogicalName] {
        &self.logical_names
    }

    /// Logical names from one source, in resolution order.
    pub fn names_from(&self, source: NameSource) -> impl Iterator<Item = &str> {
        self.logical_names
            .iter()
            .filter(move |n| n.source() == source)
            .map(LogicalName::name)
    }

    pub fn functions(&self) -> &[PinFunction] {
        &self.functions
    }

    /// The label chosen by precedence, before any rename rule.
    pub fn base_label(&self) -> &str {
        &self.label
    }

    pub fn display_label(&self) -> Option<&str> {
        self.display_label.as_deref()
    }

    /// The text drawn for this pin.
    pub fn label(&self) -> &str {
        self.display_label.as_deref().unwrap_or(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::geometry::Size;

    fn record() -> PinRecord {
        PinRecord::new(
            PhysicalPin::new("connector3", "IO3"),
            Point::new(10.0, 20.0),
            PadShape::Circle,
            "IO3",
        )
    }

    #[test]
    fn test_record_label_defaults_to_connector_name() {
        let r = record();
        assert_eq!(r.label(), "IO3");
        assert_eq!(r.display_label(), None);
        assert_eq!(r.physical().connector_id(), "connector3");
    }

    #[test]
    fn test_internal_record() {
        let r = PinRecord::internal("NEOPIXEL", "GPIO33");
        assert!(r.is_internal());
        assert!(!record().is_internal());
        assert_eq!(r.label(), "NEOPIXEL");
        assert_eq!(r.port(), "GPIO33");
        assert_eq!(r.side(), Side::Unknown);
    }

    #[test]
    fn test_record_display_label_overrides() {
        let r = record().with_label("D3").with_display_label("GPIO3");
        assert_eq!(r.base_label(), "D3");
        assert_eq!(r.label(), "GPIO3");
    }

    #[test]
    fn test_record_display_label_same_as_label_not_stored() {
        let r = record().with_display_label("IO3");
        assert_eq!(r.display_label(), None);
    }

    #[test]
    fn test_names_from_filters_by_source() {
        let r = record().with_logical_names(vec![
            LogicalName::new("D3", NameSource::CircuitPython),
            LogicalName::new("3", NameSource::Arduino),
            LogicalName::new("TX", NameSource::CircuitPython),
        ]);
        let cp: Vec<_> = r.names_from(NameSource::CircuitPython).collect();
        assert_eq!(cp, ["D3", "TX"]);
        let arduino: Vec<_> = r.names_from(NameSource::Arduino).collect();
        assert_eq!(arduino, ["3"]);
    }

    #[test]
    fn test_pad_shape_from_element() {
        assert_eq!(PadShape::from_element("circle"), Some(PadShape::Circle));
        assert_eq!(PadShape::from_element("ellipse"), Some(PadShape::Ellipse));
        assert_eq!(PadShape::from_element("rect"), Some(PadShape::Rect));
        assert_eq!(PadShape::from_element("path"), None);
    }

    #[test]
    fn test_side_classify_edges() {
        let view_box = Bounds::new_from_top_left(Point::default(), Size::new(100.0, 50.0));
        assert_eq!(Side::classify(Point::new(50.0, 45.0), view_box), Side::Bottom);
        assert_eq!(Side::classify(Point::new(3.0, 25.0), view_box), Side::Left);
        // Corners resolve to top/bottom
        assert_eq!(Side::classify(Point::new(2.0, 2.0), view_box), Side::Top);
        assert_eq!(Side::classify(Point::new(98.0, 48.0), view_box), Side::Bottom);
    }

    #[test]
    fn test_side_classify_offset_view_box() {
        let view_box = Bounds::new_from_top_left(Point::new(-50.0, -50.0), Size::new(100.0, 100.0));
        assert_eq!(Side::classify(Point::new(0.0, -45.0), view_box), Side::Top);
        assert_eq!(Side::classify(Point::new(0.0, 0.0), view_box), Side::Unknown);
    }

    #[test]
    fn test_name_source_serde_names() {
        assert_eq!(NameSource::CircuitPython.to_string(), "circuitpython");
        assert_eq!(NameSource::Arduino.to_string(), "arduino");
    }

    proptest! {
        #[test]
        fn interior_points_are_unknown(x in 10.5f32..89.5, y in 10.5f32..39.5) {
            let view_box = Bounds::new_from_top_left(Point::default(), Size::new(100.0, 50.0));
            prop_assert_eq!(Side::classify(Point::new(x, y), view_box), Side::Unknown);
        }

        #[test]
        fn top_band_is_always_top(x in -20.0f32..120.0, y in 0.0f32..9.9) {
            let view_box = Bounds::new_from_top_left(Point::default(), Size::new(100.0, 50.0));
            prop_assert_eq!(Side::classify(Point::new(x, y), view_box), Side::Top);
        }
    }
}
