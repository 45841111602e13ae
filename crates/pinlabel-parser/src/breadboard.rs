//! Breadboard artwork (`svg.breadboard.*.svg`) parser.
//!
//! Extracts what the exporters need from the artwork: the canvas size,
//! the positions of the pads connectors point at, and the raw markup so
//! the overview can draw the board underneath the labels.

use log::{debug, trace};
use pinlabel_core::{
    board::Canvas,
    geometry::{Bounds, Length, LengthUnit, Point, Size, Transform},
    pin::{Pad, PadShape},
};
use roxmltree::Node;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    svg_attr, xml,
};

/// Containers whose children are never rendered in place.
const NON_RENDERED: &[&str] = &["defs", "clipPath", "mask", "pattern", "symbol"];

/// A pad element found in the artwork.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkPad {
    pad: Pad,
    span: Span,
}

impl ArtworkPad {
    pub fn pad(&self) -> &Pad {
        &self.pad
    }

    /// Span of the element's start tag in the artwork source.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// The parsed breadboard artwork.
#[derive(Debug, Clone)]
pub struct Artwork {
    canvas: Canvas,
    markup: String,
    namespaces: Vec<(String, String)>,
    pads: Vec<ArtworkPad>,
}

impl Artwork {
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Everything between the root `<svg>` start and end tags, verbatim.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Prefixed namespace declarations in scope on the root element,
    /// as `(prefix, uri)` pairs.
    pub fn namespaces(&self) -> &[(String, String)] {
        &self.namespaces
    }

    /// Pads in document order.
    pub fn pads(&self) -> &[ArtworkPad] {
        &self.pads
    }

    /// Looks up a pad by element id. The first element wins when ids repeat.
    pub fn pad(&self, svg_id: &str) -> Option<&ArtworkPad> {
        self.pads.iter().find(|p| p.pad.svg_id() == svg_id)
    }
}

/// Parses breadboard artwork.
///
/// # Errors
///
/// - `E001` if the text is not well-formed XML
/// - `E004` if the root is not `<svg>` or the canvas has no size
/// - `E005` for an unparseable `width`, `height`, `viewBox`, coordinate or
///   `transform`
///
/// # Examples
///
/// ```
/// let source = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1in" height="0.5in" viewBox="0 0 100 50">
///   <g transform="translate(10 5)"><circle id="connector0pin" cx="5" cy="5" r="2"/></g>
/// </svg>"#;
///
/// let artwork = pinlabel_parser::breadboard::parse_artwork(source).unwrap();
/// assert_eq!(artwork.canvas().px_size().width(), 96.0);
///
/// let center = artwork.pad("connector0pin").unwrap().pad().center().unwrap();
/// assert_eq!((center.x(), center.y()), (15.0, 10.0));
/// ```
pub fn parse_artwork(source: &str) -> Result<Artwork, ParseError> {
    let doc = xml::parse_document(source, "breadboard artwork")?;
    let root = doc.root_element();
    let root_span = xml::start_tag_span(source, root);

    if !root.has_tag_name("svg") {
        return Err(Diagnostic::error(format!(
            "breadboard artwork root is `<{}>`, expected `<svg>`",
            root.tag_name().name()
        ))
        .with_code(ErrorCode::E004)
        .with_label(root_span, "root element")
        .into());
    }

    let mut collector = DiagnosticCollector::new();

    let width = length_attribute(root, "width", root_span, &mut collector);
    let height = length_attribute(root, "height", root_span, &mut collector);
    let view_box = root
        .attribute("viewBox")
        .and_then(|text| match svg_attr::parse_view_box(text) {
            Ok(bounds) => Some(bounds),
            Err(message) => {
                collector.emit(invalid_value(message, root_span));
                None
            }
        });

    let mut pads = Vec::new();
    for node in root.descendants().filter(|n| is_pad_element(*n)) {
        match parse_pad(source, node) {
            Ok(pad) => pads.push(pad),
            Err(diagnostic) => collector.emit(diagnostic),
        }
    }

    collector.finish()?;

    let canvas = build_canvas(width, height, view_box).ok_or_else(|| {
        ParseError::from(
            Diagnostic::error("breadboard artwork has no size")
                .with_code(ErrorCode::E004)
                .with_label(root_span, "no usable `width`/`height` or `viewBox`")
                .with_help("add a `viewBox` or absolute `width` and `height` attributes"),
        )
    })?;

    let markup = match (root.first_child(), root.last_child()) {
        (Some(first), Some(last)) => source[first.range().start..last.range().end].to_string(),
        _ => String::new(),
    };

    let namespaces = root
        .namespaces()
        .filter_map(|ns| ns.name().map(|prefix| (prefix.to_string(), ns.uri().to_string())))
        .filter(|(prefix, _)| prefix != "xml")
        .collect();

    debug!(
        pads = pads.len(),
        view_box = canvas.view_box().to_view_box();
        "Breadboard artwork parsed"
    );
    Ok(Artwork {
        canvas,
        markup,
        namespaces,
        pads,
    })
}

/// A size attribute, with its original text.
struct SizeAttribute {
    text: String,
    length: Length,
}

fn length_attribute(
    root: Node<'_, '_>,
    name: &str,
    span: Span,
    collector: &mut DiagnosticCollector,
) -> Option<SizeAttribute> {
    let text = root.attribute(name)?.trim();
    if text.ends_with('%') {
        debug!(attribute = name, value = text; "Ignoring relative canvas size");
        return None;
    }
    match text.parse::<Length>() {
        Ok(length) => Some(SizeAttribute {
            text: text.to_string(),
            length,
        }),
        Err(err) => {
            collector.emit(invalid_value(format!("invalid `{name}`: {err}"), span));
            None
        }
    }
}

fn build_canvas(
    width: Option<SizeAttribute>,
    height: Option<SizeAttribute>,
    view_box: Option<Bounds>,
) -> Option<Canvas> {
    let px_width = width
        .as_ref()
        .map(|w| w.length.to_px())
        .or_else(|| view_box.map(Bounds::width))?;
    let px_height = height
        .as_ref()
        .map(|h| h.length.to_px())
        .or_else(|| view_box.map(Bounds::height))?;
    let px_size = Size::new(px_width, px_height);
    if px_size.is_empty() {
        return None;
    }

    let view_box =
        view_box.unwrap_or_else(|| Bounds::new_from_top_left(Point::default(), px_size));
    let attr_text = |attr: Option<SizeAttribute>, px: f32| {
        attr.map(|a| a.text)
            .unwrap_or_else(|| Length::new(px, LengthUnit::Px).to_string())
    };

    Some(Canvas::new(
        attr_text(width, px_width),
        attr_text(height, px_height),
        view_box,
        px_size,
    ))
}

fn is_pad_element(node: Node<'_, '_>) -> bool {
    node.is_element()
        && node.attribute("id").is_some()
        && PadShape::from_element(node.tag_name().name()).is_some()
        && !node
            .ancestors()
            .skip(1)
            .any(|a| NON_RENDERED.iter().any(|name| a.has_tag_name(*name)))
}

fn parse_pad(source: &str, node: Node<'_, '_>) -> Result<ArtworkPad, Diagnostic> {
    let span = xml::start_tag_span(source, node);
    let id = node.attribute("id").unwrap_or_default();
    let shape = PadShape::from_element(node.tag_name().name()).unwrap_or(PadShape::Rect);

    let coordinate = |name: &str| -> Result<Option<f32>, Diagnostic> {
        node.attribute(name)
            .map(|text| parse_coordinate(text).map_err(|msg| invalid_value(msg, span)))
            .transpose()
    };

    let local = match shape {
        PadShape::Circle | PadShape::Ellipse => Some(Point::new(
            coordinate("cx")?.unwrap_or(0.0),
            coordinate("cy")?.unwrap_or(0.0),
        )),
        PadShape::Rect => match (coordinate("width")?, coordinate("height")?) {
            (Some(w), Some(h)) => Some(Point::new(
                coordinate("x")?.unwrap_or(0.0) + w / 2.0,
                coordinate("y")?.unwrap_or(0.0) + h / 2.0,
            )),
            _ => None,
        },
    };

    let mut total = Transform::IDENTITY;
    for ancestor in node.ancestors() {
        if let Some(text) = ancestor.attribute("transform") {
            let transform = svg_attr::parse_transform(text).map_err(|msg| {
                invalid_value(msg, xml::start_tag_span(source, ancestor))
            })?;
            total = transform.then_inner(total);
        }
    }

    let center = local.map(|p| total.apply(p));
    trace!(id, shape = shape.to_string(), center:?; "Pad found");
    Ok(ArtworkPad {
        pad: Pad::new(id, shape, center),
        span,
    })
}

/// Coordinates are user units; an absolute unit is converted the way SVG
/// does, one user unit per CSS pixel.
fn parse_coordinate(text: &str) -> Result<f32, String> {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<f32>() {
        return Ok(value);
    }
    trimmed
        .parse::<Length>()
        .map(Length::to_px)
        .map_err(|err| format!("invalid coordinate `{trimmed}`: {err}"))
}

fn invalid_value(message: impl Into<String>, span: Span) -> Diagnostic {
    Diagnostic::error(message)
        .with_code(ErrorCode::E005)
        .with_label(span, "in this element")
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    const ARTWORK: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink"
     width="2in" height="1in" viewBox="0 0 144 72">
  <defs><circle id="template" cx="1" cy="1" r="1"/></defs>
  <g id="breadboard" transform="translate(10,0)">
    <rect id="board" x="0" y="0" width="124" height="72" fill="#1A1A1A"/>
    <circle id="connector0pin" cx="7.2" cy="3.6" r="2"/>
    <g transform="scale(2)">
      <ellipse id="connector1pin" cx="10" cy="30" rx="2" ry="1"/>
    </g>
    <path id="connector2pin" d="M0 0 L1 1"/>
  </g>
</svg>"##;

    #[test]
    fn test_canvas_from_attributes() {
        let artwork = parse_artwork(ARTWORK).unwrap();
        let canvas = artwork.canvas();
        assert_eq!(canvas.width_attr(), "2in");
        assert_eq!(canvas.height_attr(), "1in");
        assert_eq!(canvas.view_box().width(), 144.0);
        assert!(approx_eq!(f32, canvas.px_size().width(), 192.0, ulps = 2));
    }

    #[test]
    fn test_canvas_defaults_view_box() {
        let artwork = parse_artwork(r#"<svg width="40" height="20"/>"#).unwrap();
        let canvas = artwork.canvas();
        assert_eq!(canvas.view_box().width(), 40.0);
        assert_eq!(canvas.view_box().height(), 20.0);
        assert_eq!(canvas.px_per_unit(), (1.0, 1.0));
    }

    #[test]
    fn test_canvas_from_view_box_only() {
        let artwork = parse_artwork(r#"<svg viewBox="0 0 30 10"/>"#).unwrap();
        assert_eq!(artwork.canvas().width_attr(), "30px");
        assert_eq!(artwork.canvas().px_size().height(), 10.0);
    }

    #[test]
    fn test_pads_apply_transforms() {
        let artwork = parse_artwork(ARTWORK).unwrap();

        let circle = artwork.pad("connector0pin").unwrap().pad();
        assert_eq!(circle.shape(), PadShape::Circle);
        let center = circle.center().unwrap();
        assert!(approx_eq!(f32, center.x(), 17.2, epsilon = 1e-4));
        assert!(approx_eq!(f32, center.y(), 3.6, epsilon = 1e-4));

        let ellipse = artwork.pad("connector1pin").unwrap().pad();
        assert_eq!(ellipse.shape(), PadShape::Ellipse);
        let center = ellipse.center().unwrap();
        assert!(approx_eq!(f32, center.x(), 30.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, center.y(), 60.0, epsilon = 1e-4));

        let rect = artwork.pad("board").unwrap().pad();
        let center = rect.center().unwrap();
        assert!(approx_eq!(f32, center.x(), 72.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, center.y(), 36.0, epsilon = 1e-4));
    }

    #[test]
    fn test_pads_skip_defs_and_other_shapes() {
        let artwork = parse_artwork(ARTWORK).unwrap();
        assert!(artwork.pad("template").is_none());
        assert!(artwork.pad("connector2pin").is_none());
        assert_eq!(artwork.pads().len(), 3);
    }

    #[test]
    fn test_markup_and_namespaces() {
        let artwork = parse_artwork(ARTWORK).unwrap();
        assert!(artwork.markup().trim_start().starts_with("<defs>"));
        assert!(artwork.markup().trim_end().ends_with("</g>"));
        assert!(
            artwork
                .namespaces()
                .contains(&("xlink".to_string(), "http://www.w3.org/1999/xlink".to_string()))
        );
    }

    #[test]
    fn test_rect_without_size_has_no_center() {
        let artwork =
            parse_artwork(r#"<svg viewBox="0 0 10 10"><rect id="p" x="1" y="1"/></svg>"#).unwrap();
        assert_eq!(artwork.pad("p").unwrap().pad().center(), None);
    }

    #[test]
    fn test_coordinates_with_units() {
        let artwork = parse_artwork(
            r#"<svg viewBox="0 0 200 200"><circle id="a" cx="0.5in" cy="25.4mm"/><circle id="b" cx="3px" cy="1e1"/></svg>"#,
        )
        .unwrap();
        let center = artwork.pad("a").unwrap().pad().center().unwrap();
        assert!(approx_eq!(f32, center.x(), 48.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, center.y(), 96.0, epsilon = 1e-4));
        let center = artwork.pad("b").unwrap().pad().center().unwrap();
        assert_eq!((center.x(), center.y()), (3.0, 10.0));

        let err = parse_artwork(r#"<svg viewBox="0 0 10 10"><circle id="c" cx="50%" cy="1"/></svg>"#)
            .unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E005));
    }

    #[test]
    fn test_root_must_be_svg() {
        let err = parse_artwork("<module/>").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E004));
    }

    #[test]
    fn test_missing_size() {
        let err = parse_artwork("<svg><circle id=\"a\"/></svg>").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E004));
    }

    #[test]
    fn test_invalid_values_are_collected() {
        let source = r#"<svg width="3furlongs" height="1in" viewBox="0 0 10 10">
  <g transform="wobble(3)"><circle id="a" cx="1" cy="1"/></g>
  <circle id="b" cx="x" cy="1"/>
</svg>"#;
        let err = parse_artwork(source).unwrap_err();
        let codes: Vec<_> = err.diagnostics().iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec![Some(ErrorCode::E005); 3]);

        let transform_label = err.diagnostics()[1].labels()[0].span();
        assert!(source[transform_label.range()].starts_with("<g transform"));
    }
}
