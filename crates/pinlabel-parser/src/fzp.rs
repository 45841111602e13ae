//! Fritzing part file (`.fzp`) parser.
//!
//! A part file declares the board's connectors and links each one to an
//! element id in the breadboard artwork:
//!
//! ```xml
//! <module>
//!   <title>Adafruit Feather</title>
//!   <views>
//!     <breadboardView><layers image="breadboard/feather.svg"/></breadboardView>
//!   </views>
//!   <connectors>
//!     <connector id="connector0" name="GND" type="male">
//!       <description>Ground</description>
//!       <views>
//!         <breadboardView><p layer="breadboard" svgId="connector0pin"/></breadboardView>
//!       </views>
//!     </connector>
//!   </connectors>
//! </module>
//! ```

use std::collections::HashMap;

use log::{debug, trace};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    xml,
};

/// A connector declared in the part file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorDecl {
    id: String,
    name: String,
    description: Option<String>,
    svg_id: Option<String>,
    span: Span,
}

impl ConnectorDecl {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Id of the pad element in the breadboard artwork, if the connector has one.
    pub fn svg_id(&self) -> Option<&str> {
        self.svg_id.as_deref()
    }

    /// Span of the connector's start tag in the part file.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// The parts of a Fritzing part file pinlabel uses.
#[derive(Debug, Clone)]
pub struct PartFile {
    title: Option<String>,
    breadboard_image: Option<String>,
    connectors: Vec<ConnectorDecl>,
}

impl PartFile {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Path of the breadboard artwork as written in the part file,
    /// e.g. `breadboard/feather.svg`.
    pub fn breadboard_image(&self) -> Option<&str> {
        self.breadboard_image.as_deref()
    }

    /// Connectors in declaration order.
    pub fn connectors(&self) -> &[ConnectorDecl] {
        &self.connectors
    }
}

/// Parses a part file.
///
/// # Errors
///
/// - `E001` if the text is not well-formed XML
/// - `E002` if there are no connectors
/// - `E003` for a connector without `id` or `name`
/// - `E006` for a repeated connector `id`
///
/// # Examples
///
/// ```
/// let source = r#"<module><connectors>
///   <connector id="connector0" name="GND">
///     <views><breadboardView><p layer="breadboard" svgId="connector0pin"/></breadboardView></views>
///   </connector>
/// </connectors></module>"#;
///
/// let part = pinlabel_parser::fzp::parse_part(source).unwrap();
/// assert_eq!(part.connectors()[0].name(), "GND");
/// assert_eq!(part.connectors()[0].svg_id(), Some("connector0pin"));
/// ```
pub fn parse_part(source: &str) -> Result<PartFile, ParseError> {
    let doc = xml::parse_document(source, "part file")?;
    let root = doc.root_element();

    let title = xml::child(root, "title").and_then(xml::text_of);
    let breadboard_image = xml::path(root, &["views", "breadboardView", "layers"])
        .and_then(|layers| layers.attribute("image"))
        .map(str::to_string);

    let mut collector = DiagnosticCollector::new();
    let mut connectors = Vec::new();
    let mut seen: HashMap<&str, Span> = HashMap::new();

    let declared = root.descendants().filter(|n| {
        n.is_element()
            && n.has_tag_name("connector")
            && n.parent_element().is_some_and(|p| p.has_tag_name("connectors"))
    });

    for node in declared {
        let span = xml::start_tag_span(source, node);
        let (id, name) = match (node.attribute("id"), node.attribute("name")) {
            (Some(id), Some(name)) => (id, name),
            (id, _) => {
                let missing = if id.is_none() { "id" } else { "name" };
                collector.emit(
                    Diagnostic::error(format!("connector is missing its `{missing}` attribute"))
                        .with_code(ErrorCode::E003)
                        .with_label(span, "connector declared here")
                        .with_help("every connector needs an `id` and a `name`"),
                );
                continue;
            }
        };

        if let Some(first) = seen.get(id) {
            collector.emit(
                Diagnostic::error(format!("connector id `{id}` is declared more than once"))
                    .with_code(ErrorCode::E006)
                    .with_label(span, "duplicate declaration")
                    .with_secondary_label(*first, "first declared here"),
            );
            continue;
        }
        seen.insert(id, span);

        let svg_id = xml::path(node, &["views", "breadboardView"]).and_then(|view| {
            view.children()
                .filter(|p| p.is_element() && p.has_tag_name("p"))
                .find_map(|p| p.attribute("svgId"))
        });
        if svg_id.is_none() {
            debug!(connector = id; "Connector has no breadboard pad");
        }

        trace!(id, name, svg_id:?; "Connector declared");
        connectors.push(ConnectorDecl {
            id: id.to_string(),
            name: name.to_string(),
            description: xml::child(node, "description").and_then(xml::text_of),
            svg_id: svg_id.map(str::to_string),
            span,
        });
    }

    if connectors.is_empty() && !collector.has_errors() {
        collector.emit(
            Diagnostic::error("part file declares no connectors")
                .with_code(ErrorCode::E002)
                .with_label(xml::start_tag_span(source, root), "in this part")
                .with_help("expected `<connectors><connector id=.. name=..>` elements"),
        );
    }

    collector.finish()?;

    debug!(connectors = connectors.len(), title:?; "Part file parsed");
    Ok(PartFile {
        title,
        breadboard_image,
        connectors,
    })
}
