//! Shared XML helpers for the part and artwork parsers.

use roxmltree::{Document, Node, ParsingOptions};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::{Span, offset_of},
};

/// Parses `source`, allowing the DOCTYPE declarations vector editors emit.
pub(crate) fn parse_document<'a>(source: &'a str, what: &str) -> Result<Document<'a>, Diagnostic> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(source, options).map_err(|err| {
        let pos = err.pos();
        let offset = offset_of(source, pos.row, pos.col);
        Diagnostic::error(format!("malformed {what}: {err}"))
            .with_code(ErrorCode::E001)
            .with_label(Span::new(offset..offset), "XML error here")
    })
}

/// Span of an element's start tag, or of the whole node when the tag end
/// cannot be found.
pub(crate) fn start_tag_span(source: &str, node: Node<'_, '_>) -> Span {
    let range = node.range();
    match source[range.clone()].find('>') {
        Some(end) => Span::new(range.start..range.start + end + 1),
        None => Span::new(range),
    }
}

/// Returns the first child element with the given local name.
pub(crate) fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(name))
}

/// Follows a path of child element names.
pub(crate) fn path<'a, 'input>(node: Node<'a, 'input>, names: &[&str]) -> Option<Node<'a, 'input>> {
    names.iter().try_fold(node, |current, name| child(current, name))
}

/// Trimmed, non-empty text content of an element.
pub(crate) fn text_of(node: Node<'_, '_>) -> Option<String> {
    node.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
