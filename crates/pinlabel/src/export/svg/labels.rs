//! The positioned label fragment, `pinlabels.svg`.

use log::trace;
use svg::Document;

use pinlabel_core::{board::BoardDocument, draw::Text};

use super::Svg;

impl Svg {
    /// Renders one `<text>` per record at the record's position, in a
    /// document with the board's own size and view box so it can be pasted
    /// over the artwork.
    pub fn render_labels(&self, board: &BoardDocument) -> Document {
        let canvas = board.canvas();
        let mut doc = Document::new()
            .set("width", canvas.width_attr())
            .set("height", canvas.height_attr())
            .set("viewBox", canvas.view_box().to_view_box());

        for record in board.records() {
            trace!(label = record.label(), position:? = record.position(); "Placing label");
            let text = Text::new(&self.label_text, record.label());
            doc = doc.add(text.to_svg_element(record.position()));
        }

        doc
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{board, record, text_contents};
    use crate::{export::svg::SvgBuilder, rename::RenameRule};

    #[test]
    fn test_one_text_per_record() {
        let board = board(vec![
            record("connector0", "IO3", 10.0, 20.0),
            record("connector1", "GND", 60.0, 45.0),
        ]);
        let svg = SvgBuilder::new("pinlabels.svg").build().unwrap();
        let rendered = svg.render_labels(&board).to_string();

        assert_eq!(text_contents(&rendered), vec!["IO3", "GND"]);
        assert!(rendered.contains("width=\"1in\""));
        assert!(rendered.contains("height=\"0.5in\""));
        assert!(rendered.contains("viewBox=\"0 0 100 50\""));
        assert!(rendered.contains("font-family=\"Courier New\""));
        assert!(!rendered.contains("<circle"));
    }

    #[test]
    fn test_internal_records_have_no_label() {
        let board = board(vec![record("connector0", "IO3", 10.0, 20.0)])
            .with_internal_records(vec![pinlabel_core::pin::PinRecord::internal("LED", "GPIO13")]);
        let svg = SvgBuilder::new("pinlabels.svg").build().unwrap();
        let rendered = svg.render_labels(&board).to_string();
        assert_eq!(text_contents(&rendered), vec!["IO3"]);
    }

    #[test]
    fn test_renamed_label_keeps_position() {
        let rule = RenameRule::new("^IO([0-9])", "D\\1").unwrap();
        let renamed = record("connector0", "IO3", 10.0, 20.0);
        let renamed = renamed.clone().with_display_label(rule.apply(renamed.base_label()));
        let board = board(vec![renamed]);

        let svg = SvgBuilder::new("pinlabels.svg").build().unwrap();
        let rendered = svg.render_labels(&board).to_string();
        assert_eq!(text_contents(&rendered), vec!["D3"]);
        assert!(rendered.contains("x=\"10\""));
        assert!(rendered.contains("y=\"20\""));
    }

    #[test]
    fn test_label_color_sets_fill() {
        let style: crate::config::StyleConfig = toml::from_str("label_color = \"#FF0000\"").unwrap();
        let svg = SvgBuilder::new("pinlabels.svg").with_style(&style).build().unwrap();
        let rendered = svg
            .render_labels(&board(vec![record("connector0", "A0", 1.0, 1.0)]))
            .to_string();
        assert!(rendered.contains("fill="));
    }
}
