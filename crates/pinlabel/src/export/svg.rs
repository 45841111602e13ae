//! SVG export of pin label sheets.

mod labels;
mod overview;

use std::{fs::File, io::Write};

use log::{debug, error, info};
use svg::Document;

use pinlabel_core::{
    board::BoardDocument,
    color::Color,
    draw::{LabelBoxDefinition, StrokeCap, StrokeDefinition, TextAnchor, TextDefinition},
};

use crate::{config::StyleConfig, export};

/// Distance from a label's center to its baseline at the default font size.
const LABEL_HEIGHT_ADJUST: f32 = 1.75;

/// Width of the row lines behind the overview boxes, 0.25mm in points.
const ROW_STROKE_WIDTH: f32 = 0.25 * 72.0 / 25.4;

/// Which file an [`Svg`] exporter writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sheet {
    /// One text label per pin at the pin's position, sized like the board.
    #[default]
    Labels,
    /// The board artwork with a themed table of every pin's names.
    Overview,
}

/// Builder for [`Svg`] exporters.
#[derive(Debug, Default)]
pub struct SvgBuilder<'a> {
    file_name: String,
    style: Option<&'a StyleConfig>,
    sheet: Sheet,
}

impl<'a> SvgBuilder<'a> {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheet = sheet;
        self
    }

    /// Resolves the style into drawing definitions.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if a configured color is invalid.
    pub fn build(self) -> Result<Svg, export::Error> {
        let default_style = StyleConfig::default();
        let style = self.style.unwrap_or(&default_style);

        let font_size = style.font_size();
        let baseline_adjust = LABEL_HEIGHT_ADJUST * font_size / 6.0;

        let mut label_text = TextDefinition::new();
        label_text.set_font_family(style.font_family());
        label_text.set_font_size(font_size);
        label_text.set_color(style.label_color().map_err(export::Error::Render)?);

        let mut box_text = TextDefinition::new();
        box_text.set_font_family(style.font_family());
        box_text.set_font_size(font_size);
        box_text.set_baseline_adjust(baseline_adjust);

        let mut legend_text = box_text.clone();
        legend_text.set_anchor(TextAnchor::Start);
        legend_text.set_font_weight(Some("bold"));
        legend_text.set_color(Some(Color::from_rgb8(0x00, 0x00, 0x00)));

        let mut row_stroke =
            StrokeDefinition::new(style.row_color().map_err(export::Error::Render)?, ROW_STROKE_WIDTH);
        row_stroke.set_cap(StrokeCap::Round);

        let box_height = style.box_height();
        debug!(
            file_name = self.file_name.as_str(),
            sheet:? = self.sheet,
            font_size,
            box_height;
            "SVG exporter configured"
        );

        Ok(Svg {
            file_name: self.file_name,
            sheet: self.sheet,
            label_text,
            box_definition: LabelBoxDefinition::new(box_text),
            legend_text,
            row_stroke,
            box_height,
        })
    }
}

/// SVG exporter for one output file.
#[derive(Debug)]
pub struct Svg {
    file_name: String,
    sheet: Sheet,
    label_text: TextDefinition,
    box_definition: LabelBoxDefinition,
    legend_text: TextDefinition,
    row_stroke: StrokeDefinition,
    box_height: f32,
}

impl Svg {
    /// Renders the configured sheet without writing it.
    pub fn render_document(&self, board: &BoardDocument) -> Document {
        match self.sheet {
            Sheet::Labels => self.render_labels(board),
            Sheet::Overview => self.render_overview(board),
        }
    }

    /// Width of one character column in the overview table.
    fn box_width_per_char(&self) -> f32 {
        self.box_height / 2.0
    }

    /// Writes an SVG document to the configured file.
    pub fn write_document(&self, doc: Document) -> Result<(), export::Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name=self.file_name, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(&f, "{doc}") {
            error!(file_name=self.file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_board(&self, board: &BoardDocument) -> Result<(), export::Error> {
        let doc = self.render_document(board);
        debug!(sheet:? = self.sheet; "SVG document rendered");

        self.write_document(doc)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pinlabel_core::{
        board::Canvas,
        geometry::{Bounds, Point, Size},
        pin::{PadShape, PhysicalPin, PinRecord},
    };

    use super::*;
    use crate::export::Exporter;

    pub(super) fn board(records: Vec<PinRecord>) -> BoardDocument {
        let view_box = Bounds::new_from_top_left(Point::default(), Size::new(100.0, 50.0));
        BoardDocument::new(
            "Test Board",
            "test.fzp",
            Canvas::new("1in", "0.5in", view_box, Size::new(96.0, 48.0)),
            Some("<circle id=\"connector0pin\" cx=\"10\" cy=\"20\" r=\"2\"/>".to_string()),
            records,
        )
    }

    pub(super) fn record(id: &str, name: &str, x: f32, y: f32) -> PinRecord {
        PinRecord::new(PhysicalPin::new(id, name), Point::new(x, y), PadShape::Circle, name)
    }

    /// The trimmed content of every `<text>` element, in document order.
    pub(super) fn text_contents(rendered: &str) -> Vec<&str> {
        rendered
            .split("</text>")
            .filter_map(|chunk| chunk.rsplit_once('>'))
            .map(|(_, text)| text.trim())
            .filter(|text| !text.is_empty())
            .collect()
    }

    #[test]
    fn test_build_rejects_invalid_color() {
        let style: StyleConfig = toml::from_str("label_color = \"nope\"").unwrap();
        let err = SvgBuilder::new("out.svg").with_style(&style).build().unwrap_err();
        assert!(matches!(err, export::Error::Render(_)));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinlabels.svg");
        let exporter = SvgBuilder::new(path.to_str().unwrap()).build().unwrap();
        assert_eq!(exporter.sheet, Sheet::Labels);

        exporter
            .export_board(&board(vec![record("connector0", "IO3", 10.0, 20.0)]))
            .unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(text_contents(&written), vec!["IO3"]);
    }

    #[test]
    fn test_export_to_missing_directory_is_io_error() {
        let exporter = SvgBuilder::new("/nonexistent/dir/out.svg").build().unwrap();
        let err = exporter.export_board(&board(Vec::new())).unwrap_err();
        assert!(matches!(err, export::Error::Io(_)));
    }
}
