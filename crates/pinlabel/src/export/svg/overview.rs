//! The overview sheet, `output.svg`: the board artwork beside a table of
//! every pin's label and pinout functions.
//!
//! Rows are grouped by board side (top, bottom, right, left, then pins off
//! the edges followed by internal pins) with a blank row between groups.
//! Boxes of top, right, unknown and internal pins grow to the right of the
//! name box; bottom and left pins grow to the left so the table reads
//! outward from the board when cut apart.

use std::collections::{BTreeSet, HashMap};

use log::{debug, trace};
use svg::{
    Document,
    node::{Blob, element::Group},
};

use pinlabel_core::{
    board::BoardDocument,
    draw::{Drawable as _, LabelBox, LayeredOutput, Line, RenderLayer, Text},
    geometry::{Bounds, Point, Size},
    pin::{PinRecord, Side},
    theme::LabelKind,
};

use super::Svg;

/// Minimum width of the name column, in characters.
const NAME_COLUMN_CHARS: usize = 6;
/// How far a row line reaches past the name box.
const ROW_LINE_OVERHANG: f32 = 4.0;
/// Rows from the last table row to the first legend entry.
const LEGEND_OFFSET_ROWS: usize = 4;
/// Blank space between the artwork and the table, in rows.
const TABLE_GAP_ROWS: f32 = 2.0;

/// Drawn table content in table coordinates.
#[derive(Debug, Default)]
struct Table {
    output: LayeredOutput,
    bounds: Option<Bounds>,
    kinds: BTreeSet<LabelKind>,
}

impl Table {
    fn include(&mut self, bounds: Bounds) {
        self.bounds = Some(match self.bounds {
            Some(current) => current.merge(&bounds),
            None => bounds,
        });
    }
}

impl Svg {
    /// Renders the artwork with the pin table placed to its right.
    pub fn render_overview(&self, board: &BoardDocument) -> Document {
        let canvas = board.canvas();
        let artwork_bounds = canvas.view_box();
        let table = self.render_table(board.records(), board.internal_records());

        let mut artwork = LayeredOutput::new();
        if let Some(markup) = board.artwork() {
            artwork.add_to_layer(RenderLayer::Artwork, Box::new(Blob::new(markup)));
        }

        let mut view_box = artwork_bounds;
        let mut table_group = None;
        if let Some(table_bounds) = table.bounds {
            let origin = Point::new(
                artwork_bounds.max_x() + self.box_height * TABLE_GAP_ROWS,
                artwork_bounds.min_y(),
            );
            let offset = origin.sub_point(table_bounds.min_point());
            view_box = view_box.merge(&Bounds::new_from_top_left(origin, table_bounds.to_size()));

            let group = table.output.render().into_iter().fold(
                Group::new().set(
                    "transform",
                    format!("translate({}, {})", offset.x(), offset.y()),
                ),
                |group, node| group.add(node),
            );
            table_group = Some(group);
        }

        let (sx, sy) = canvas.px_per_unit();
        debug!(
            view_box = view_box.to_view_box().as_str(),
            kinds = table.kinds.len();
            "Overview laid out"
        );

        let mut doc = Document::new()
            .set("width", view_box.width() * sx)
            .set("height", view_box.height() * sy)
            .set("viewBox", view_box.to_view_box());
        for node in artwork.render() {
            doc = doc.add(node);
        }
        if let Some(group) = table_group {
            doc = doc.add(group);
        }
        doc
    }

    fn render_table(&self, records: &[PinRecord], internal: &[PinRecord]) -> Table {
        let widths = column_widths(records.iter().chain(internal));
        let mut table = Table::default();

        let mut rows = table_rows(records);
        rows.extend(internal.iter().map(Some));
        for (index, row) in rows.iter().enumerate() {
            if let Some(record) = row {
                self.render_row(&mut table, record, index, &widths);
            }
        }

        if !table.kinds.is_empty() {
            self.render_legend(&mut table, rows.len().saturating_sub(1));
        }
        table
    }

    fn render_row(
        &self,
        table: &mut Table,
        record: &PinRecord,
        index: usize,
        widths: &HashMap<&str, usize>,
    ) {
        let per_char = self.box_width_per_char();
        let top = self.box_height * index as f32;
        let extends_left = record.side().extends_left();

        let name = record.label();
        let name_kind = LabelKind::for_pin_name(name, record.pad_shape());
        let name_width = (name.chars().count() + 1).max(NAME_COLUMN_CHARS) as f32 * per_char;
        self.draw_cell(table, name_kind, Some(name), 0.0, top, name_width);

        // Empty cells still take their column's width
        let mut cursor = if extends_left { 0.0 } else { name_width };
        let mut last_used_center = name_width / 2.0;
        for function in record.functions() {
            let chars = widths.get(function.column()).copied().unwrap_or_default();
            let width = (chars + 1) as f32 * per_char;
            let min_x = if extends_left { cursor - width } else { cursor };
            cursor = if extends_left { min_x } else { cursor + width };
            if function.is_empty() {
                continue;
            }

            let kind = LabelKind::for_column(function.column());
            self.draw_cell(table, kind, Some(function.value()), min_x, top, width);
            last_used_center = min_x + width / 2.0;
        }

        let start = if extends_left {
            name_width + ROW_LINE_OVERHANG
        } else {
            -ROW_LINE_OVERHANG
        };
        let center_y = top + self.box_height / 2.0;
        let (line, center) = Line::between(&self.row_stroke, start, last_used_center, center_y);
        table.output.merge(line.render_to_layers(center));
        table.include(Bounds::new_from_top_left(
            Point::new(start.min(last_used_center), center_y),
            Size::new((last_used_center - start).abs(), 0.0),
        ));
        trace!(label = name, side:% = record.side(), row = index; "Table row drawn");
    }

    fn render_legend(&self, table: &mut Table, last_row: usize) {
        let mut top = self.box_height * (last_row + LEGEND_OFFSET_ROWS) as f32;
        let kinds: Vec<LabelKind> = table.kinds.iter().copied().collect();

        for kind in kinds {
            self.draw_cell(table, kind, None, 0.0, top, self.box_height);

            let text = Text::new(&self.legend_text, kind.name());
            let position = Point::new(self.box_height * 1.2, top + self.box_height / 2.0);
            table.output.merge(text.render_to_layers(position));
            table.include(Bounds::new_from_top_left(
                Point::new(position.x(), top),
                Size::new(text.calculate_size().width(), self.box_height),
            ));

            top += self.box_height;
        }
    }

    fn draw_cell(
        &self,
        table: &mut Table,
        kind: LabelKind,
        text: Option<&str>,
        min_x: f32,
        top: f32,
        width: f32,
    ) {
        let size = Size::new(width, self.box_height);
        let cell = Bounds::new_from_top_left(Point::new(min_x, top), size);
        let label = LabelBox::new(&self.box_definition, kind.theme(), text, size);
        let center = Point::new(min_x + width / 2.0, top + self.box_height / 2.0);

        table.output.merge(label.render_to_layers(center));
        table.include(cell);
        table.kinds.insert(kind);
    }
}

/// Widest value of each function column, in characters.
fn column_widths<'a>(records: impl Iterator<Item = &'a PinRecord>) -> HashMap<&'a str, usize> {
    let mut widths: HashMap<&str, usize> = HashMap::new();
    for function in records.flat_map(PinRecord::functions) {
        let width = widths.entry(function.column()).or_default();
        *width = (*width).max(function.value().chars().count());
    }
    widths
}

/// Records in table order. `None` marks the blank row between side groups.
fn table_rows(records: &[PinRecord]) -> Vec<Option<&PinRecord>> {
    let on_side = |side: Side| -> Vec<&PinRecord> {
        records.iter().filter(|record| record.side() == side).collect()
    };
    let by_x = |a: &&PinRecord, b: &&PinRecord| a.position().x().total_cmp(&b.position().x());
    let by_y = |a: &&PinRecord, b: &&PinRecord| a.position().y().total_cmp(&b.position().y());

    let mut tops = on_side(Side::Top);
    tops.sort_by(by_x);
    let mut bottoms = on_side(Side::Bottom);
    bottoms.sort_by(by_x);
    let mut rights = on_side(Side::Right);
    rights.sort_by(by_y);
    let mut lefts = on_side(Side::Left);
    lefts.sort_by(by_y);

    let mut rows = Vec::with_capacity(records.len() + 4);
    for group in [tops, bottoms, rights, lefts] {
        rows.extend(group.into_iter().map(Some));
        rows.push(None);
    }
    rows.extend(on_side(Side::Unknown).into_iter().map(Some));
    rows
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use pinlabel_core::pin::PinFunction;

    use super::super::tests::{board, record, text_contents};
    use super::*;
    use crate::export::svg::{Sheet, SvgBuilder};

    fn svg() -> Svg {
        SvgBuilder::new("output.svg")
            .with_sheet(Sheet::Overview)
            .build()
            .unwrap()
    }

    fn io3() -> PinRecord {
        record("connector0", "IO3", 10.0, 4.0)
            .with_side(Side::Top)
            .with_functions(vec![
                PinFunction::new("GPIO", "GPIO3"),
                PinFunction::new("ADC", ""),
            ])
    }

    #[test]
    fn test_table_rows_grouped_by_side() {
        let records = vec![
            record("c0", "A", 50.0, 25.0),
            record("c1", "B", 30.0, 2.0).with_side(Side::Top),
            record("c2", "C", 10.0, 2.0).with_side(Side::Top),
            record("c3", "D", 95.0, 25.0).with_side(Side::Right),
        ];
        let rows: Vec<Option<&str>> = table_rows(&records)
            .into_iter()
            .map(|row| row.map(PinRecord::label))
            .collect();
        assert_eq!(
            rows,
            vec![Some("C"), Some("B"), None, None, Some("D"), None, None, Some("A")]
        );
    }

    #[test]
    fn test_column_widths() {
        let records = vec![
            io3(),
            record("c1", "IO4", 20.0, 4.0).with_functions(vec![PinFunction::new("GPIO", "GPIO14")]),
        ];
        let widths = column_widths(records.iter());
        assert_eq!(widths["GPIO"], 6);
        assert_eq!(widths["ADC"], 0);
    }

    #[test]
    fn test_right_extending_row_bounds() {
        let svg = svg();
        let table = svg.render_table(&[io3()], &[]);
        let bounds = table.bounds.unwrap();
        assert_approx_eq!(f32, bounds.min_x(), -ROW_LINE_OVERHANG);
        assert_approx_eq!(f32, bounds.min_y(), 0.0);
        assert!(table.kinds.contains(&LabelKind::CircuitPythonName));
        assert!(table.kinds.contains(&LabelKind::Port));
        assert!(!table.kinds.contains(&LabelKind::Analog));
    }

    #[test]
    fn test_left_extending_row_grows_negative() {
        let svg = svg();
        let gnd = record("c1", "GND", 60.0, 45.0)
            .with_side(Side::Bottom)
            .with_functions(vec![PinFunction::new("GPIO", "GPIO7")]);
        let table = svg.render_table(&[gnd], &[]);
        let bounds = table.bounds.unwrap();
        let per_char = svg.box_width_per_char();
        assert_approx_eq!(f32, bounds.min_x(), -6.0 * per_char);
        assert!(table.kinds.contains(&LabelKind::Gnd));
    }

    #[test]
    fn test_overview_document() {
        let rendered = svg().render_overview(&board(vec![io3()])).to_string();
        assert!(rendered.contains("data-layer=\"artwork\""));
        assert!(rendered.contains("connector0pin"));
        let texts = text_contents(&rendered);
        assert_eq!(texts.len(), 4);
        for expected in ["IO3", "GPIO3", "CircuitPython Name", "Port"] {
            assert!(texts.contains(&expected), "missing {expected} in {texts:?}");
        }
        assert!(rendered.contains("translate("));
    }

    #[test]
    fn test_internal_records_follow_board_pins() {
        let led = PinRecord::internal("LED", "GPIO13")
            .with_functions(vec![PinFunction::new("GPIO", "GPIO13")]);
        let board = board(vec![io3()]).with_internal_records(vec![led]);
        let rendered = svg().render_overview(&board).to_string();

        let texts = text_contents(&rendered);
        assert!(texts.contains(&"LED"));
        assert!(texts.contains(&"GPIO13"));
        let led_at = texts.iter().position(|t| *t == "LED").unwrap();
        let io3_at = texts.iter().position(|t| *t == "IO3").unwrap();
        assert!(io3_at < led_at);
    }

    #[test]
    fn test_overview_without_records_is_artwork_only() {
        let rendered = svg().render_overview(&board(Vec::new())).to_string();
        assert!(rendered.contains("viewBox=\"0 0 100 50\""));
        assert!(!rendered.contains("<rect"));
    }
}
