//! The merged board model handed to the exporters.

use std::path::{Path, PathBuf};

use crate::{
    geometry::{Bounds, Size},
    pin::PinRecord,
};

/// Size information of the breadboard artwork.
///
/// `width_attr`/`height_attr` keep the original attribute text so exported
/// files can reuse it verbatim; `px_size` is the same size in CSS pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width_attr: String,
    height_attr: String,
    view_box: Bounds,
    px_size: Size,
}

impl Canvas {
    pub fn new(
        width_attr: impl Into<String>,
        height_attr: impl Into<String>,
        view_box: Bounds,
        px_size: Size,
    ) -> Self {
        Self {
            width_attr: width_attr.into(),
            height_attr: height_attr.into(),
            view_box,
            px_size,
        }
    }

    pub fn width_attr(&self) -> &str {
        &self.width_attr
    }

    pub fn height_attr(&self) -> &str {
        &self.height_attr
    }

    /// The user-unit coordinate space pad positions are expressed in.
    pub fn view_box(&self) -> Bounds {
        self.view_box
    }

    pub fn px_size(&self) -> Size {
        self.px_size
    }

    /// CSS pixels per user unit along x and y.
    pub fn px_per_unit(&self) -> (f32, f32) {
        let vb = self.view_box.to_size();
        let sx = if vb.width() > 0.0 {
            self.px_size.width() / vb.width()
        } else {
            1.0
        };
        let sy = if vb.height() > 0.0 {
            self.px_size.height() / vb.height()
        } else {
            1.0
        };
        (sx, sy)
    }
}

/// All pin records of one board plus its metadata.
///
/// Built once per run after merging and renaming; read-only afterwards.
#[derive(Debug, Clone)]
pub struct BoardDocument {
    name: String,
    source_path: PathBuf,
    canvas: Canvas,
    artwork: Option<String>,
    records: Vec<PinRecord>,
    internal: Vec<PinRecord>,
}

impl BoardDocument {
    pub fn new(
        name: impl Into<String>,
        source_path: impl Into<PathBuf>,
        canvas: Canvas,
        artwork: Option<String>,
        records: Vec<PinRecord>,
    ) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
            canvas,
            artwork,
            records,
            internal: Vec::new(),
        }
    }

    /// Adds the records of chip pins without a connector.
    pub fn with_internal_records(mut self, internal: Vec<PinRecord>) -> Self {
        self.internal = internal;
        self
    }

    /// The part title, or the file stem when the part has none.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The inner markup of the breadboard SVG, if it was loaded.
    pub fn artwork(&self) -> Option<&str> {
        self.artwork.as_deref()
    }

    pub fn records(&self) -> &[PinRecord] {
        &self.records
    }

    /// Chip pins without a connector. They are listed in the overview table
    /// but have no label position.
    pub fn internal_records(&self) -> &[PinRecord] {
        &self.internal
    }

    /// Looks a record up by its connector id.
    pub fn record(&self, connector_id: &str) -> Option<&PinRecord> {
        self.records
            .iter()
            .find(|r| r.physical().connector_id() == connector_id)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{
        geometry::Point,
        pin::{PadShape, PhysicalPin},
    };

    #[test]
    fn test_canvas_px_per_unit() {
        let canvas = Canvas::new(
            "1in",
            "0.5in",
            Bounds::new_from_top_left(Point::default(), Size::new(72.0, 36.0)),
            Size::new(96.0, 48.0),
        );
        let (sx, sy) = canvas.px_per_unit();
        assert_approx_eq!(f32, sx, 96.0 / 72.0);
        assert_approx_eq!(f32, sy, 48.0 / 36.0);
    }

    #[test]
    fn test_canvas_px_per_unit_empty_view_box() {
        let canvas = Canvas::new("0", "0", Bounds::default(), Size::default());
        assert_eq!(canvas.px_per_unit(), (1.0, 1.0));
    }

    #[test]
    fn test_document_record_lookup() {
        let record = PinRecord::new(
            PhysicalPin::new("connector0", "GND"),
            Point::new(1.0, 2.0),
            PadShape::Circle,
            "GND",
        );
        let doc = BoardDocument::new(
            "Feather",
            "feather.fzp",
            Canvas::new("1in", "1in", Bounds::default(), Size::default()),
            None,
            vec![record],
        );
        assert_eq!(doc.record("connector0").map(|r| r.label()), Some("GND"));
        assert!(doc.record("connector1").is_none());
        assert_eq!(doc.source_path(), Path::new("feather.fzp"));
        assert!(doc.artwork().is_none());
        assert!(doc.internal_records().is_empty());

        let doc = doc.with_internal_records(vec![PinRecord::internal("LED", "GPIO13")]);
        assert_eq!(doc.internal_records()[0].label(), "LED");
        assert!(doc.record("").is_none());
    }
}
