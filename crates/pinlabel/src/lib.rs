//! pinlabel - Pin label sheets for Fritzing boards.
//!
//! Joins a board's Fritzing part and breadboard artwork with its firmware pin
//! names and a pinout table, then writes two SVG sheets: the labels placed
//! over each pin, and the artwork beside a themed table of every pin's
//! functions.

pub mod config;
pub mod load;
pub mod names;
pub mod rename;
pub mod resolve;

mod error;
mod export;

pub use pinlabel_core::{board, color, geometry, pin, theme};

pub use error::{InputKind, PinlabelError, SourceFile, SourcedDiagnostic};

use std::path::{Path, PathBuf};

use log::{debug, info, trace};

use pinlabel_core::board::BoardDocument;
use pinlabel_parser::breadboard::Artwork;

use config::AppConfig;
use export::{
    Exporter,
    svg::{Sheet, SvgBuilder},
};
use names::NameIndex;
use rename::RenameRules;
use resolve::Resolver;

/// Paths of the files one board is resolved from.
///
/// # Examples
///
/// ```rust,no_run
/// use pinlabel::Inputs;
///
/// let inputs = Inputs::new("feather.fzpz", "pinout.csv")
///     .with_pin_definitions("pins.c")
///     .with_arduino_variant("variants/feather");
/// ```
#[derive(Debug, Clone)]
pub struct Inputs {
    board: PathBuf,
    pin_definitions: Option<PathBuf>,
    pinout: PathBuf,
    arduino_variant: Option<PathBuf>,
}

impl Inputs {
    /// Inputs with only the board and its pinout table.
    pub fn new(board: impl Into<PathBuf>, pinout: impl Into<PathBuf>) -> Self {
        Self {
            board: board.into(),
            pin_definitions: None,
            pinout: pinout.into(),
            arduino_variant: None,
        }
    }

    /// Adds a CircuitPython `pins.c`.
    pub fn with_pin_definitions(mut self, path: impl Into<PathBuf>) -> Self {
        self.pin_definitions = Some(path.into());
        self
    }

    /// Adds an Arduino variant directory.
    pub fn with_arduino_variant(mut self, dir: impl Into<PathBuf>) -> Self {
        self.arduino_variant = Some(dir.into());
        self
    }

    pub fn board(&self) -> &Path {
        &self.board
    }

    pub fn pin_definitions(&self) -> Option<&Path> {
        self.pin_definitions.as_deref()
    }

    pub fn pinout(&self) -> &Path {
        &self.pinout
    }

    pub fn arduino_variant(&self) -> Option<&Path> {
        self.arduino_variant.as_deref()
    }
}

/// A resolved board and the warnings raised while resolving it.
#[derive(Debug, Clone)]
pub struct ResolvedBoard {
    document: BoardDocument,
    warnings: Vec<SourcedDiagnostic>,
}

impl ResolvedBoard {
    pub fn document(&self) -> &BoardDocument {
        &self.document
    }

    /// Non-fatal problems, in the order they were found.
    pub fn warnings(&self) -> &[SourcedDiagnostic] {
        &self.warnings
    }

    pub fn into_document(self) -> BoardDocument {
        self.document
    }
}

/// Builder for resolving boards and rendering their label sheets.
///
/// # Examples
///
/// ```rust,no_run
/// use pinlabel::{Inputs, PinoutBuilder, config::AppConfig};
///
/// let builder = PinoutBuilder::new(AppConfig::default())
///     .with_rename("^IO([0-9]+)", "D\\1");
///
/// let inputs = Inputs::new("feather.fzpz", "pinout.csv").with_pin_definitions("pins.c");
/// let resolved = builder.resolve(&inputs).expect("Failed to resolve board");
///
/// builder
///     .write_labels(resolved.document(), "pinlabels.svg")
///     .expect("Failed to write labels");
/// builder
///     .write_overview(resolved.document(), "output.svg")
///     .expect("Failed to write overview");
/// ```
#[derive(Debug, Default)]
pub struct PinoutBuilder {
    config: AppConfig,
    renames: Vec<(String, String)>,
}

impl PinoutBuilder {
    /// Create a new builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            renames: Vec::new(),
        }
    }

    /// Appends a rename rule. Rules run after the configured ones, in the
    /// order they were added.
    pub fn with_rename(mut self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.renames.push((pattern.into(), replacement.into()));
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Compiles the configured rename rules followed by the added ones.
    ///
    /// # Errors
    ///
    /// Returns [`PinlabelError::Rule`] for the first pattern that does not
    /// compile.
    pub fn rename_rules(&self) -> Result<RenameRules, PinlabelError> {
        RenameRules::from_sources(
            self.config.renames(),
            self.renames.iter().map(|(p, r)| (p.as_str(), r.as_str())),
        )
    }

    /// Loads every input, matches pins and applies the rename rules.
    ///
    /// The configuration and rules are checked before any file is read.
    ///
    /// # Errors
    ///
    /// - [`PinlabelError::Config`] or [`PinlabelError::Rule`] for bad settings.
    /// - [`PinlabelError::Input`] or [`PinlabelError::Parse`] for unreadable
    ///   or malformed inputs.
    /// - [`PinlabelError::Unmatched`] when pins do not match and the policy
    ///   is to fail.
    pub fn resolve(&self, inputs: &Inputs) -> Result<ResolvedBoard, PinlabelError> {
        info!(board:? = inputs.board(), pinout:? = inputs.pinout(); "Resolving board");

        self.validate_style()?;
        let rules = self.rename_rules()?;

        let board = load::load_board(inputs.board())?;
        let pin_table = inputs
            .pin_definitions()
            .map(load::load_pin_table)
            .transpose()?;

        let mut warnings = Vec::new();
        let variant = match inputs.arduino_variant() {
            Some(dir) => {
                let (variant, variant_warnings) = load::load_variant(dir)?;
                warnings.extend(variant_warnings);
                Some(variant)
            }
            None => None,
        };
        let (pinout, pinout_src) = load::load_pinout(inputs.pinout())?;

        let names = NameIndex::new(pin_table, variant);
        let aliases = self.config.aliases();
        let resolution =
            Resolver::new(&board, &names, self.config.resolve(), &aliases).resolve(&pinout, &pinout_src)?;
        let (records, internal, resolve_warnings) = resolution.into_parts();
        warnings.extend(resolve_warnings);

        let records: Vec<_> = records.into_iter().map(|record| rules.relabel(record)).collect();
        let internal: Vec<_> = internal.into_iter().map(|record| rules.relabel(record)).collect();
        debug!(
            records = records.len(),
            internal = internal.len(),
            warnings = warnings.len();
            "Board resolved"
        );

        let document = BoardDocument::new(
            board.name(),
            board.path(),
            board.artwork().canvas().clone(),
            Some(artwork_markup(board.artwork())),
            records,
        )
        .with_internal_records(internal);
        trace!(document:?; "Resolved board");

        Ok(ResolvedBoard { document, warnings })
    }

    /// Renders the positioned label sheet to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`PinlabelError::Config`] if a configured color is invalid.
    pub fn render_labels(&self, board: &BoardDocument) -> Result<String, PinlabelError> {
        self.render(board, Sheet::Labels)
    }

    /// Renders the artwork and pin table to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`PinlabelError::Config`] if a configured color is invalid.
    pub fn render_overview(&self, board: &BoardDocument) -> Result<String, PinlabelError> {
        self.render(board, Sheet::Overview)
    }

    /// Writes the positioned label sheet to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PinlabelError::Export`] if the file cannot be written.
    pub fn write_labels(&self, board: &BoardDocument, path: impl AsRef<Path>) -> Result<(), PinlabelError> {
        self.write(board, Sheet::Labels, path.as_ref())
    }

    /// Writes the artwork and pin table to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PinlabelError::Export`] if the file cannot be written.
    pub fn write_overview(&self, board: &BoardDocument, path: impl AsRef<Path>) -> Result<(), PinlabelError> {
        self.write(board, Sheet::Overview, path.as_ref())
    }

    fn render(&self, board: &BoardDocument, sheet: Sheet) -> Result<String, PinlabelError> {
        self.validate_style()?;
        info!(sheet:?; "Rendering SVG");

        let svg = SvgBuilder::new("")
            .with_style(self.config.style())
            .with_sheet(sheet)
            .build()?;
        Ok(svg.render_document(board).to_string())
    }

    fn write(&self, board: &BoardDocument, sheet: Sheet, path: &Path) -> Result<(), PinlabelError> {
        self.validate_style()?;

        let svg = SvgBuilder::new(&path.to_string_lossy())
            .with_style(self.config.style())
            .with_sheet(sheet)
            .build()?;
        svg.export_board(board)?;

        info!(output_file:? = path, sheet:?; "SVG exported successfully");
        Ok(())
    }

    fn validate_style(&self) -> Result<(), PinlabelError> {
        self.config.style().validate().map_err(PinlabelError::Config)
    }
}

/// Artwork markup wrapped in a group that redeclares the root's prefixed
/// namespaces, so the markup stays valid once moved into another document.
fn artwork_markup(artwork: &Artwork) -> String {
    let namespaces = artwork.namespaces();
    if namespaces.is_empty() {
        return artwork.markup().to_string();
    }

    let declarations: String = namespaces
        .iter()
        .map(|(prefix, uri)| format!(" xmlns:{prefix}=\"{}\"", escape_attribute(uri)))
        .collect();
    format!("<g{declarations}>{}</g>", artwork.markup())
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
