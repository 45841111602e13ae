//! Merging connectors, firmware names and pinout rows into pin records.
//!
//! Each pinout row claims the connectors whose port or name equals its key.
//! A claimed row becomes one [`PinRecord`] positioned on the first claimed
//! circle pad. Rows nothing matches and connectors no row claims are
//! unmatched; [`UnmatchedPolicy`] decides whether that fails the run.
//!
//! Chip pins bound in `pins.c` that no connector leads to (an on-board LED,
//! a NeoPixel) become internal records. They may claim rows too, and are
//! only drawn in the overview table.

use log::{debug, info, trace, warn};

use pinlabel_core::{
    geometry::Point,
    pin::{LogicalName, Pad, PadShape, PhysicalPin, PinRecord, Side},
};
use pinlabel_parser::{
    Diagnostic, ErrorCode,
    breadboard::ArtworkPad,
    fzp::ConnectorDecl,
    pinout::{PinoutRow, PinoutTable},
};

use crate::{
    config::{AliasConfig, ResolveConfig, UnmatchedPolicy},
    error::{PinlabelError, SourceFile, SourcedDiagnostic},
    load::LoadedBoard,
    names::NameIndex,
};

/// Pin records of a board plus the warnings raised while building them.
#[derive(Debug, Default)]
pub struct Resolution {
    records: Vec<PinRecord>,
    internal: Vec<PinRecord>,
    warnings: Vec<SourcedDiagnostic>,
}

impl Resolution {
    pub fn records(&self) -> &[PinRecord] {
        &self.records
    }

    /// Records of chip pins without a connector, in `pins.c` order.
    pub fn internal(&self) -> &[PinRecord] {
        &self.internal
    }

    pub fn warnings(&self) -> &[SourcedDiagnostic] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Vec<PinRecord>, Vec<PinRecord>, Vec<SourcedDiagnostic>) {
        (self.records, self.internal, self.warnings)
    }
}

/// A connector with its cleaned-up name, port and breadboard pad.
#[derive(Debug)]
struct Connector<'a> {
    decl: &'a ConnectorDecl,
    name: &'a str,
    port: &'a str,
    pad: Option<&'a Pad>,
}

impl Connector<'_> {
    fn matches(&self, key: &str) -> bool {
        self.port == key || self.name == key
    }

    fn position(&self) -> Option<Point> {
        self.pad.and_then(Pad::center)
    }
}

/// A `pins.c` chip pin no connector's port refers to.
#[derive(Debug)]
struct InternalPin<'a> {
    name: &'a str,
    aliases: Vec<&'a str>,
    port: &'a str,
    row: Option<usize>,
}

impl InternalPin<'_> {
    fn matches(&self, key: &str) -> bool {
        self.port == key || self.name == key || self.aliases.contains(&key)
    }
}

/// Joins one board with its name sources and settings.
#[derive(Debug)]
pub struct Resolver<'a> {
    board: &'a LoadedBoard,
    names: &'a NameIndex,
    config: &'a ResolveConfig,
    aliases: &'a [AliasConfig],
}

impl<'a> Resolver<'a> {
    pub fn new(
        board: &'a LoadedBoard,
        names: &'a NameIndex,
        config: &'a ResolveConfig,
        aliases: &'a [AliasConfig],
    ) -> Self {
        Self {
            board,
            names,
            config,
            aliases,
        }
    }

    /// Builds one record per pinout row that claims a positioned connector.
    ///
    /// # Errors
    ///
    /// Returns [`PinlabelError::Unmatched`] with every unmatched row and
    /// connector when the policy is [`UnmatchedPolicy::Error`].
    pub fn resolve(
        &self,
        pinout: &PinoutTable,
        pinout_src: &SourceFile,
    ) -> Result<Resolution, PinlabelError> {
        info!(rows = pinout.rows().len(); "Resolving pins");
        let connectors = self.connectors();
        let mut internal = self.internal_pins(&connectors);
        let rows = pinout.rows();

        let mut claimed_by: Vec<Option<usize>> = vec![None; connectors.len()];
        let mut records = Vec::new();
        let mut warnings = Vec::new();
        let mut unmatched = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            let mut claimed = Vec::new();
            let mut matched = false;

            for (index, connector) in connectors.iter().enumerate() {
                if !connector.matches(row.key()) {
                    continue;
                }
                matched = true;
                match claimed_by[index] {
                    Some(first) => {
                        let diagnostic = already_described("connector", connector.name, row, &rows[first]);
                        warnings.push(SourcedDiagnostic::new(diagnostic, pinout_src.clone()));
                    }
                    None => {
                        claimed_by[index] = Some(row_index);
                        claimed.push(connector);
                    }
                }
            }

            if !matched {
                if let Some(pin) = internal.iter_mut().find(|pin| pin.matches(row.key())) {
                    match pin.row {
                        Some(first) => {
                            let diagnostic = already_described("pin", pin.name, row, &rows[first]);
                            warnings.push(SourcedDiagnostic::new(diagnostic, pinout_src.clone()));
                        }
                        None => pin.row = Some(row_index),
                    }
                    continue;
                }

                let diagnostic = Diagnostic::error(format!(
                    "pinout row `{}` has no connector on the board",
                    row.key()
                ))
                .with_code(ErrorCode::E300)
                .with_label(row.span(), "not on the board")
                .with_help("check the connector names in the part file and the pin definitions");
                unmatched.push(SourcedDiagnostic::new(diagnostic, pinout_src.clone()));
                continue;
            }
            if claimed.is_empty() {
                continue;
            }

            match self.build_record(row, &claimed) {
                Some(record) => records.push(record),
                None => {
                    let diagnostic = Diagnostic::warning(format!(
                        "pinout row `{}` matches no connector with a breadboard pad",
                        row.key()
                    ))
                    .with_code(ErrorCode::E302)
                    .with_label(row.span(), "no label is drawn for this row");
                    warnings.push(SourcedDiagnostic::new(diagnostic, pinout_src.clone()));
                }
            }
        }

        for (connector, claim) in connectors.iter().zip(&claimed_by) {
            if claim.is_some() {
                continue;
            }
            let diagnostic = Diagnostic::error(format!(
                "connector `{}` ({}) has no pinout row",
                connector.name,
                connector.decl.id()
            ))
            .with_code(ErrorCode::E301)
            .with_label(connector.decl.span(), "declared here")
            .with_help(format!(
                "add a row keyed `{}` to the pinout table",
                connector.port
            ));
            unmatched.push(SourcedDiagnostic::new(
                diagnostic,
                self.board.part_src().clone(),
            ));
        }

        if !unmatched.is_empty() {
            match self.config.unmatched() {
                UnmatchedPolicy::Error => {
                    return Err(PinlabelError::Unmatched {
                        diagnostics: unmatched,
                    });
                }
                UnmatchedPolicy::Warn => {
                    warnings.extend(unmatched.into_iter().map(SourcedDiagnostic::into_warning));
                }
            }
        }

        let internal: Vec<PinRecord> = internal
            .iter()
            .map(|pin| self.build_internal(pin, rows))
            .collect();

        for warning in &warnings {
            warn!("{warning}");
        }
        info!(
            records = records.len(),
            internal = internal.len(),
            warnings = warnings.len();
            "Pins resolved"
        );
        Ok(Resolution {
            records,
            internal,
            warnings,
        })
    }

    /// Chip pins of the pin table that no connector's port refers to,
    /// grouped by port in file order.
    fn internal_pins(&self, connectors: &[Connector<'a>]) -> Vec<InternalPin<'a>> {
        let Some(table) = self.names.pin_table() else {
            return Vec::new();
        };

        let mut internal: Vec<InternalPin<'a>> = Vec::new();
        for entry in table.entries() {
            if connectors.iter().any(|connector| connector.port == entry.pin()) {
                continue;
            }
            match internal.iter_mut().find(|pin| pin.port == entry.pin()) {
                Some(pin) => pin.aliases.push(entry.name()),
                None => {
                    debug!(name = entry.name(), port = entry.pin(); "Internal pin");
                    internal.push(InternalPin {
                        name: entry.name(),
                        aliases: Vec::new(),
                        port: entry.pin(),
                        row: None,
                    });
                }
            }
        }
        internal
    }

    fn build_internal(&self, pin: &InternalPin<'_>, rows: &[PinoutRow]) -> PinRecord {
        let names = self.names.names_for(pin.port, pin.name);
        let label = self.choose_label(&names, pin.name);
        let functions = pin
            .row
            .map(|index| rows[index].functions().to_vec())
            .unwrap_or_default();
        trace!(port = pin.port, label = label.as_str(); "Internal record built");

        PinRecord::internal(pin.name, pin.port)
            .with_logical_names(names)
            .with_functions(functions)
            .with_label(label)
    }

    fn connectors(&self) -> Vec<Connector<'a>> {
        let artwork = self.board.artwork();
        self.board
            .part()
            .connectors()
            .iter()
            .map(|decl| {
                let name = self.alias(decl.name());
                let port = self.names.port_for(name);
                let pad = decl
                    .svg_id()
                    .and_then(|svg_id| artwork.pad(svg_id))
                    .map(ArtworkPad::pad);
                if pad.is_none() {
                    debug!(connector = decl.id(), svg_id:? = decl.svg_id(); "Connector has no pad in the artwork");
                }
                trace!(connector = decl.id(), name, port; "Connector prepared");
                Connector {
                    decl,
                    name,
                    port,
                    pad,
                }
            })
            .collect()
    }

    fn alias(&self, name: &'a str) -> &'a str {
        self.aliases
            .iter()
            .find(|alias| alias.from() == name)
            .map_or(name, AliasConfig::to)
    }

    fn build_record(&self, row: &PinoutRow, claimed: &[&Connector<'a>]) -> Option<PinRecord> {
        let positioned: Vec<(&Connector<'a>, &Pad, Point)> = claimed
            .iter()
            .filter_map(|connector| {
                let pad = connector.pad?;
                Some((*connector, pad, connector.position()?))
            })
            .collect();
        let (connector, pad, position) = positioned
            .iter()
            .find(|(_, pad, _)| pad.shape() == PadShape::Circle)
            .or_else(|| positioned.first())
            .copied()?;

        let names = self.names.names_for(connector.port, connector.name);
        let label = self.choose_label(&names, connector.name);
        let side = Side::classify(position, self.board.artwork().canvas().view_box());
        debug!(
            key = row.key(),
            connector = connector.decl.id(),
            label = label.as_str(),
            side:% = side;
            "Pin record built"
        );

        Some(
            PinRecord::new(
                PhysicalPin::new(connector.decl.id(), connector.name),
                position,
                pad.shape(),
                row.key(),
            )
            .with_side(side)
            .with_logical_names(names)
            .with_functions(row.functions().to_vec())
            .with_label(label),
        )
    }

    /// The first name from the preferred source, else any name, else the
    /// connector name.
    fn choose_label(&self, names: &[LogicalName], connector_name: &str) -> String {
        let preferred = self.config.precedence();
        names
            .iter()
            .find(|name| name.source() == preferred)
            .or_else(|| names.first())
            .map_or_else(|| connector_name.to_string(), |name| name.name().to_string())
    }
}

fn already_described(what: &str, name: &str, row: &PinoutRow, first: &PinoutRow) -> Diagnostic {
    Diagnostic::warning(format!(
        "{what} `{name}` is already described by row `{}`",
        first.key()
    ))
    .with_code(ErrorCode::E303)
    .with_label(row.span(), "this row is ignored for it")
    .with_secondary_label(first.span(), "first matching row")
}
