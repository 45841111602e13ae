//! pinlabel CLI library
//!
//! This module contains the core CLI logic for the pinlabel tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Prefer};

use log::{info, warn};

use pinlabel::{Inputs, PinlabelError, PinoutBuilder, SourcedDiagnostic, config::UnmatchedPolicy};

use error_adapter::{Reportable, warning_reportables};

/// Run the pinlabel CLI application
///
/// This function resolves the board's pins from its inputs and writes the
/// label sheet and the overview sheet.
///
/// # Errors
///
/// Returns `PinlabelError` for:
/// - Configuration loading errors and invalid rename rules
/// - Missing or malformed input files
/// - Unmatched pins under the fatal policy
/// - Output write errors
pub fn run(args: &Args) -> Result<(), PinlabelError> {
    info!(
        board = args.board,
        pinout = args.pinout,
        output_path = args.output,
        labels_path = args.labels;
        "Processing board"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(prefer) = args.prefer {
        app_config.resolve_mut().set_precedence(prefer.into());
    }
    if args.allow_unmatched {
        app_config.resolve_mut().set_unmatched(UnmatchedPolicy::Warn);
    }

    let mut inputs = Inputs::new(&args.board, &args.pinout);
    if let Some(pins) = args.pin_definitions() {
        inputs = inputs.with_pin_definitions(pins);
    }
    if let Some(dir) = &args.arduino_variant {
        inputs = inputs.with_arduino_variant(dir);
    }

    let builder = args
        .renames()
        .fold(PinoutBuilder::new(app_config), |builder, (pattern, replacement)| {
            builder.with_rename(pattern, replacement)
        });

    let resolved = builder.resolve(&inputs)?;
    report_warnings(resolved.warnings());

    builder.write_labels(resolved.document(), &args.labels)?;
    builder.write_overview(resolved.document(), &args.output)?;

    info!(
        pins = resolved.document().records().len(),
        output_file = args.output,
        labels_file = args.labels;
        "SVG files exported successfully"
    );

    Ok(())
}

/// Renders each warning with its source snippet.
fn report_warnings(warnings: &[SourcedDiagnostic]) {
    if warnings.is_empty() {
        return;
    }

    let reporter = miette::GraphicalReportHandler::new();
    for reportable in warning_reportables(warnings) {
        warn!("{}", render(&reporter, &reportable));
    }
}

/// Renders one reportable to a string.
pub fn render(reporter: &miette::GraphicalReportHandler, reportable: &Reportable<'_>) -> String {
    let mut writer = String::new();
    if reporter.render_report(&mut writer, reportable).is_err() {
        return reportable.to_string();
    }
    writer
}
