//! Error adapter for converting PinlabelError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! Parse errors and unmatched pins carry several diagnostics, possibly into
//! different files. Each diagnostic is rendered independently, with the
//! snippet of the file it points into.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, Severity, SourceSpan};

use pinlabel::{PinlabelError, SourceFile, SourcedDiagnostic};
use pinlabel_parser::Diagnostic;

/// Adapter for a single pinlabel diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    src: NamedSource<String>,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter over the file `diag` points into.
    pub fn new(diag: &'a Diagnostic, src: &SourceFile) -> Self {
        Self {
            diag,
            src: NamedSource::new(src.name(), src.text().to_string()),
        }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<Severity> {
        if self.diag.severity().is_warning() {
            Some(Severity::Warning)
        } else {
            Some(Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`PinlabelError`] variants without source locations.
pub struct ErrorAdapter<'a>(pub &'a PinlabelError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PinlabelError::Io(_) => "pinlabel::io",
            PinlabelError::Input { .. } => "pinlabel::input",
            PinlabelError::Parse { .. } | PinlabelError::Unmatched { .. } => return None,
            PinlabelError::Rule { .. } => "pinlabel::rule",
            PinlabelError::Config(_) => "pinlabel::config",
            PinlabelError::Export(_) => "pinlabel::export",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            PinlabelError::Rule { .. } => Some(Box::new(
                "patterns use the regex crate syntax, replacements accept \\1 or $1",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a pinlabel [`Span`](pinlabel_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: pinlabel_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`PinlabelError`] into a list of reportable errors.
///
/// Parse errors and unmatched pins give one [`Reportable`] per diagnostic.
/// Other variants give a single [`Reportable`].
pub fn to_reportables(err: &PinlabelError) -> Vec<Reportable<'_>> {
    match err {
        PinlabelError::Parse { err: parse_err, src, .. } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        PinlabelError::Unmatched { diagnostics } => warning_reportables(diagnostics),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// One [`Reportable`] per sourced diagnostic, e.g. resolution warnings.
pub fn warning_reportables(diagnostics: &[SourcedDiagnostic]) -> Vec<Reportable<'_>> {
    diagnostics
        .iter()
        .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d.diagnostic(), d.src())))
        .collect()
}

#[cfg(test)]
mod tests {
    use pinlabel::InputKind;
    use pinlabel_parser::{ErrorCode, ParseError, Span};

    use super::*;

    #[test]
    fn test_parse_error_per_diagnostic() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E200)
                .with_label(Span::new(0..5), "first"),
            Diagnostic::error("second error").with_label(Span::new(6..10), "second"),
        ];
        let err = PinlabelError::new_parse_error(
            InputKind::Pinout,
            ParseError::from(diags),
            SourceFile::new("pinout.csv", "GPIO,ADC\nGPIO4,\n"),
        );

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
    }

    #[test]
    fn test_unmatched_per_diagnostic() {
        let diagnostics = vec![
            SourcedDiagnostic::new(
                Diagnostic::error("pinout row `GPIO99` has no connector on the board")
                    .with_code(ErrorCode::E300)
                    .with_label(Span::new(9..15), "not on the board"),
                SourceFile::new("pinout.csv", "GPIO,ADC\nGPIO99,\n"),
            ),
            SourcedDiagnostic::new(
                Diagnostic::error("connector `VBAT` is not in the pinout table")
                    .with_code(ErrorCode::E301),
                SourceFile::new("feather.fzp", "<module/>"),
            ),
        ];
        let err = PinlabelError::Unmatched { diagnostics };

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);
        assert!(reportables[0].to_string().contains("GPIO99"));
        assert!(reportables[0].labels().is_some());
        assert!(reportables[1].labels().is_none());
    }

    #[test]
    fn test_warning_severity() {
        let warning = SourcedDiagnostic::new(
            Diagnostic::warning("row has no position").with_code(ErrorCode::E302),
            SourceFile::new("pinout.csv", ""),
        );
        let reportables = warning_reportables(std::slice::from_ref(&warning));
        assert_eq!(reportables[0].severity(), Some(Severity::Warning));
    }

    #[test]
    fn test_non_diagnostic_error() {
        let err = PinlabelError::Config("font_size must be positive, got 0".to_string());

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(
                    e.to_string(),
                    "Configuration error: font_size must be positive, got 0"
                );
                assert_eq!(e.code().unwrap().to_string(), "pinlabel::config");
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_primary_flag_on_labels() {
        let diag = Diagnostic::error("connector claimed twice")
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(6..10), "secondary");
        let src = SourceFile::new("pinout.csv", "GND,1\nGND,2\n");

        let adapter = DiagnosticAdapter::new(&diag, &src);

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }
}
