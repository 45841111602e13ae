//! Error types for pinlabel operations.
//!
//! This module provides the main error type [`PinlabelError`] which wraps
//! the error conditions of loading, resolving and exporting a board.

use std::{fmt, io, path::PathBuf, sync::Arc};

use thiserror::Error;

use pinlabel_parser::{Diagnostic, ParseError};

/// The input files pinlabel reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Board,
    Artwork,
    PinDefinitions,
    ArduinoVariant,
    Pinout,
}

impl InputKind {
    /// Process exit code for a failure reading or parsing this input.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Board | Self::Artwork => 3,
            Self::PinDefinitions | Self::ArduinoVariant | Self::Pinout => 4,
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Board => "board file",
            Self::Artwork => "breadboard artwork",
            Self::PinDefinitions => "pin definition file",
            Self::ArduinoVariant => "Arduino variant",
            Self::Pinout => "pinout table",
        };
        f.write_str(name)
    }
}

/// Name and full text of a file diagnostics point into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    text: Arc<str>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A diagnostic together with the file its spans refer to.
#[derive(Debug, Clone)]
pub struct SourcedDiagnostic {
    diagnostic: Diagnostic,
    src: SourceFile,
}

impl SourcedDiagnostic {
    pub fn new(diagnostic: Diagnostic, src: SourceFile) -> Self {
        Self { diagnostic, src }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    pub fn src(&self) -> &SourceFile {
        &self.src
    }

    /// Downgrades the diagnostic to a warning.
    pub fn into_warning(self) -> Self {
        Self {
            diagnostic: self.diagnostic.into_warning(),
            src: self.src,
        }
    }
}

impl fmt::Display for SourcedDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.src.name, self.diagnostic)
    }
}

/// The main error type for pinlabel operations.
///
/// # Diagnostic Variants
///
/// `Parse` and `Unmatched` carry [`Diagnostic`]s with spans into the
/// offending file, so callers can render source snippets.
#[derive(Debug, Error)]
pub enum PinlabelError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot read {kind} `{}`: {source}", .path.display())]
    Input {
        kind: InputKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{err}")]
    Parse {
        kind: InputKind,
        err: ParseError,
        src: SourceFile,
    },

    #[error("unmatched pins ({})", .diagnostics.len())]
    Unmatched { diagnostics: Vec<SourcedDiagnostic> },

    #[error("invalid rename rule `{pattern}`: {message}")]
    Rule { pattern: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for PinlabelError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl PinlabelError {
    /// Create a new `Parse` error with the file it came from.
    pub fn new_parse_error(kind: InputKind, err: ParseError, src: SourceFile) -> Self {
        Self::Parse { kind, err, src }
    }

    /// Create a new `Input` error for a file that could not be read.
    pub fn new_input_error(kind: InputKind, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Input {
            kind,
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error.
    ///
    /// `1` output or I/O failure, `2` invalid rule or configuration, `3` board
    /// input, `4` pin source input, `5` unmatched pins.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) | Self::Export(_) => 1,
            Self::Rule { .. } | Self::Config(_) => 2,
            Self::Input { kind, .. } | Self::Parse { kind, .. } => kind.exit_code(),
            Self::Unmatched { .. } => 5,
        }
    }
}
