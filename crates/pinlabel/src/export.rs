//! Export functionality for resolved boards.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! writing a [`BoardDocument`] to an output format. It is the final stage in
//! the pinlabel pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Board file, pin sources, pinout CSV
//!     ↓ load
//! Parsed inputs
//!     ↓ resolve, rename
//! BoardDocument
//!     ↓ export (this module)
//! pinlabels.svg, output.svg
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`PinlabelError::Export`] at the crate
//! boundary.
//!
//! [`PinlabelError::Export`]: crate::PinlabelError::Export

/// SVG export backend.
pub mod svg;

use pinlabel_core::board::BoardDocument;

/// Abstraction for board export backends.
pub trait Exporter {
    /// Exports a resolved board to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the board cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_board(&self, board: &BoardDocument) -> Result<(), Error>;
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
