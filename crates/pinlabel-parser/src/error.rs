//! Error and diagnostic system for the pinlabel input parsers.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! Every parser reports problems as [`Diagnostic`]s pointing into the text it
//! was given. Multiple diagnostics are wrapped in [`ParseError`] for returning
//! from a parse call; the caller attaches the file name and text when
//! rendering them.
//!
//! # Example
//!
//! ```
//! # use pinlabel_parser::error::{Diagnostic, ErrorCode};
//! # use pinlabel_parser::Span;
//!
//! let span = Span::new(100..120);
//! let original_span = Span::new(50..70);
//!
//! let diag = Diagnostic::error("pinout row `GPIO5` is listed twice")
//!     .with_code(ErrorCode::E202)
//!     .with_label(span, "duplicate row")
//!     .with_secondary_label(original_span, "first listed here")
//!     .with_help("remove one of the rows");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
