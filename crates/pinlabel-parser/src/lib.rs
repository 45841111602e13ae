//! # Pinlabel Parser
//!
//! Parsers for every input pinlabel reads. Each parser takes the full text
//! of one file and returns its typed contents or a [`ParseError`] carrying
//! [`Diagnostic`]s with [`Span`]s into that text.
//!
//! | Input | Parser |
//! |-------|--------|
//! | Fritzing part file (`.fzp`) | [`fzp::parse_part`] |
//! | Breadboard artwork (`.svg`) | [`breadboard::parse_artwork`] |
//! | CircuitPython `pins.c` | [`pin_table::parse_pin_table`] |
//! | Arduino variant headers | [`arduino::VariantBuilder`] |
//! | Pinout CSV | [`pinout::parse_pinout`] |
//!
//! ## Usage
//!
//! ```
//! # use pinlabel_parser::{ParseError, pinout};
//! fn main() -> Result<(), ParseError> {
//!     let table = pinout::parse_pinout("GPIO,I2C\nGPIO4,SCL\n")?;
//!     assert_eq!(table.rows().len(), 1);
//!     Ok(())
//! }
//! ```

pub mod arduino;
pub mod breadboard;
pub mod error;
pub mod fzp;
pub mod pin_table;
pub mod pinout;
mod span;
mod svg_attr;
mod xml;

pub use error::{Diagnostic, ErrorCode, ParseError, Severity};
pub use span::Span;
