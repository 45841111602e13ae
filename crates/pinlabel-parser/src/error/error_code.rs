//! Error codes for the pinlabel diagnostic system.
//!
//! Error codes are organized by input:
//! - `E0xx` - Part file and breadboard artwork
//! - `E1xx` - Pin tables (CircuitPython `pins.c`, Arduino variants)
//! - `E2xx` - Pinout CSV
//! - `E3xx` - Resolution across inputs

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Part and artwork errors (E0xx)
    // =========================================================================
    /// Malformed XML.
    ///
    /// The part file or the breadboard SVG is not well-formed XML.
    E001,

    /// No connectors.
    ///
    /// The part file declares no `connectors/connector` elements.
    E002,

    /// Missing connector attribute.
    ///
    /// A connector lacks its `id` or `name` attribute.
    E003,

    /// Malformed artwork.
    ///
    /// The breadboard file is XML but its root is not an `<svg>` element.
    E004,

    /// Invalid length or transform.
    ///
    /// A `width`, `height`, `viewBox` or `transform` value cannot be parsed.
    E005,

    /// Duplicate connector id.
    ///
    /// Two connectors in the part file share the same `id`.
    E006,

    // =========================================================================
    // Pin table errors (E1xx)
    // =========================================================================
    /// No pin table entries.
    ///
    /// The CircuitPython pin definition file contains no
    /// `MP_ROM_QSTR(...), MP_ROM_PTR(&pin_...)` entries.
    E100,

    /// No Arduino pin constants.
    ///
    /// No header in the variant directory defines a pin constant.
    E101,

    /// Unresolved Arduino alias.
    ///
    /// A constant refers to a name that is not defined anywhere in the variant.
    E102,

    // =========================================================================
    // Pinout CSV errors (E2xx)
    // =========================================================================
    /// Malformed CSV.
    ///
    /// A record could not be read, e.g. invalid UTF-8 or an unterminated quote.
    E200,

    /// Empty pin key.
    ///
    /// A row has an empty value in the key column.
    E201,

    /// Duplicate pin key.
    ///
    /// Two rows share the same key.
    E202,

    /// Empty pinout table.
    ///
    /// The file has no header or no data rows.
    E203,

    // =========================================================================
    // Resolution errors (E3xx)
    // =========================================================================
    /// Pinout row not on the board.
    ///
    /// No connector's name or port matches the row key.
    E300,

    /// Connector without a pinout row.
    ///
    /// No row key matches the connector's name or port.
    E301,

    /// Pinout row without a position.
    ///
    /// The row matched connectors but none of them has a positioned pad.
    E302,

    /// Connector matched by several rows.
    ///
    /// Only the first matching row claims the connector.
    E303,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed XML",
            ErrorCode::E002 => "no connectors",
            ErrorCode::E003 => "missing connector attribute",
            ErrorCode::E004 => "malformed artwork",
            ErrorCode::E005 => "invalid length or transform",
            ErrorCode::E006 => "duplicate connector id",
            ErrorCode::E100 => "no pin table entries",
            ErrorCode::E101 => "no Arduino pin constants",
            ErrorCode::E102 => "unresolved Arduino alias",
            ErrorCode::E200 => "malformed CSV",
            ErrorCode::E201 => "empty pin key",
            ErrorCode::E202 => "duplicate pin key",
            ErrorCode::E203 => "empty pinout table",
            ErrorCode::E300 => "pinout row not on the board",
            ErrorCode::E301 => "connector without a pinout row",
            ErrorCode::E302 => "pinout row without a position",
            ErrorCode::E303 => "connector matched by several rows",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
