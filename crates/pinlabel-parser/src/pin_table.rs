//! CircuitPython board pin table (`pins.c`) parser.
//!
//! Only the global dictionary entries binding a name to a microcontroller
//! pin are read:
//!
//! ```c
//! { MP_ROM_QSTR(MP_QSTR_D5), MP_ROM_PTR(&pin_GPIO5) },
//! ```
//!
//! Entries bound to other objects (`&board_i2c_obj`) and everything else in
//! the file are ignored.

use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::delimited,
    error::{ContextError, ModalResult},
    stream::LocatingSlice,
    token::take_while,
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
};

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError>;

const ENTRY_START: &str = "MP_ROM_QSTR(";

/// One `name → pin` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinTableEntry {
    name: String,
    pin: String,
    span: Span,
}

impl PinTableEntry {
    /// The Python-visible name, e.g. `D5`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The microcontroller pin, e.g. `GPIO5`.
    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// All bindings of a `pins.c` file in file order.
#[derive(Debug, Clone, Default)]
pub struct PinTable {
    entries: Vec<PinTableEntry>,
}

impl PinTable {
    pub fn entries(&self) -> &[PinTableEntry] {
        &self.entries
    }

    /// The pin bound to `name` by its first entry.
    pub fn pin_for(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.pin.as_str())
    }

    /// Every name bound to `pin`, in file order.
    pub fn names_for<'a>(&'a self, pin: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.pin == pin)
            .map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn identifier<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)
}

/// `MP_ROM_QSTR(MP_QSTR_<name>), MP_ROM_PTR(&pin_<pin>)`
fn entry<'a>(input: &mut Input<'a>) -> IResult<((&'a str, &'a str), std::ops::Range<usize>)> {
    (
        delimited(
            (ENTRY_START, multispace0, "MP_QSTR_"),
            identifier,
            (multispace0, ')'),
        ),
        delimited(
            (multispace0, ',', multispace0, "MP_ROM_PTR(", multispace0, "&pin_"),
            identifier,
            (multispace0, ')'),
        ),
    )
        .with_span()
        .parse_next(input)
}

/// Parses a CircuitPython `pins.c` file.
///
/// # Errors
///
/// `E100` if the file has no pin bindings.
///
/// # Examples
///
/// ```
/// let source = r#"
/// STATIC const mp_rom_map_elem_t board_module_globals_table[] = {
///     { MP_ROM_QSTR(MP_QSTR_D5), MP_ROM_PTR(&pin_GPIO5) },
///     { MP_ROM_QSTR(MP_QSTR_I2C), MP_ROM_PTR(&board_i2c_obj) },
/// };
/// "#;
///
/// let table = pinlabel_parser::pin_table::parse_pin_table(source).unwrap();
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.pin_for("D5"), Some("GPIO5"));
/// ```
pub fn parse_pin_table(source: &str) -> Result<PinTable, ParseError> {
    let mut entries = Vec::new();
    let mut line_start = 0;

    for line in source.split_inclusive('\n') {
        let offset = line_start;
        line_start += line.len();

        if line.trim_start().starts_with("//") {
            continue;
        }
        let Some(found) = line.find(ENTRY_START) else {
            continue;
        };

        let base = offset + found;
        let mut input = LocatingSlice::new(&line[found..]);
        match entry(&mut input) {
            Ok(((name, pin), range)) => {
                let span = Span::new(range).offset_by(base);
                trace!(name, pin; "Pin table entry");
                entries.push(PinTableEntry {
                    name: name.to_string(),
                    pin: pin.to_string(),
                    span,
                });
            }
            Err(_) => trace!(line = line.trim(); "Skipping non-pin table entry"),
        }
    }

    if entries.is_empty() {
        return Err(Diagnostic::error("no pin bindings found in pin definition file")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..0), "in this file")
            .with_help("expected entries like `MP_ROM_QSTR(MP_QSTR_D5), MP_ROM_PTR(&pin_GPIO5)`")
            .into());
    }

    debug!(entries = entries.len(); "Pin table parsed");
    Ok(PinTable { entries })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const PINS_C: &str = r#"#include "shared-bindings/board/__init__.h"

STATIC const mp_rom_map_elem_t board_module_globals_table[] = {
    CIRCUITPYTHON_BOARD_DICT_STANDARD_ITEMS

    { MP_ROM_QSTR(MP_QSTR_A0), MP_ROM_PTR(&pin_GPIO18) },
    { MP_ROM_QSTR(MP_QSTR_D5), MP_ROM_PTR(&pin_GPIO5) },
    { MP_ROM_QSTR(MP_QSTR_IO5),MP_ROM_PTR(&pin_GPIO5) },
    // { MP_ROM_QSTR(MP_QSTR_D6), MP_ROM_PTR(&pin_GPIO6) },
    { MP_ROM_QSTR(MP_QSTR_SCL), MP_ROM_PTR(&pin_GPIO4) },
    { MP_ROM_QSTR(MP_QSTR_I2C), MP_ROM_PTR(&board_i2c_obj) },
};
"#;

    #[test]
    fn test_parse_entries() {
        let table = parse_pin_table(PINS_C).unwrap();
        let pairs: Vec<_> = table.entries().iter().map(|e| (e.name(), e.pin())).collect();
        assert_eq!(
            pairs,
            vec![("A0", "GPIO18"), ("D5", "GPIO5"), ("IO5", "GPIO5"), ("SCL", "GPIO4")]
        );
    }

    #[test]
    fn test_entry_span() {
        let table = parse_pin_table(PINS_C).unwrap();
        let span = table.entries()[1].span();
        assert_eq!(
            &PINS_C[span.range()],
            "MP_ROM_QSTR(MP_QSTR_D5), MP_ROM_PTR(&pin_GPIO5)"
        );
    }

    #[test]
    fn test_lookups() {
        let table = parse_pin_table(PINS_C).unwrap();
        assert_eq!(table.pin_for("SCL"), Some("GPIO4"));
        assert_eq!(table.pin_for("D6"), None);
        assert_eq!(table.names_for("GPIO5").collect::<Vec<_>>(), vec!["D5", "IO5"]);
    }

    #[test]
    fn test_no_entries() {
        let err = parse_pin_table("int main(void) { return 0; }\n").unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
    }

    proptest! {
        #[test]
        fn generated_entries_parse(
            name in "[A-Z][A-Z0-9_]{0,8}",
            pin in "GPIO[0-9]{1,2}",
            indent in " {0,8}"
        ) {
            let source = format!("{indent}{{ MP_ROM_QSTR(MP_QSTR_{name}), MP_ROM_PTR(&pin_{pin}) }},\n");
            let table = parse_pin_table(&source).unwrap();
            prop_assert_eq!(table.pin_for(&name), Some(pin.as_str()));
            let span = table.entries()[0].span();
            prop_assert!(source[span.range()].starts_with(ENTRY_START));
        }

        #[test]
        fn arbitrary_input_never_panics(source in "\\PC*") {
            let _ = parse_pin_table(&source);
        }
    }
}
