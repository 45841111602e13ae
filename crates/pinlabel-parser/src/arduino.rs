//! Arduino variant header parser.
//!
//! A variant directory (e.g. `variants/feather_esp32s3/`) declares pin
//! numbers in one or more headers, either as constants or as defines:
//!
//! ```c
//! static const uint8_t A0 = 18;
//! static const uint8_t SDA = PIN_WIRE_SDA;
//! #define PIN_WIRE_SDA (3u)
//! ```
//!
//! Headers are parsed independently and then resolved together, so an alias
//! may refer to a constant from another header.

use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};
use winnow::{
    Parser as _,
    ascii::{digit1, hex_digit1, space0, space1},
    combinator::{alt, delimited, preceded, terminated},
    error::{ContextError, ModalResult},
    token::{take_till, take_while},
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
};

type IResult<O> = ModalResult<O, ContextError>;

/// A pin number with the name a variant gives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArduinoPin {
    name: String,
    number: u32,
    header: String,
}

impl ArduinoPin {
    /// The constant's name, `PIN_` prefix removed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// The header the constant was declared in.
    pub fn header(&self) -> &str {
        &self.header
    }
}

/// A warning raised while resolving, together with the header its span
/// refers to.
#[derive(Debug)]
pub struct HeaderDiagnostic {
    header: String,
    diagnostic: Diagnostic,
}

impl HeaderDiagnostic {
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }
}

/// All resolved pins of a variant.
#[derive(Debug, Default)]
pub struct ArduinoVariant {
    pins: Vec<ArduinoPin>,
    warnings: Vec<HeaderDiagnostic>,
}

impl ArduinoVariant {
    /// Pins in declaration order, one per distinct `(name, number)`.
    pub fn pins(&self) -> &[ArduinoPin] {
        &self.pins
    }

    /// Names declared for `number`, in declaration order.
    pub fn names_for(&self, number: u32) -> impl Iterator<Item = &str> {
        self.pins
            .iter()
            .filter(move |p| p.number == number)
            .map(|p| p.name.as_str())
    }

    /// The number of the first pin named `name`.
    pub fn number_of(&self, name: &str) -> Option<u32> {
        self.pins.iter().find(|p| p.name == name).map(|p| p.number)
    }

    /// Aliases that could not be resolved.
    pub fn warnings(&self) -> &[HeaderDiagnostic] {
        &self.warnings
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value<'a> {
    Number(u32),
    Alias(&'a str),
}

#[derive(Debug)]
struct Constant<'a> {
    raw_name: &'a str,
    value: Value<'a>,
    header: usize,
    span: Span,
}

impl Constant<'_> {
    fn display_name(&self) -> &str {
        self.raw_name.strip_prefix("PIN_").unwrap_or(self.raw_name)
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn identifier<'a>(input: &mut &'a str) -> IResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
        .verify(|text: &str| is_identifier(text))
        .parse_next(input)
}

/// `13`, `(13u)`, `0x0D`, `((13UL))` or a bare identifier.
fn value<'a>(input: &mut &'a str) -> IResult<Value<'a>> {
    alt((
        delimited(('(', space0), value, (space0, ')')),
        terminated(
            alt((
                preceded(alt(("0x", "0X")), hex_digit1)
                    .try_map(|digits: &str| u32::from_str_radix(digits, 16)),
                digit1.try_map(|digits: &str| digits.parse::<u32>()),
            )),
            take_while(0.., ['u', 'U', 'l', 'L']),
        )
        .map(Value::Number),
        identifier.map(Value::Alias),
    ))
    .parse_next(input)
}

/// `static const <type> NAME = VALUE;`
fn static_const<'a>(input: &mut &'a str) -> IResult<(&'a str, Value<'a>)> {
    preceded(
        (space0, "static", space1, "const", space1),
        (
            take_till(1.., '=').verify_map(|decl: &'a str| {
                decl.split_whitespace()
                    .last()
                    .filter(|name| is_identifier(name))
            }),
            delimited(('=', space0), value, (space0, ';')),
        ),
    )
    .parse_next(input)
}

/// `#define PIN_NAME VALUE`
fn define_pin<'a>(input: &mut &'a str) -> IResult<(&'a str, Value<'a>)> {
    preceded(
        (space0, '#', space0, "define", space1),
        (
            identifier.verify(|name: &str| name.starts_with("PIN_")),
            preceded(space1, value),
        ),
    )
    .parse_next(input)
}

/// Parses one line, accepting only a trailing comment after the declaration.
fn declaration(line: &str) -> Option<(&str, Value<'_>)> {
    let mut input = line;
    let parsed = alt((static_const, define_pin)).parse_next(&mut input).ok()?;
    let rest = input.trim();
    (rest.is_empty() || rest.starts_with("//") || rest.starts_with("/*")).then_some(parsed)
}

/// Collects variant headers and resolves their pin constants.
///
/// # Examples
///
/// ```
/// use pinlabel_parser::arduino::VariantBuilder;
///
/// let variant = VariantBuilder::new()
///     .add_header("pins_arduino.h", "static const uint8_t SDA = PIN_WIRE_SDA;\n")
///     .add_header("variant.h", "#define PIN_WIRE_SDA (3u)\n")
///     .build()
///     .unwrap();
///
/// let names: Vec<_> = variant.names_for(3).collect();
/// assert_eq!(names, vec!["SDA", "WIRE_SDA"]);
/// ```
#[derive(Debug, Default)]
pub struct VariantBuilder {
    headers: Vec<(String, String)>,
}

impl VariantBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header. Headers are resolved in the order they are added.
    pub fn add_header(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.headers.push((name.into(), text.into()));
        self
    }

    /// Parses every header and resolves aliases across them.
    ///
    /// # Errors
    ///
    /// `E101` if no pin number could be resolved. Unresolved aliases are
    /// `E102` warnings available from [`ArduinoVariant::warnings`].
    pub fn build(self) -> Result<ArduinoVariant, ParseError> {
        let constants = self.collect_constants();
        debug!(headers = self.headers.len(), constants = constants.len(); "Variant headers scanned");

        let mut by_raw: HashMap<&str, usize> = HashMap::new();
        let mut by_display: HashMap<&str, usize> = HashMap::new();
        for (index, constant) in constants.iter().enumerate() {
            by_raw.entry(constant.raw_name).or_insert(index);
            by_display.entry(constant.display_name()).or_insert(index);
        }
        let lookup = |name: &str| by_raw.get(name).or_else(|| by_display.get(name)).copied();

        let mut pins = Vec::new();
        let mut seen_pins = HashSet::new();
        let mut warnings = Vec::new();

        for constant in &constants {
            match resolve(&constants, constant, &lookup) {
                Ok(number) => {
                    let name = constant.display_name();
                    if seen_pins.insert((name, number)) {
                        trace!(name, number; "Arduino pin resolved");
                        pins.push(ArduinoPin {
                            name: name.to_string(),
                            number,
                            header: self.headers[constant.header].0.clone(),
                        });
                    }
                }
                Err(message) => {
                    let header = self.headers[constant.header].0.clone();
                    warn!(header = header.as_str(), constant = constant.raw_name; "{message}");
                    warnings.push(HeaderDiagnostic {
                        header,
                        diagnostic: Diagnostic::warning(message)
                            .with_code(ErrorCode::E102)
                            .with_label(constant.span, "declared here"),
                    });
                }
            }
        }

        if pins.is_empty() {
            return Err(Diagnostic::error("no Arduino pin constants found in variant")
                .with_code(ErrorCode::E101)
                .with_help(
                    "expected `static const uint8_t NAME = VALUE;` or `#define PIN_NAME VALUE`",
                )
                .into());
        }

        debug!(pins = pins.len(), warnings = warnings.len(); "Arduino variant resolved");
        Ok(ArduinoVariant { pins, warnings })
    }

    fn collect_constants(&self) -> Vec<Constant<'_>> {
        let mut constants = Vec::new();
        for (header, (_, text)) in self.headers.iter().enumerate() {
            let mut line_start = 0;
            for line in text.split_inclusive('\n') {
                let offset = line_start;
                line_start += line.len();

                let line = line.trim_end_matches(['\r', '\n']);
                if let Some((raw_name, value)) = declaration(line) {
                    let indent = line.len() - line.trim_start().len();
                    constants.push(Constant {
                        raw_name,
                        value,
                        header,
                        span: Span::new(offset + indent..offset + line.len()),
                    });
                }
            }
        }
        constants
    }
}

/// Follows aliases until a number is reached.
fn resolve<'a>(
    constants: &[Constant<'a>],
    start: &Constant<'a>,
    lookup: impl Fn(&str) -> Option<usize>,
) -> Result<u32, String> {
    let mut current = start;
    let mut visited = HashSet::new();
    loop {
        match current.value {
            Value::Number(number) => return Ok(number),
            Value::Alias(target) => {
                if !visited.insert(target) {
                    return Err(format!(
                        "`{}` is part of an alias cycle through `{target}`",
                        start.raw_name
                    ));
                }
                let Some(index) = lookup(target) else {
                    return Err(format!(
                        "`{}` refers to unknown constant `{target}`",
                        start.raw_name
                    ));
                };
                current = &constants[index];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PINS_ARDUINO: &str = "#ifndef Pins_Arduino_h
#define Pins_Arduino_h

#include <stdint.h>

static const uint8_t LED_BUILTIN = 13;
static const uint8_t A0 = 18; // analog
static const uint8_t SDA = PIN_WIRE_SDA;
static const uint8_t SCL = 4;
static const uint8_t MISO = SPI_MISO_PIN;
static const uint8_t pins[] = { 1, 2 };

#endif
";

    const VARIANT_H: &str = "#define PIN_WIRE_SDA (3u)
#define PIN_LED PIN_LED_BUILTIN
#define PIN_LED_BUILTIN LED_BUILTIN
#define PIN_A0 (0x12)
#define PIN_LOOP_A PIN_LOOP_B
#define PIN_LOOP_B PIN_LOOP_A
#define PIN_COUNT (PINS + 1)
";

    fn variant() -> ArduinoVariant {
        VariantBuilder::new()
            .add_header("pins_arduino.h", PINS_ARDUINO)
            .add_header("variant.h", VARIANT_H)
            .build()
            .unwrap()
    }

    #[test]
    fn test_value_forms() {
        assert_eq!(value.parse("13").ok(), Some(Value::Number(13)));
        assert_eq!(value.parse("(13u)").ok(), Some(Value::Number(13)));
        assert_eq!(value.parse("((7UL))").ok(), Some(Value::Number(7)));
        assert_eq!(value.parse("0x1A").ok(), Some(Value::Number(26)));
        assert_eq!(value.parse("PIN_A1").ok(), Some(Value::Alias("PIN_A1")));
        assert!(value.parse("(A0 + 1)").is_err());
    }

    #[test]
    fn test_declaration_shapes() {
        assert_eq!(
            declaration("static const uint8_t A0 = 18; // analog"),
            Some(("A0", Value::Number(18)))
        );
        assert_eq!(
            declaration("  static const unsigned int SS = PIN_SPI_SS;"),
            Some(("SS", Value::Alias("PIN_SPI_SS")))
        );
        assert_eq!(
            declaration("#define PIN_LED (13u)"),
            Some(("PIN_LED", Value::Number(13)))
        );
        assert_eq!(declaration("#define LED_COUNT 3"), None);
        assert_eq!(declaration("static const uint8_t pins[] = { 1, 2 };"), None);
        assert_eq!(declaration("#define PIN_COUNT (PINS + 1)"), None);
    }

    #[test]
    fn test_resolves_numbers_and_aliases() {
        let variant = variant();
        assert_eq!(variant.names_for(13).collect::<Vec<_>>(), vec!["LED_BUILTIN", "LED"]);
        assert_eq!(variant.names_for(3).collect::<Vec<_>>(), vec!["SDA", "WIRE_SDA"]);
        assert_eq!(variant.names_for(4).collect::<Vec<_>>(), vec!["SCL"]);
    }

    #[test]
    fn test_dedupes_same_name_and_number() {
        let variant = variant();
        // `A0 = 18` and `PIN_A0 (0x12)` both name pin 18
        assert_eq!(variant.names_for(18).collect::<Vec<_>>(), vec!["A0"]);
        assert_eq!(variant.pins().iter().find(|p| p.name() == "A0").unwrap().header(), "pins_arduino.h");
    }

    #[test]
    fn test_unresolved_aliases_are_warnings() {
        let variant = variant();
        let messages: Vec<_> = variant
            .warnings()
            .iter()
            .map(|w| (w.header(), w.diagnostic().message().to_string()))
            .collect();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].0, "pins_arduino.h");
        assert!(messages[0].1.contains("unknown constant `SPI_MISO_PIN`"));
        assert!(messages[1].1.contains("alias cycle"));
        assert!(
            variant
                .warnings()
                .iter()
                .all(|w| w.diagnostic().code() == Some(ErrorCode::E102)
                    && w.diagnostic().severity().is_warning())
        );

        let span = variant.warnings()[0].diagnostic().labels()[0].span();
        assert_eq!(&PINS_ARDUINO[span.range()], "static const uint8_t MISO = SPI_MISO_PIN;");
    }

    #[test]
    fn test_no_constants_is_an_error() {
        let err = VariantBuilder::new()
            .add_header("empty.h", "#pragma once\n")
            .build()
            .unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E101));
    }
}
