//! Lookup of firmware names for a pin.

use pinlabel_core::pin::{LogicalName, NameSource};
use pinlabel_parser::{arduino::ArduinoVariant, pin_table::PinTable};

/// The firmware name sources of one run. Either may be absent.
#[derive(Debug, Default)]
pub struct NameIndex {
    pin_table: Option<PinTable>,
    arduino: Option<ArduinoVariant>,
}

impl NameIndex {
    pub fn new(pin_table: Option<PinTable>, arduino: Option<ArduinoVariant>) -> Self {
        Self { pin_table, arduino }
    }

    pub fn pin_table(&self) -> Option<&PinTable> {
        self.pin_table.as_ref()
    }

    pub fn arduino(&self) -> Option<&ArduinoVariant> {
        self.arduino.as_ref()
    }

    /// The chip pin a connector name refers to: the CircuitPython binding
    /// for that name, otherwise the name itself.
    pub fn port_for<'a>(&'a self, connector_name: &'a str) -> &'a str {
        self.pin_table
            .as_ref()
            .and_then(|table| table.pin_for(connector_name))
            .unwrap_or(connector_name)
    }

    /// Every logical name of `port`.
    ///
    /// CircuitPython names come first, starting with `connector_name` when it
    /// is one of them. Arduino names follow, matched on the pin number from
    /// [`NameIndex::arduino_number`].
    pub fn names_for(&self, port: &str, connector_name: &str) -> Vec<LogicalName> {
        let mut names = Vec::new();

        if let Some(table) = &self.pin_table {
            let bound = connector_first(table.names_for(port).collect(), connector_name);
            names.extend(
                bound
                    .into_iter()
                    .map(|name| LogicalName::new(name, NameSource::CircuitPython)),
            );
        }

        if let (Some(variant), Some(number)) = (&self.arduino, self.arduino_number(port, connector_name)) {
            let mut arduino: Vec<&str> = Vec::new();
            for name in variant.names_for(number) {
                if !arduino.contains(&name) {
                    arduino.push(name);
                }
            }
            names.extend(
                connector_first(arduino, connector_name)
                    .into_iter()
                    .map(|name| LogicalName::new(name, NameSource::Arduino)),
            );
        }

        names
    }

    /// The Arduino pin number of a connector.
    ///
    /// A port bound in `pins.c` is a chip pin, so its trailing number is the
    /// pin number. Otherwise the connector name must itself be a constant of
    /// the variant, e.g. `A0` for pin 18.
    pub fn arduino_number(&self, port: &str, connector_name: &str) -> Option<u32> {
        let variant = self.arduino.as_ref()?;
        let bound = self
            .pin_table
            .as_ref()
            .is_some_and(|table| table.pin_for(connector_name) == Some(port));
        if bound {
            trailing_number(port)
        } else {
            variant.number_of(connector_name)
        }
    }
}

/// Moves `connector_name` to the front when it is one of `names`.
fn connector_first<'a>(mut names: Vec<&'a str>, connector_name: &str) -> Vec<&'a str> {
    if let Some(index) = names.iter().position(|n| *n == connector_name) {
        let first = names.remove(index);
        names.insert(0, first);
    }
    names
}

/// The decimal number a port name ends with, e.g. `5` for `GPIO5` or `PA05`.
pub fn trailing_number(port: &str) -> Option<u32> {
    let digits = port.len() - port.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    port[port.len() - digits..].parse().ok()
}

#[cfg(test)]
mod tests {
    use pinlabel_parser::{arduino::VariantBuilder, pin_table::parse_pin_table};

    use super::*;

    fn index() -> NameIndex {
        let table = parse_pin_table(
            "{ MP_ROM_QSTR(MP_QSTR_IO5), MP_ROM_PTR(&pin_GPIO5) },
{ MP_ROM_QSTR(MP_QSTR_D5), MP_ROM_PTR(&pin_GPIO5) },
{ MP_ROM_QSTR(MP_QSTR_SCL), MP_ROM_PTR(&pin_GPIO4) },
",
        )
        .unwrap();
        let variant = VariantBuilder::new()
            .add_header("pins_arduino.h", "static const uint8_t D5 = 5;\nstatic const uint8_t SCL = 4;\n")
            .build()
            .unwrap();
        NameIndex::new(Some(table), Some(variant))
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number("GPIO5"), Some(5));
        assert_eq!(trailing_number("PA05"), Some(5));
        assert_eq!(trailing_number("GND"), None);
    }

    #[test]
    fn test_port_for() {
        let index = index();
        assert_eq!(index.port_for("D5"), "GPIO5");
        assert_eq!(index.port_for("GND"), "GND");
    }

    #[test]
    fn test_names_connector_first() {
        let index = index();
        let names = index.names_for("GPIO5", "D5");
        let listed: Vec<_> = names.iter().map(|n| (n.name(), n.source())).collect();
        assert_eq!(
            listed,
            vec![
                ("D5", NameSource::CircuitPython),
                ("IO5", NameSource::CircuitPython),
                ("D5", NameSource::Arduino),
            ]
        );
    }

    #[test]
    fn test_arduino_only_uses_constant_number() {
        let variant = VariantBuilder::new()
            .add_header("pins_arduino.h", "static const uint8_t RX = 0;\nstatic const uint8_t A0 = 18;\n")
            .build()
            .unwrap();
        let index = NameIndex::new(None, Some(variant));

        assert_eq!(index.arduino_number("A0", "A0"), Some(18));
        assert_eq!(
            index.names_for("A0", "A0"),
            vec![LogicalName::new("A0", NameSource::Arduino)]
        );
        assert!(index.names_for("GPIO0", "GPIO0").is_empty());
    }

    #[test]
    fn test_arduino_connector_name_first() {
        let variant = VariantBuilder::new()
            .add_header("variant.h", "#define PIN_WIRE_SCL (4u)\nstatic const uint8_t SCL = PIN_WIRE_SCL;\n")
            .build()
            .unwrap();
        let index = NameIndex::new(None, Some(variant));
        let names: Vec<_> = index.names_for("SCL", "SCL").into_iter().map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["SCL", "WIRE_SCL"]);
    }

    #[test]
    fn test_bound_port_uses_trailing_number() {
        let index = index();
        assert_eq!(index.arduino_number("GPIO4", "SCL"), Some(4));
        assert_eq!(index.arduino_number("GND", "GND"), None);
    }

    #[test]
    fn test_names_without_sources() {
        let index = NameIndex::default();
        assert!(index.names_for("GPIO5", "D5").is_empty());
        assert_eq!(index.port_for("D5"), "D5");
    }
}
