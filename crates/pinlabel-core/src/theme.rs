//! Label categories and their box styling.
//!
//! Every box drawn in the overview belongs to a [`LabelKind`]. The palette is
//! chosen to stay distinguishable under the common forms of color blindness.

use std::fmt;

use crate::{color::Color, pin::PadShape};

/// Stroke of a label box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outline {
    None,
    /// Fill color at half brightness.
    Auto,
}

/// Resolved styling of a label box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelTheme {
    fill: Color,
    outline: Option<Color>,
    text_color: Color,
    bold: bool,
}

impl LabelTheme {
    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn outline(&self) -> Option<Color> {
        self.outline
    }

    /// White on dark fills, black otherwise.
    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn font_weight(&self) -> &'static str {
        if self.bold { "bold" } else { "normal" }
    }
}

/// The category of a label box, in legend order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelKind {
    CircuitPythonName,
    Power,
    Gnd,
    Control,
    Arduino,
    Port,
    Analog,
    Pwm,
    Uart,
    Spi,
    I2c,
    QtScl,
    QtSda,
    ExtInt,
    PcInt,
    Misc,
    Misc2,
}

impl LabelKind {
    /// All kinds in legend order.
    pub const ALL: [LabelKind; 17] = [
        Self::CircuitPythonName,
        Self::Power,
        Self::Gnd,
        Self::Control,
        Self::Arduino,
        Self::Port,
        Self::Analog,
        Self::Pwm,
        Self::Uart,
        Self::Spi,
        Self::I2c,
        Self::QtScl,
        Self::QtSda,
        Self::ExtInt,
        Self::PcInt,
        Self::Misc,
        Self::Misc2,
    ];

    /// Legend text for this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::CircuitPythonName => "CircuitPython Name",
            Self::Power => "Power",
            Self::Gnd => "GND",
            Self::Control => "Control",
            Self::Arduino => "Arduino",
            Self::Port => "Port",
            Self::Analog => "Analog",
            Self::Pwm => "PWM",
            Self::Uart => "UART",
            Self::Spi => "SPI",
            Self::I2c => "I2C",
            Self::QtScl => "QT_SCL",
            Self::QtSda => "QT_SDA",
            Self::ExtInt => "ExtInt",
            Self::PcInt => "PCInt",
            Self::Misc => "Misc",
            Self::Misc2 => "Misc2",
        }
    }

    fn fill_rgb(self) -> (u8, u8, u8) {
        match self {
            Self::CircuitPythonName => (0xE6, 0xE6, 0xE6),
            Self::Power => (0x92, 0x00, 0x00),
            Self::Gnd => (0x00, 0x00, 0x00),
            Self::Control => (0x00, 0x49, 0x49),
            Self::Arduino => (0x00, 0xFF, 0x00),
            Self::Port | Self::QtScl => (0xFF, 0xFF, 0x6D),
            Self::Analog => (0xDB, 0x6D, 0x00),
            Self::Pwm => (0xFF, 0xB6, 0xDB),
            Self::Uart => (0xB6, 0xDB, 0xFF),
            Self::Spi => (0x24, 0xFF, 0x24),
            Self::I2c => (0xB6, 0x6D, 0xFF),
            Self::QtSda => (0x00, 0x6D, 0xDB),
            Self::ExtInt => (0xFF, 0x00, 0xFF),
            Self::PcInt => (0xFF, 0xC0, 0x00),
            Self::Misc => (0xA0, 0xA0, 0xFF),
            Self::Misc2 => (0xC0, 0xC0, 0xFF),
        }
    }

    fn outline(self) -> Outline {
        match self {
            Self::CircuitPythonName => Outline::Auto,
            _ => Outline::None,
        }
    }

    fn bold(self) -> bool {
        matches!(
            self,
            Self::CircuitPythonName
                | Self::Power
                | Self::Gnd
                | Self::Control
                | Self::Arduino
                | Self::QtScl
                | Self::QtSda
        )
    }

    /// Resolves fill, outline and text color for this kind.
    pub fn theme(self) -> LabelTheme {
        let (r, g, b) = self.fill_rgb();
        let fill = Color::from_rgb8(r, g, b);
        let outline = match self.outline() {
            Outline::None => None,
            Outline::Auto => Some(fill.darkened()),
        };
        let text_color = if fill.is_dark() {
            Color::from_rgb8(0xFF, 0xFF, 0xFF)
        } else {
            Color::from_rgb8(0x00, 0x00, 0x00)
        };
        LabelTheme {
            fill,
            outline,
            text_color,
            bold: self.bold(),
        }
    }

    /// Picks the kind of a pin's name box.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pinlabel_core::pin::PadShape;
    /// # use pinlabel_core::theme::LabelKind;
    /// assert_eq!(LabelKind::for_pin_name("3.3V", PadShape::Circle), LabelKind::Power);
    /// assert_eq!(LabelKind::for_pin_name("SCL", PadShape::Ellipse), LabelKind::QtScl);
    /// assert_eq!(LabelKind::for_pin_name("SCL", PadShape::Circle), LabelKind::CircuitPythonName);
    /// ```
    pub fn for_pin_name(name: &str, shape: PadShape) -> Self {
        match name {
            "3.3V" | "5V" | "VBAT" | "VBUS" | "VHI" => Self::Power,
            "GND" => Self::Gnd,
            "EN" | "RESET" | "SWCLK" | "SWC" | "SWDIO" | "SWD" => Self::Control,
            "SCL" | "SCL0" | "SCL1" if shape == PadShape::Ellipse => Self::QtScl,
            "SDA" | "SDA0" | "SDA1" if shape == PadShape::Ellipse => Self::QtSda,
            _ => Self::CircuitPythonName,
        }
    }

    /// Picks the kind of a pinout function box from its column header.
    pub fn for_column(column: &str) -> Self {
        match column.trim().to_ascii_uppercase().as_str() {
            "GPIO" => Self::Port,
            "SPI" => Self::Spi,
            "I2C" => Self::I2c,
            "UART" => Self::Uart,
            "PWM" => Self::Pwm,
            "ADC" | "ANALOG" => Self::Analog,
            "ARDUINO" => Self::Arduino,
            "EXTINT" | "EINT" => Self::ExtInt,
            "PCINT" => Self::PcInt,
            _ => Self::Misc,
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_box_kinds() {
        assert_eq!(LabelKind::for_pin_name("GND", PadShape::Rect), LabelKind::Gnd);
        assert_eq!(LabelKind::for_pin_name("RESET", PadShape::Circle), LabelKind::Control);
        assert_eq!(LabelKind::for_pin_name("VBUS", PadShape::Circle), LabelKind::Power);
        assert_eq!(LabelKind::for_pin_name("SDA1", PadShape::Ellipse), LabelKind::QtSda);
        assert_eq!(
            LabelKind::for_pin_name("A0", PadShape::Circle),
            LabelKind::CircuitPythonName
        );
    }

    #[test]
    fn test_column_kinds() {
        assert_eq!(LabelKind::for_column("GPIO"), LabelKind::Port);
        assert_eq!(LabelKind::for_column("adc"), LabelKind::Analog);
        assert_eq!(LabelKind::for_column(" SPI "), LabelKind::Spi);
        assert_eq!(LabelKind::for_column("Touch"), LabelKind::Misc);
    }

    #[test]
    fn test_theme_text_color_follows_lightness() {
        let white = Color::from_rgb8(0xFF, 0xFF, 0xFF);
        let black = Color::from_rgb8(0, 0, 0);
        assert_eq!(LabelKind::Power.theme().text_color(), white);
        assert_eq!(LabelKind::Gnd.theme().text_color(), white);
        assert_eq!(LabelKind::QtSda.theme().text_color(), white);
        assert_eq!(LabelKind::Port.theme().text_color(), black);
        assert_eq!(LabelKind::Spi.theme().text_color(), black);
    }

    #[test]
    fn test_theme_auto_outline() {
        let theme = LabelKind::CircuitPythonName.theme();
        assert_eq!(theme.outline().map(Color::to_hex).as_deref(), Some("#737373"));
        assert!(LabelKind::Port.theme().outline().is_none());
    }

    #[test]
    fn test_theme_font_weight() {
        assert_eq!(LabelKind::QtScl.theme().font_weight(), "bold");
        assert_eq!(LabelKind::Port.theme().font_weight(), "normal");
    }

    #[test]
    fn test_all_is_in_legend_order() {
        let mut sorted = LabelKind::ALL;
        sorted.sort();
        assert_eq!(sorted, LabelKind::ALL);
        assert_eq!(LabelKind::ALL[0].name(), "CircuitPython Name");
    }
}
