//! Color handling for pinlabel output
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, adding the few operations label themes need:
//! perceived lightness for choosing a text color and a darkened variant for
//! automatic box outlines.

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{AlphaColor, DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use pinlabel_core::color::Color;
    ///
    /// let power = Color::new("#920000").unwrap();
    /// let gnd = Color::new("black").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates an opaque color from 8-bit sRGB channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            color: DynamicColor::from_alpha_color(AlphaColor::<Srgb>::from_rgba8(r, g, b, 255)),
        }
    }

    /// Creates a new color with the specified alpha (transparency) value.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Returns the 8-bit sRGB channels of this color, ignoring alpha.
    pub fn rgb8(self) -> (u8, u8, u8) {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        (rgba.r, rgba.g, rgba.b)
    }

    /// Perceived lightness on a 0-255 scale (`0.299 R + 0.587 G + 0.114 B`).
    ///
    /// # Examples
    ///
    /// ```
    /// use pinlabel_core::color::Color;
    ///
    /// assert!(Color::new("black").unwrap().lightness() < 1.0);
    /// assert!(Color::new("white").unwrap().lightness() > 254.0);
    /// ```
    pub fn lightness(self) -> f32 {
        let (r, g, b) = self.rgb8();
        f32::from(r) * 0.299 + f32::from(g) * 0.587 + f32::from(b) * 0.114
    }

    /// Returns true if white text reads better than black on this color.
    pub fn is_dark(self) -> bool {
        self.lightness() < 128.0
    }

    /// Halves every channel, keeping alpha.
    pub fn darkened(self) -> Self {
        let (r, g, b) = self.rgb8();
        Self::from_rgb8(r / 2, g / 2, b / 2).with_alpha(self.alpha())
    }

    /// Formats the color as `#RRGGBB`.
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.rgb8();
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").unwrap_or_else(|_| Self::from_rgb8(0, 0, 0))
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#ff0000").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_default() {
        let color = Color::default();
        assert_eq!(color.to_string(), "black");
    }

    #[test]
    fn test_color_rgb8_and_hex() {
        let color = Color::new("#FFB6DB").unwrap();
        assert_eq!(color.rgb8(), (0xFF, 0xB6, 0xDB));
        assert_eq!(color.to_hex(), "#FFB6DB");
    }

    #[test]
    fn test_color_lightness_threshold() {
        // Power red and control teal are dark, port yellow is light
        assert!(Color::new("#920000").unwrap().is_dark());
        assert!(Color::new("#004949").unwrap().is_dark());
        assert!(!Color::new("#FFFF6D").unwrap().is_dark());
        assert!(!Color::new("#E6E6E6").unwrap().is_dark());
    }

    #[test]
    fn test_color_darkened_halves_channels() {
        let outline = Color::new("#E6E6E6").unwrap().darkened();
        assert_eq!(outline.to_hex(), "#737373");
        assert!((outline.alpha() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_color_with_alpha() {
        let color = Color::new("red").unwrap();
        let transparent = color.with_alpha(0.5);
        assert!((transparent.alpha() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let color1 = Color::new("red").unwrap();
        let color2 = Color::new("red").unwrap();
        let color3 = Color::new("blue").unwrap();

        assert_eq!(color1, color2);
        assert_ne!(color1, color3);

        let mut set = HashSet::new();
        set.insert(color1);
        assert!(set.contains(&color2));
        assert!(!set.contains(&color3));
    }
}
