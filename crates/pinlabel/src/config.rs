//! Configuration types for pinlabel.
//!
//! This module provides configuration structures that control how pins are
//! resolved and how label sheets are styled. All types implement
//! [`serde::Deserialize`] for loading from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration.
//! - [`StyleConfig`] - Font, box and row styling of the exported SVGs.
//! - [`ResolveConfig`] - Label precedence and the unmatched-pin policy.
//! - [`AliasConfig`] - Connector name cleanups applied before matching.
//! - [`RenameConfig`] - Rename rules applied before command-line rules.
//!
//! # Example
//!
//! ```toml
//! [style]
//! font_family = "Courier New"
//! row_color = "#8C8C8C"
//!
//! [resolve]
//! precedence = "arduino"
//! unmatched = "warn"
//!
//! [[alias]]
//! from = "D5_5V"
//! to = "D5"
//!
//! [[rename]]
//! pattern = "^GPIO"
//! replacement = "IO"
//! ```

use serde::Deserialize;

use pinlabel_core::{color::Color, pin::NameSource};

/// 0.1 inch in points, the pitch of a pin header.
pub const DEFAULT_BOX_HEIGHT: f32 = 2.54 * 72.0 / 25.4;

const DEFAULT_FONT_FAMILY: &str = "Courier New";
const DEFAULT_FONT_SIZE: f32 = 6.0;
const DEFAULT_ROW_COLOR: &str = "#8C8C8C";

/// Connector names Fritzing parts commonly use that read badly on a label.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("!RESET", "RESET"),
    ("D5_5V", "D5"),
    ("+3V3", "3.3V"),
    ("+5V", "5V"),
];

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    resolve: ResolveConfig,

    /// Connector name cleanups, `[[alias]]` tables.
    #[serde(default, rename = "alias")]
    aliases: Vec<AliasConfig>,

    /// Rename rules, `[[rename]]` tables.
    #[serde(default, rename = "rename")]
    renames: Vec<RenameConfig>,
}

impl AppConfig {
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn resolve(&self) -> &ResolveConfig {
        &self.resolve
    }

    /// Mutable access for command-line overrides.
    pub fn resolve_mut(&mut self) -> &mut ResolveConfig {
        &mut self.resolve
    }

    /// Built-in aliases followed by configured ones. A configured alias for
    /// the same connector name replaces the built-in one.
    pub fn aliases(&self) -> Vec<AliasConfig> {
        let mut aliases: Vec<AliasConfig> = BUILTIN_ALIASES
            .iter()
            .filter(|(from, _)| !self.aliases.iter().any(|a| a.from == *from))
            .map(|(from, to)| AliasConfig::new(*from, *to))
            .collect();
        aliases.extend(self.aliases.iter().cloned());
        aliases
    }

    /// Rename rules from the configuration file, in file order.
    pub fn renames(&self) -> &[RenameConfig] {
        &self.renames
    }
}

/// Visual styling of the exported SVGs.
///
/// Fields that are not set fall back to the defaults below.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    font_family: Option<String>,

    #[serde(default)]
    font_size: Option<f32>,

    /// Text color of `pinlabels.svg`; unset leaves the fill to the viewer.
    #[serde(default)]
    label_color: Option<String>,

    #[serde(default)]
    box_height: Option<f32>,

    #[serde(default)]
    row_color: Option<String>,
}

impl StyleConfig {
    /// Label font family, `Courier New` by default.
    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
    }

    /// Label font size, 6 by default.
    pub fn font_size(&self) -> f32 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// Returns the parsed label [`Color`], or `None` if none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn label_color(&self) -> Result<Option<Color>, String> {
        self.label_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid label color in config: {err}"))
    }

    /// Height of one label row in the overview.
    pub fn box_height(&self) -> f32 {
        self.box_height.unwrap_or(DEFAULT_BOX_HEIGHT)
    }

    /// Returns the parsed row line [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn row_color(&self) -> Result<Color, String> {
        Color::new(self.row_color.as_deref().unwrap_or(DEFAULT_ROW_COLOR))
            .map_err(|err| format!("Invalid row color in config: {err}"))
    }

    /// Checks every value that can be malformed.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        self.label_color()?;
        self.row_color()?;
        if !(self.font_size() > 0.0) {
            return Err(format!("font_size must be positive, got {}", self.font_size()));
        }
        if !(self.box_height() > 0.0) {
            return Err(format!("box_height must be positive, got {}", self.box_height()));
        }
        Ok(())
    }
}

/// What to do with pinout rows and connectors that do not match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Fail the run.
    #[default]
    Error,
    /// Report and continue without the unmatched pins.
    Warn,
}

/// Name resolution settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Which logical name becomes the label when a pin has several.
    precedence: NameSource,

    unmatched: UnmatchedPolicy,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            precedence: NameSource::CircuitPython,
            unmatched: UnmatchedPolicy::Error,
        }
    }
}

impl ResolveConfig {
    pub fn precedence(&self) -> NameSource {
        self.precedence
    }

    pub fn unmatched(&self) -> UnmatchedPolicy {
        self.unmatched
    }

    pub fn set_precedence(&mut self, precedence: NameSource) {
        self.precedence = precedence;
    }

    pub fn set_unmatched(&mut self, unmatched: UnmatchedPolicy) {
        self.unmatched = unmatched;
    }
}

/// Replaces a connector name exactly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AliasConfig {
    from: String,
    to: String,
}

impl AliasConfig {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }
}

/// A rename rule as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RenameConfig {
    pattern: String,
    replacement: String,
}

impl RenameConfig {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}
