//! Command-line argument definitions for the pinlabel CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments name the board and its pin sources, the rename
//! rules, the two output files, configuration file selection, and logging
//! verbosity.

use clap::{ArgAction, Parser, ValueEnum};

use pinlabel::pin::NameSource;

/// Label source preferred when a pin has names from both firmwares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Prefer {
    Circuitpython,
    Arduino,
}

impl From<Prefer> for NameSource {
    fn from(prefer: Prefer) -> Self {
        match prefer {
            Prefer::Circuitpython => NameSource::CircuitPython,
            Prefer::Arduino => NameSource::Arduino,
        }
    }
}

/// Command-line arguments for the pinlabel tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Fritzing part file (.fzp) or part bundle (.fzpz)
    #[arg(help = "Path to the Fritzing board file")]
    pub board: String,

    /// CircuitPython `pins.c`, or `None` to use connector names
    #[arg(help = "Path to the CircuitPython pins.c, or None")]
    pub pin_definitions: String,

    /// Pinout table (CSV)
    #[arg(help = "Path to the pinout CSV")]
    pub pinout: String,

    /// Rename rule, may be repeated; applied in order after configured rules
    #[arg(
        short = 's',
        long = "substitute",
        num_args = 2,
        value_names = ["PATTERN", "REPLACEMENT"],
        action = ArgAction::Append
    )]
    pub substitute: Vec<String>,

    /// Arduino variant directory with the board's pin headers
    #[arg(short = 'a', long)]
    pub arduino_variant: Option<String>,

    /// Path to the overview SVG file
    #[arg(short, long, default_value = "output.svg")]
    pub output: String,

    /// Path to the label SVG file
    #[arg(short = 'l', long, default_value = "pinlabels.svg")]
    pub labels: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Label source to prefer, overriding the configuration
    #[arg(long, value_enum)]
    pub prefer: Option<Prefer>,

    /// Report unmatched pins as warnings instead of failing
    #[arg(long)]
    pub allow_unmatched: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// The pins.c path, unless disabled with `None`.
    pub fn pin_definitions(&self) -> Option<&str> {
        match self.pin_definitions.as_str() {
            "None" | "none" => None,
            path => Some(path),
        }
    }

    /// `-s` values as `(pattern, replacement)` pairs.
    pub fn renames(&self) -> impl Iterator<Item = (&str, &str)> {
        self.substitute
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}
