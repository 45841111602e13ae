//! Geometric primitives for board coordinates and label placement.
//!
//! This module provides the geometric types used throughout pinlabel for
//! locating pads on the breadboard artwork and sizing label boxes.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in board document units
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding/margin values for four sides
//! - [`Transform`] - An SVG affine transform
//! - [`Length`] - An SVG length with a unit, convertible to pixels
//!
//! # Coordinate System
//!
//! pinlabel uses the SVG coordinate system of the board artwork:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! Pad positions are expressed in the artwork's user units (its `viewBox`
//! space), never in physical units.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// A 2D point representing a position in board coordinate space.
///
/// # Examples
///
/// ```
/// # use pinlabel_core::geometry::Point;
/// let pad = Point::new(10.0, 20.0);
/// let origin = Point::new(5.0, 25.0);
///
/// let relative = pad.sub_point(origin);
/// assert_eq!(relative.x(), 5.0);
/// assert_eq!(relative.y(), -5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Subtracts another point from this point, returning a new point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Converts a point and size into a bounds rectangle
    ///
    /// The point is treated as the center of the bounds.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns true if either dimension is zero or negative
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pinlabel_core::geometry::{Bounds, Point, Size};
    /// let board = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let label = Bounds::new_from_top_left(Point::new(90.0, 10.0), Size::new(40.0, 8.0));
    ///
    /// let combined = board.merge(&label);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 30.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Expands the bounds by adding insets on every side.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }

    /// Formats the bounds as an SVG `viewBox` attribute value.
    pub fn to_view_box(self) -> String {
        format!(
            "{} {} {} {}",
            self.min_x,
            self.min_y,
            self.width(),
            self.height()
        )
    }
}

/// Represents spacing around an element (padding, margin, etc.)
/// with potentially different values for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Returns the top inset value
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value
    pub fn left(self) -> f32 {
        self.left
    }
}

/// An SVG affine transform `[a c e; b d f; 0 0 1]`.
///
/// Transforms compose the way SVG nests them: the transform of an ancestor
/// is applied after the transform of its descendants.
///
/// # Examples
///
/// ```
/// # use pinlabel_core::geometry::{Point, Transform};
/// let group = Transform::translate(10.0, 5.0);
/// let pad = Transform::scale(2.0, 2.0);
///
/// // The pad's own transform runs first, then the group's.
/// let combined = group.then_inner(pad);
/// let p = combined.apply(Point::new(1.0, 1.0));
/// assert_eq!(p.x(), 12.0);
/// assert_eq!(p.y(), 7.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Creates a transform from the six SVG `matrix(a b c d e f)` values.
    pub fn matrix(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Creates a translation.
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self::matrix(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Creates a scale about the origin.
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::matrix(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Creates a rotation in degrees about `center`.
    pub fn rotate(degrees: f32, center: Point) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let rotation = Self::matrix(cos, sin, -sin, cos, 0.0, 0.0);
        Self::translate(center.x(), center.y())
            .then_inner(rotation)
            .then_inner(Self::translate(-center.x(), -center.y()))
    }

    /// Returns `self * inner`: `inner` is applied to a point first.
    pub fn then_inner(self, inner: Transform) -> Self {
        Self {
            a: self.a * inner.a + self.c * inner.b,
            b: self.b * inner.a + self.d * inner.b,
            c: self.a * inner.c + self.c * inner.d,
            d: self.b * inner.c + self.d * inner.d,
            e: self.a * inner.e + self.c * inner.f + self.e,
            f: self.b * inner.e + self.d * inner.f + self.f,
        }
    }

    /// Maps a point through this transform.
    pub fn apply(self, point: Point) -> Point {
        Point::new(
            self.a * point.x() + self.c * point.y() + self.e,
            self.b * point.x() + self.d * point.y() + self.f,
        )
    }

    /// Returns true when this transform leaves every point in place.
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Units accepted in SVG `width`/`height` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    In,
    Mm,
    Cm,
    Pt,
    Pc,
}

impl LengthUnit {
    /// CSS pixels per one unit (96 DPI).
    pub fn px_per_unit(self) -> f32 {
        match self {
            Self::Px => 1.0,
            Self::In => 96.0,
            Self::Mm => 96.0 / 25.4,
            Self::Cm => 96.0 / 2.54,
            Self::Pt => 96.0 / 72.0,
            Self::Pc => 16.0,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::In => "in",
            Self::Mm => "mm",
            Self::Cm => "cm",
            Self::Pt => "pt",
            Self::Pc => "pc",
        }
    }
}

/// Error returned when an SVG length cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LengthError {
    #[error("empty length")]
    Empty,

    #[error("invalid number in length `{0}`")]
    InvalidNumber(String),

    #[error("unsupported length unit `{unit}` in `{value}`")]
    UnsupportedUnit { value: String, unit: String },
}

/// An SVG length such as `1.2in`, `30mm` or `86.4`.
///
/// # Examples
///
/// ```
/// # use pinlabel_core::geometry::{Length, LengthUnit};
/// let width: Length = "1.5in".parse().unwrap();
/// assert_eq!(width.unit(), LengthUnit::In);
/// assert_eq!(width.to_px(), 144.0);
///
/// assert!("12furlongs".parse::<Length>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    value: f32,
    unit: LengthUnit,
}

impl Length {
    pub fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    /// Returns the numeric part of the length.
    pub fn value(self) -> f32 {
        self.value
    }

    /// Returns the unit of the length.
    pub fn unit(self) -> LengthUnit {
        self.unit
    }

    /// Converts the length to CSS pixels.
    pub fn to_px(self) -> f32 {
        self.value * self.unit.px_per_unit()
    }
}

impl FromStr for Length {
    type Err = LengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LengthError::Empty);
        }

        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic() || c == '%')
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        let value: f32 = number
            .trim()
            .parse()
            .map_err(|_| LengthError::InvalidNumber(trimmed.to_string()))?;

        let unit = match unit.trim() {
            "" | "px" => LengthUnit::Px,
            "in" => LengthUnit::In,
            "mm" => LengthUnit::Mm,
            "cm" => LengthUnit::Cm,
            "pt" => LengthUnit::Pt,
            "pc" => LengthUnit::Pc,
            other => {
                return Err(LengthError::UnsupportedUnit {
                    value: trimmed.to_string(),
                    unit: other.to_string(),
                });
            }
        };

        Ok(Self { value, unit })
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}
