//! Geometric primitives for coordinate frames.
//!
//! Extents are signed: a y range written top-down as `(0.9h, 0.1h)` yields a
//! negative height, and every derivation below keeps that sign.

use serde::{Deserialize, Serialize};

/// A 2D point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation between two points.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// A rectangle defined by origin and signed size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the origin corner.
    pub x: f64,
    /// Y coordinate of the origin corner.
    pub y: f64,
    /// Signed width.
    pub width: f64,
    /// Signed height.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle spanned by an x range and a y range.
    #[must_use]
    pub fn from_ranges(x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        Self::new(
            x_range.0,
            y_range.0,
            x_range.1 - x_range.0,
            y_range.1 - y_range.0,
        )
    }

    /// Sub-rectangle selected by fractional ranges of this one.
    ///
    /// The origin lands at `x + fx0 * width` and the extent is
    /// `(fx1 - fx0) * width`, independent of where `self` sits.
    #[must_use]
    pub fn fraction(&self, fx: (f64, f64), fy: (f64, f64)) -> Self {
        Self::new(
            self.x + fx.0 * self.width,
            self.y + fy.0 * self.height,
            (fx.1 - fx.0) * self.width,
            (fy.1 - fy.0) * self.height,
        )
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}
