//! Finger orientation in the image plane.
//!
//! The frame uses pixel coordinates with `y` growing downward, so an angle
//! that increases between frames is a clockwise turn on screen.

use std::fmt;

// ════════════════════════════════════════════════════════════════════════════
// Point2D
// ════════════════════════════════════════════════════════════════════════════

/// A pixel position inside one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point2D {
    pub x: i32,
    pub y: i32,
}

impl Point2D {
    pub const fn new(x: i32, y: i32) -> Self {
        Point2D { x, y }
    }

    /// Map a landmark normalized to [0, 1] onto a `width × height` frame.
    /// Coordinates are truncated, not rounded.
    pub fn from_normalized(nx: f32, ny: f32, width: usize, height: usize) -> Self {
        Point2D {
            x: (nx * width as f32) as i32,
            y: (ny * height as f32) as i32,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Angle
// ════════════════════════════════════════════════════════════════════════════

/// An orientation in degrees, always inside [0, 360).
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    /// Wrap any finite degree value into [0, 360).  Non-finite input maps to 0°.
    pub fn from_degrees(deg: f64) -> Self {
        if !deg.is_finite() {
            return Angle::ZERO;
        }
        let wrapped = deg.rem_euclid(360.0);
        // rem_euclid of a tiny negative value rounds up to exactly 360.0
        if wrapped >= 360.0 {
            Angle::ZERO
        } else {
            Angle(wrapped)
        }
    }

    pub fn degrees(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*}°", p, self.0),
            None    => write!(f, "{}°", self.0),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AngleEstimator
// ════════════════════════════════════════════════════════════════════════════

/// Direction of the base → tip vector.
pub struct AngleEstimator;

impl AngleEstimator {
    /// `atan2(dy, dx)` in degrees, shifted into [0, 360).
    ///
    /// Returns `None` when `base == tip`, since a zero vector has no
    /// direction.
    pub fn estimate(base: Point2D, tip: Point2D) -> Option<Angle> {
        let dx = (tip.x - base.x) as f64;
        let dy = (tip.y - base.y) as f64;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        let mut deg = dy.atan2(dx).to_degrees();
        if deg < 0.0 {
            deg += 360.0;
        }
        Some(Angle::from_degrees(deg))
    }

    /// Like [`estimate`](Self::estimate), but yields `fallback` for
    /// coincident points.
    pub fn estimate_or(base: Point2D, tip: Point2D, fallback: Angle) -> Angle {
        Self::estimate(base, tip).unwrap_or(fallback)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
