//! Calibration module - turning point detection and range-of-motion bounds

use std::fmt;
use std::time::Duration;

pub mod range_of_motion;
pub mod session;
pub mod turning_point;

// ============================================================================
// DIRECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Distance growing.
    Increasing,
    /// Distance shrinking.
    Decreasing,
}

impl Direction {
    /// Direction of `delta`, or `None` when it is zero or NaN.
    pub fn of(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(Direction::Increasing)
        } else if delta < 0.0 {
            Some(Direction::Decreasing)
        } else {
            None
        }
    }

    pub fn sign(self) -> f64 {
        match self {
            Direction::Increasing => 1.0,
            Direction::Decreasing => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Increasing => Direction::Decreasing,
            Direction::Decreasing => Direction::Increasing,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Increasing => write!(f, "+1"),
            Direction::Decreasing => write!(f, "-1"),
        }
    }
}

// ============================================================================
// TURNING POINT
// ============================================================================

/// A confirmed local extremum of the motion.
///
/// `direction` is the movement direction leading into the extremum, so an
/// `Increasing` turning point is a maximum and a `Decreasing` one a minimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurningPoint {
    pub value: f64,
    pub time: Duration,
    pub direction: Direction,
}

// ============================================================================
// ROM BOUNDS
// ============================================================================

/// Low and high distance of the user's movement. `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RomBounds {
    low: f64,
    high: f64,
}

impl RomBounds {
    /// Builds bounds from two limits given in either order.
    pub fn new(a: f64, b: f64) -> Self {
        Self { low: a.min(b), high: a.max(b) }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    /// True when the bounds cannot be used to scale readings.
    pub fn is_degenerate(&self) -> bool {
        !(self.span() > 0.0) || !self.span().is_finite()
    }
}

impl fmt::Display for RomBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.1}, {:.1}]", self.low, self.high)
    }
}
