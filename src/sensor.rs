//! Sensor module - readings, windowed averages, scaling and smoothing

use std::time::Duration;

pub mod filter;
pub mod generator;
pub mod scaling;
pub mod window;

// ============================================================================
// SENSOR READING
// ============================================================================

/// One distance measurement from the motion sensor.
///
/// `value` is in sensor units (millimeters for the supported devices) and
/// `timestamp` is the monotonic offset from the start of the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub value: f64,
    pub timestamp: Duration,
}

impl SensorReading {
    pub fn new(value: f64, timestamp: Duration) -> Self {
        Self { value, timestamp }
    }
}
