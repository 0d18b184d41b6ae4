//! Turning point detection over a noisy distance stream.
//!
//! Two moving averages are kept over adjacent windows of equal length: the
//! most recent `window_size` of samples and the `window_size` before that.
//! Once the motion has moved far enough from where it started, the detector
//! knows its direction. A recent average that falls behind the older one
//! (against that direction) marks a candidate extremum, which is confirmed
//! only after the signal has travelled `minimal_distance_for_turning_point`
//! away from it. Any sample that agrees with the established direction again
//! throws the candidate away as noise.
//!
//! All comparisons are strict: equal averages are never a reversal and a
//! distance equal to the threshold never confirms.

use std::time::Duration;

use tracing::{debug, info};

use super::{Direction, TurningPoint};
use crate::error::SampleError;
use crate::sensor::window::SampleWindow;
use crate::sensor::SensorReading;

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Length of each of the two averaging windows.
    pub window_size: Duration,
    /// Distance the averaged signal must travel to set a direction or to
    /// confirm a reversal.
    pub minimal_distance_for_turning_point: f64,
    /// Hard cap on buffered samples, independent of age.
    pub window_capacity: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: Duration::from_millis(100),
            minimal_distance_for_turning_point: 40.0,
            window_capacity: 4096,
        }
    }
}

pub struct TurningPointDetector {
    config: DetectorConfig,
    window: SampleWindow,
    start_position: Option<f64>,
    movement_direction: Option<Direction>,
    potential_turning_point: Option<TurningPoint>,
}

impl TurningPointDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let window = SampleWindow::new(config.window_capacity);
        Self {
            config,
            window,
            start_position: None,
            movement_direction: None,
            potential_turning_point: None,
        }
    }

    /// Consumes one sample and returns a turning point if this sample
    /// confirmed one.
    ///
    /// Samples must be fed in non-decreasing time order. A sample that breaks
    /// the order, or carries a non-finite value, is refused and leaves the
    /// detector untouched.
    pub fn feed(&mut self, value: f64, time: Duration) -> Result<Option<TurningPoint>, SampleError> {
        if !value.is_finite() {
            return Err(SampleError::NonFiniteValue(value));
        }
        self.window.push(SensorReading::new(value, time))?;

        let start = *self.start_position.get_or_insert(value);

        let window_size = self.config.window_size;
        self.window.prune(time, window_size * 2);

        let boundary = time.checked_sub(window_size);
        let avg_recent = self.window.average_in_interval(boundary, time);
        let avg_older = boundary.and_then(|high| {
            self.window
                .average_in_interval(time.checked_sub(window_size * 2), high)
        });

        let (Some(avg_recent), Some(avg_older)) = (avg_recent, avg_older) else {
            return Ok(None);
        };

        let min_distance = self.config.minimal_distance_for_turning_point;

        let Some(direction) = self.movement_direction else {
            let displacement = avg_recent - start;
            if displacement.abs() > min_distance {
                self.movement_direction = Direction::of(displacement);
                debug!(start, avg_recent, direction = ?self.movement_direction, "movement direction established");
            }
            return Ok(None);
        };

        let trend = direction.sign() * (avg_recent - avg_older);
        if trend >= 0.0 {
            if let Some(dropped) = self.potential_turning_point.take() {
                debug!(value = dropped.value, "candidate turning point discarded");
            }
            return Ok(None);
        }

        match self.potential_turning_point {
            None => {
                let candidate = TurningPoint {
                    value: avg_older,
                    time: boundary.unwrap_or_default(),
                    direction,
                };
                debug!(value = candidate.value, time = ?candidate.time, %direction, "candidate turning point");
                self.potential_turning_point = Some(candidate);
                Ok(None)
            }
            Some(candidate) if (avg_recent - candidate.value).abs() > min_distance => {
                self.potential_turning_point = None;
                self.start_position = Some(avg_recent);
                self.movement_direction = Some(direction.flipped());
                info!(
                    value = candidate.value,
                    time = ?candidate.time,
                    direction = %candidate.direction,
                    "turning point confirmed"
                );
                Ok(Some(candidate))
            }
            Some(_) => Ok(None),
        }
    }

    /// Feeds a whole reading; see [`TurningPointDetector::feed`].
    pub fn feed_reading(&mut self, reading: SensorReading) -> Result<Option<TurningPoint>, SampleError> {
        self.feed(reading.value, reading.timestamp)
    }

    /// Returns the detector to its freshly constructed state.
    pub fn reset(&mut self) {
        self.window.clear();
        self.start_position = None;
        self.movement_direction = None;
        self.potential_turning_point = None;
    }

    pub fn movement_direction(&self) -> Option<Direction> {
        self.movement_direction
    }

    pub fn start_position(&self) -> Option<f64> {
        self.start_position
    }

    pub fn candidate(&self) -> Option<&TurningPoint> {
        self.potential_turning_point.as_ref()
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn buffered_samples(&self) -> usize {
        self.window.len()
    }
}
