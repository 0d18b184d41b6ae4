use std::collections::VecDeque;

use tracing::info;

use super::range_of_motion::compute_bounds;
use super::turning_point::{DetectorConfig, TurningPointDetector};
use super::{RomBounds, TurningPoint};
use crate::error::SampleError;
use crate::sensor::SensorReading;

/// Turning points kept by default; only the latest two per direction matter.
pub const DEFAULT_HISTORY_LIMIT: usize = 32;

/// One automatic calibration run: detects turning points in the raw stream
/// and recomputes the bounds every time a new one is confirmed.
pub struct CalibrationSession {
    detector: TurningPointDetector,
    turning_points: VecDeque<TurningPoint>,
    history_limit: usize,
    max_difference: f64,
    bounds: Option<RomBounds>,
    confirmed: u64,
    recalibrations: u64,
}

impl CalibrationSession {
    pub fn new(config: DetectorConfig, max_difference: f64) -> Self {
        Self::with_history_limit(config, max_difference, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(config: DetectorConfig, max_difference: f64, history_limit: usize) -> Self {
        // Two per direction is the least the calculator can work with.
        let history_limit = history_limit.max(4);
        Self {
            detector: TurningPointDetector::new(config),
            turning_points: VecDeque::with_capacity(history_limit),
            history_limit,
            max_difference,
            bounds: None,
            confirmed: 0,
            recalibrations: 0,
        }
    }

    /// Feeds one raw reading.
    ///
    /// Returns the new bounds when this reading confirmed a turning point and
    /// the collected points now yield bounds different from the last ones.
    pub fn feed(&mut self, reading: SensorReading) -> Result<Option<RomBounds>, SampleError> {
        let Some(point) = self.detector.feed_reading(reading)? else {
            return Ok(None);
        };

        self.confirmed += 1;
        if self.turning_points.len() >= self.history_limit {
            self.turning_points.pop_front();
        }
        self.turning_points.push_back(point);

        let points = self.turning_points.make_contiguous();
        let Some(bounds) = compute_bounds(points, self.max_difference) else {
            return Ok(None);
        };
        if self.bounds == Some(bounds) {
            return Ok(None);
        }

        self.bounds = Some(bounds);
        self.recalibrations += 1;
        info!(%bounds, turning_points = self.turning_points.len(), "range of motion updated");
        Ok(Some(bounds))
    }

    pub fn turning_points(&self) -> impl Iterator<Item = &TurningPoint> + '_ {
        self.turning_points.iter()
    }

    /// Latest bounds produced by this session, if any.
    pub fn bounds(&self) -> Option<RomBounds> {
        self.bounds
    }

    /// Turning points confirmed since the session started, including those
    /// already dropped from the history.
    pub fn confirmed_turning_points(&self) -> u64 {
        self.confirmed
    }

    pub fn recalibrations(&self) -> u64 {
        self.recalibrations
    }

    pub fn detector(&self) -> &TurningPointDetector {
        &self.detector
    }

    /// Starts over, forgetting turning points and bounds.
    pub fn reset(&mut self) {
        self.detector.reset();
        self.turning_points.clear();
        self.bounds = None;
        self.confirmed = 0;
        self.recalibrations = 0;
    }
}
