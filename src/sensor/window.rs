use std::collections::VecDeque;
use std::time::Duration;

use super::SensorReading;
use crate::error::SampleError;

/// Timestamp-ordered buffer of readings, bounded by capacity and pruned by age.
///
/// Readings must arrive in non-decreasing timestamp order; `prune` relies on
/// the oldest reading always sitting at the front.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    capacity: usize,
    readings: VecDeque<SensorReading>,
}

impl SampleWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            readings: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    /// Appends a reading, evicting the oldest one when full.
    ///
    /// A reading older than the newest stored one is refused and the window
    /// is left untouched.
    pub fn push(&mut self, reading: SensorReading) -> Result<(), SampleError> {
        if let Some(last) = self.readings.back() {
            if reading.timestamp < last.timestamp {
                return Err(SampleError::OutOfOrderSample {
                    timestamp: reading.timestamp,
                    last: last.timestamp,
                });
            }
        }

        if self.readings.len() >= self.capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);
        Ok(())
    }

    /// Drops every reading strictly older than `reference_time - retain`.
    pub fn prune(&mut self, reference_time: Duration, retain: Duration) {
        let Some(cutoff) = reference_time.checked_sub(retain) else {
            return;
        };
        while self
            .readings
            .front()
            .is_some_and(|oldest| oldest.timestamp < cutoff)
        {
            self.readings.pop_front();
        }
    }

    /// Mean of the readings with `low_exclusive < timestamp <= high_inclusive`.
    ///
    /// A `None` lower bound leaves the interval open below. Returns `None` when
    /// no reading falls inside, which callers must read as "not enough data".
    pub fn average_in_interval(
        &self,
        low_exclusive: Option<Duration>,
        high_inclusive: Duration,
    ) -> Option<f64> {
        let (sum, count) = self
            .readings
            .iter()
            .filter(|r| low_exclusive.map_or(true, |low| r.timestamp > low))
            .filter(|r| r.timestamp <= high_inclusive)
            .fold((0.0, 0usize), |(sum, count), r| (sum + r.value, count + 1));

        if count == 0 {
            None
        } else {
            Some(sum / count as f64)
        }
    }

    pub fn latest(&self) -> Option<&SensorReading> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}
