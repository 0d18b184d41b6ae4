// Smoothing of the scaled pull amount (moving average over the last N values)
use std::collections::VecDeque;

use crate::calibration::RomBounds;

/// Distance at which the smoothing filter reaches its largest size.
pub const FILTER_SATURATION_DISTANCE: f64 = 1000.0;
pub const MIN_FILTER_AMOUNT: usize = 1;
pub const MAX_FILTER_AMOUNT: usize = 10;

fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Number of samples to smooth over for the given bounds.
///
/// Scales linearly from 1 sample at 0 to 10 samples at 1000 sensor units,
/// truncated toward zero and capped at 10 beyond that.
pub fn filter_amount(bounds: &RomBounds) -> usize {
    let reach = bounds.high().max(bounds.low());
    let t = inverse_lerp(0.0, FILTER_SATURATION_DISTANCE, reach);
    if t.is_nan() {
        return MIN_FILTER_AMOUNT;
    }
    let amount = lerp(MIN_FILTER_AMOUNT as f64, MAX_FILTER_AMOUNT as f64, t).floor() as usize;
    amount.clamp(MIN_FILTER_AMOUNT, MAX_FILTER_AMOUNT)
}

pub struct InputSmoothingFilter {
    capacity: usize,
    buf: VecDeque<f64>,
}

impl InputSmoothingFilter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, buf: VecDeque::with_capacity(capacity) }
    }

    pub fn for_bounds(bounds: &RomBounds) -> Self {
        Self::new(filter_amount(bounds))
    }

    /// Pushes `value` and returns the mean of the values currently held.
    pub fn feed(&mut self, value: f64) -> f64 {
        if self.buf.len() >= self.capacity {
            self.buf.pop_front();
        }
        self.buf.push_back(value);
        self.buf.iter().sum::<f64>() / self.buf.len() as f64
    }

    pub fn average(&self) -> Option<f64> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.buf.iter().sum::<f64>() / self.buf.len() as f64)
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
