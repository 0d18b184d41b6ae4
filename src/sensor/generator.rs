use std::f64::consts::TAU;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::SensorReading;

/// Shape of the simulated exercise motion.
#[derive(Debug, Clone)]
pub struct MotionProfile {
    /// Closest distance reached during a repetition.
    pub low: f64,
    /// Furthest distance reached during a repetition.
    pub high: f64,
    /// Duration of one full repetition (out and back).
    pub period: Duration,
    /// Time between consecutive samples.
    pub sample_interval: Duration,
    /// Uniform noise added to every sample, +/- this amount.
    pub noise_amplitude: f64,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            low: 120.0,
            high: 780.0,
            period: Duration::from_millis(2000),
            sample_interval: Duration::from_millis(10),
            noise_amplitude: 6.0,
        }
    }
}

/// Simulated distance sensor following a periodic pull motion.
///
/// Each repetition starts at `low`, reaches `high` half a period later and
/// returns. Timestamps advance by exactly `sample_interval`, so the output is
/// always in order.
pub struct SensorGenerator {
    rng: StdRng,
    sequence_counter: u64,
    profile: MotionProfile,
    offset: f64,
}

impl SensorGenerator {
    pub fn new(seed: u64, profile: MotionProfile) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sequence_counter: 0,
            profile,
            offset: 0.0,
        }
    }

    pub fn generate(&mut self) -> SensorReading {
        let timestamp = self.timestamp_of(self.sequence_counter);
        self.sequence_counter += 1;

        let noise = if self.profile.noise_amplitude > 0.0 {
            self.rng
                .gen_range(-self.profile.noise_amplitude..self.profile.noise_amplitude)
        } else {
            0.0
        };

        SensorReading {
            value: self.ideal_value(timestamp) + self.offset + noise,
            timestamp,
        }
    }

    /// Timestamp given to the `sequence`-th sample.
    pub fn timestamp_of(&self, sequence: u64) -> Duration {
        let nanos = self.profile.sample_interval.as_nanos() * u128::from(sequence);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Noise-free position of the motion at `timestamp`.
    pub fn ideal_value(&self, timestamp: Duration) -> f64 {
        let period = self.profile.period.as_secs_f64();
        if period <= 0.0 {
            return self.profile.low;
        }
        let mid = 0.5 * (self.profile.low + self.profile.high);
        let amplitude = 0.5 * (self.profile.high - self.profile.low);
        let phase = TAU * timestamp.as_secs_f64() / period;
        mid - amplitude * phase.cos()
    }

    pub fn get_sequence(&self) -> u64 {
        self.sequence_counter
    }

    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Shifts every following reading by `delta`, as if the sensor mount slipped.
    pub fn inject_disturbance(&mut self, delta: f64) {
        self.offset += delta;
    }
}
