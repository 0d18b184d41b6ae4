// Runtime configuration loaded from TOML
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::calibration::turning_point::DetectorConfig;
use crate::calibration::RomBounds;
use crate::error::{CalibrationError, Result};
use crate::ipc::shared_resource::SessionState;
use crate::sensor::generator::MotionProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Samples produced on a dedicated OS thread.
    Threaded,
    /// Samples produced by a tokio interval task.
    Async,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub low: f64,
    pub high: f64,
    pub period_ms: u64,
    pub noise_amplitude: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            low: 120.0,
            high: 780.0,
            period_ms: 2000,
            noise_amplitude: 6.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub source: SourceMode,
    pub run_duration_secs: u64,
    pub sample_interval_ms: u64,
    pub queue_capacity: usize,
    pub moving_average_window_ms: u64,
    pub minimal_distance_for_turning_point: f64,
    pub max_difference_between_rom_findings: f64,
    pub window_capacity: usize,
    pub turning_point_history: usize,
    pub initial_rom_low: f64,
    pub initial_rom_high: f64,
    pub inverted: bool,
    pub prevent_filtering: bool,
    pub trace_capacity: usize,
    pub chart_path: Option<String>,
    pub simulation: SimulationConfig,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            source: SourceMode::Threaded,
            run_duration_secs: 10,
            sample_interval_ms: 10,
            queue_capacity: 256,
            moving_average_window_ms: 100,
            minimal_distance_for_turning_point: 40.0,
            max_difference_between_rom_findings: 150.0,
            window_capacity: 4096,
            turning_point_history: 32,
            initial_rom_low: 0.0,
            initial_rom_high: 1000.0,
            inverted: false,
            prevent_filtering: true,
            trace_capacity: 2000,
            chart_path: None,
            simulation: SimulationConfig::default(),
        }
    }
}

impl CalibrationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.moving_average_window_ms == 0 {
            return Err(CalibrationError::invalid_config("moving_average_window_ms must be positive"));
        }
        if self.sample_interval_ms == 0 {
            return Err(CalibrationError::invalid_config("sample_interval_ms must be positive"));
        }
        if !(self.minimal_distance_for_turning_point > 0.0) {
            return Err(CalibrationError::invalid_config(
                "minimal_distance_for_turning_point must be positive",
            ));
        }
        if !(self.max_difference_between_rom_findings > 0.0) {
            return Err(CalibrationError::invalid_config(
                "max_difference_between_rom_findings must be positive",
            ));
        }
        // Both averaging windows must fit in the sample buffer at once
        let needed = (2 * self.moving_average_window_ms)
            .div_ceil(self.sample_interval_ms)
            .max(2);
        if (self.window_capacity as u64) < needed {
            return Err(CalibrationError::invalid_config(format!(
                "window_capacity must hold at least {needed} samples, got {}",
                self.window_capacity
            )));
        }
        if self.queue_capacity == 0 {
            return Err(CalibrationError::invalid_config("queue_capacity must be positive"));
        }
        let bounds = self.initial_bounds();
        if bounds.is_degenerate() {
            return Err(CalibrationError::DegenerateBounds {
                low: bounds.low(),
                high: bounds.high(),
            });
        }
        Ok(())
    }

    pub fn initial_bounds(&self) -> RomBounds {
        RomBounds::new(self.initial_rom_low, self.initial_rom_high)
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            window_size: Duration::from_millis(self.moving_average_window_ms),
            minimal_distance_for_turning_point: self.minimal_distance_for_turning_point,
            window_capacity: self.window_capacity,
        }
    }

    pub fn session_state(&self) -> SessionState {
        SessionState {
            bounds: self.initial_bounds(),
            inverted: self.inverted,
            prevent_filtering: self.prevent_filtering,
        }
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn motion_profile(&self) -> MotionProfile {
        MotionProfile {
            low: self.simulation.low,
            high: self.simulation.high,
            period: Duration::from_millis(self.simulation.period_ms),
            sample_interval: self.sample_interval(),
            noise_amplitude: self.simulation.noise_amplitude,
        }
    }
}

pub fn parse_config(text: &str) -> Result<CalibrationConfig> {
    let config: CalibrationConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<CalibrationConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| CalibrationError::ConfigIo {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&text)
}
