//! Error types for the calibration core and its harness.

use std::time::Duration;
use thiserror::Error;

/// Reasons a single sample is refused by the core.
///
/// These never stop a session; the caller drops the sample and keeps feeding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    /// Timestamp earlier than the last accepted sample.
    #[error("out-of-order sample: {timestamp:?} precedes last accepted {last:?}")]
    OutOfOrderSample { timestamp: Duration, last: Duration },

    /// NaN or infinite sensor value.
    #[error("non-finite sample value: {0}")]
    NonFiniteValue(f64),
}

#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Bounds with no span; scaling would divide by zero.
    #[error("degenerate bounds: low {low} and high {high} span no distance")]
    DegenerateBounds { low: f64, high: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("histogram setup failed: {0}")]
    Histogram(#[from] hdrhistogram::CreationError),

    #[error(transparent)]
    Sample(#[from] SampleError),
}

impl CalibrationError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, CalibrationError>;
