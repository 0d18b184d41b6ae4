//! Streaming motion smoothing and automatic range-of-motion calibration for
//! distance sensors mounted on rehabilitation exercise equipment.

pub mod async_impl;
pub mod benchmark;
pub mod calibration;
pub mod config;
pub mod error;
pub mod ipc;
pub mod sensor;
pub mod threaded_impl;
pub mod visualization;

pub use calibration::range_of_motion::compute_bounds;
pub use calibration::session::CalibrationSession;
pub use calibration::turning_point::{DetectorConfig, TurningPointDetector};
pub use calibration::{Direction, RomBounds, TurningPoint};
pub use error::{CalibrationError, SampleError};
pub use ipc::channels::{sample_queue, SampleConsumer, SampleProducer};
pub use ipc::shared_resource::{SessionSettings, SessionState};
pub use sensor::filter::{filter_amount, InputSmoothingFilter};
pub use sensor::generator::{MotionProfile, SensorGenerator};
pub use sensor::scaling::ScalingPipeline;
pub use sensor::window::SampleWindow;
pub use sensor::SensorReading;
