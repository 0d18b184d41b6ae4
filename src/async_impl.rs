//! Tokio-driven sample source, an alternative to the sensor thread.

pub mod sensor_task;
