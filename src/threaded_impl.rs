//! Thread-per-role runtime: a sensor thread producing samples and a single
//! processing thread consuming them.

pub mod processing_thread;
pub mod sensor_thread;
