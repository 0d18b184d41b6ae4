//! IPC module - sample hand-off queue and shared session settings

pub mod channels;
pub mod shared_resource;
