//! Benchmark module - latency histograms for the sample path

pub mod metrics;
