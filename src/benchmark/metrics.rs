use hdrhistogram::Histogram;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

/// Latency histograms shared between the source and the processing thread.
#[derive(Clone)]
pub struct TimingMetrics {
    generation_hist: Arc<Mutex<Histogram<u64>>>,
    processing_hist: Arc<Mutex<Histogram<u64>>>,
    transmission_hist: Arc<Mutex<Histogram<u64>>>,
    e2e_hist: Arc<Mutex<Histogram<u64>>>,
    dropped_samples: Arc<AtomicU64>,
}

fn histogram() -> Result<Arc<Mutex<Histogram<u64>>>> {
    Ok(Arc::new(Mutex::new(Histogram::new(3)?)))
}

impl TimingMetrics {
    pub fn new() -> Result<Self> {
        Ok(Self {
            generation_hist: histogram()?,
            processing_hist: histogram()?,
            transmission_hist: histogram()?,
            e2e_hist: histogram()?,
            dropped_samples: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn record_generation(&self, duration: Duration) {
        self.generation_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    /// Time spent scaling, smoothing and detecting for one sample.
    pub fn record_processing(&self, duration: Duration) {
        self.processing_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    pub fn record_transmission(&self, duration: Duration) {
        self.transmission_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    /// Time from hand-off by the source to the end of processing.
    pub fn record_e2e(&self, duration: Duration) {
        self.e2e_hist.lock().record(duration.as_nanos() as u64).ok();
    }

    pub fn record_dropped(&self) {
        self.dropped_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn report(&self) -> MetricsReport {
        let gen = self.generation_hist.lock();
        let proc = self.processing_hist.lock();
        let trans = self.transmission_hist.lock();
        let e2e = self.e2e_hist.lock();

        MetricsReport {
            generation_p50: Duration::from_nanos(gen.value_at_quantile(0.5)),
            generation_p99: Duration::from_nanos(gen.value_at_quantile(0.99)),
            processing_p50: Duration::from_nanos(proc.value_at_quantile(0.5)),
            processing_p99: Duration::from_nanos(proc.value_at_quantile(0.99)),
            transmission_p50: Duration::from_nanos(trans.value_at_quantile(0.5)),
            e2e_p50: Duration::from_nanos(e2e.value_at_quantile(0.5)),
            e2e_p99: Duration::from_nanos(e2e.value_at_quantile(0.99)),
            processed_samples: proc.len(),
            dropped_samples: self.dropped_samples.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug)]
pub struct MetricsReport {
    pub generation_p50: Duration,
    pub generation_p99: Duration,
    pub processing_p50: Duration,
    pub processing_p99: Duration,
    pub transmission_p50: Duration,
    pub e2e_p50: Duration,
    pub e2e_p99: Duration,
    pub processed_samples: u64,
    pub dropped_samples: u64,
}
