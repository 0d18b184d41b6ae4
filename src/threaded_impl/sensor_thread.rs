use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::benchmark::metrics::TimingMetrics;
use crate::ipc::channels::{QueueError, SampleProducer};
use crate::sensor::generator::SensorGenerator;

pub struct SourceStats {
    pub produced: AtomicU64,
    pub dropped: AtomicU64,
    pub shutdown: AtomicBool,
}

impl SourceStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            produced: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        })
    }
}

/// Generates one reading and offers it to the queue.
///
/// A full queue drops the reading; only a vanished consumer is an error.
pub(crate) fn hand_off(
    producer: &SampleProducer,
    generator: &mut SensorGenerator,
    stats: &SourceStats,
    metrics: &TimingMetrics,
) -> Result<(), QueueError> {
    let gen_start = Instant::now();
    let reading = generator.generate();
    metrics.record_generation(gen_start.elapsed());

    let tx_start = Instant::now();
    match producer.offer(reading) {
        Ok(()) => {
            metrics.record_transmission(tx_start.elapsed());
            stats.produced.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
        Err(QueueError::Full) => {
            let dropped = stats.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            metrics.record_dropped();
            if dropped % 100 == 1 {
                warn!(dropped, "sample queue full, dropping readings");
            }
            Ok(())
        }
        Err(QueueError::Disconnected) => Err(QueueError::Disconnected),
    }
}

/// Runs the simulated sensor on its own thread at a fixed sampling interval.
///
/// The thread stops when `stats.shutdown` is set or the consumer goes away;
/// the producer is dropped on exit, which lets the consumer drain and finish.
pub fn spawn_sensor_thread(
    producer: SampleProducer,
    mut generator: SensorGenerator,
    interval: Duration,
    metrics: TimingMetrics,
) -> (thread::JoinHandle<()>, Arc<SourceStats>) {
    let stats = SourceStats::new();
    let stats_clone = stats.clone();

    let handle = thread::spawn(move || {
        loop {
            if stats_clone.shutdown.load(Ordering::Relaxed) {
                break;
            }
            let cycle_start = Instant::now();

            if hand_off(&producer, &mut generator, &stats_clone, &metrics).is_err() {
                warn!("sample consumer disconnected, stopping source");
                break;
            }

            // Sleep to maintain sampling rate
            let elapsed = cycle_start.elapsed();
            if elapsed < interval {
                thread::sleep(interval - elapsed);
            }
        }
        info!(
            produced = stats_clone.produced.load(Ordering::Relaxed),
            dropped = stats_clone.dropped.load(Ordering::Relaxed),
            "sensor thread stopped"
        );
    });

    (handle, stats)
}
