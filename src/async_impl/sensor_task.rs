use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

use crate::benchmark::metrics::TimingMetrics;
use crate::ipc::channels::SampleProducer;
use crate::sensor::generator::SensorGenerator;
use crate::threaded_impl::sensor_thread::{hand_off, SourceStats};

/// Produces simulated samples on a tokio interval until shutdown or until
/// the consumer disconnects.
pub async fn sensor_task(
    producer: SampleProducer,
    mut generator: SensorGenerator,
    period: Duration,
    metrics: TimingMetrics,
    stats: Arc<SourceStats>,
) {
    let mut interval_timer = interval(period);
    // A late tick must not burst samples into the queue.
    interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval_timer.tick().await;

        if stats.shutdown.load(Ordering::Relaxed) {
            break;
        }
        if hand_off(&producer, &mut generator, &stats, &metrics).is_err() {
            warn!("sample consumer disconnected, stopping async source");
            break;
        }
    }
    info!(
        produced = stats.produced.load(Ordering::Relaxed),
        dropped = stats.dropped.load(Ordering::Relaxed),
        "async sensor task stopped"
    );
}

/// Runs [`sensor_task`] on a dedicated current-thread runtime.
pub fn spawn_async_source(
    producer: SampleProducer,
    generator: SensorGenerator,
    period: Duration,
    metrics: TimingMetrics,
) -> std::io::Result<(thread::JoinHandle<()>, Arc<SourceStats>)> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let stats = SourceStats::new();
    let stats_clone = stats.clone();

    let handle = thread::spawn(move || {
        runtime.block_on(sensor_task(producer, generator, period, metrics, stats_clone));
    });

    Ok((handle, stats))
}
