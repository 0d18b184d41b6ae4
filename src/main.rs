use std::sync::atomic::Ordering;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rom_calibrator::async_impl::sensor_task::spawn_async_source;
use rom_calibrator::benchmark::metrics::TimingMetrics;
use rom_calibrator::config::{load_config, CalibrationConfig, SourceMode};
use rom_calibrator::error::CalibrationError;
use rom_calibrator::ipc::channels::sample_queue;
use rom_calibrator::ipc::shared_resource::SessionSettings;
use rom_calibrator::sensor::generator::SensorGenerator;
use rom_calibrator::threaded_impl::processing_thread::{spawn_processing_thread, ProcessingConfig};
use rom_calibrator::threaded_impl::sensor_thread::spawn_sensor_thread;
use rom_calibrator::visualization::dashboard::render_calibration_chart;

const DEFAULT_CONFIG_PATH: &str = "config/calibration_config.toml";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("===========================================");
    println!("Starting Range of Motion Calibration");
    println!("===========================================\n");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(CalibrationError::ConfigIo { path, source }) => {
            warn!(%path, error = %source, "config file unavailable, using defaults");
            let cfg = CalibrationConfig::default();
            cfg.validate()?;
            cfg
        }
        Err(e) => return Err(e.into()),
    };

    let settings = SessionSettings::new(cfg.session_state());
    let metrics = TimingMetrics::new()?;
    let (producer, consumer) = sample_queue(cfg.queue_capacity);

    let (processing_handle, processing_stats) = spawn_processing_thread(
        consumer,
        settings.clone(),
        metrics.clone(),
        ProcessingConfig {
            detector: cfg.detector_config(),
            max_difference_between_rom_findings: cfg.max_difference_between_rom_findings,
            turning_point_history: cfg.turning_point_history,
            trace_capacity: cfg.trace_capacity,
        },
    )?;

    let generator = SensorGenerator::new(cfg.simulation.seed, cfg.motion_profile());
    let (source_handle, source_stats) = match cfg.source {
        SourceMode::Threaded => {
            spawn_sensor_thread(producer, generator, cfg.sample_interval(), metrics.clone())
        }
        SourceMode::Async => {
            spawn_async_source(producer, generator, cfg.sample_interval(), metrics.clone())?
        }
    };

    info!(source = ?cfg.source, seconds = cfg.run_duration_secs, "calibration running");
    for elapsed in 1..=cfg.run_duration_secs {
        std::thread::sleep(Duration::from_secs(1));
        info!(
            elapsed,
            processed = processing_stats.samples_processed.load(Ordering::Relaxed),
            turning_points = processing_stats.turning_points.load(Ordering::Relaxed),
            recalibrations = processing_stats.recalibrations.load(Ordering::Relaxed),
            "progress"
        );
    }

    // Stop the source first; the consumer drains and exits on disconnect
    source_stats.shutdown.store(true, Ordering::Relaxed);
    let _ = source_handle.join();
    let report = processing_handle
        .join()
        .map_err(|_| anyhow::anyhow!("processing thread panicked"))?;

    let produced = source_stats.produced.load(Ordering::Relaxed);
    let dropped = source_stats.dropped.load(Ordering::Relaxed);
    let state = settings.get();

    println!("\n===========================================");
    println!("CALIBRATION RESULTS");
    println!("===========================================");
    println!("Samples produced: {} ({} dropped at the queue)", produced, dropped);
    println!("Samples processed: {} ({} rejected)", report.samples_processed, report.samples_rejected);
    println!("Turning points confirmed: {}", report.confirmed_turning_points);
    for tp in &report.turning_points {
        println!("- {:>8.3}s  {:>8.1}  ({})", tp.time.as_secs_f64(), tp.value, tp.direction);
    }
    match report.bounds {
        Some(bounds) => println!("Range of motion: {} after {} recalibrations", bounds, report.recalibrations),
        None => println!("Range of motion: not determined, keep collecting"),
    }
    println!("Active bounds: {} (inverted: {})", state.bounds, state.inverted);
    println!("Last pull amount: {:.3}", report.smoothed_pull_amount);

    let metrics_report = metrics.report();
    println!("\n=== Performance Metrics ===");
    println!("Generation P50: {:?}, P99: {:?}", metrics_report.generation_p50, metrics_report.generation_p99);
    println!("Processing P50: {:?}, P99: {:?}", metrics_report.processing_p50, metrics_report.processing_p99);
    println!("E2E P50: {:?}, P99: {:?}", metrics_report.e2e_p50, metrics_report.e2e_p99);

    if let Some(path) = cfg.chart_path.as_deref() {
        if let Err(e) = render_calibration_chart(&report, path) {
            warn!(path, error = %e, "failed to render calibration chart");
        }
    }

    Ok(())
}
