use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::benchmark::metrics::TimingMetrics;
use crate::calibration::session::CalibrationSession;
use crate::calibration::turning_point::DetectorConfig;
use crate::calibration::{RomBounds, TurningPoint};
use crate::error::{CalibrationError, Result};
use crate::ipc::channels::{QueueError, SampleConsumer};
use crate::ipc::shared_resource::{SessionSettings, SessionState};
use crate::sensor::scaling::ScalingPipeline;
use crate::sensor::SensorReading;

pub struct ProcessingStats {
    pub samples_processed: AtomicU64,
    pub samples_rejected: AtomicU64,
    pub turning_points: AtomicU64,
    pub recalibrations: AtomicU64,
    pub shutdown: AtomicBool,
}

impl ProcessingStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            samples_processed: AtomicU64::new(0),
            samples_rejected: AtomicU64::new(0),
            turning_points: AtomicU64::new(0),
            recalibrations: AtomicU64::new(0),
            shutdown: AtomicBool::new(false),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub detector: DetectorConfig,
    pub max_difference_between_rom_findings: f64,
    pub turning_point_history: usize,
    /// Number of most recent raw readings kept for the report.
    pub trace_capacity: usize,
}

/// Summary handed back when the processing thread finishes.
#[derive(Debug, Clone)]
pub struct CalibrationReport {
    pub samples_processed: u64,
    pub samples_rejected: u64,
    pub confirmed_turning_points: u64,
    /// Most recent turning points, oldest first.
    pub turning_points: Vec<TurningPoint>,
    pub recalibrations: u64,
    pub bounds: Option<RomBounds>,
    pub final_state: SessionState,
    pub smoothed_pull_amount: f64,
    pub trace: Vec<SensorReading>,
}

/// Core state owned by the single consumer.
pub struct SampleProcessor {
    session: CalibrationSession,
    pipeline: ScalingPipeline,
    applied: SessionState,
    trace: VecDeque<SensorReading>,
    trace_capacity: usize,
    samples_processed: u64,
    samples_rejected: u64,
}

impl SampleProcessor {
    pub fn new(config: &ProcessingConfig, state: SessionState) -> Result<Self> {
        Ok(Self {
            session: CalibrationSession::with_history_limit(
                config.detector.clone(),
                config.max_difference_between_rom_findings,
                config.turning_point_history,
            ),
            pipeline: ScalingPipeline::new(state.bounds, state.inverted, state.prevent_filtering)?,
            applied: state,
            trace: VecDeque::with_capacity(config.trace_capacity.min(4096)),
            trace_capacity: config.trace_capacity,
            samples_processed: 0,
            samples_rejected: 0,
        })
    }

    /// Brings the scaling pipeline in line with the shared settings.
    pub fn apply_settings(&mut self, state: SessionState) -> Result<()> {
        if state != self.applied {
            self.pipeline
                .reconfigure(state.bounds, state.inverted, state.prevent_filtering)?;
            self.applied = state;
        }
        Ok(())
    }

    /// Runs one reading through the calibration and control paths.
    ///
    /// Returns new bounds when the reading completed a calibration. A reading
    /// the detector refuses is counted and reported, and never reaches the
    /// control output.
    pub fn process(&mut self, reading: SensorReading) -> Result<Option<RomBounds>> {
        let update = match self.session.feed(reading) {
            Ok(update) => update,
            Err(e) => {
                self.samples_rejected += 1;
                return Err(CalibrationError::from(e));
            }
        };
        self.pipeline.feed(reading.value);

        self.samples_processed += 1;
        if self.trace_capacity > 0 {
            if self.trace.len() >= self.trace_capacity {
                self.trace.pop_front();
            }
            self.trace.push_back(reading);
        }
        Ok(update)
    }

    pub fn smoothed_pull_amount(&self) -> f64 {
        self.pipeline.smoothed_pull_amount()
    }

    pub fn session(&self) -> &CalibrationSession {
        &self.session
    }

    pub fn pipeline(&self) -> &ScalingPipeline {
        &self.pipeline
    }

    pub fn into_report(self) -> CalibrationReport {
        CalibrationReport {
            samples_processed: self.samples_processed,
            samples_rejected: self.samples_rejected,
            confirmed_turning_points: self.session.confirmed_turning_points(),
            turning_points: self.session.turning_points().copied().collect(),
            recalibrations: self.session.recalibrations(),
            bounds: self.session.bounds(),
            final_state: self.applied,
            smoothed_pull_amount: self.pipeline.smoothed_pull_amount(),
            trace: self.trace.into_iter().collect(),
        }
    }
}

/// Starts the single consumer that drives the calibration core.
///
/// Each queued reading refreshes the pipeline from `settings`, is fed to the
/// calibration session and then scaled and smoothed; new bounds are published
/// back into `settings`. The thread ends when shutdown is requested or the
/// producer disconnects, and returns its report.
pub fn spawn_processing_thread(
    consumer: SampleConsumer,
    settings: SessionSettings,
    metrics: TimingMetrics,
    config: ProcessingConfig,
) -> Result<(thread::JoinHandle<CalibrationReport>, Arc<ProcessingStats>)> {
    let stats = ProcessingStats::new();
    let stats_clone = stats.clone();
    let mut processor = SampleProcessor::new(&config, settings.get())?;

    let handle = thread::spawn(move || {
        loop {
            if stats_clone.shutdown.load(Ordering::Relaxed) {
                info!("processing thread shutting down");
                break;
            }

            // Receive with timeout to allow the shutdown check
            let sample = match consumer.recv_timeout(Duration::from_millis(100)) {
                Ok(Some(sample)) => sample,
                Ok(None) => continue,
                Err(QueueError::Disconnected) | Err(QueueError::Full) => {
                    info!("sample source disconnected");
                    break;
                }
            };

            let proc_start = Instant::now();

            if let Err(e) = processor.apply_settings(settings.get()) {
                warn!(error = %e, "ignoring unusable session settings");
            }

            match processor.process(sample.reading) {
                Ok(update) => {
                    stats_clone.samples_processed.fetch_add(1, Ordering::Relaxed);
                    if let Some(bounds) = update {
                        settings.publish_bounds(bounds);
                        stats_clone.recalibrations.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(e) => {
                    stats_clone.samples_rejected.fetch_add(1, Ordering::Relaxed);
                    warn!(error = %e, "sample rejected");
                }
            }
            stats_clone
                .turning_points
                .store(processor.session().confirmed_turning_points(), Ordering::Relaxed);

            metrics.record_processing(proc_start.elapsed());
            metrics.record_e2e(sample.enqueued_at.elapsed());
        }

        processor.into_report()
    });

    Ok((handle, stats))
}
