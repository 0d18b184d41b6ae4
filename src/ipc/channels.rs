use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::sensor::SensorReading;

/// A reading in flight between the source and the processing thread.
#[derive(Debug, Clone, Copy)]
pub struct QueuedSample {
    pub reading: SensorReading,
    /// Wall-clock time the source handed the reading over.
    pub enqueued_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("sample queue full, reading dropped")]
    Full,
    #[error("sample consumer disconnected")]
    Disconnected,
}

/// Sending half of the sample queue. Only one producer exists per session.
pub struct SampleProducer {
    tx: Sender<QueuedSample>,
}

/// Receiving half of the sample queue; the single logical consumer of the core.
pub struct SampleConsumer {
    rx: Receiver<QueuedSample>,
}

/// Creates the bounded queue between a sample source and the processing core.
///
/// Neither half can be cloned, so every reading is applied by exactly one
/// consumer in the order it was produced.
pub fn sample_queue(capacity: usize) -> (SampleProducer, SampleConsumer) {
    let (tx, rx) = bounded(capacity.max(1));
    (SampleProducer { tx }, SampleConsumer { rx })
}

impl SampleProducer {
    /// Hands a reading to the consumer without ever blocking the source.
    pub fn offer(&self, reading: SensorReading) -> Result<(), QueueError> {
        let sample = QueuedSample { reading, enqueued_at: Instant::now() };
        self.tx.try_send(sample).map_err(|e| match e {
            TrySendError::Full(_) => QueueError::Full,
            TrySendError::Disconnected(_) => QueueError::Disconnected,
        })
    }

    pub fn pending(&self) -> usize {
        self.tx.len()
    }
}

impl SampleConsumer {
    /// Waits up to `timeout` for the next reading.
    ///
    /// `Ok(None)` means the timeout elapsed; `Err(Disconnected)` means the
    /// producer is gone and the queue is drained.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<QueuedSample>, QueueError> {
        match self.rx.recv_timeout(timeout) {
            Ok(sample) => Ok(Some(sample)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(QueueError::Disconnected),
        }
    }

    pub fn try_recv(&self) -> Option<QueuedSample> {
        self.rx.try_recv().ok()
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
