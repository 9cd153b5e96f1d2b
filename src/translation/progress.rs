/*!
 * Progress reporting contract.
 *
 * Every long-running operation reports through a `ProgressSink`. Reports are
 * advisory: a sink that ignores them changes nothing about the translation.
 */

use std::sync::Arc;

use parking_lot::Mutex;

/// One progress report
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Percentage complete, 0 to 100
    pub percent: f64,
    /// Units processed so far
    pub current: usize,
    /// Total units in the job
    pub total: usize,
    /// Optional human readable status
    pub status: Option<String>,
}

/// Receiver of progress reports.
///
/// Called from the job's execution context; implementations that drive a UI
/// are expected to marshal the update onto their own thread themselves.
pub trait ProgressSink: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        self(update)
    }
}

/// Sink that discards every report
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Sink that records every report, for tests and summaries
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    updates: Arc<Mutex<Vec<ProgressUpdate>>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().clone()
    }

    pub fn last(&self) -> Option<ProgressUpdate> {
        self.updates.lock().last().cloned()
    }
}

impl ProgressSink for RecordingProgress {
    fn report(&self, update: ProgressUpdate) {
        self.updates.lock().push(update);
    }
}

/// Wraps a sink and keeps the reported percentage within 0..=100 and
/// monotonically non-decreasing for the lifetime of one job.
pub struct ProgressTracker<'a> {
    sink: &'a dyn ProgressSink,
    last_percent: f64,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a dyn ProgressSink) -> Self {
        Self {
            sink,
            last_percent: 0.0,
        }
    }

    pub fn report(&mut self, percent: f64, current: usize, total: usize, status: Option<String>) {
        let percent = if percent.is_finite() { percent.clamp(0.0, 100.0) } else { self.last_percent };
        self.last_percent = self.last_percent.max(percent);
        self.sink.report(ProgressUpdate {
            percent: self.last_percent,
            current,
            total,
            status,
        });
    }

    /// Report `current` of `total` units as a percentage
    pub fn report_units(&mut self, current: usize, total: usize, status: Option<String>) {
        let percent = if total == 0 {
            100.0
        } else {
            current as f64 / total as f64 * 100.0
        };
        self.report(percent, current, total, status);
    }
}
