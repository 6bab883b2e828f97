//! Per-module counters for observability
//!
//! Tracks how many records a module wrote, how many were suppressed by the
//! level threshold, and how many failed somewhere in the filter chain or
//! writer.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by every [`Logger`](crate::Logger)
///
/// # Example
///
/// ```
/// use module_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_written();
/// metrics.record_failure();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records the writer accepted; records dropped by a filter are not counted
    records_written: AtomicU64,

    /// Records below the module threshold
    records_suppressed: AtomicU64,

    /// Records whose chain run returned an error
    write_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            records_suppressed: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_suppressed(&self) -> u64 {
        self.records_suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Record a write the sink accepted, returns the previous count
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.records_suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Failure rate as a percentage (0.0 - 100.0) of attempted records
    ///
    /// Returns 0.0 if nothing has been attempted. Suppressed records are not
    /// attempts.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.records_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.records_written.store(0, Ordering::Relaxed);
        self.records_suppressed.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            records_written: AtomicU64::new(self.records_written()),
            records_suppressed: AtomicU64::new(self.records_suppressed()),
            write_failures: AtomicU64::new(self.write_failures()),
        }
    }
}
