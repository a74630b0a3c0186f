//! Progress reporting and cancellation for long aggregation batches.
//!
//! A 100k-line batch parses in one synchronous pass. Hosts that share a thread
//! with a UI can ask [`LogAggregator::aggregate_with`] to report after every
//! chunk and to check a [`CancelToken`] between chunks.
//!
//! [`LogAggregator::aggregate_with`]: crate::core::aggregate::LogAggregator::aggregate_with
//!
//! # Example
//!
//! ```rust
//! use chatsift::progress::{CancelToken, Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     if let Some(pct) = progress.percentage() {
//!         println!("Parsed {:.1}%", pct);
//!     }
//! });
//! callback(Progress::new(500, Some(1000)));
//!
//! let token = CancelToken::new();
//! let handle = token.clone();
//! handle.cancel();
//! assert!(token.is_cancelled());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Snapshot of an aggregation in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Non-blank lines parsed so far.
    pub lines_processed: usize,

    /// Non-blank lines in the whole batch, if known.
    pub total_lines: Option<usize>,

    /// Records produced so far.
    pub records: usize,

    /// Failures produced so far.
    pub failures: usize,
}

impl Progress {
    pub fn new(lines_processed: usize, total_lines: Option<usize>) -> Self {
        Self {
            lines_processed,
            total_lines,
            records: 0,
            failures: 0,
        }
    }

    /// Sets the record and failure counts.
    #[must_use]
    pub fn with_counts(mut self, records: usize, failures: usize) -> Self {
        self.records = records;
        self.failures = failures;
        self
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    ///
    /// Returns `None` if the total is not known.
    ///
    /// ```rust
    /// use chatsift::progress::Progress;
    ///
    /// assert_eq!(Progress::new(250, Some(1000)).percentage(), Some(25.0));
    /// assert_eq!(Progress::new(250, None).percentage(), None);
    /// ```
    pub fn percentage(&self) -> Option<f64> {
        self.total_lines.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.lines_processed as f64 / total as f64) * 100.0
            }
        })
    }

    pub fn is_complete(&self) -> bool {
        self.total_lines
            .map(|total| self.lines_processed >= total)
            .unwrap_or(false)
    }

    pub fn remaining_lines(&self) -> Option<usize> {
        self.total_lines
            .map(|total| total.saturating_sub(self.lines_processed))
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a progress callback that emits `tracing` debug events.
pub fn tracing_progress() -> ProgressCallback {
    Arc::new(|progress| {
        tracing::debug!(
            lines = progress.lines_processed,
            total = progress.total_lines,
            records = progress.records,
            failures = progress.failures,
            "Aggregation progress"
        );
    })
}

/// Shared flag a host flips to abandon an in-flight aggregation.
///
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
