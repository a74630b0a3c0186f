//! Multi-file aggregation of parsed transcript lines.
//!
//! [`LogAggregator`] runs the line parser over an ordered batch of files and
//! collects an [`AggregationResult`]: every record in file order then line
//! order, every failure with its file and 1-based line number, and a
//! [`FailureSummary`].
//!
//! Blank lines are not log content and are skipped silently. Nothing is
//! deduplicated, within or across files.
//!
//! # Example
//!
//! ```
//! use chatsift::core::aggregate::{LogAggregator, SourceText};
//! use chatsift::parsing::FailureReason;
//!
//! let a = "[10-11-25 21:29:30.123] Rota (Rota) @ 1,2,0: [en] /say hi\n\ngarbage\n";
//! let b = "[10-11-25 21:30:00.000] Mira: hello";
//!
//! let result = LogAggregator::new().aggregate(&[
//!     SourceText::new("a.log", a),
//!     SourceText::new("b.log", b),
//! ]);
//!
//! assert_eq!(result.records().len(), 2);
//! assert_eq!(result.records()[1].user, "Mira");
//!
//! let failure = &result.failures()[0];
//! assert_eq!((failure.file.as_str(), failure.line_number), ("a.log", 3));
//! assert_eq!(failure.reason, FailureReason::MalformedStructure);
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AggregatorConfig;
use crate::error::{ChatsiftError, Result};
use crate::parsing::{FailureReason, parse_line};
use crate::progress::{CancelToken, Progress, ProgressCallback};
use crate::record::ChatLogRecord;

/// One file's worth of raw transcript text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceText<'a> {
    /// Identifier reported on failures, usually the file name.
    pub file: &'a str,
    pub text: &'a str,
}

impl<'a> SourceText<'a> {
    pub fn new(file: &'a str, text: &'a str) -> Self {
        Self { file, text }
    }
}

/// A line that did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub file: String,
    /// 1-based, counting blank lines.
    pub line_number: usize,
    /// The line as it appeared in the file.
    pub raw: String,
    pub reason: FailureReason,
}

/// Counts for one aggregation batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSummary {
    pub files: usize,
    /// Non-blank lines handed to the parser.
    pub lines_seen: usize,
    pub records: usize,
    /// Every failure, including ones dropped by `max_failures_kept`.
    pub failures: usize,
    pub by_reason: BTreeMap<FailureReason, usize>,
}

impl FailureSummary {
    /// Number of failures with the given reason.
    pub fn count(&self, reason: FailureReason) -> usize {
        self.by_reason.get(&reason).copied().unwrap_or(0)
    }

    /// Share of non-blank lines that became records, in percent.
    pub fn success_rate(&self) -> f64 {
        if self.lines_seen == 0 {
            return 0.0;
        }
        self.records as f64 / self.lines_seen as f64 * 100.0
    }
}

/// Records and failures from one batch of files.
///
/// A new batch produces a new result; results are never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    records: Vec<ChatLogRecord>,
    failures: Vec<ParseFailure>,
    summary: FailureSummary,
}

impl AggregationResult {
    /// Records in file order, then line order.
    pub fn records(&self) -> &[ChatLogRecord] {
        &self.records
    }

    pub fn failures(&self) -> &[ParseFailure] {
        &self.failures
    }

    pub fn summary(&self) -> &FailureSummary {
        &self.summary
    }

    pub fn into_records(self) -> Vec<ChatLogRecord> {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct user names, sorted.
    pub fn users(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.user.as_str()).collect()
    }

    /// Distinct language codes, sorted.
    pub fn languages(&self) -> BTreeSet<&str> {
        self.records.iter().filter_map(|r| r.language()).collect()
    }

    /// Distinct message types, sorted.
    pub fn message_types(&self) -> BTreeSet<&str> {
        self.records.iter().filter_map(|r| r.message_type()).collect()
    }

    /// Earliest and latest timestamps, or `None` without records.
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.records.iter().map(|r| r.timestamp).min()?;
        let last = self.records.iter().map(|r| r.timestamp).max()?;
        Some((first, last))
    }
}

/// Progress and cancellation hooks for [`LogAggregator::aggregate_with`].
#[derive(Clone, Default)]
pub struct AggregateControl {
    progress: Option<ProgressCallback>,
    cancel: Option<CancelToken>,
}

impl AggregateControl {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn checkpoint(&self, batch: &Batch, total_lines: usize) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(ChatsiftError::cancelled(batch.summary.lines_seen));
        }
        if let Some(callback) = &self.progress {
            callback(batch.progress(total_lines));
        }
        Ok(())
    }
}

/// Combines per-file parse passes into one [`AggregationResult`].
#[derive(Debug, Clone, Default)]
pub struct LogAggregator {
    config: AggregatorConfig,
}

impl LogAggregator {
    /// Creates an aggregator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AggregatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Parses every file in order. Never fails: bad lines become
    /// [`ParseFailure`]s and an empty batch is an empty result.
    pub fn aggregate(&self, files: &[SourceText<'_>]) -> AggregationResult {
        let mut batch = Batch::new(self.config.max_failures_kept);
        for file in files {
            let Ok(()) = batch.push_file::<Infallible>(file, |_| Ok(()));
        }
        batch.finish()
    }

    /// Like [`aggregate`](Self::aggregate), but reports progress and checks
    /// for cancellation every `chunk_size` lines.
    ///
    /// Chunking never changes the result. When the token is cancelled the
    /// partial batch is dropped and [`ChatsiftError::Cancelled`] returned.
    pub fn aggregate_with(
        &self,
        files: &[SourceText<'_>],
        control: &AggregateControl,
    ) -> Result<AggregationResult> {
        let total_lines: usize = files.iter().map(|f| content_lines(f.text).count()).sum();
        let chunk_size = self.config.chunk_size.max(1);
        let mut batch = Batch::new(self.config.max_failures_kept);

        control.checkpoint(&batch, total_lines)?;
        for file in files {
            batch.push_file::<ChatsiftError>(file, |batch| {
                if batch.summary.lines_seen % chunk_size == 0 {
                    control.checkpoint(batch, total_lines)?;
                }
                Ok(())
            })?;
        }
        control.checkpoint(&batch, total_lines)?;

        Ok(batch.finish())
    }
}

/// Parses a batch with the default configuration.
pub fn aggregate(files: &[SourceText<'_>]) -> AggregationResult {
    LogAggregator::new().aggregate(files)
}

/// Non-blank lines with their 1-based line numbers. A leading UTF-8 BOM is
/// dropped.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
}

/// Accumulator for a batch in flight.
struct Batch {
    records: Vec<ChatLogRecord>,
    failures: Vec<ParseFailure>,
    summary: FailureSummary,
    max_failures_kept: Option<usize>,
}

impl Batch {
    fn new(max_failures_kept: Option<usize>) -> Self {
        Self {
            records: Vec::new(),
            failures: Vec::new(),
            summary: FailureSummary::default(),
            max_failures_kept,
        }
    }

    /// Parses one file, calling `after_line` after each non-blank line.
    fn push_file<E>(
        &mut self,
        file: &SourceText<'_>,
        mut after_line: impl FnMut(&Batch) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        let records_before = self.summary.records;
        let failures_before = self.summary.failures;

        for (line_number, line) in content_lines(file.text) {
            self.push_line(file.file, line_number, line);
            after_line(self)?;
        }

        self.summary.files += 1;
        tracing::debug!(
            file = file.file,
            records = self.summary.records - records_before,
            failures = self.summary.failures - failures_before,
            "Parsed file"
        );
        Ok(())
    }

    fn push_line(&mut self, file: &str, line_number: usize, line: &str) {
        self.summary.lines_seen += 1;
        match parse_line(line) {
            Ok(record) => {
                self.summary.records += 1;
                self.records.push(record);
            }
            Err(reason) => {
                self.summary.failures += 1;
                *self.summary.by_reason.entry(reason).or_default() += 1;
                if self
                    .max_failures_kept
                    .is_none_or(|max| self.failures.len() < max)
                {
                    self.failures.push(ParseFailure {
                        file: file.to_string(),
                        line_number,
                        raw: line.to_string(),
                        reason,
                    });
                }
            }
        }
    }

    fn progress(&self, total_lines: usize) -> Progress {
        Progress::new(self.summary.lines_seen, Some(total_lines))
            .with_counts(self.summary.records, self.summary.failures)
    }

    fn finish(self) -> AggregationResult {
        tracing::info!(
            files = self.summary.files,
            records = self.summary.records,
            failures = self.summary.failures,
            "Aggregation complete"
        );
        AggregationResult {
            records: self.records,
            failures: self.failures,
            summary: self.summary,
        }
    }
}
