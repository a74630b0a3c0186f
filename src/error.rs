//! Unified error types for chatsift.
//!
//! This module provides a single [`ChatsiftError`] enum for everything that can
//! abort an operation, and [`FilterError`] for rejected filter specifications.
//!
//! Per-line parse failures are *not* errors: a line that does not match the
//! grammar is reported as a [`ParseFailure`](crate::core::aggregate::ParseFailure)
//! and the batch carries on. A batch of pure garbage still aggregates
//! successfully, it just has no records.

use std::io;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// A specialized [`Result`] type for chatsift operations.
///
/// # Example
///
/// ```rust
/// use chatsift::error::Result;
/// use chatsift::ChatLogRecord;
///
/// fn my_function() -> Result<Vec<ChatLogRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatsiftError>;

/// The error type for all chatsift operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatsiftError {
    /// An I/O error occurred while writing export output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The filter specification was rejected.
    ///
    /// The caller should keep whatever filter it applied last.
    #[error("Invalid filter: {0}")]
    Filter(#[from] FilterError),

    /// An unknown or unsupported output format was requested.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The kind of format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// The display offset is outside the range chrono accepts (±24h).
    #[error("Invalid UTC offset: {seconds} seconds")]
    InvalidOffset {
        /// The offending offset in seconds east of UTC
        seconds: i32,
    },

    /// Aggregation was cancelled before it finished.
    ///
    /// Nothing of the in-flight batch is returned.
    #[error("Aggregation cancelled after {lines_processed} lines")]
    Cancelled {
        /// Lines parsed before the cancellation was observed
        lines_processed: usize,
    },

    /// Output bytes were not valid UTF-8.
    #[error("UTF-8 encoding error in {context}: {source}")]
    Utf8 {
        /// Description of where the error occurred
        context: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Reasons a [`FilterSpecification`](crate::core::filter::FilterSpecification)
/// is rejected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FilterError {
    /// A date string could not be parsed.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The end of the date range lies before its start.
    #[error("Date range ends ({end}) before it starts ({start})")]
    InvertedDateRange {
        /// Lower bound
        start: DateTime<Utc>,
        /// Upper bound
        end: DateTime<Utc>,
    },

    /// The radius is negative or not a finite number.
    #[error("Invalid radius {value}: must be a finite, non-negative number")]
    InvalidRadius {
        /// The rejected radius
        value: f64,
    },

    /// A center coordinate is not a finite number.
    #[error("Invalid {field} {value}: must be a finite number")]
    InvalidCoordinate {
        /// Which coordinate ("latitude" or "longitude")
        field: &'static str,
        /// The rejected value
        value: f64,
    },

    /// The message pattern is not a valid regular expression.
    #[cfg(feature = "regex-search")]
    #[error("Invalid message pattern '{pattern}': {source}")]
    InvalidRegex {
        /// The pattern as given
        pattern: String,
        /// Compilation error
        #[source]
        source: regex::Error,
    },
}

impl From<std::string::FromUtf8Error> for ChatsiftError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        ChatsiftError::Utf8 {
            context: "output conversion".to_string(),
            source: err,
        }
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatsiftError {
    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatsiftError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates a cancellation error.
    pub fn cancelled(lines_processed: usize) -> Self {
        ChatsiftError::Cancelled { lines_processed }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatsiftError::Io(_))
    }

    /// Returns `true` if a filter specification was rejected.
    pub fn is_filter(&self) -> bool {
        matches!(self, ChatsiftError::Filter(_))
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatsiftError::InvalidFormat { .. })
    }

    /// Returns `true` if aggregation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChatsiftError::Cancelled { .. })
    }
}

impl FilterError {
    /// Creates an invalid date error for `YYYY-MM-DD` input.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        FilterError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let err = ChatsiftError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("pipe closed"));
        assert!(err.is_io());
    }

    #[test]
    fn test_invalid_format_display() {
        let err = ChatsiftError::invalid_format("output", "unknown extension '.xml'");
        assert!(err.is_invalid_format());
        assert!(err.to_string().contains("Invalid output format"));
        assert!(err.to_string().contains(".xml"));
    }

    #[test]
    fn test_cancelled_display() {
        let err = ChatsiftError::cancelled(4096);
        assert!(err.is_cancelled());
        assert!(err.to_string().contains("4096"));
    }

    #[test]
    fn test_invalid_offset_display() {
        let err = ChatsiftError::InvalidOffset { seconds: 90_000 };
        assert!(err.to_string().contains("90000"));
    }

    #[test]
    fn test_filter_error_wraps() {
        let err: ChatsiftError = FilterError::InvalidRadius { value: -1.0 }.into();
        assert!(err.is_filter());
        assert!(err.to_string().contains("Invalid filter"));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn test_invalid_date_display() {
        let err = FilterError::invalid_date("10/11/25");
        let display = err.to_string();
        assert!(display.contains("10/11/25"));
        assert!(display.contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_inverted_range_display() {
        let start = Utc.with_ymd_and_hms(2025, 11, 10, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 11, 9, 0, 0, 0).unwrap();
        let err = FilterError::InvertedDateRange { start, end };
        assert!(err.to_string().contains("2025-11-09"));
        assert!(err.to_string().contains("2025-11-10"));
    }

    #[test]
    fn test_invalid_coordinate_display() {
        let err = FilterError::InvalidCoordinate {
            field: "latitude",
            value: f64::NAN,
        };
        assert!(err.to_string().contains("latitude"));
    }

    #[cfg(feature = "regex-search")]
    #[test]
    fn test_invalid_regex_source_chain() {
        use std::error::Error;
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = FilterError::InvalidRegex {
            pattern: "(unclosed".into(),
            source,
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("(unclosed"));
    }

    #[cfg(feature = "csv-output")]
    #[test]
    fn test_from_csv_error() {
        let csv_err = csv::Error::from(io::Error::other("disk full"));
        let err: ChatsiftError = csv_err.into();
        assert!(err.to_string().contains("CSV error"));
    }

    #[test]
    fn test_from_utf8_error() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err: ChatsiftError = utf8_err.into();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_error_debug() {
        let err = ChatsiftError::cancelled(1);
        assert!(format!("{:?}", err).contains("Cancelled"));
    }
}
