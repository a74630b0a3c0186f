//! Configuration types for aggregation and export.
//!
//! Plain serde-friendly structs with builder methods, so a host can keep them
//! in its own settings file and hand them over unchanged.
//!
//! - [`AggregatorConfig`] - chunking and failure retention for [`LogAggregator`](crate::core::aggregate::LogAggregator)
//! - [`ExportConfig`] - display offset and line endings for the exporters
//!
//! # Example
//!
//! ```rust
//! use chatsift::config::{AggregatorConfig, ExportConfig, LineEnding};
//!
//! let aggregate = AggregatorConfig::new()
//!     .with_chunk_size(10_000)
//!     .with_max_failures_kept(500);
//!
//! let export = ExportConfig::new()
//!     .with_utc_offset_seconds(3 * 3600)
//!     .with_line_ending(LineEnding::Crlf);
//! assert_eq!(export.offset().unwrap().local_minus_utc(), 10_800);
//! ```

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::{ChatsiftError, Result};

/// Configuration for batch aggregation.
///
/// # Example
///
/// ```rust
/// use chatsift::config::AggregatorConfig;
///
/// let config = AggregatorConfig::default();
/// assert_eq!(config.chunk_size, 4096);
/// assert!(config.max_failures_kept.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Lines parsed between progress callbacks and cancellation checks
    /// (default: 4096). Has no effect on the result.
    pub chunk_size: usize,

    /// Keep at most this many failure entries (default: unlimited).
    ///
    /// The failure summary still counts every failure.
    pub max_failures_kept: Option<usize>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            max_failures_kept: None,
        }
    }
}

impl AggregatorConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the chunk size. Zero is treated as one.
    #[must_use]
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Caps the number of stored failure entries.
    #[must_use]
    pub fn with_max_failures_kept(mut self, max: usize) -> Self {
        self.max_failures_kept = Some(max);
        self
    }
}

/// Row terminator for CSV output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    Crlf,
}

/// Configuration for CSV and Discord export.
///
/// Records store UTC instants. The display offset only affects the CSV
/// timestamp column; Discord output uses epoch seconds and lets the chat
/// client localize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Display offset east of UTC in seconds (default: 0).
    pub utc_offset_seconds: i32,

    /// CSV row terminator (default: LF).
    pub line_ending: LineEnding,
}

impl ExportConfig {
    /// Creates a new configuration with default values (UTC, LF).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display offset in seconds east of UTC.
    #[must_use]
    pub fn with_utc_offset_seconds(mut self, seconds: i32) -> Self {
        self.utc_offset_seconds = seconds;
        self
    }

    /// Sets the display offset from a chrono offset.
    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset_seconds = offset.local_minus_utc();
        self
    }

    /// Sets the CSV row terminator.
    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Returns the display offset.
    ///
    /// # Errors
    ///
    /// Returns [`ChatsiftError::InvalidOffset`] if the offset is a day or more.
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds).ok_or(ChatsiftError::InvalidOffset {
            seconds: self.utc_offset_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregator_config_default() {
        let config = AggregatorConfig::default();
        assert_eq!(config.chunk_size, 4096);
        assert!(config.max_failures_kept.is_none());
    }

    #[test]
    fn test_aggregator_config_builder() {
        let config = AggregatorConfig::new()
            .with_chunk_size(0)
            .with_max_failures_kept(10);
        assert_eq!(config.chunk_size, 1);
        assert_eq!(config.max_failures_kept, Some(10));
    }

    #[test]
    fn test_export_config_offset() {
        let config = ExportConfig::new().with_utc_offset_seconds(-5 * 3600);
        assert_eq!(config.offset().unwrap().local_minus_utc(), -18_000);

        let config = ExportConfig::new().with_utc_offset_seconds(86_400);
        assert!(matches!(
            config.offset(),
            Err(ChatsiftError::InvalidOffset { seconds: 86_400 })
        ));
    }

    #[test]
    fn test_export_config_with_offset() {
        let offset = FixedOffset::east_opt(5400).unwrap();
        let config = ExportConfig::new().with_offset(offset);
        assert_eq!(config.utc_offset_seconds, 5400);
    }

    #[test]
    fn test_line_ending() {
        assert_eq!(LineEnding::default(), LineEnding::Lf);
        let json = serde_json::to_string(&LineEnding::Crlf).unwrap();
        assert_eq!(json, "\"crlf\"");
    }

    #[test]
    fn test_config_serde() {
        let config: ExportConfig =
            serde_json::from_str(r#"{"utc_offset_seconds":3600,"line_ending":"crlf"}"#).unwrap();
        assert_eq!(config.utc_offset_seconds, 3600);
        assert_eq!(config.line_ending, LineEnding::Crlf);

        let config: AggregatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AggregatorConfig::default());
    }
}
