//! # Chatsift
//!
//! A Rust library for parsing, filtering and exporting game-server chat
//! transcripts.
//!
//! ## Overview
//!
//! Game servers write chat as one line per message:
//!
//! ```text
//! [10-11-25 21:29:30.123] Rota Lyashko (Rota) @ 5776,11056,0: [en] /say -, no, - no, - I believe you.
//! ```
//!
//! Chatsift turns batches of such files into typed records, lets a
//! presentation layer narrow them down with a compound filter, and exports the
//! result as CSV or as Discord markdown. Every stage is a synchronous, pure
//! computation: nothing here reads files, and nothing mutates a previous
//! result.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatsift::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let text = "\
//! [10-11-25 21:29:30.123] Rota Lyashko (Rota) @ 5776,11056,0: [en] /say -, no, - no, - I believe you.
//! [10-11-25 21:31:02.500] Mira @ 5780,11050,0: [de] /say Guten Abend
//! not a log line";
//!
//!     // Parse a batch (one file here)
//!     let result = aggregate(&[SourceText::new("server.log", text)]);
//!     assert_eq!(result.records().len(), 2);
//!     assert_eq!(result.summary().count(FailureReason::MalformedStructure), 1);
//!
//!     // Keep English lines near the spawn point
//!     let spec = FilterSpecification::new()
//!         .with_language("en")
//!         .with_radius(RadiusFilter::new(5776.0, 11056.0, 25.0));
//!     let visible = apply_filters(result.records(), &spec)?;
//!
//!     // Paste-ready Discord markdown
//!     let text = to_discord(&visible);
//!     assert!(text.starts_with("> -# Rota Lyashko <t:1762810170:f> - `5776,11056,0`"));
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parsing`] - Line grammar
//!   - [`parse_line`], [`FailureReason`], [`parse_log_timestamp`](parsing::parse_log_timestamp)
//! - [`record`] - [`ChatLogRecord`], [`Location`]
//! - [`core`] - Pipeline stages
//!   - [`core::aggregate`] - [`LogAggregator`](core::LogAggregator), [`AggregationResult`](core::AggregationResult)
//!   - [`core::filter`] - [`FilterSpecification`](core::FilterSpecification), [`apply_filters`](core::apply_filters), [`ActiveFilter`](core::ActiveFilter)
//!   - [`core::output`] - `to_csv`, [`to_discord`](core::to_discord)
//! - [`format`] - [`OutputFormat`](format::OutputFormat) dispatch
//! - [`config`] - [`AggregatorConfig`](config::AggregatorConfig), [`ExportConfig`](config::ExportConfig)
//! - [`progress`] - Progress callbacks and cancellation for large batches
//! - [`error`] - Error types ([`ChatsiftError`], [`Result`])
//! - [`prelude`] - Convenient re-exports
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `csv-output` | yes | CSV export via the `csv` crate |
//! | `regex-search` | yes | the `message_pattern` filter facet |
//!
//! ## Logging
//!
//! The aggregator, filter engine and writers emit [`tracing`] events. The
//! library never installs a subscriber.

pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod parsing;
pub mod progress;
pub mod record;

// Re-export the main types at the crate root for convenience
pub use error::{ChatsiftError, Result};
pub use parsing::{FailureReason, parse_line};
pub use record::{ChatLogRecord, Location};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use chatsift::prelude::*;
/// ```
pub mod prelude {
    // Data model
    pub use crate::record::{ChatLogRecord, Location};

    // Error types
    pub use crate::error::{ChatsiftError, FilterError, Result};

    // Parsing
    pub use crate::parsing::{FailureReason, parse_line};

    // Configuration
    pub use crate::config::{AggregatorConfig, ExportConfig, LineEnding};

    // Aggregation
    pub use crate::core::aggregate::{
        AggregateControl, AggregationResult, FailureSummary, LogAggregator, ParseFailure,
        SourceText, aggregate,
    };
    pub use crate::progress::{CancelToken, Progress, ProgressCallback};

    // Filtering
    pub use crate::core::filter::{
        ActiveFilter, DateRange, FilterSpecification, RadiusFilter, apply_filters,
    };

    // Output
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    pub use crate::core::output::{format_discord_record, to_discord, write_discord};
    pub use crate::format::{OutputFormat, render, write_to_format};
}
