//! Core pipeline stages for chatsift.
//!
//! This module contains:
//! - [`aggregate`] - Multi-file parsing into records, failures and a summary
//! - [`filter`] - Compound filter specifications and their evaluation
//! - [`output`] - Export writers (CSV, Discord markdown)
//!
//! # Quick Start
//!
//! ```rust
//! use chatsift::core::{FilterSpecification, LogAggregator, SourceText, apply_filters, to_discord};
//!
//! # fn main() -> Result<(), chatsift::error::FilterError> {
//! let text = "[10-11-25 21:29:30.123] Rota: hello\n[10-11-25 21:30:00.000] Mira: bye";
//! let result = LogAggregator::new().aggregate(&[SourceText::new("chat.log", text)]);
//!
//! let spec = FilterSpecification::new().with_user("Mira");
//! let visible = apply_filters(result.records(), &spec)?;
//! assert!(to_discord(&visible).ends_with("> *bye*"));
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod filter;
pub mod output;

pub use aggregate::{
    AggregateControl, AggregationResult, FailureSummary, LogAggregator, ParseFailure, SourceText,
    aggregate,
};
pub use filter::{
    ActiveFilter, CompiledFilter, DateRange, FilterSpecification, RadiusFilter, apply_filters,
    filter_indices,
};

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
pub use output::{format_discord_record, to_discord, write_discord};
