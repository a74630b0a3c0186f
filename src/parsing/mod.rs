//! Line grammar and timestamp parsing.
//!
//! Everything here is a pure function of its input. The aggregator in
//! [`crate::core::aggregate`] drives these over whole files.

pub mod line;
pub mod timestamp;

pub use line::{FailureReason, parse_line};
pub use timestamp::{LOG_TIMESTAMP_FORMAT, parse_log_timestamp};
