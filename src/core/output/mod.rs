//! Export writers.
//!
//! - [`write_csv`] / [`to_csv`] - RFC 4180 CSV, one row per record (requires `csv-output`)
//! - [`write_discord`] / [`to_discord`] - Discord markdown quote blocks
//!
//! Writers take records in the order the caller wants them exported, usually
//! the output of [`apply_filters`](crate::core::filter::apply_filters). Both
//! accept `&[ChatLogRecord]` and `&[&ChatLogRecord]`.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "csv-output")]
//! # fn main() -> chatsift::Result<()> {
//! use chatsift::config::ExportConfig;
//! use chatsift::core::output::{to_csv, to_discord};
//! use chatsift::parse_line;
//!
//! let record = parse_line(
//!     "[10-11-25 21:29:30.123] Rota Lyashko (Rota) @ 5776,11056,0: [en] /say hi",
//! )
//! .unwrap();
//!
//! let csv = to_csv(&[&record], &ExportConfig::new())?;
//! assert!(csv.starts_with("timestamp,user,nickname"));
//!
//! let discord = to_discord(&[&record]);
//! assert_eq!(
//!     discord,
//!     "> -# Rota Lyashko <t:1762810170:f> - `5776,11056,0`\n> *[en] /say hi*"
//! );
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "csv-output"))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod discord_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{CSV_HEADER, CSV_TIMESTAMP_FORMAT, to_csv, write_csv};
pub use discord_writer::{format_discord_record, to_discord, write_discord};
