//! CSV output writer.

use std::borrow::Borrow;
use std::io::Write;

use chrono::FixedOffset;

use crate::config::{ExportConfig, LineEnding};
use crate::error::Result;
use crate::record::ChatLogRecord;

/// Column order of every CSV export.
pub const CSV_HEADER: [&str; 9] = [
    "timestamp",
    "user",
    "nickname",
    "latitude",
    "longitude",
    "floor",
    "language",
    "message_type",
    "message",
];

/// Timestamp column layout, rendered in the configured display offset.
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Writes records to CSV and returns the number of rows written.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: see [`CSV_HEADER`]
/// - Absent optional fields are empty
/// - Fields containing a comma, a double quote, CR or LF are quoted, with
///   inner quotes doubled
/// - Rows end with the configured [`LineEnding`]
///
/// # Errors
///
/// Returns an error if the display offset is out of range or the writer fails.
pub fn write_csv<W: Write, R: Borrow<ChatLogRecord>>(
    records: &[R],
    writer: W,
    config: &ExportConfig,
) -> Result<usize> {
    let offset = config.offset()?;
    let terminator = match config.line_ending {
        LineEnding::Lf => csv::Terminator::Any(b'\n'),
        LineEnding::Crlf => csv::Terminator::CRLF,
    };

    let mut writer = csv::WriterBuilder::new()
        .terminator(terminator)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record(build_row(record.borrow(), offset))?;
    }
    writer.flush()?;

    tracing::debug!(rows = records.len(), "Wrote CSV export");
    Ok(records.len())
}

/// Renders records as a CSV string.
pub fn to_csv<R: Borrow<ChatLogRecord>>(records: &[R], config: &ExportConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf, config)?;
    Ok(String::from_utf8(buf)?)
}

fn build_row(record: &ChatLogRecord, offset: FixedOffset) -> [String; 9] {
    let location = record.location;
    [
        record
            .timestamp
            .with_timezone(&offset)
            .format(CSV_TIMESTAMP_FORMAT)
            .to_string(),
        record.user.clone(),
        record.nickname.clone().unwrap_or_default(),
        location.map(|l| l.latitude.to_string()).unwrap_or_default(),
        location.map(|l| l.longitude.to_string()).unwrap_or_default(),
        location.map(|l| l.floor.to_string()).unwrap_or_default(),
        record.language.clone().unwrap_or_default(),
        record.message_type.clone().unwrap_or_default(),
        record.message.clone(),
    ]
}
