//! Discord markdown output writer.
//!
//! Each record becomes a two-line quote block:
//!
//! ```text
//! > -# Rota Lyashko <t:1762810170:f> - `5776,11056,0`
//! > *[en] /say -, no, - no, - I believe you.*
//! ```
//!
//! `<t:EPOCH:f>` is Discord's localized timestamp token, so the reader sees
//! the time in their own zone.

use std::borrow::Borrow;
use std::fmt::Write as _;
use std::io::Write;

use crate::error::Result;
use crate::record::ChatLogRecord;

/// Formats one record as a Discord quote block (no trailing newline).
pub fn format_discord_record(record: &ChatLogRecord) -> String {
    let mut out = String::with_capacity(record.message.len() + 64);

    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "> -# {} <t:{}:f>",
        record.user,
        record.epoch_seconds()
    );
    if let Some(location) = record.location {
        let _ = write!(out, " - `{location}`");
    }

    out.push_str("\n> *");
    let mut first = true;
    let language = record.language.as_ref().map(|lang| format!("[{lang}]"));
    for segment in [
        language.as_deref(),
        record.message_type.as_deref(),
        Some(record.message.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|s| !s.is_empty())
    {
        if !first {
            out.push(' ');
        }
        out.push_str(segment);
        first = false;
    }
    out.push('*');
    out
}

/// Formats records as newline-joined quote blocks, in input order.
pub fn to_discord<R: Borrow<ChatLogRecord>>(records: &[R]) -> String {
    records
        .iter()
        .map(|record| format_discord_record(record.borrow()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes the same text as [`to_discord`] and returns the number of blocks.
pub fn write_discord<W: Write, R: Borrow<ChatLogRecord>>(
    records: &[R],
    mut writer: W,
) -> Result<usize> {
    for (idx, record) in records.iter().enumerate() {
        if idx > 0 {
            writer.write_all(b"\n")?;
        }
        writer.write_all(format_discord_record(record.borrow()).as_bytes())?;
    }
    writer.flush()?;

    tracing::debug!(blocks = records.len(), "Wrote Discord export");
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn base() -> ChatLogRecord {
        let ts = Utc.timestamp_millis_opt(1_762_810_170_123).unwrap();
        ChatLogRecord::new(ts, "Rota Lyashko", "-, no, - no, - I believe you.")
    }

    #[test]
    fn test_full_record() {
        let record = base()
            .with_nickname("Rota")
            .with_location(5776.0, 11056.0, 0)
            .with_language("en")
            .with_message_type("/say");
        assert_eq!(
            format_discord_record(&record),
            "> -# Rota Lyashko <t:1762810170:f> - `5776,11056,0`\n> *[en] /say -, no, - no, - I believe you.*"
        );
    }

    #[test]
    fn test_omits_absent_segments() {
        assert_eq!(
            format_discord_record(&base()),
            "> -# Rota Lyashko <t:1762810170:f>\n> *-, no, - no, - I believe you.*"
        );

        let record = base().with_message_type("/me");
        assert_eq!(
            format_discord_record(&record),
            "> -# Rota Lyashko <t:1762810170:f>\n> */me -, no, - no, - I believe you.*"
        );

        let record = base().with_language("de");
        assert!(format_discord_record(&record).ends_with("> *[de] -, no, - no, - I believe you.*"));
    }

    #[test]
    fn test_empty_message_has_no_dangling_space() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let record = ChatLogRecord::new(ts, "Ana", "")
            .with_language("en")
            .with_message_type("/say");
        assert!(format_discord_record(&record).ends_with("> *[en] /say*"));
    }

    #[test]
    fn test_fractional_coordinates() {
        let record = base().with_location(-12.5, 0.25, -2);
        assert!(format_discord_record(&record).contains(" - `-12.5,0.25,-2`\n"));
    }

    #[test]
    fn test_bulk_join() {
        let ts = Utc.with_ymd_and_hms(2025, 11, 10, 21, 30, 0).unwrap();
        let records = vec![base(), ChatLogRecord::new(ts, "Mira", "hi")];
        let text = to_discord(&records);
        assert_eq!(text.lines().count(), 4);
        assert!(!text.ends_with('\n'));
        assert!(text.lines().nth(2).unwrap().starts_with("> -# Mira "));

        let mut buf = Vec::new();
        assert_eq!(write_discord(&records, &mut buf).unwrap(), 2);
        assert_eq!(String::from_utf8(buf).unwrap(), text);
    }

    #[test]
    fn test_empty_subset() {
        let records: Vec<ChatLogRecord> = Vec::new();
        assert_eq!(to_discord(&records), "");
    }
}
