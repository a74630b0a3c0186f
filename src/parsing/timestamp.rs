//! Transcript timestamp parsing.
//!
//! Lines carry `DD-MM-YY HH:mm:ss.SSS` in UTC. The two-digit year always
//! means `20YY`, which is why chrono's `%y` (which pivots at 69) is not used
//! for parsing.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// chrono format that renders a timestamp the way transcripts write it.
pub const LOG_TIMESTAMP_FORMAT: &str = "%d-%m-%y %H:%M:%S%.3f";

/// Parses the text between the timestamp brackets.
///
/// Returns `None` unless the text has exactly the expected shape and names a
/// real calendar instant (no 31st of April, no hour 24).
///
/// ```
/// use chatsift::parsing::parse_log_timestamp;
///
/// let ts = parse_log_timestamp("10-11-25 21:29:30.123").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2025-11-10T21:29:30.123+00:00");
/// assert!(parse_log_timestamp("31-04-25 10:00:00.000").is_none());
/// ```
pub fn parse_log_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let (date, time) = text.trim().split_once(' ')?;
    let (hms, millis) = time.split_once('.')?;

    let [day, month, year] = split_fixed::<3>(date, '-')?;
    let [hour, minute, second] = split_fixed::<3>(hms, ':')?;
    if millis.len() != 3 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(2000 + year as i32, month, day)?;
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, number(millis)?)?;
    Some(date.and_time(time).and_utc())
}

/// Splits `text` into exactly `N` two-digit numbers.
fn split_fixed<const N: usize>(text: &str, sep: char) -> Option<[u32; N]> {
    let mut out = [0u32; N];
    let mut parts = text.split(sep);
    for slot in &mut out {
        let part = parts.next()?;
        if part.len() != 2 {
            return None;
        }
        *slot = number(part)?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

/// ASCII digits only; `u32::from_str` would also take a leading `+`.
fn number(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
