//! The structured chat log record.
//!
//! This module provides [`ChatLogRecord`], the typed form of one transcript
//! line, and [`Location`], the optional `@ lat,lng,floor` clause.
//!
//! Records are produced once by the line parser and never mutated afterwards.
//! The builder methods exist for tests and for hosts that construct records
//! from other sources.
//!
//! # Examples
//!
//! ```
//! use chatsift::ChatLogRecord;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = Utc.with_ymd_and_hms(2025, 11, 10, 21, 29, 30).unwrap();
//! let record = ChatLogRecord::new(ts, "Rota Lyashko", "hello")
//!     .with_nickname("Rota")
//!     .with_location(5776.0, 11056.0, 0)
//!     .with_language("en")
//!     .with_message_type("/say");
//!
//! assert_eq!(record.floor(), Some(0));
//! assert_eq!(
//!     record.to_log_line(),
//!     "[10-11-25 21:29:30.000] Rota Lyashko (Rota) @ 5776,11056,0: [en] /say hello"
//! );
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parsing::timestamp::LOG_TIMESTAMP_FORMAT;

/// Position of the speaker when the line was logged.
///
/// The grammar only accepts all three parts together, so a record either has a
/// full location or none. Floor `0` is a real floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub floor: i32,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64, floor: i32) -> Self {
        Self {
            latitude,
            longitude,
            floor,
        }
    }

    /// Planar distance to a point, ignoring floors.
    pub fn distance_to(&self, latitude: f64, longitude: f64) -> f64 {
        let dlat = self.latitude - latitude;
        let dlng = self.longitude - longitude;
        (dlat * dlat + dlng * dlng).sqrt()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.latitude, self.longitude, self.floor)
    }
}

/// One parsed chat transcript line.
///
/// | Field | Type | Source |
/// |-------|------|--------|
/// | `timestamp` | `DateTime<Utc>` | `[DD-MM-YY HH:mm:ss.SSS]` |
/// | `user` | `String` | text before the nickname |
/// | `nickname` | `Option<String>` | `( ... )` |
/// | `location` | `Option<Location>` | `@ lat,lng,floor` |
/// | `language` | `Option<String>` | `[en]` after the colon |
/// | `message_type` | `Option<String>` | leading `/say`-style token |
/// | `message` | `String` | the rest, possibly empty |
///
/// The timestamp carries no display timezone; exporters apply one at the
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatLogRecord {
    pub timestamp: DateTime<Utc>,

    /// Account identity, never empty.
    pub user: String,

    /// In-character display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub nickname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub location: Option<Location>,

    /// Short language code such as `en`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub language: Option<String>,

    /// Command token including its leading slash, e.g. `/say`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub message_type: Option<String>,

    pub message: String,
}

impl ChatLogRecord {
    /// Creates a record with only the mandatory fields.
    pub fn new(
        timestamp: DateTime<Utc>,
        user: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            user: user.into(),
            nickname: None,
            location: None,
            language: None,
            message_type: None,
            message: message.into(),
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    #[must_use]
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, latitude: f64, longitude: f64, floor: i32) -> Self {
        self.location = Some(Location::new(latitude, longitude, floor));
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    #[must_use]
    pub fn with_message_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = Some(message_type.into());
        self
    }

    // =========================================================================
    // Accessor methods
    // =========================================================================

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn message_type(&self) -> Option<&str> {
        self.message_type.as_deref()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.location.map(|l| l.latitude)
    }

    pub fn longitude(&self) -> Option<f64> {
        self.location.map(|l| l.longitude)
    }

    pub fn floor(&self) -> Option<i32> {
        self.location.map(|l| l.floor)
    }

    /// Whole seconds since the Unix epoch, fractional part truncated.
    pub fn epoch_seconds(&self) -> i64 {
        self.timestamp.timestamp()
    }

    /// Renders the record back into the transcript line grammar.
    ///
    /// Parsing the result yields an equal record, provided the year lies in
    /// 2000..=2099 and the text fields contain none of the grammar's
    /// delimiters.
    pub fn to_log_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChatLogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format(LOG_TIMESTAMP_FORMAT),
            self.user
        )?;
        if let Some(nickname) = &self.nickname {
            write!(f, " ({nickname})")?;
        }
        if let Some(location) = &self.location {
            write!(f, " @ {location}")?;
        }
        f.write_str(":")?;

        let language = self.language.as_ref().map(|l| format!("[{l}]"));
        let parts = [
            language.as_deref(),
            self.message_type.as_deref(),
            Some(self.message.as_str()),
        ];
        for part in parts.into_iter().flatten().filter(|p| !p.is_empty()) {
            write!(f, " {part}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 21, 29, 30).unwrap()
            + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn test_record_new() {
        let record = ChatLogRecord::new(ts(), "Rota", "hi");
        assert_eq!(record.user(), "Rota");
        assert_eq!(record.message(), "hi");
        assert!(record.nickname().is_none());
        assert!(record.location.is_none());
        assert!(record.latitude().is_none());
        assert!(record.floor().is_none());
    }

    #[test]
    fn test_record_builder() {
        let record = ChatLogRecord::new(ts(), "Rota", "hi")
            .with_nickname("R")
            .with_location(-1.5, 2.25, -3)
            .with_language("de")
            .with_message_type("/me");

        assert_eq!(record.nickname(), Some("R"));
        assert_eq!(record.latitude(), Some(-1.5));
        assert_eq!(record.longitude(), Some(2.25));
        assert_eq!(record.floor(), Some(-3));
        assert_eq!(record.language(), Some("de"));
        assert_eq!(record.message_type(), Some("/me"));
    }

    #[test]
    fn test_epoch_seconds_truncates_millis() {
        let record = ChatLogRecord::new(ts(), "Rota", "hi");
        assert_eq!(record.epoch_seconds(), 1762810170);
    }

    #[test]
    fn test_location_distance() {
        let loc = Location::new(3.0, 4.0, 0);
        assert_eq!(loc.distance_to(0.0, 0.0), 5.0);
        assert_eq!(loc.to_string(), "3,4,0");
    }

    #[test]
    fn test_display_full() {
        let record = ChatLogRecord::new(ts(), "Rota Lyashko", "-, no, - no, - I believe you.")
            .with_nickname("Rota")
            .with_location(5776.0, 11056.0, 0)
            .with_language("en")
            .with_message_type("/say");
        assert_eq!(
            record.to_log_line(),
            "[10-11-25 21:29:30.123] Rota Lyashko (Rota) @ 5776,11056,0: [en] /say -, no, - no, - I believe you."
        );
    }

    #[test]
    fn test_display_minimal() {
        let record = ChatLogRecord::new(ts(), "Rota", "");
        assert_eq!(record.to_log_line(), "[10-11-25 21:29:30.123] Rota:");
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let record = ChatLogRecord::new(ts(), "Rota", "hi");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"user\":\"Rota\""));
        assert!(!json.contains("nickname"));
        assert!(!json.contains("location"));
    }

    #[test]
    fn test_deserialization() {
        let json = r#"{"timestamp":"2025-11-10T21:29:30.123Z","user":"Bob","message":"x","location":{"latitude":1.0,"longitude":2.0,"floor":0}}"#;
        let record: ChatLogRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp, ts());
        assert_eq!(record.floor(), Some(0));
        assert!(record.language().is_none());
    }
}
