//! Filter records by user, date, position, language, type and text.
//!
//! A [`FilterSpecification`] is a plain value describing which records to keep.
//! Validating it yields a [`CompiledFilter`], which evaluates records. Facets
//! combine with AND; a facet left empty matches everything.
//!
//! | Facet | Builder | Keeps a record when |
//! |-------|---------|---------------------|
//! | users | [`with_user`](FilterSpecification::with_user) | `user` is in the set |
//! | date range | [`with_date_from`](FilterSpecification::with_date_from), [`with_date_to`](FilterSpecification::with_date_to) | timestamp within the inclusive bounds |
//! | radius | [`with_radius`](FilterSpecification::with_radius) | it has a location within `max_distance` (and on `floor`, if given) |
//! | languages | [`with_language`](FilterSpecification::with_language) | it has a language in the set |
//! | message types | [`with_message_type`](FilterSpecification::with_message_type) | it has a type in the set |
//! | search text | [`with_search`](FilterSpecification::with_search) | message contains it, ignoring case |
//! | pattern | `with_pattern` | message matches the regex (`regex-search` feature) |
//!
//! # Example
//!
//! ```
//! use chatsift::core::filter::{FilterSpecification, RadiusFilter, apply_filters};
//! use chatsift::ChatLogRecord;
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> Result<(), chatsift::error::FilterError> {
//! let ts = Utc.with_ymd_and_hms(2025, 11, 10, 21, 0, 0).unwrap();
//! let records = vec![
//!     ChatLogRecord::new(ts, "Rota", "Hello there").with_location(0.0, 0.0, 0),
//!     ChatLogRecord::new(ts, "Mira", "hello back").with_location(30.0, 40.0, 0),
//!     ChatLogRecord::new(ts, "Ana", "HELLO, no position"),
//! ];
//!
//! let spec = FilterSpecification::new()
//!     .with_search("hello")
//!     .with_radius(RadiusFilter::new(0.0, 0.0, 50.0));
//!
//! let visible = apply_filters(&records, &spec)?;
//! let users: Vec<_> = visible.iter().map(|r| r.user.as_str()).collect();
//! assert_eq!(users, ["Rota", "Mira"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Filtering is stable: the output keeps the input order.
//! - Records without a location never pass an active radius facet.
//! - Records without a language (or type) never pass a non-empty language
//!   (or type) facet.
//! - An invalid specification is rejected as a whole; see [`ActiveFilter`] for
//!   keeping the last valid one.

use std::borrow::Borrow;
use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::record::ChatLogRecord;

/// Inclusive time window; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| ts >= start) && self.end.is_none_or(|end| ts <= end)
    }
}

/// Circle around a point, optionally restricted to one floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusFilter {
    pub center_latitude: f64,
    pub center_longitude: f64,
    /// Inclusive: a record exactly this far away passes.
    pub max_distance: f64,
    #[serde(default)]
    pub floor: Option<i32>,
}

impl RadiusFilter {
    pub fn new(center_latitude: f64, center_longitude: f64, max_distance: f64) -> Self {
        Self {
            center_latitude,
            center_longitude,
            max_distance,
            floor: None,
        }
    }

    #[must_use]
    pub fn with_floor(mut self, floor: i32) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn contains(&self, record: &ChatLogRecord) -> bool {
        let Some(location) = record.location else {
            return false;
        };
        location.distance_to(self.center_latitude, self.center_longitude) <= self.max_distance
            && self.floor.is_none_or(|floor| floor == location.floor)
    }

    fn validate(&self) -> Result<(), FilterError> {
        if !self.center_latitude.is_finite() {
            return Err(FilterError::InvalidCoordinate {
                field: "latitude",
                value: self.center_latitude,
            });
        }
        if !self.center_longitude.is_finite() {
            return Err(FilterError::InvalidCoordinate {
                field: "longitude",
                value: self.center_longitude,
            });
        }
        if !self.max_distance.is_finite() || self.max_distance < 0.0 {
            return Err(FilterError::InvalidRadius {
                value: self.max_distance,
            });
        }
        Ok(())
    }
}

/// Which records to show.
///
/// Deserializes from JSON with every facet optional, so a presentation layer
/// can send only the facets the user touched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSpecification {
    /// Exact user names (empty = all).
    pub users: HashSet<String>,

    pub date_range: Option<DateRange>,

    pub radius: Option<RadiusFilter>,

    /// Language codes (empty = all).
    pub languages: HashSet<String>,

    /// Message types including the slash (empty = all).
    pub message_types: HashSet<String>,

    /// Case-insensitive substring of the message (empty = all).
    pub search_text: String,

    /// Regular expression the message must match.
    #[cfg(feature = "regex-search")]
    pub message_pattern: Option<String>,
}

impl FilterSpecification {
    /// Creates a specification with no active facets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user to the users facet.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.users.insert(user.into());
        self
    }

    /// Sets the start of the date range to midnight UTC of a `YYYY-MM-DD` date.
    pub fn with_date_from(self, date_str: &str) -> Result<Self, FilterError> {
        let start = parse_date(date_str, NaiveTime::MIN)?;
        Ok(self.with_after(start))
    }

    /// Sets the end of the date range to the last millisecond of a
    /// `YYYY-MM-DD` date (UTC).
    pub fn with_date_to(self, date_str: &str) -> Result<Self, FilterError> {
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .ok_or_else(|| FilterError::invalid_date(date_str))?;
        let end = parse_date(date_str, end_of_day)?;
        Ok(self.with_before(end))
    }

    /// Sets the inclusive lower bound directly.
    #[must_use]
    pub fn with_after(mut self, start: DateTime<Utc>) -> Self {
        self.date_range.get_or_insert_with(DateRange::default).start = Some(start);
        self
    }

    /// Sets the inclusive upper bound directly.
    #[must_use]
    pub fn with_before(mut self, end: DateTime<Utc>) -> Self {
        self.date_range.get_or_insert_with(DateRange::default).end = Some(end);
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: RadiusFilter) -> Self {
        self.radius = Some(radius);
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.languages.insert(language.into());
        self
    }

    #[must_use]
    pub fn with_message_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_types.insert(message_type.into());
        self
    }

    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Sets a regular expression the message must match.
    #[cfg(feature = "regex-search")]
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.message_pattern = Some(pattern.into());
        self
    }

    /// Returns `true` if any facet constrains the result.
    pub fn is_active(&self) -> bool {
        let active = !self.users.is_empty()
            || self.date_range.is_some_and(|r| r.start.is_some() || r.end.is_some())
            || self.radius.is_some()
            || !self.languages.is_empty()
            || !self.message_types.is_empty()
            || !self.search_text.is_empty();
        #[cfg(feature = "regex-search")]
        let active = active || self.message_pattern.as_deref().is_some_and(|p| !p.is_empty());
        active
    }

    /// Checks the specification, discarding the compiled filter.
    pub fn validate(&self) -> Result<(), FilterError> {
        CompiledFilter::new(self).map(|_| ())
    }
}

fn parse_date(date_str: &str, time: NaiveTime) -> Result<DateTime<Utc>, FilterError> {
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| FilterError::invalid_date(date_str))?;
    Ok(date.and_time(time).and_utc())
}

/// A validated specification, ready to evaluate.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilter {
    spec: FilterSpecification,
    search_lower: String,
    #[cfg(feature = "regex-search")]
    pattern: Option<regex::Regex>,
}

impl CompiledFilter {
    /// Validates `spec` and prepares it for evaluation.
    ///
    /// # Errors
    ///
    /// - [`FilterError::InvertedDateRange`] if the end precedes the start
    /// - [`FilterError::InvalidCoordinate`] / [`FilterError::InvalidRadius`]
    ///   for non-finite or negative radius input
    /// - `FilterError::InvalidRegex` if the message pattern does not compile
    pub fn new(spec: &FilterSpecification) -> Result<Self, FilterError> {
        if let Some(DateRange {
            start: Some(start),
            end: Some(end),
        }) = spec.date_range
        {
            if end < start {
                return Err(FilterError::InvertedDateRange { start, end });
            }
        }

        if let Some(radius) = &spec.radius {
            radius.validate()?;
        }

        #[cfg(feature = "regex-search")]
        let pattern = match spec.message_pattern.as_deref() {
            Some(pattern) if !pattern.is_empty() => {
                Some(
                    regex::Regex::new(pattern).map_err(|source| FilterError::InvalidRegex {
                        pattern: pattern.to_string(),
                        source,
                    })?,
                )
            }
            _ => None,
        };

        Ok(Self {
            spec: spec.clone(),
            search_lower: spec.search_text.to_lowercase(),
            #[cfg(feature = "regex-search")]
            pattern,
        })
    }

    pub fn spec(&self) -> &FilterSpecification {
        &self.spec
    }

    /// Returns `true` if the record passes every active facet.
    pub fn matches(&self, record: &ChatLogRecord) -> bool {
        let spec = &self.spec;

        if !spec.users.is_empty() && !spec.users.contains(&record.user) {
            return false;
        }

        if let Some(range) = &spec.date_range {
            if !range.contains(record.timestamp) {
                return false;
            }
        }

        if !in_set(&spec.languages, record.language()) {
            return false;
        }

        if !in_set(&spec.message_types, record.message_type()) {
            return false;
        }

        if let Some(radius) = &spec.radius {
            if !radius.contains(record) {
                return false;
            }
        }

        if !self.search_lower.is_empty()
            && !record.message.to_lowercase().contains(&self.search_lower)
        {
            return false;
        }

        #[cfg(feature = "regex-search")]
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(&record.message) {
                return false;
            }
        }

        true
    }

    /// Matching records, in input order.
    pub fn apply<'a, R: Borrow<ChatLogRecord>>(&self, records: &'a [R]) -> Vec<&'a ChatLogRecord> {
        let visible: Vec<_> = records
            .iter()
            .map(Borrow::borrow)
            .filter(|record| self.matches(record))
            .collect();
        tracing::debug!(total = records.len(), visible = visible.len(), "Applied filter");
        visible
    }

    /// Positions of matching records, ascending.
    pub fn indices<R: Borrow<ChatLogRecord>>(&self, records: &[R]) -> Vec<usize> {
        records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches((*record).borrow()))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// An absent value is never a member of a non-empty set.
fn in_set(set: &HashSet<String>, value: Option<&str>) -> bool {
    set.is_empty() || value.is_some_and(|v| set.contains(v))
}

/// Validates `spec` and returns the matching records in input order.
///
/// # Errors
///
/// Returns a [`FilterError`] if the specification is invalid; nothing is
/// evaluated in that case.
pub fn apply_filters<'a, R: Borrow<ChatLogRecord>>(
    records: &'a [R],
    spec: &FilterSpecification,
) -> Result<Vec<&'a ChatLogRecord>, FilterError> {
    Ok(CompiledFilter::new(spec)?.apply(records))
}

/// Like [`apply_filters`], but returns positions into `records`.
pub fn filter_indices<R: Borrow<ChatLogRecord>>(
    records: &[R],
    spec: &FilterSpecification,
) -> Result<Vec<usize>, FilterError> {
    Ok(CompiledFilter::new(spec)?.indices(records))
}

/// The filter currently in effect for a view.
///
/// Owned by the caller. [`try_apply`](Self::try_apply) swaps in a new
/// specification only if it validates, so a half-typed radius or an inverted
/// date range leaves the previous filter in place.
///
/// ```
/// use chatsift::core::filter::{ActiveFilter, FilterSpecification, RadiusFilter};
///
/// let mut active = ActiveFilter::new();
/// active.try_apply(FilterSpecification::new().with_user("Rota")).unwrap();
///
/// let bad = FilterSpecification::new().with_radius(RadiusFilter::new(0.0, 0.0, -5.0));
/// assert!(active.try_apply(bad).is_err());
/// assert!(active.spec().users.contains("Rota"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActiveFilter {
    current: CompiledFilter,
}

impl ActiveFilter {
    /// Starts with the match-everything filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current filter if `spec` is valid.
    pub fn try_apply(&mut self, spec: FilterSpecification) -> Result<(), FilterError> {
        match CompiledFilter::new(&spec) {
            Ok(compiled) => {
                self.current = compiled;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "Rejected filter specification");
                Err(err)
            }
        }
    }

    pub fn spec(&self) -> &FilterSpecification {
        self.current.spec()
    }

    pub fn filter(&self) -> &CompiledFilter {
        &self.current
    }

    pub fn apply<'a, R: Borrow<ChatLogRecord>>(&self, records: &'a [R]) -> Vec<&'a ChatLogRecord> {
        self.current.apply(records)
    }
}
