//! Transcript line grammar.
//!
//! ```text
//! [DD-MM-YY HH:mm:ss.SSS] <user> (<nickname>) @ <lat>,<lng>,<floor>: [<lang>] </type> <message>
//! ```
//!
//! The nickname group, the `@` clause and the language tag are each optional,
//! so a line comes in one of two shapes: with location or without. The
//! recognizer walks the line left to right and stops at the first problem,
//! which determines the [`FailureReason`]:
//!
//! 1. skeleton (`[`, `]`, `:`, balanced parentheses) → [`FailureReason::MalformedStructure`]
//! 2. timestamp → [`FailureReason::InvalidTimestamp`]
//! 3. user → [`FailureReason::EmptyUser`]
//! 4. `@` clause → [`FailureReason::InvalidCoordinate`]

use std::fmt;

use serde::{Deserialize, Serialize};

use super::timestamp::parse_log_timestamp;
use crate::record::{ChatLogRecord, Location};

/// Why a line did not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// The line matches neither grammar shape.
    MalformedStructure,
    /// The bracketed timestamp is not a valid calendar instant.
    InvalidTimestamp,
    /// The `@` clause is not `<number>,<number>,<integer>`.
    InvalidCoordinate,
    /// Nothing but whitespace in front of the nickname or colon.
    EmptyUser,
}

impl FailureReason {
    /// The stable tag shown to users and used in serialized output.
    pub fn tag(&self) -> &'static str {
        match self {
            FailureReason::MalformedStructure => "MALFORMED_STRUCTURE",
            FailureReason::InvalidTimestamp => "INVALID_TIMESTAMP",
            FailureReason::InvalidCoordinate => "INVALID_COORDINATE",
            FailureReason::EmptyUser => "EMPTY_USER",
        }
    }

    /// Every reason, in the order the recognizer checks for them.
    pub fn all() -> &'static [FailureReason] {
        &[
            FailureReason::MalformedStructure,
            FailureReason::InvalidTimestamp,
            FailureReason::InvalidCoordinate,
            FailureReason::EmptyUser,
        ]
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Parses one transcript line.
///
/// Total over every input: any string yields either a record or a reason,
/// never a panic.
///
/// ```
/// use chatsift::parsing::{parse_line, FailureReason};
///
/// let record = parse_line("[10-11-25 21:29:30.123] Rota Lyashko (Rota): hello").unwrap();
/// assert_eq!(record.user, "Rota Lyashko");
/// assert_eq!(record.nickname.as_deref(), Some("Rota"));
/// assert!(record.location.is_none());
///
/// assert_eq!(
///     parse_line("garbage text with no structure"),
///     Err(FailureReason::MalformedStructure)
/// );
/// ```
pub fn parse_line(line: &str) -> Result<ChatLogRecord, FailureReason> {
    let line = line.trim();

    let rest = line
        .strip_prefix('[')
        .ok_or(FailureReason::MalformedStructure)?;
    let (stamp, rest) = rest
        .split_once(']')
        .ok_or(FailureReason::MalformedStructure)?;
    let (header, body) = rest
        .split_once(':')
        .ok_or(FailureReason::MalformedStructure)?;
    let header = Header::split(header)?;

    let timestamp = parse_log_timestamp(stamp).ok_or(FailureReason::InvalidTimestamp)?;

    if header.user.is_empty() {
        return Err(FailureReason::EmptyUser);
    }

    let location = header.location.map(parse_location).transpose()?;
    let (language, rest) = split_language(body);
    let (message_type, message) = split_message_type(rest);

    Ok(ChatLogRecord {
        timestamp,
        user: header.user.to_string(),
        nickname: header.nickname.map(str::to_string),
        location,
        language: language.map(str::to_string),
        message_type: message_type.map(str::to_string),
        message: message.to_string(),
    })
}

/// The part between the timestamp bracket and the first colon.
#[derive(Debug, PartialEq)]
struct Header<'a> {
    user: &'a str,
    nickname: Option<&'a str>,
    location: Option<&'a str>,
}

impl<'a> Header<'a> {
    /// The nickname group is located first, so an `@` inside the user name
    /// or the nickname is plain text. Only an `@` after the closing `)`
    /// starts the location clause. Without a nickname group the last `@`
    /// starts it, since coordinates never contain one.
    fn split(header: &'a str) -> Result<Self, FailureReason> {
        let Some(open) = header.find('(') else {
            if header.contains(')') {
                return Err(FailureReason::MalformedStructure);
            }
            let (user, location) = match header.rsplit_once('@') {
                Some((user, location)) => (user, Some(location.trim())),
                None => (header, None),
            };
            return Ok(Self {
                user: user.trim(),
                nickname: None,
                location,
            });
        };

        let user = &header[..open];
        let after = &header[open + 1..];
        let close = after.find(')').ok_or(FailureReason::MalformedStructure)?;
        let nickname = &after[..close];
        let trailing = after[close + 1..].trim();

        // A user name with its own parentheses is ambiguous; refuse it.
        if user.contains(')') || nickname.contains('(') || trailing.contains(['(', ')']) {
            return Err(FailureReason::MalformedStructure);
        }
        let location = match trailing.strip_prefix('@') {
            Some(clause) => Some(clause.trim()),
            None if trailing.is_empty() => None,
            None => return Err(FailureReason::MalformedStructure),
        };

        let nickname = nickname.trim();
        Ok(Self {
            user: user.trim(),
            nickname: (!nickname.is_empty()).then_some(nickname),
            location,
        })
    }
}

fn parse_location(clause: &str) -> Result<Location, FailureReason> {
    let mut parts = clause.split(',').map(str::trim);
    let (Some(lat), Some(lng), Some(floor), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(FailureReason::InvalidCoordinate);
    };

    Ok(Location {
        latitude: parse_coordinate(lat)?,
        longitude: parse_coordinate(lng)?,
        floor: floor
            .parse()
            .map_err(|_| FailureReason::InvalidCoordinate)?,
    })
}

fn parse_coordinate(text: &str) -> Result<f64, FailureReason> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(FailureReason::InvalidCoordinate)
}

/// Splits a leading `[lang]` tag off the message part.
fn split_language(body: &str) -> (Option<&str>, &str) {
    let body = body.trim_start();
    body.strip_prefix('[')
        .and_then(|inner| inner.split_once(']'))
        .filter(|(tag, _)| !tag.is_empty() && !tag.chars().any(char::is_whitespace))
        .map_or((None, body), |(tag, rest)| (Some(tag), rest))
}

/// Splits a leading `/command` token off the message.
fn split_message_type(rest: &str) -> (Option<&str>, &str) {
    let rest = rest.trim();
    let is_command = rest
        .strip_prefix('/')
        .is_some_and(|after| after.starts_with(|c: char| !c.is_whitespace()));
    if !is_command {
        return (None, rest);
    }

    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    (Some(&rest[..end]), rest[end..].trim())
}
