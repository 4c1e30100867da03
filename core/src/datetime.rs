//! Timestamps in the format the Tilda API uses for `date` fields.
//!
//! The service sends `YYYY-MM-DD HH:MM:SS` without a timezone, or the token
//! `null` (sometimes quoted, sometimes a bare JSON `null`) for pages that were
//! never published. Both map onto `DateTime`; the null token becomes the zero
//! value, which reads as 1970-01-01 00:00:00 but stays distinct from it.

use std::fmt;

use chrono::NaiveDateTime;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NULL_TOKEN: &str = "null";

/// Text that is neither a `YYYY-MM-DD HH:MM:SS` timestamp nor `null`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date `{input}`, expected YYYY-MM-DD HH:MM:SS or null")]
pub struct DateFormatError {
    pub input: String,
}

/// Naive timestamp, interpreted as UTC by convention.
///
/// The `null` token is kept apart from every real instant, so a genuine
/// 1970-01-01 00:00:00 still prints as a timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(Option<NaiveDateTime>);

impl DateTime {
    /// Parse the service's textual format. Surrounding `"` are ignored.
    pub fn parse(input: &str) -> Result<Self, DateFormatError> {
        let trimmed = input.trim_matches('"');
        if trimmed == NULL_TOKEN {
            return Ok(Self::default());
        }
        let invalid = || DateFormatError {
            input: trimmed.to_string(),
        };
        // chrono alone accepts unpadded fields, signs and extra whitespace.
        if !has_service_layout(trimmed) {
            return Err(invalid());
        }
        NaiveDateTime::parse_from_str(trimmed, DATE_TIME_FORMAT)
            .map(|naive| Self(Some(naive)))
            .map_err(|_| invalid())
    }

    /// True for the value produced by the `null` token.
    pub fn is_zero(&self) -> bool {
        self.0.is_none()
    }

    /// The parsed instant, `None` for the `null` token.
    pub fn naive(&self) -> Option<NaiveDateTime> {
        self.0
    }

    /// The parsed instant, with the `null` token read as 1970-01-01 00:00:00.
    pub fn into_naive(self) -> NaiveDateTime {
        self.0.unwrap_or_default()
    }
}

/// Exactly `DDDD-DD-DD DD:DD:DD`, one ASCII byte per position.
fn has_service_layout(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 19
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b' ',
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

impl From<NaiveDateTime> for DateTime {
    fn from(value: NaiveDateTime) -> Self {
        Self(Some(value))
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(naive) => write!(f, "{}", naive.format(DATE_TIME_FORMAT)),
            None => f.write_str(NULL_TOKEN),
        }
    }
}

impl Serialize for DateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DateTimeVisitor)
    }
}

struct DateTimeVisitor;

impl<'de> Visitor<'de> for DateTimeVisitor {
    type Value = DateTime;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a `YYYY-MM-DD HH:MM:SS` string or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<DateTime, E> {
        DateTime::parse(value).map_err(E::custom)
    }

    fn visit_unit<E: de::Error>(self) -> Result<DateTime, E> {
        Ok(DateTime::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<DateTime, E> {
        Ok(DateTime::default())
    }
}
