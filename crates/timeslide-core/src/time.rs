#![forbid(unsafe_code)]

//! Time normalization.
//!
//! Turns the loosely-typed values hosts store in item metadata into:
//!
//! - an [`Instant`] (milliseconds since the Unix epoch) for ordering,
//! - a display label for the timestamp pill ([`to_display_label`]),
//! - an equality key for grouping items that share a moment
//!   ([`to_equality_key`]).
//!
//! Every function here is total. Values that cannot be interpreted become
//! `None` (an unknown instant), an empty label, or a stringified key; they
//! never cause an error.
//!
//! # Numeric epochs
//!
//! Numbers below [`EPOCH_SECONDS_THRESHOLD`] are read as seconds and
//! scaled to milliseconds, larger numbers are already milliseconds. The
//! heuristic always applies when ordering; for display it applies only when
//! the caller says the values are epochs, otherwise numbers are taken as
//! milliseconds verbatim.
//!
//! # Strings
//!
//! ```
//! use timeslide_core::time::{parse_date, Instant};
//!
//! assert_eq!(parse_date("1970-01-02"), Some(Instant::from_millis(86_400_000)));
//! assert_eq!(parse_date("1970-01-01T00:00:01.5Z"), Some(Instant::from_millis(1_500)));
//! assert_eq!(parse_date("not a date"), None);
//! ```

use crate::value::MetaValue;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use unicode_segmentation::UnicodeSegmentation;

/// Numbers strictly below this are epoch seconds; at or above, milliseconds.
pub const EPOCH_SECONDS_THRESHOLD: f64 = 1e12;

/// Largest representable distance from the epoch, in milliseconds
/// (±100,000,000 days).
pub const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// Equality key used for items with no time value at all.
pub const ABSENT_EQUALITY_KEY: &str = "undefined";

/// Default `length` of [`LabelFormat::Substring`].
pub const DEFAULT_SUBSTRING_LENGTH: usize = 19;

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    // `Date.prototype.toString`, zone name already stripped.
    "%a %b %d %Y %H:%M:%S GMT%z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%d %B %Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const NAIVE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%a %B %d %Y",
    "%m/%d/%Y",
];

/// A normalized point in time: milliseconds since 1970-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instant(i64);

impl Instant {
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    #[inline]
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// UTC date-time for this instant, if chrono can represent it.
    #[must_use]
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }

    /// UTC calendar year.
    #[must_use]
    pub fn utc_year(self) -> Option<i32> {
        self.to_datetime().map(|d| d.year())
    }

    /// ISO-8601 rendering with millisecond precision, e.g.
    /// `2001-01-01T00:00:00.000Z`.
    #[must_use]
    pub fn to_iso_string(self) -> Option<String> {
        self.to_datetime()
            .map(|d| d.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
    }
}

impl From<DateTime<Utc>> for Instant {
    fn from(d: DateTime<Utc>) -> Self {
        Self(d.timestamp_millis())
    }
}

/// How the timestamp label is derived from a raw time value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LabelFormat {
    /// Four-digit UTC year.
    #[default]
    YearOnly,
    /// `length` graphemes starting at `start` of the string value (or of the
    /// ISO rendering for non-string values).
    Substring { start: usize, length: usize },
}

impl LabelFormat {
    /// Substring format with the historical defaults (`0`, `19`), which
    /// shows `YYYY-MM-DDTHH:MM:SS` of an ISO timestamp.
    #[must_use]
    pub const fn substring_default() -> Self {
        Self::Substring {
            start: 0,
            length: DEFAULT_SUBSTRING_LENGTH,
        }
    }
}

fn number_to_instant(n: f64, seconds_heuristic: bool) -> Option<Instant> {
    if !n.is_finite() {
        return None;
    }
    let millis = if seconds_heuristic && n < EPOCH_SECONDS_THRESHOLD {
        n * 1000.0
    } else {
        n
    };
    if millis.abs() > MAX_EPOCH_MILLIS {
        return None;
    }
    Some(Instant(millis.trunc() as i64))
}

/// Convert a raw value to an instant.
///
/// `is_epoch` enables the seconds/milliseconds heuristic for numbers;
/// without it numbers are milliseconds.
#[must_use]
pub fn to_instant(raw: &MetaValue, is_epoch: bool) -> Option<Instant> {
    match raw {
        MetaValue::Date(d) => Some(Instant::from(*d)),
        MetaValue::Number(n) => number_to_instant(*n, is_epoch),
        MetaValue::Text(s) => parse_date(s),
        MetaValue::Null | MetaValue::Bool(_) => None,
    }
}

/// Instant used for ordering items. Numbers always go through the
/// seconds/milliseconds heuristic.
#[inline]
#[must_use]
pub fn ordering_instant(raw: &MetaValue) -> Option<Instant> {
    to_instant(raw, true)
}

/// Parse a date string.
///
/// Accepts RFC 3339 (with or without a colon in the offset), RFC 2822,
/// `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`,
/// `YYYY-MM-DD[T ]HH:MM[:SS[.fff]]`, month-name dates (`July 4, 1998`,
/// `Jul 4 1998`, `04 Jul 1998`, `Sat Jul 04 1998`), and the
/// `Sat Jul 04 1998 00:00:00 GMT+0000 (zone name)` shape browsers store.
/// Forms without an offset are read as UTC. A leading weekday must match
/// the date.
#[must_use]
pub fn parse_date(s: &str) -> Option<Instant> {
    let s = strip_zone_name(s.trim());
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(Instant::from(d.with_timezone(&Utc)));
    }
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(d) = DateTime::parse_from_str(s, fmt) {
            return Some(Instant::from(d.with_timezone(&Utc)));
        }
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Instant::from(d.and_utc()));
        }
    }
    for fmt in NAIVE_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(Instant::from(d.and_time(NaiveTime::MIN).and_utc()));
        }
    }
    if let Some(d) = parse_year_month(s) {
        return Some(Instant::from(d.and_time(NaiveTime::MIN).and_utc()));
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(s) {
        return Some(Instant::from(d.with_timezone(&Utc)));
    }
    None
}

/// Drop a trailing `" (Zone Name)"`.
fn strip_zone_name(s: &str) -> &str {
    match s.rsplit_once(" (") {
        Some((head, tail)) if tail.ends_with(')') => head.trim_end(),
        _ => s,
    }
}

/// `YYYY` or `YYYY-MM`, resolved to the first day of the period.
fn parse_year_month(s: &str) -> Option<NaiveDate> {
    let (year, month) = match s.split_once('-') {
        Some((y, m)) if m.len() == 2 => (y, m.parse::<u32>().ok()?),
        Some(_) => return None,
        None => (s, 1),
    };
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, 1)
}

/// Leading four ASCII digits of `s`, if it starts with them.
fn leading_year(s: &str) -> Option<&str> {
    let head = s.get(..4)?;
    head.bytes().all(|b| b.is_ascii_digit()).then_some(head)
}

fn format_year(year: i32) -> String {
    if (0..=9999).contains(&year) {
        format!("{year:04}")
    } else {
        year.to_string()
    }
}

fn grapheme_slice(s: &str, start: usize, length: usize) -> String {
    s.graphemes(true).skip(start).take(length).collect()
}

/// Text for the timestamp label.
#[must_use]
pub fn to_display_label(raw: &MetaValue, is_epoch: bool, format: LabelFormat) -> String {
    match format {
        LabelFormat::YearOnly => {
            if let MetaValue::Text(s) = raw
                && let Some(year) = leading_year(s)
            {
                return year.to_owned();
            }
            to_instant(raw, is_epoch)
                .and_then(Instant::utc_year)
                .map(format_year)
                .unwrap_or_default()
        }
        LabelFormat::Substring { start, length } => match raw {
            MetaValue::Text(s) => grapheme_slice(s, start, length),
            other => to_instant(other, is_epoch)
                .and_then(Instant::to_iso_string)
                .map(|iso| grapheme_slice(&iso, start, length))
                .unwrap_or_default(),
        },
    }
}

/// Canonical key used to group items that share a moment.
///
/// The ISO rendering of the instant when one is derivable, otherwise the
/// raw value stringified.
#[must_use]
pub fn to_equality_key(raw: &MetaValue, is_epoch: bool) -> String {
    to_instant(raw, is_epoch)
        .and_then(Instant::to_iso_string)
        .unwrap_or_else(|| raw.to_string())
}

/// [`to_equality_key`] for a possibly absent value; absent values map to
/// [`ABSENT_EQUALITY_KEY`].
#[must_use]
pub fn equality_key_of(raw: Option<&MetaValue>, is_epoch: bool) -> String {
    raw.map_or_else(
        || ABSENT_EQUALITY_KEY.to_owned(),
        |raw| to_equality_key(raw, is_epoch),
    )
}
