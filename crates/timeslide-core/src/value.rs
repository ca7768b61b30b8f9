#![forbid(unsafe_code)]

//! Metadata values carried by map items.

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use std::fmt;

/// A property/option bag keyed by field name.
pub type Metadata = AHashMap<String, MetaValue>;

/// A single metadata value as the host hands it over.
///
/// Only some variants can ever describe a point in time; the normalizer in
/// [`crate::time`] decides which, without ever failing.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// Explicit null. Treated as absent by the extractor.
    Null,
    Bool(bool),
    /// Numeric epoch (seconds or milliseconds) or any other number.
    Number(f64),
    Text(String),
    /// Native date value.
    Date(DateTime<Utc>),
}

impl MetaValue {
    /// Whether this value is [`MetaValue::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the string payload, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if n.is_nan() => f.write_str("NaN"),
            Self::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // f64's Display already drops a trailing ".0" on integral values.
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for MetaValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for MetaValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for MetaValue {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<MetaValue>> From<Option<T>> for MetaValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
