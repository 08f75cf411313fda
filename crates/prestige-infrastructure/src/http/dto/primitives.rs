//! Loosely-typed JSON scalars the server is known to send.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;

/// Identifier sent either as a string or a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(serde_json::Number),
}

impl WireId {
    /// Canonical string form; blank strings are treated as absent
    pub fn into_string(self) -> Option<String> {
        match self {
            WireId::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            WireId::Number(n) => Some(n.to_string()),
        }
    }
}

/// Instant sent as RFC 3339 text, a bare date, or epoch milliseconds
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Millis(i64),
    FloatMillis(f64),
    Text(String),
}

impl WireTimestamp {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            WireTimestamp::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms),
            WireTimestamp::FloatMillis(ms) if ms.is_finite() => {
                DateTime::<Utc>::from_timestamp_millis(ms.trunc() as i64)
            }
            WireTimestamp::FloatMillis(_) => None,
            WireTimestamp::Text(text) => parse_timestamp_text(text),
        }
    }
}

impl std::fmt::Display for WireTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireTimestamp::Millis(ms) => write!(f, "{}", ms),
            WireTimestamp::FloatMillis(ms) => write!(f, "{}", ms),
            WireTimestamp::Text(text) => write!(f, "{:?}", text),
        }
    }
}

fn parse_timestamp_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    // Offset-less date-times are read as UTC
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    text.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// Counter sent as an integer, a float, numeric text, or an array whose
/// length is the count
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireCount {
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<serde_json::Value>),
}

impl WireCount {
    /// Signed value; non-finite or unparseable input becomes 0
    pub fn to_i64(&self) -> i64 {
        match self {
            WireCount::Int(n) => *n,
            WireCount::Float(f) if f.is_finite() => f.trunc() as i64,
            WireCount::Float(_) => 0,
            WireCount::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .ok()
                    .or_else(|| {
                        text.parse::<f64>()
                            .ok()
                            .filter(|f| f.is_finite())
                            .map(|f| f.trunc() as i64)
                    })
                    .unwrap_or(0)
            }
            WireCount::List(items) => i64::try_from(items.len()).unwrap_or(i64::MAX),
        }
    }

    /// Non-negative value; negatives clamp to 0
    pub fn to_u64(&self) -> u64 {
        match self {
            WireCount::Float(f) if f.is_finite() && *f > i64::MAX as f64 => u64::MAX,
            _ => u64::try_from(self.to_i64().max(0)).unwrap_or(0),
        }
    }

    pub fn to_u32(&self) -> u32 {
        u32::try_from(self.to_u64()).unwrap_or(u32::MAX)
    }
}

/// Optional-counter helpers so payload conversions read flat
pub fn count_u64(value: &Option<WireCount>) -> u64 {
    value.as_ref().map_or(0, WireCount::to_u64)
}

pub fn count_u32(value: &Option<WireCount>) -> u32 {
    value.as_ref().map_or(0, WireCount::to_u32)
}
