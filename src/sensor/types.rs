//! Core data types for the sensor feed
//!
//! This module defines the values exchanged with the sensor endpoints:
//! - `Timestamp`: An opaque serialized instant as delivered by the source
//! - `Trend`: Short-term direction reported by the source
//! - `LatestReading`: Payload of `/api/latest`
//! - `HistoryWindow`: Payload of `/api/history`
//! - `Reading`: One observation of the history window

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Naive date-time layouts accepted when the source omits an offset.
/// These are interpreted in the viewer's zone.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A point in time as serialized by the sensor source
///
/// The raw text is kept verbatim so that display code can fall back to it
/// when it cannot be parsed. JSON numbers are accepted and kept as their
/// decimal text (epoch milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap a raw serialized instant
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Timestamp from epoch milliseconds
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.to_string())
    }

    /// The raw text exactly as delivered
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Parse the instant and express it in the given zone
    ///
    /// Accepts RFC 3339 / RFC 2822 (with offset), naive ISO date-times
    /// (interpreted in `tz`), and bare epoch milliseconds.
    pub fn to_zone<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        let raw = self.0.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(tz));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
            return Some(dt.with_timezone(tz));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return tz.from_local_datetime(&naive).earliest();
            }
        }

        raw.parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.with_timezone(tz))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Timestamp {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawInstant {
            Text(String),
            Integer(i64),
            Float(f64),
            Null(()),
        }

        Ok(match RawInstant::deserialize(deserializer)? {
            RawInstant::Text(text) => Timestamp(text),
            RawInstant::Integer(millis) => Timestamp::from_millis(millis),
            RawInstant::Float(value) if value.fract() == 0.0 => {
                Timestamp::from_millis(value as i64)
            }
            RawInstant::Float(value) => Timestamp(value.to_string()),
            RawInstant::Null(()) => Timestamp::default(),
        })
    }
}

/// Short-term direction of the temperature, as reported by the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Trend {
    /// Warming
    Rising,
    /// Cooling
    Falling,
    /// No meaningful change; suppresses any directional indicator
    #[default]
    Stable,
}

impl Trend {
    /// Wire name used by the source
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "up",
            Trend::Falling => "down",
            Trend::Stable => "stable",
        }
    }

    /// Lenient parse: unknown tags collapse to `Stable`
    pub fn from_wire(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "up" | "rising" => Trend::Rising,
            "down" | "falling" => Trend::Falling,
            _ => Trend::Stable,
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Trend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Trend {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.as_deref().map(Trend::from_wire).unwrap_or_default())
    }
}

/// Payload of `GET /api/latest`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LatestReading {
    /// Degrees Celsius; absent while the sensor has nothing to report
    #[serde(default)]
    pub temperature: Option<f64>,
    /// When the reading was taken
    #[serde(default)]
    pub time: Option<Timestamp>,
    /// Direction reported alongside the reading
    #[serde(default)]
    pub trend: Trend,
}

impl LatestReading {
    pub fn new(temperature: Option<f64>, time: Option<Timestamp>, trend: Trend) -> Self {
        Self {
            temperature,
            time,
            trend,
        }
    }
}

/// One observation of the history window
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: Timestamp,
    /// Absent values are display-only and never aggregated
    pub value: Option<f64>,
}

/// Payload of `GET /api/history`
///
/// The two sequences are kept in delivery order. `count` is whatever the
/// source reports and is not checked against the sequence lengths.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryWindow {
    #[serde(rename = "lastTimestamps", default, deserialize_with = "null_as_default")]
    pub timestamps: Vec<Timestamp>,
    #[serde(rename = "lastTemperatures", default, deserialize_with = "null_as_default")]
    pub temperatures: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
}

impl HistoryWindow {
    /// Build a window from parallel sequences
    pub fn new(timestamps: Vec<Timestamp>, temperatures: Vec<Option<f64>>, count: u64) -> Self {
        Self {
            timestamps,
            temperatures,
            count,
        }
    }

    /// Pair timestamps and temperatures by index
    ///
    /// Stops at the shorter sequence when the source sends mismatched lengths.
    pub fn readings(&self) -> impl Iterator<Item = Reading> + '_ {
        self.timestamps
            .iter()
            .zip(self.temperatures.iter())
            .map(|(timestamp, value)| Reading {
                timestamp: timestamp.clone(),
                value: *value,
            })
    }

    /// Number of temperature samples actually delivered
    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    /// Temperatures that are present, in delivery order
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.temperatures.iter().filter_map(|v| *v)
    }
}

/// Treat an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `count` is display-only, so it never fails the window: floats are
/// truncated, negative or non-numeric values decode as 0.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Other(IgnoredAny),
    }

    Ok(match RawCount::deserialize(deserializer)? {
        RawCount::Unsigned(count) => count,
        RawCount::Signed(_) => 0,
        RawCount::Float(value) if value.is_finite() && value > 0.0 => value.trunc() as u64,
        RawCount::Float(_) | RawCount::Other(_) => 0,
    })
}
