//! Value and time-of-day formatting
//!
//! Times render on the viewer's 24-hour clock as `HH:MM`. The summary and
//! the chart disagree on what to show when a timestamp cannot be parsed:
//! the summary shows [`TIME_PLACEHOLDER`], chart labels show the raw text.

use chrono::{Local, TimeZone};
use std::fmt::Display;

use crate::sensor::Timestamp;

/// Shown for an absent or unparseable summary time
pub const TIME_PLACEHOLDER: &str = "--:--";

/// Shown for an absent temperature
pub const VALUE_PLACEHOLDER: &str = "--";

/// Unit suffix for temperatures
pub const CELSIUS: &str = "°C";

/// `HH:MM` in the given zone, if the timestamp parses
pub fn clock_label_in<Tz>(timestamp: &Timestamp, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .to_zone(tz)
        .map(|dt| dt.format("%H:%M").to_string())
}

/// Summary time label: placeholder when absent or unparseable
pub fn summary_time_in<Tz>(timestamp: Option<&Timestamp>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp
        .and_then(|ts| clock_label_in(ts, tz))
        .unwrap_or_else(|| TIME_PLACEHOLDER.to_string())
}

/// Chart axis label: raw timestamp text when unparseable
pub fn chart_label_in<Tz>(timestamp: &Timestamp, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    clock_label_in(timestamp, tz).unwrap_or_else(|| timestamp.raw().to_string())
}

/// [`summary_time_in`] on the viewer's local clock
pub fn summary_time(timestamp: Option<&Timestamp>) -> String {
    summary_time_in(timestamp, &Local)
}

/// [`chart_label_in`] on the viewer's local clock
pub fn chart_label(timestamp: &Timestamp) -> String {
    chart_label_in(timestamp, &Local)
}

/// One decimal place, without a negative zero
pub fn one_decimal(value: f64) -> String {
    let value = if value.abs() < 0.05 { 0.0 } else { value };
    format!("{:.1}", value)
}

/// Temperature text, or the placeholder when absent
pub fn temperature_label(value: Option<f64>) -> String {
    value
        .map(one_decimal)
        .unwrap_or_else(|| VALUE_PLACEHOLDER.to_string())
}
