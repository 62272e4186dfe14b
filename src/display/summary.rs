//! Summary display for the latest reading

use chrono::{Local, TimeZone};
use std::fmt::Display;

use super::format::{summary_time_in, temperature_label, CELSIUS};
use crate::poller::ClientState;
use crate::sensor::{LatestReading, Trend};

/// Arrow direction of a trend indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Directional indicator; direction only, never a numeric delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendIndicator {
    pub direction: Direction,
    pub glyph: &'static str,
    /// Warm colour for rising, cool colour for falling
    pub color: &'static str,
    pub label: &'static str,
}

impl TrendIndicator {
    pub const WARMING: TrendIndicator = TrendIndicator {
        direction: Direction::Up,
        glyph: "↑",
        color: "#F44336",
        label: "warming",
    };

    pub const COOLING: TrendIndicator = TrendIndicator {
        direction: Direction::Down,
        glyph: "↓",
        color: "#2196F3",
        label: "cooling",
    };

    /// `None` for a stable trend
    pub fn for_trend(trend: Trend) -> Option<Self> {
        match trend {
            Trend::Rising => Some(Self::WARMING),
            Trend::Falling => Some(Self::COOLING),
            Trend::Stable => None,
        }
    }
}

/// Everything the summary display needs
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    /// Show a spinner instead of values
    pub loading: bool,
    /// One decimal, or the placeholder
    pub temperature: String,
    pub has_value: bool,
    pub unit: &'static str,
    /// `HH:MM`, or the placeholder
    pub time: String,
    pub trend: Option<TrendIndicator>,
}

impl SummaryView {
    /// Derive the view on the viewer's local clock
    pub fn from_state(state: &ClientState<LatestReading>) -> Self {
        Self::from_state_in(state, &Local)
    }

    pub fn from_state_in<Tz>(state: &ClientState<LatestReading>, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let reading = state.data.as_ref();
        let temperature = reading.and_then(|r| r.temperature);

        Self {
            loading: state.loading,
            temperature: temperature_label(temperature),
            has_value: temperature.is_some(),
            unit: CELSIUS,
            time: summary_time_in(reading.and_then(|r| r.time.as_ref()), tz),
            trend: reading.and_then(|r| TrendIndicator::for_trend(r.trend)),
        }
    }
}
