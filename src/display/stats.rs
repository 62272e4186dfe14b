//! Statistics derived from a history window
//!
//! Computed fresh from the current state on every render; nothing here is
//! cached. Absent temperatures are skipped for the aggregates.

use serde::Serialize;

use super::format::{one_decimal, temperature_label};
use crate::sensor::HistoryWindow;

/// Aggregates over the present values of a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoryStats {
    /// Value at the last index; `None` if that sample is absent
    pub current: Option<f64>,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Number of present values aggregated
    pub samples: usize,
}

impl HistoryStats {
    /// `None` for an empty sequence or one with no present value
    pub fn from_values(values: &[Option<f64>]) -> Option<Self> {
        let current = *values.last()?;

        let present = values.iter().flatten().copied();
        let (sum, samples, min, max) = present.fold(
            (0.0, 0usize, f64::INFINITY, f64::NEG_INFINITY),
            |(sum, n, min, max), v| (sum + v, n + 1, min.min(v), max.max(v)),
        );

        if samples == 0 {
            return None;
        }

        Some(Self {
            current,
            average: sum / samples as f64,
            min,
            max,
            samples,
        })
    }

    pub fn from_window(window: &HistoryWindow) -> Option<Self> {
        Self::from_values(&window.temperatures)
    }

    /// Max minus min; 0 for a single sample
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Display strings for the statistics block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub current: String,
    pub average: String,
    pub range: String,
}

impl From<&HistoryStats> for StatsView {
    fn from(stats: &HistoryStats) -> Self {
        Self {
            current: temperature_label(stats.current),
            average: one_decimal(stats.average),
            range: one_decimal(stats.range()),
        }
    }
}
