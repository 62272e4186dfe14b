//! Chart display for the history window
//!
//! The view branches on the state: spinner while loading, an error view
//! with a retry action whenever a failure is recorded, otherwise the chart.

use chrono::{Local, TimeZone};
use std::fmt::Display;

use super::format::chart_label_in;
use super::stats::{HistoryStats, StatsView};
use super::theme::Palette;
use crate::poller::ClientState;
use crate::sensor::HistoryWindow;

/// One plotted sample
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: Option<f64>,
}

/// The chart itself
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub points: Vec<ChartPoint>,
    /// Omitted when there is nothing to aggregate
    pub stats: Option<StatsView>,
    /// Text built from the source-reported count
    pub caption: String,
    pub palette: Palette,
}

/// Everything the history display needs
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Loading,
    /// Replaces the chart until the next success; offers a retry action
    Error { message: String },
    Chart(ChartView),
}

impl HistoryView {
    /// Derive the view on the viewer's local clock
    pub fn from_state(state: &ClientState<HistoryWindow>, palette: Palette) -> Self {
        Self::from_state_in(state, palette, &Local)
    }

    pub fn from_state_in<Tz>(state: &ClientState<HistoryWindow>, palette: Palette, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        if state.loading {
            return HistoryView::Loading;
        }
        if let Some(message) = &state.error {
            return HistoryView::Error {
                message: message.clone(),
            };
        }

        let empty = HistoryWindow::default();
        let window = state.data.as_ref().unwrap_or(&empty);
        HistoryView::Chart(ChartView::build(window, palette, tz))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, HistoryView::Error { .. })
    }
}

impl ChartView {
    pub fn build<Tz>(window: &HistoryWindow, palette: Palette, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let points = window
            .readings()
            .map(|reading| ChartPoint {
                label: chart_label_in(&reading.timestamp, tz),
                value: reading.value,
            })
            .collect();

        Self {
            points,
            stats: HistoryStats::from_window(window).as_ref().map(StatsView::from),
            caption: caption(window.count),
            palette,
        }
    }
}

fn caption(count: u64) -> String {
    match count {
        1 => "Last 1 reading".to_string(),
        n => format!("Last {} readings", n),
    }
}
