//! Terminal rendering of the summary and history views

use crate::display::theme::hex_to_rgb;
use crate::display::{ChartView, HistoryView, SummaryView};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Renders views as plain text, optionally with 24-bit ANSI colour
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    pub color: bool,
}

impl TerminalRenderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn summary(&self, view: &SummaryView) -> String {
        if view.loading {
            return "Temperature  loading...".to_string();
        }

        let value = if view.has_value {
            format!("{}{}", view.temperature, view.unit)
        } else {
            view.temperature.clone()
        };

        let mut line = format!("Temperature  {}", value);
        if let Some(trend) = &view.trend {
            let arrow = format!("{} {}", trend.glyph, trend.label);
            line.push_str("  ");
            line.push_str(&self.paint(&arrow, trend.color));
        }
        line.push_str(&format!("  at {}", view.time));
        line
    }

    pub fn history(&self, view: &HistoryView) -> String {
        match view {
            HistoryView::Loading => "History      loading...".to_string(),
            HistoryView::Error { message } => {
                format!("History      {}\n             Type 'r' + Enter to retry", message)
            }
            HistoryView::Chart(chart) => self.chart(chart),
        }
    }

    fn chart(&self, chart: &ChartView) -> String {
        let mut out = format!("History      {}", chart.caption);

        if !chart.points.is_empty() {
            let values: Vec<Option<f64>> = chart.points.iter().map(|p| p.value).collect();
            out.push_str("\n             ");
            out.push_str(&self.paint(&sparkline(&values), chart.palette.line));

            if let (Some(first), Some(last)) = (chart.points.first(), chart.points.last()) {
                out.push_str(&format!("\n             {} .. {}", first.label, last.label));
            }
        }

        if let Some(stats) = &chart.stats {
            out.push_str(&format!(
                "\n             Current {}°C  Average {}°C  Range {}°C",
                stats.current, stats.average, stats.range
            ));
        }

        out
    }

    fn paint(&self, text: &str, hex: &str) -> String {
        match (self.color, hex_to_rgb(hex)) {
            (true, Some((r, g, b))) => format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, text),
            _ => text.to_string(),
        }
    }
}

/// One block character per sample, scaled to the present values
pub fn sparkline(values: &[Option<f64>]) -> String {
    let present = values.iter().flatten().copied();
    let (min, max) = present.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = max - min;
    let top = SPARK_LEVELS.len() - 1;

    values
        .iter()
        .map(|value| match value {
            None => ' ',
            Some(_) if span <= 0.0 || !span.is_finite() => SPARK_LEVELS[top / 2],
            Some(v) => {
                let level = ((v - min) / span * top as f64).round() as usize;
                SPARK_LEVELS[level.min(top)]
            }
        })
        .collect()
}
