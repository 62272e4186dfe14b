//! Display Derivation
//!
//! Turns poller state into display-ready values. This is the render surface:
//! the views below carry everything a renderer needs and nothing else.
//!
//! - **format**: `HH:MM` labels, one-decimal values, placeholders
//! - **stats**: current / average / range over a history window
//! - **summary**: `SummaryView` for the latest reading
//! - **chart**: `HistoryView` (loading, error-with-retry, or chart)
//! - **theme**: light/dark signal, passive observer, palettes

pub mod chart;
pub mod format;
pub mod stats;
pub mod summary;
pub mod theme;

pub use chart::{ChartPoint, ChartView, HistoryView};
pub use format::{TIME_PLACEHOLDER, VALUE_PLACEHOLDER};
pub use stats::{HistoryStats, StatsView};
pub use summary::{Direction, SummaryView, TrendIndicator};
pub use theme::{ManualTheme, Palette, SubscriptionId, Theme, ThemeCallback, ThemeObserver, ThemeSignal};
