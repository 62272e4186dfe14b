//! # Thermowatch
//!
//! Polls a remote temperature sensor and keeps two client-side views in step
//! with it: a "current value" summary and a time-series chart with derived
//! statistics.
//!
//! ## Features
//!
//! - **Fixed-cadence polling**: immediate fetch on mount, then every 30 seconds
//! - **Last-good state**: failures never wipe what is already displayed
//! - **Asymmetric failure policy**: the summary fails silently, the chart
//!   swaps to an error view with a retry action
//! - **Safe teardown**: nothing mutates state after a poller is unmounted
//! - **Stale-response guard**: an older response cannot overwrite a newer one
//!
//! ## Modules
//!
//! - [`sensor`]: Wire types and the HTTP source
//! - [`poller`]: Poll schedule and client state
//! - [`display`]: View models, statistics, formatting, theme
//! - [`monitor`]: Both pollers mounted together
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use thermowatch::{Config, HttpSensorSource, ManualTheme, Monitor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let source = Arc::new(HttpSensorSource::new(&config.source)?);
//!     let theme = Arc::new(ManualTheme::new(config.display.theme));
//!
//!     let monitor = Monitor::start(&config.polling, source, theme);
//!     let mut latest = monitor.latest().subscribe();
//!
//!     latest.changed().await?;
//!     println!("{:?}", monitor.summary_view());
//!
//!     monitor.shutdown();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod display;
pub mod logging;
pub mod monitor;
pub mod poller;
pub mod sensor;
pub mod terminal;

// Re-export top-level types for convenience
pub use config::{
    generate_default_config, Config, ConfigError, DisplayConfig, LoggingConfig, PollingConfig,
    SourceConfig,
};

pub use sensor::{
    FetchError, FetchResult, HistoryWindow, HttpSensorSource, LatestReading, Reading,
    SensorSource, Timestamp, Trend,
};

pub use poller::{
    ClientState, Feed, HistoryFeed, HistoryPoller, LatestFeed, LatestPoller, Phase, PollOptions,
    PollOutcome, Poller,
};

pub use display::{
    ChartPoint, ChartView, HistoryStats, HistoryView, ManualTheme, Palette, StatsView,
    SummaryView, Theme, ThemeObserver, ThemeSignal, TrendIndicator,
};

pub use monitor::Monitor;
pub use terminal::TerminalRenderer;
