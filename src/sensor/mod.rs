//! Sensor Source
//!
//! Everything that crosses the network boundary:
//!
//! - **types**: Wire payloads (`LatestReading`, `HistoryWindow`, `Trend`, `Timestamp`)
//! - **client**: `SensorSource` trait and the reqwest-backed `HttpSensorSource`
//! - **error**: `FetchError` taxonomy
//!
//! # Endpoints
//!
//! ```text
//! GET <base>/api/latest  -> { temperature, time, trend }
//! GET <base>/api/history -> { lastTimestamps, lastTemperatures, count }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpSensorSource, SensorSource, HISTORY_PATH, LATEST_PATH};
pub use error::{FetchError, FetchResult};
pub use types::{HistoryWindow, LatestReading, Reading, Timestamp, Trend};

#[cfg(test)]
pub(crate) mod testing;
