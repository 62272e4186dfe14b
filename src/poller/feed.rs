//! What each poller fetches and how it treats a failure
//!
//! The two feeds share the polling machinery but not their failure policy:
//! the latest reading fails silently and keeps showing the last value, the
//! history surfaces the failure so the chart can be swapped for an error view.

use async_trait::async_trait;
use std::sync::Arc;

use super::state::ClientState;
use crate::sensor::{FetchError, FetchResult, HistoryWindow, LatestReading, SensorSource};

/// A fetch routine plus its failure policy
#[async_trait]
pub trait Feed: Send + Sync + 'static {
    type Data: Clone + Send + Sync + 'static;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fetch a fresh snapshot from the source
    async fn fetch(&self) -> FetchResult<Self::Data>;

    /// Record a failed fetch. Returns whether the visible state changed.
    fn record_failure(&self, state: &mut ClientState<Self::Data>, error: &FetchError) -> bool;
}

/// Feed for `/api/latest`; failures are logged and otherwise ignored
pub struct LatestFeed {
    source: Arc<dyn SensorSource>,
}

impl LatestFeed {
    pub fn new(source: Arc<dyn SensorSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Feed for LatestFeed {
    type Data = LatestReading;

    fn name(&self) -> &'static str {
        "latest"
    }

    async fn fetch(&self) -> FetchResult<LatestReading> {
        self.source.fetch_latest().await
    }

    fn record_failure(&self, _state: &mut ClientState<LatestReading>, error: &FetchError) -> bool {
        tracing::warn!("Latest reading fetch failed, keeping last known value: {}", error);
        false
    }
}

/// Feed for `/api/history`; failures become a visible error message
pub struct HistoryFeed {
    source: Arc<dyn SensorSource>,
}

impl HistoryFeed {
    pub fn new(source: Arc<dyn SensorSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Feed for HistoryFeed {
    type Data = HistoryWindow;

    fn name(&self) -> &'static str {
        "history"
    }

    async fn fetch(&self) -> FetchResult<HistoryWindow> {
        self.source.fetch_history().await
    }

    fn record_failure(&self, state: &mut ClientState<HistoryWindow>, error: &FetchError) -> bool {
        tracing::warn!("History fetch failed: {}", error);

        let message = format!("Could not load temperature history: {}", error);
        if state.error.as_deref() == Some(message.as_str()) {
            return false;
        }
        state.error = Some(message);
        true
    }
}
