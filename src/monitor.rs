//! Monitor
//!
//! Mounts the two pollers side by side with the history chart's theme
//! observer. The pollers share nothing but the source handle.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::PollingConfig;
use crate::display::{HistoryView, SummaryView, ThemeObserver, ThemeSignal};
use crate::poller::{HistoryFeed, HistoryPoller, LatestFeed, LatestPoller, PollOptions, PollOutcome, Poller};
use crate::sensor::SensorSource;

/// Both pollers plus the theme observer, mounted together
pub struct Monitor {
    latest: LatestPoller,
    history: HistoryPoller,
    theme: ThemeObserver,
}

impl Monitor {
    /// Mount both pollers; must be called from within a tokio runtime
    pub fn start(
        config: &PollingConfig,
        source: Arc<dyn SensorSource>,
        theme: Arc<dyn ThemeSignal>,
    ) -> Self {
        let latest = Poller::mount(
            LatestFeed::new(Arc::clone(&source)),
            PollOptions {
                interval: config.latest_interval(),
                discard_stale: config.discard_stale_responses,
            },
        );

        let history = Poller::mount(
            HistoryFeed::new(source),
            PollOptions {
                interval: config.history_interval(),
                discard_stale: config.discard_stale_responses,
            },
        );

        Self {
            latest,
            history,
            theme: ThemeObserver::observe(theme),
        }
    }

    pub fn latest(&self) -> &LatestPoller {
        &self.latest
    }

    pub fn history(&self) -> &HistoryPoller {
        &self.history
    }

    /// Summary derived from the current latest-reading state
    pub fn summary_view(&self) -> SummaryView {
        SummaryView::from_state(&self.latest.snapshot())
    }

    /// Chart (or error/loading) derived from the current history state
    pub fn history_view(&self) -> HistoryView {
        HistoryView::from_state(&self.history.snapshot(), self.theme.palette())
    }

    /// Retry action of the history error view
    pub async fn retry_history(&self) -> PollOutcome {
        tracing::info!("Retrying history fetch");
        self.history.refresh().await
    }

    /// Retry on a background task; the outcome is also visible through the
    /// history subscription
    pub fn spawn_history_retry(&self) -> JoinHandle<PollOutcome> {
        tracing::info!("Retrying history fetch");
        self.history.spawn_refresh()
    }

    /// Tear down both pollers and release the theme subscription
    pub fn shutdown(self) {
        let Monitor {
            latest,
            history,
            theme,
        } = self;
        latest.unmount();
        history.unmount();
        drop(theme);
    }
}
