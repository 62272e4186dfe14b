//! Fixed-interval poll schedule
//!
//! A `Poller` fetches once at mount, then on every tick of a fixed interval.
//! Each tick spawns an independent fetch task, so fetches may overlap and
//! resolve out of order. Every resolution passes through one guard:
//!
//! ```text
//! tick ─► spawn fetch(seq) ─► await source ─► lock guard ─┬─ unmounted ─► drop
//!                                                         ├─ stale     ─► drop
//!                                                         └─ apply to state ─► notify
//! ```
//!
//! Teardown takes the same lock, so no resolution can mutate state after
//! `unmount()` (or drop) returns.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::feed::Feed;
use super::state::ClientState;
use crate::sensor::FetchResult;

/// Schedule options for one poller
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Time between scheduled fetches
    pub interval: Duration,
    /// Drop a resolution older than one that already resolved
    pub discard_stale: bool,
}

impl PollOptions {
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            discard_stale: true,
        }
    }
}

/// What happened to one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Fresh data replaced the state
    Updated,
    /// The fetch failed and the feed's failure policy was applied
    Failed,
    /// A newer fetch had already resolved; this one was ignored
    Stale,
    /// The poller was torn down before the fetch resolved
    Unmounted,
}

struct Guard {
    mounted: bool,
    /// Sequence number of the most recently issued fetch
    issued: u64,
    /// Highest sequence number that has resolved
    resolved: u64,
}

struct Shared<F: Feed> {
    feed: F,
    state: watch::Sender<ClientState<F::Data>>,
    guard: Mutex<Guard>,
    discard_stale: bool,
}

impl<F: Feed> Shared<F> {
    fn lock(&self) -> MutexGuard<'_, Guard> {
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_mounted(&self) -> bool {
        self.lock().mounted
    }

    async fn poll_once(&self) -> PollOutcome {
        let seq = {
            let mut guard = self.lock();
            if !guard.mounted {
                return PollOutcome::Unmounted;
            }
            guard.issued += 1;
            guard.issued
        };

        tracing::debug!(feed = self.feed.name(), seq, "Fetching");
        let result = self.feed.fetch().await;
        self.resolve(seq, result)
    }

    fn resolve(&self, seq: u64, result: FetchResult<F::Data>) -> PollOutcome {
        let mut guard = self.lock();

        if !guard.mounted {
            tracing::debug!(feed = self.feed.name(), seq, "Discarding response after teardown");
            return PollOutcome::Unmounted;
        }
        if self.discard_stale && seq < guard.resolved {
            tracing::debug!(
                feed = self.feed.name(),
                seq,
                newest = guard.resolved,
                "Discarding stale response"
            );
            return PollOutcome::Stale;
        }
        guard.resolved = guard.resolved.max(seq);

        match result {
            Ok(data) => {
                self.state.send_modify(|state| state.apply_success(data));
                PollOutcome::Updated
            }
            Err(error) => {
                self.state.send_if_modified(|state| {
                    let was_loading = state.finish_loading();
                    let changed = self.feed.record_failure(state, &error);
                    was_loading || changed
                });
                PollOutcome::Failed
            }
        }
    }
}

/// A mounted poller: fetches immediately, then on every interval tick
///
/// Must be mounted from within a tokio runtime. Dropping the poller has the
/// same effect as [`Poller::unmount`].
pub struct Poller<F: Feed> {
    shared: Arc<Shared<F>>,
    ticker: Option<JoinHandle<()>>,
    interval: Duration,
}

impl<F: Feed> Poller<F> {
    /// Start polling `feed`
    pub fn mount(feed: F, options: PollOptions) -> Self {
        let (state, _) = watch::channel(ClientState::new());
        let name = feed.name();

        let shared = Arc::new(Shared {
            feed,
            state,
            guard: Mutex::new(Guard {
                mounted: true,
                issued: 0,
                resolved: 0,
            }),
            discard_stale: options.discard_stale,
        });

        let ticker = tokio::spawn(run_schedule(Arc::clone(&shared), options.interval));

        tracing::info!(
            "Mounted {} poller (every {}s)",
            name,
            options.interval.as_secs_f64()
        );

        Self {
            shared,
            ticker: Some(ticker),
            interval: options.interval,
        }
    }

    /// Read-only view of the state; notified on every visible change
    pub fn subscribe(&self) -> watch::Receiver<ClientState<F::Data>> {
        self.shared.state.subscribe()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ClientState<F::Data> {
        self.shared.state.borrow().clone()
    }

    /// Run the fetch routine now, independent of the timer
    ///
    /// This is the manual retry behind the history error view.
    pub async fn refresh(&self) -> PollOutcome {
        self.shared.poll_once().await
    }

    /// [`Poller::refresh`] on its own task, so the caller is not held up
    /// while the fetch is in flight
    pub fn spawn_refresh(&self) -> JoinHandle<PollOutcome> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move { shared.poll_once().await })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_mounted(&self) -> bool {
        self.shared.is_mounted()
    }

    /// Stop the schedule; in-flight fetches resolve into nothing
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        {
            let mut guard = self.shared.lock();
            if !guard.mounted {
                return;
            }
            guard.mounted = false;
        }

        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }

        tracing::info!("Unmounted {} poller", self.shared.feed.name());
    }
}

impl<F: Feed> Drop for Poller<F> {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn run_schedule<F: Feed>(shared: Arc<Shared<F>>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        // First tick completes immediately
        interval.tick().await;

        if !shared.is_mounted() {
            break;
        }

        let task = Arc::clone(&shared);
        tokio::spawn(async move {
            task.poll_once().await;
        });
    }
}
