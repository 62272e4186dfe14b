//! Scripted in-memory source for unit tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{FetchError, FetchResult, HistoryWindow, LatestReading, SensorSource};

struct Scripted<T> {
    delay: Duration,
    result: FetchResult<T>,
}

/// Replays queued responses in order; answers `Unavailable` once drained
#[derive(Default)]
pub(crate) struct ScriptedSource {
    latest: Mutex<VecDeque<Scripted<LatestReading>>>,
    history: Mutex<VecDeque<Scripted<HistoryWindow>>>,
    latest_calls: AtomicUsize,
    history_calls: AtomicUsize,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_latest(&self, result: FetchResult<LatestReading>) {
        self.push_latest_after(Duration::ZERO, result);
    }

    pub(crate) fn push_latest_after(&self, delay: Duration, result: FetchResult<LatestReading>) {
        self.latest.lock().unwrap().push_back(Scripted { delay, result });
    }

    pub(crate) fn push_history(&self, result: FetchResult<HistoryWindow>) {
        self.push_history_after(Duration::ZERO, result);
    }

    pub(crate) fn push_history_after(&self, delay: Duration, result: FetchResult<HistoryWindow>) {
        self.history.lock().unwrap().push_back(Scripted { delay, result });
    }

    pub(crate) fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

async fn replay<T>(queue: &Mutex<VecDeque<Scripted<T>>>) -> FetchResult<T> {
    let next = queue.lock().unwrap().pop_front();
    match next {
        Some(scripted) => {
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            scripted.result
        }
        None => Err(FetchError::Unavailable),
    }
}

#[async_trait]
impl SensorSource for ScriptedSource {
    async fn fetch_latest(&self) -> FetchResult<LatestReading> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        replay(&self.latest).await
    }

    async fn fetch_history(&self) -> FetchResult<HistoryWindow> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        replay(&self.history).await
    }
}
