//! Client-side state owned by one poller

/// Where a poller is in its lifecycle, as seen by the render layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The first fetch has not resolved yet
    Loading,
    /// Showing the last good data (possibly none, if the source never answered)
    Ready,
    /// The most recent fetch failed and the failure is surfaced
    Failed,
}

/// The mutable snapshot owned by one poller
///
/// Created with `loading = true` and no data. `loading` flips to `false` on
/// the first fetch resolution and never comes back.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientState<T> {
    /// Last successfully fetched snapshot
    pub data: Option<T>,
    /// True only before the first fetch resolves
    pub loading: bool,
    /// Message describing the most recent failure, when surfaced
    pub error: Option<String>,
}

impl<T> ClientState<T> {
    /// Fresh state at mount time
    pub fn new() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failed
        } else {
            Phase::Ready
        }
    }

    /// Replace the snapshot wholesale and clear any failure
    pub(crate) fn apply_success(&mut self, data: T) {
        self.data = Some(data);
        self.loading = false;
        self.error = None;
    }

    /// Leave the loading phase; returns whether it was still loading
    pub(crate) fn finish_loading(&mut self) -> bool {
        std::mem::replace(&mut self.loading, false)
    }
}

impl<T> Default for ClientState<T> {
    fn default() -> Self {
        Self::new()
    }
}
