//! Polling Clients
//!
//! Keeps client-side state in step with the sensor source on a fixed cadence:
//!
//! - **state**: `ClientState` snapshot and its `Phase`
//! - **feed**: `Feed` trait with the latest and history failure policies
//! - **runner**: `Poller`, the schedule, teardown guard and stale-response check
//!
//! # Lifecycle
//!
//! ```text
//! Loading ──first resolution──► Ready ◄──success──┐
//!                         └───► Failed ──success──┘   (history only)
//! ```

pub mod feed;
pub mod runner;
pub mod state;

pub use feed::{Feed, HistoryFeed, LatestFeed};
pub use runner::{PollOptions, PollOutcome, Poller};
pub use state::{ClientState, Phase};

/// Poller for the single most recent reading
pub type LatestPoller = Poller<LatestFeed>;

/// Poller for the window of recent readings
pub type HistoryPoller = Poller<HistoryFeed>;
