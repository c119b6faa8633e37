//! Poll cycle and change detection.
//!
//! The poller owns the only state that survives between cycles: the count of
//! posts seen on the previous successful poll. Each cycle fetches the
//! collection, resolves it into a [`DashboardSnapshot`], compares the new
//! count against the stored one, and delivers the result to the consumer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dashboard::DashboardSnapshot;
use crate::fetch::PostFetcher;

/// Count of posts seen on the previous successful poll. Initialized to zero at
/// startup and never persisted across restarts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollState {
    last_known_count: usize,
}

impl PollState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last_known_count(&self) -> usize {
        self.last_known_count
    }

    /// Record one poll outcome and report whether new data arrived.
    ///
    /// A `count` of zero means the poll produced no data (failed fetch or
    /// empty collection); both the comparison and the stored count are left
    /// untouched so a bad poll cannot corrupt change detection. Otherwise the
    /// stored count is always replaced, whether it grew, shrank, or held.
    pub fn observe(&mut self, count: usize) -> bool {
        if count == 0 {
            return false;
        }
        let new_data = count > self.last_known_count;
        self.last_known_count = count;
        new_data
    }
}

/// One fully processed poll cycle, delivered to the presentation layer.
#[derive(Debug)]
pub struct PollUpdate {
    pub snapshot: DashboardSnapshot,
    /// True when this cycle saw more posts than the previous successful one.
    /// The consumer raises a one-time alert for it.
    pub new_data: bool,
}

/// Handle for user-triggered refreshes outside the timer cadence.
#[derive(Debug, Clone)]
pub struct RefreshHandle(mpsc::Sender<()>);

impl RefreshHandle {
    /// Request an immediate poll. A no-op when the poller is gone or a
    /// refresh is already queued.
    pub fn refresh(&self) {
        let _ = self.0.try_send(());
    }
}

/// Drives the poll loop: one poll at startup, then one per timer tick or
/// manual refresh, until cancelled.
pub struct Poller {
    fetcher: Arc<dyn PostFetcher>,
    interval: Duration,
    state: PollState,
    updates: mpsc::Sender<PollUpdate>,
    refresh_rx: mpsc::Receiver<()>,
    cancel: CancellationToken,
}

impl Poller {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PostFetcher>,
        interval: Duration,
        updates: mpsc::Sender<PollUpdate>,
        cancel: CancellationToken,
    ) -> (Self, RefreshHandle) {
        let (refresh_tx, refresh_rx) = mpsc::channel(1);
        (
            Self {
                fetcher,
                interval,
                state: PollState::new(),
                updates,
                refresh_rx,
                cancel,
            },
            RefreshHandle(refresh_tx),
        )
    }

    #[must_use]
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Run the poll loop until cancellation, or until the update receiver is
    /// dropped.
    ///
    /// Cycles never overlap: the next trigger is not examined until the
    /// current cycle finishes, and timer ticks that elapse mid-cycle are
    /// skipped rather than queued.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                () = self.cancel.cancelled() => {
                    debug!("Poller cancelled");
                    break;
                }
                _ = ticker.tick() => {}
                Some(()) = self.refresh_rx.recv() => {
                    debug!("Manual refresh requested");
                }
            }

            if let Some(update) = self.poll_once().await {
                if self.updates.send(update).await.is_err() {
                    debug!("Update receiver dropped, stopping poller");
                    break;
                }
            }
        }
    }

    /// Execute one poll cycle: fetch, resolve the snapshot, then run change
    /// detection. `None` when the fetch failed or returned no posts; the
    /// stored count is untouched in either case and the next cycle proceeds
    /// normally.
    pub async fn poll_once(&mut self) -> Option<PollUpdate> {
        let posts = match self.fetcher.fetch_posts().await {
            Ok(posts) => posts,
            Err(e) => {
                warn!("Poll fetch failed: {e:#}");
                return None;
            }
        };

        // The snapshot must be fully resolved before the count comparison so
        // an emitted event always describes consistent, processed data.
        let Some(snapshot) = DashboardSnapshot::build(posts) else {
            debug!("Poll returned no posts, keeping previous count");
            return None;
        };

        let new_data = self.state.observe(snapshot.posts.len());
        if new_data {
            info!(posts = snapshot.posts.len(), "New data detected");
        }
        Some(PollUpdate { snapshot, new_data })
    }
}
