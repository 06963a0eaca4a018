//! Dealer feed health checks.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dealscout_core::{Dealer, DealerStatus, StatusTracker};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::InventoryQuery;
use crate::source::PageSource;

/// Answers "does this feed currently list anything?" with one zero-row query.
pub struct DealerStatusProbe<S> {
    source: S,
}

impl<S: PageSource> DealerStatusProbe<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// `Online` when the feed reports at least one listing. Zero listings and
    /// request failures both map to `Error`; neither is propagated.
    pub async fn check(&self, feed_id: &str) -> DealerStatus {
        match self
            .source
            .fetch_page(&InventoryQuery::count_only(feed_id))
            .await
        {
            Ok(page) if page.total_found > 0 => {
                tracing::debug!(feed_id, total_found = page.total_found, "dealer feed online");
                DealerStatus::Online
            }
            Ok(page) => {
                tracing::warn!(feed_id, url = %page.url, "dealer feed reports zero listings");
                DealerStatus::Error
            }
            Err(e) => {
                tracing::warn!(feed_id, error = %e, "dealer status probe failed");
                DealerStatus::Error
            }
        }
    }
}

/// Drives the status indicator for the current dealer selection.
///
/// Each selection waits out a settle delay before probing. A newer selection
/// or a clear cancels the pending probe, and a probe that finishes for an
/// outdated selection is discarded by the tracker.
pub struct StatusMonitor<S> {
    probe: Arc<DealerStatusProbe<S>>,
    tracker: Arc<Mutex<StatusTracker>>,
    settle: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    tx: Arc<watch::Sender<DealerStatus>>,
}

impl<S: PageSource + 'static> StatusMonitor<S> {
    pub fn new(source: S, settle: Duration) -> Self {
        let (tx, _rx) = watch::channel(DealerStatus::Idle);
        Self {
            probe: Arc::new(DealerStatusProbe::new(source)),
            tracker: Arc::new(Mutex::new(StatusTracker::new())),
            settle,
            pending: Mutex::new(None),
            tx: Arc::new(tx),
        }
    }

    /// Records a selection and schedules its probe. Must be called inside a
    /// Tokio runtime.
    ///
    /// Returns the status right after selection: `Checking` when the dealer
    /// has a feed, `Idle` otherwise.
    pub fn select(&self, dealer: &Dealer) -> DealerStatus {
        self.cancel_pending();

        let (token, status) = {
            let mut tracker = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
            let token = tracker.select(dealer);
            (token, tracker.status())
        };
        self.tx.send_replace(status);

        let (Some(token), Some(feed_id)) = (token, dealer.feed_id()) else {
            return status;
        };

        let feed_id = feed_id.to_owned();
        let probe = Arc::clone(&self.probe);
        let tracker = Arc::clone(&self.tracker);
        let tx = Arc::clone(&self.tx);
        let settle = self.settle;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(settle).await;
            let result = probe.check(&feed_id).await;

            let mut tracker = tracker.lock().unwrap_or_else(PoisonError::into_inner);
            if tracker.complete(token, result == DealerStatus::Online) {
                tx.send_replace(tracker.status());
            } else {
                tracing::debug!(feed_id, "discarding stale status probe result");
            }
        });
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        status
    }

    /// Input cleared or edited without a selection.
    pub fn clear(&self) {
        self.cancel_pending();
        let status = {
            let mut tracker = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
            tracker.clear();
            tracker.status()
        };
        self.tx.send_replace(status);
    }

    #[must_use]
    pub fn status(&self) -> DealerStatus {
        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .status()
    }

    /// Receiver that observes every published status change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DealerStatus> {
        self.tx.subscribe()
    }

    fn cancel_pending(&self) {
        if let Some(handle) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

impl<S> Drop for StatusMonitor<S> {
    fn drop(&mut self) {
        if let Some(handle) = self
            .pending
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}
