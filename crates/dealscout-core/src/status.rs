//! Dealer feed-health indicator state machine.
//!
//! ```text
//! idle ──select(with feed)──▶ checking ──probe ≥1──▶ online
//!   ▲                            │
//!   │                            └──probe 0 / failed──▶ error
//!   └──────── clear / edit (from any state) ────────────┘
//! ```
//!
//! Every selection mints a fresh [`ProbeToken`]; a probe completion carrying
//! any other token is stale and ignored.

use serde::Serialize;

use crate::dealers::Dealer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DealerStatus {
    #[default]
    Idle,
    Checking,
    Online,
    Error,
}

impl DealerStatus {
    /// `true` while the main search action should stay disabled.
    #[must_use]
    pub fn blocks_search(self) -> bool {
        matches!(self, DealerStatus::Checking | DealerStatus::Error)
    }

    #[must_use]
    pub fn message(self) -> Option<&'static str> {
        match self {
            DealerStatus::Idle => None,
            DealerStatus::Checking => Some("Checking dealer inventory..."),
            DealerStatus::Online => Some("Dealer inventory is online"),
            DealerStatus::Error => Some("Could not connect to dealer inventory"),
        }
    }
}

impl std::fmt::Display for DealerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DealerStatus::Idle => write!(f, "idle"),
            DealerStatus::Checking => write!(f, "checking"),
            DealerStatus::Online => write!(f, "online"),
            DealerStatus::Error => write!(f, "error"),
        }
    }
}

/// Identifies the selection a probe was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProbeToken(u64);

#[derive(Debug, Default)]
pub struct StatusTracker {
    status: DealerStatus,
    generation: u64,
    pending: Option<ProbeToken>,
}

impl StatusTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> DealerStatus {
        self.status
    }

    /// Records a fresh dealer selection.
    ///
    /// Returns the token the caller must present when the probe finishes, or
    /// `None` when the dealer has no feed identifier (status stays `idle`).
    pub fn select(&mut self, dealer: &Dealer) -> Option<ProbeToken> {
        self.generation += 1;
        if dealer.feed_id().is_none() {
            self.status = DealerStatus::Idle;
            self.pending = None;
            return None;
        }
        let token = ProbeToken(self.generation);
        self.status = DealerStatus::Checking;
        self.pending = Some(token);
        Some(token)
    }

    /// Input was cleared or edited without a new selection.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.status = DealerStatus::Idle;
        self.pending = None;
    }

    /// Applies a probe result. Returns `false` if `token` is stale.
    pub fn complete(&mut self, token: ProbeToken, online: bool) -> bool {
        if self.pending != Some(token) || self.status != DealerStatus::Checking {
            return false;
        }
        self.pending = None;
        self.status = if online {
            DealerStatus::Online
        } else {
            DealerStatus::Error
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dealer(website: Option<&str>) -> Dealer {
        Dealer {
            name: "Lakeside Auto".to_string(),
            website: website.map(str::to_string),
        }
    }

    #[test]
    fn starts_idle_and_allows_search() {
        let tracker = StatusTracker::new();
        assert_eq!(tracker.status(), DealerStatus::Idle);
        assert!(!tracker.status().blocks_search());
    }

    #[test]
    fn selection_with_feed_moves_to_checking() {
        let mut tracker = StatusTracker::new();
        let token = tracker.select(&dealer(Some("lakesideauto.com")));
        assert!(token.is_some());
        assert_eq!(tracker.status(), DealerStatus::Checking);
        assert!(tracker.status().blocks_search());
    }

    #[test]
    fn selection_without_feed_stays_idle() {
        let mut tracker = StatusTracker::new();
        assert!(tracker.select(&dealer(None)).is_none());
        assert_eq!(tracker.status(), DealerStatus::Idle);
    }

    #[test]
    fn zero_inventory_probe_moves_to_error_and_blocks_search() {
        let mut tracker = StatusTracker::new();
        let token = tracker.select(&dealer(Some("lakesideauto.com"))).unwrap();
        assert!(tracker.complete(token, false));
        assert_eq!(tracker.status(), DealerStatus::Error);
        assert!(tracker.status().blocks_search());
    }

    #[test]
    fn positive_probe_moves_to_online() {
        let mut tracker = StatusTracker::new();
        let token = tracker.select(&dealer(Some("lakesideauto.com"))).unwrap();
        assert!(tracker.complete(token, true));
        assert_eq!(tracker.status(), DealerStatus::Online);
        assert!(!tracker.status().blocks_search());
    }

    #[test]
    fn stale_probe_result_is_ignored() {
        let mut tracker = StatusTracker::new();
        let first = tracker.select(&dealer(Some("first.com"))).unwrap();
        let second = tracker.select(&dealer(Some("second.com"))).unwrap();

        assert!(!tracker.complete(first, true));
        assert_eq!(tracker.status(), DealerStatus::Checking);

        assert!(tracker.complete(second, false));
        assert_eq!(tracker.status(), DealerStatus::Error);
    }

    #[test]
    fn result_after_clear_is_ignored() {
        let mut tracker = StatusTracker::new();
        let token = tracker.select(&dealer(Some("lakesideauto.com"))).unwrap();
        tracker.clear();
        assert!(!tracker.complete(token, true));
        assert_eq!(tracker.status(), DealerStatus::Idle);
    }

    #[test]
    fn terminal_states_only_leave_via_new_selection_or_clear() {
        let mut tracker = StatusTracker::new();
        let token = tracker.select(&dealer(Some("lakesideauto.com"))).unwrap();
        tracker.complete(token, true);
        assert!(!tracker.complete(token, false));
        assert_eq!(tracker.status(), DealerStatus::Online);

        tracker.select(&dealer(Some("lakesideauto.com")));
        assert_eq!(tracker.status(), DealerStatus::Checking);
    }
}
