//! Coalesces keystroke-level input into one suggestion lookup per quiet period.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dealscout_core::Dealer;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::backend::DealerDirectory;
use crate::resolver::DealerResolver;

/// Latest published suggestion list and the input it answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    pub query: String,
    pub dealers: Vec<Dealer>,
}

/// Runs a lookup only once input has been stable for the quiet period.
///
/// Every input bumps a generation counter and aborts the pending lookup.
/// A lookup publishes only if its generation is still the latest, so a slow
/// answer for old input can never replace suggestions for newer input.
pub struct SuggestionDebouncer<D> {
    resolver: Arc<DealerResolver<D>>,
    quiet: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
    tx: Arc<watch::Sender<Suggestions>>,
}

impl<D: DealerDirectory + 'static> SuggestionDebouncer<D> {
    pub fn new(resolver: Arc<DealerResolver<D>>, quiet: Duration) -> Self {
        let (tx, _rx) = watch::channel(Suggestions::default());
        Self {
            resolver,
            quiet,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            tx: Arc::new(tx),
        }
    }

    /// Records new input text. Must be called inside a Tokio runtime.
    ///
    /// Blank input clears the list immediately and schedules nothing.
    pub fn input(&self, text: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_pending();

        let query = text.trim().to_owned();
        if query.is_empty() {
            self.tx.send_replace(Suggestions::default());
            return;
        }

        let resolver = Arc::clone(&self.resolver);
        let latest = Arc::clone(&self.generation);
        let tx = Arc::clone(&self.tx);
        let quiet = self.quiet;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            let dealers = resolver.suggest(&query).await;

            if latest.load(Ordering::SeqCst) == generation {
                tx.send_replace(Suggestions { query, dealers });
            } else {
                tracing::debug!(query = %query, "discarding suggestions for outdated input");
            }
        });
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    /// Hides the list, e.g. after a suggestion was picked.
    pub fn dismiss(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_pending();
        self.tx.send_replace(Suggestions::default());
    }

    #[must_use]
    pub fn current(&self) -> Suggestions {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Suggestions> {
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

impl<D> Drop for SuggestionDebouncer<D> {
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
