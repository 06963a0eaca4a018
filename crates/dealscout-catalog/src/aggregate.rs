//! Bounded multi-page retrieval of one dealer's inventory.

use std::time::Duration;

use dealscout_core::{NoInventoryInfo, ResolvedDealer};

use crate::client::InventoryQuery;
use crate::error::CatalogError;
use crate::source::{PageSource, Pause, TokioPause};
use crate::types::CatalogListing;

/// Paging budget for one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Rows requested per page.
    pub page_size: u32,
    /// Hard ceiling on page requests per run, first page included.
    pub max_pages: u32,
    /// Pause before every page after the first.
    pub inter_page_delay: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_pages: 10,
            inter_page_delay: Duration::from_millis(250),
        }
    }
}

impl AggregatorConfig {
    #[must_use]
    pub fn from_app_config(config: &dealscout_core::AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            max_pages: config.max_pages,
            inter_page_delay: Duration::from_millis(config.inter_page_delay_ms),
        }
    }

    /// Number of page requests a run makes for `total_found` listings.
    ///
    /// Inventories larger than `page_size * max_pages` are knowingly
    /// truncated.
    #[must_use]
    pub fn planned_pages(&self, total_found: u64) -> u32 {
        if self.page_size == 0 || total_found == 0 {
            return 0;
        }
        let needed = total_found.div_ceil(u64::from(self.page_size));
        u32::try_from(needed)
            .unwrap_or(u32::MAX)
            .min(self.max_pages.max(1))
    }
}

/// Result of a run that got past the first page.
#[derive(Debug, Clone)]
pub enum Retrieval {
    Listings {
        /// Listings in request order.
        listings: Vec<CatalogListing>,
        /// `num_found` from the first page, which may exceed what was fetched.
        total_found: u64,
        pages_requested: u32,
        pages_failed: u32,
    },
    /// The feed reported zero listings. Terminal, not an error.
    NoInventory(NoInventoryInfo),
}

/// Pulls a dealer's used inventory page by page under a fixed budget.
///
/// Pages are fetched strictly one after another with a pause in between.
/// Only the first page can fail the run; later failures are logged and
/// skipped, so the result is best effort once page one succeeds.
pub struct InventoryAggregator<S, P = TokioPause> {
    source: S,
    pause: P,
    config: AggregatorConfig,
}

impl<S: PageSource> InventoryAggregator<S, TokioPause> {
    pub fn new(source: S, config: AggregatorConfig) -> Self {
        Self::with_pause(source, TokioPause, config)
    }
}

impl<S: PageSource, P: Pause> InventoryAggregator<S, P> {
    pub fn with_pause(source: S, pause: P, config: AggregatorConfig) -> Self {
        Self {
            source,
            pause,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Retrieves every page of `dealer`'s inventory the budget allows.
    ///
    /// # Errors
    ///
    /// Returns the first page's [`CatalogError`] unchanged. Failures on any
    /// later page never surface here.
    pub async fn retrieve(&self, dealer: &ResolvedDealer) -> Result<Retrieval, CatalogError> {
        let feed_id = dealer.feed_id();
        let page_size = self.config.page_size;

        let first = self
            .source
            .fetch_page(&InventoryQuery::page(feed_id, page_size, 0))
            .await?;

        if first.total_found == 0 {
            tracing::info!(
                dealer = %dealer.name,
                feed_id,
                url = %first.url,
                "catalog reports no inventory for dealer"
            );
            return Ok(Retrieval::NoInventory(NoInventoryInfo {
                dealer_name: dealer.name.clone(),
                feed_id: feed_id.to_owned(),
                dealer_website: Some(dealer.website.clone()),
                query_url: first.url,
            }));
        }

        let total_found = first.total_found;
        let planned = self.config.planned_pages(total_found);
        let mut listings = first.listings;
        let mut pages_requested = 1u32;
        let mut pages_failed = 0u32;

        if u64::from(planned) * u64::from(page_size) < total_found {
            tracing::info!(
                feed_id,
                total_found,
                max_pages = self.config.max_pages,
                "inventory exceeds page budget; results will be truncated"
            );
        }

        for page_index in 1..planned {
            if !self.config.inter_page_delay.is_zero() {
                self.pause.pause(self.config.inter_page_delay).await;
            }

            let start = page_index.saturating_mul(page_size);
            let query = InventoryQuery::page(feed_id, page_size, start);
            pages_requested += 1;

            match self.source.fetch_page(&query).await {
                Ok(page) => listings.extend(page.listings),
                Err(e) => {
                    pages_failed += 1;
                    tracing::warn!(
                        feed_id,
                        page = page_index + 1,
                        url = e.url().unwrap_or_default(),
                        error = %e,
                        "inventory page failed; skipping"
                    );
                }
            }
        }

        tracing::debug!(
            feed_id,
            total_found,
            fetched = listings.len(),
            pages_requested,
            pages_failed,
            "inventory aggregation complete"
        );

        Ok(Retrieval::Listings {
            listings,
            total_found,
            pages_requested,
            pages_failed,
        })
    }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
