//! Seams between the aggregation loop and the outside world.
//!
//! The aggregator and the status probe only ever talk to a [`PageSource`]
//! and sleep through a [`Pause`], so both the page ceiling and the
//! inter-request spacing can be exercised without a network or a real clock.

use std::future::Future;
use std::time::Duration;

use crate::client::{CatalogClient, CatalogPage, InventoryQuery};
use crate::error::CatalogError;

/// Anything that can answer one inventory query.
pub trait PageSource: Send + Sync {
    fn fetch_page(
        &self,
        query: &InventoryQuery,
    ) -> impl Future<Output = Result<CatalogPage, CatalogError>> + Send;
}

impl PageSource for CatalogClient {
    fn fetch_page(
        &self,
        query: &InventoryQuery,
    ) -> impl Future<Output = Result<CatalogPage, CatalogError>> + Send {
        self.fetch_inventory(query)
    }
}

impl<S: PageSource> PageSource for std::sync::Arc<S> {
    fn fetch_page(
        &self,
        query: &InventoryQuery,
    ) -> impl Future<Output = Result<CatalogPage, CatalogError>> + Send {
        (**self).fetch_page(query)
    }
}

/// Fixed delay between consecutive page requests.
pub trait Pause: Send + Sync {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

impl<P: Pause> Pause for std::sync::Arc<P> {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        (**self).pause(duration)
    }
}

/// Real-time pause backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPause;

impl Pause for TokioPause {
    fn pause(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}
