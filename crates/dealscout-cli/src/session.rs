//! One user's search context: the current result set plus its view state.
//!
//! Results are an immutable snapshot replaced wholesale by the newest search
//! run. Filters and the page cursor only shape what is shown from it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dealscout_catalog::{
    normalize_listings, AggregatorConfig, CatalogClient, CatalogError, InventoryAggregator,
    PageSource, Pause, Retrieval, TokioPause,
};
use dealscout_core::{
    apply_filters, available_options, page, page_count, parse_qualified_amount, refine_to_budget,
    AppConfig, BudgetError, FilterField, FilterOptions, Filters, NoInventoryInfo, Vehicle,
};
use dealscout_directory::{ConfiguredDirectory, DealerDirectory, DealerResolver, ResolveError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Configuration or backend construction failed; nothing can be searched.
    #[error("Vehicle search is temporarily unavailable: {0}")]
    ConfigUnavailable(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    DealerNotFound(#[from] ResolveError),

    #[error(transparent)]
    CatalogRequestFailed(#[from] CatalogError),
}

impl From<BudgetError> for SearchError {
    fn from(err: BudgetError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

/// What a finished search run did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results were installed.
    Results {
        /// Vehicles within budget.
        within_budget: usize,
        /// `num_found` reported by the catalog.
        total_found: u64,
        pages_failed: u32,
    },
    NoInventory(NoInventoryInfo),
    /// A newer search started while this one ran; nothing was installed.
    Superseded,
}

/// The visible slice of the filtered results.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub vehicles: Vec<Vehicle>,
    /// 1-based.
    pub page: usize,
    pub page_count: usize,
    /// Vehicles passing the active filters across all pages.
    pub matching: usize,
    /// Vehicles in the unfiltered result set.
    pub total: usize,
}

#[derive(Debug, Default)]
struct ViewState {
    results: Arc<[Vehicle]>,
    no_inventory: Option<NoInventoryInfo>,
    qualified_amount: Option<u64>,
    filters: Filters,
    page: usize,
}

pub struct SearchSession<D, S, P = TokioPause> {
    resolver: Arc<DealerResolver<D>>,
    aggregator: InventoryAggregator<S, P>,
    results_per_page: usize,
    latest_run: AtomicU64,
    state: Mutex<ViewState>,
}

/// Session wired to the configured directory and the live catalog.
pub type LiveSession = SearchSession<ConfiguredDirectory, Arc<CatalogClient>>;

impl LiveSession {
    /// Wires shared backends with the paging and page-size settings from
    /// configuration.
    pub fn from_app_config(
        config: &AppConfig,
        resolver: Arc<DealerResolver<ConfiguredDirectory>>,
        client: Arc<CatalogClient>,
    ) -> Self {
        SearchSession::new(
            resolver,
            InventoryAggregator::new(client, AggregatorConfig::from_app_config(config)),
            config.results_per_page,
        )
    }
}

/// Builds the shared backends for a live session.
///
/// # Errors
///
/// Returns [`SearchError::ConfigUnavailable`] if the directory or catalog
/// client cannot be constructed.
pub fn build_backends(
    config: &AppConfig,
) -> Result<(Arc<DealerResolver<ConfiguredDirectory>>, Arc<CatalogClient>), SearchError> {
    let directory = ConfiguredDirectory::from_app_config(config)
        .map_err(|e| SearchError::ConfigUnavailable(e.to_string()))?;
    let client = CatalogClient::from_app_config(config)
        .map_err(|e| SearchError::ConfigUnavailable(e.to_string()))?;
    Ok((
        Arc::new(DealerResolver::new(directory, config.suggestion_limit)),
        Arc::new(client),
    ))
}

impl<D, S, P> SearchSession<D, S, P>
where
    D: DealerDirectory,
    S: PageSource,
    P: Pause,
{
    pub fn new(
        resolver: Arc<DealerResolver<D>>,
        aggregator: InventoryAggregator<S, P>,
        results_per_page: usize,
    ) -> Self {
        Self {
            resolver,
            aggregator,
            results_per_page: results_per_page.max(1),
            latest_run: AtomicU64::new(0),
            state: Mutex::new(ViewState {
                page: 1,
                ..ViewState::default()
            }),
        }
    }

    #[must_use]
    pub fn resolver(&self) -> &Arc<DealerResolver<D>> {
        &self.resolver
    }

    /// Runs a full search for `dealer_name` under the budget in `raw_amount`.
    ///
    /// Filters and the page cursor reset as soon as the run starts. The run's
    /// results are installed only if no newer run has started since.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidRequest`] for a blank dealer name or an
    ///   unusable amount. The session is left untouched.
    /// - [`SearchError::DealerNotFound`] when the name does not resolve.
    /// - [`SearchError::CatalogRequestFailed`] when the first catalog page
    ///   fails.
    ///
    /// The last two clear the current results when the run is still the
    /// latest.
    pub async fn search(
        &self,
        dealer_name: &str,
        raw_amount: &str,
    ) -> Result<SearchOutcome, SearchError> {
        let dealer_name = dealer_name.trim();
        if dealer_name.is_empty() {
            return Err(SearchError::InvalidRequest(
                "Please enter a dealership name.".to_owned(),
            ));
        }
        let qualified_amount = parse_qualified_amount(raw_amount)?;

        let run = self.latest_run.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.lock_state();
            state.filters = Filters::default();
            state.page = 1;
        }

        match self.run(dealer_name, qualified_amount).await {
            Ok(finished) => Ok(self.install(run, qualified_amount, finished)),
            Err(e) => {
                if !self.is_latest(run) {
                    tracing::debug!(run, error = %e, "superseded search failed");
                    return Ok(SearchOutcome::Superseded);
                }
                {
                    let mut state = self.lock_state();
                    state.results = Arc::from(Vec::new());
                    state.no_inventory = None;
                    state.qualified_amount = Some(qualified_amount);
                }
                Err(e)
            }
        }
    }

    async fn run(&self, dealer_name: &str, qualified_amount: u64) -> Result<Finished, SearchError> {
        let dealer = self.resolver.resolve(dealer_name).await?;
        tracing::info!(
            dealer = %dealer.name,
            feed_id = dealer.feed_id(),
            qualified_amount,
            "searching inventory"
        );

        match self.aggregator.retrieve(&dealer).await? {
            Retrieval::NoInventory(info) => Ok(Finished::NoInventory(info)),
            Retrieval::Listings {
                listings,
                total_found,
                pages_failed,
                ..
            } => {
                let vehicles = refine_to_budget(normalize_listings(&listings), qualified_amount);
                Ok(Finished::Vehicles {
                    vehicles,
                    total_found,
                    pages_failed,
                })
            }
        }
    }

    fn install(&self, run: u64, qualified_amount: u64, finished: Finished) -> SearchOutcome {
        let mut state = self.lock_state();
        // Checked under the lock: a newer run cannot install in between.
        if !self.is_latest(run) {
            tracing::debug!(run, "discarding superseded search results");
            return SearchOutcome::Superseded;
        }
        state.qualified_amount = Some(qualified_amount);
        match finished {
            Finished::NoInventory(info) => {
                state.results = Arc::from(Vec::new());
                state.no_inventory = Some(info.clone());
                SearchOutcome::NoInventory(info)
            }
            Finished::Vehicles {
                vehicles,
                total_found,
                pages_failed,
            } => {
                let within_budget = vehicles.len();
                state.results = Arc::from(vehicles);
                state.no_inventory = None;
                SearchOutcome::Results {
                    within_budget,
                    total_found,
                    pages_failed,
                }
            }
        }
    }

    fn is_latest(&self, run: u64) -> bool {
        self.latest_run.load(Ordering::SeqCst) == run
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets one filter from raw input and returns to page 1.
    pub fn set_filter(&self, field: FilterField, raw: &str) {
        let mut state = self.lock_state();
        state.filters.set(field, raw);
        state.page = 1;
    }

    /// Replaces all filters at once and returns to page 1.
    pub fn apply_filters(&self, filters: Filters) {
        let mut state = self.lock_state();
        state.filters = filters;
        state.page = 1;
    }

    pub fn reset_filters(&self) {
        self.apply_filters(Filters::default());
    }

    #[must_use]
    pub fn filters(&self) -> Filters {
        self.lock_state().filters.clone()
    }

    /// Moves to `page_number`, clamped to the available pages.
    pub fn go_to_page(&self, page_number: usize) -> usize {
        let (results, filters) = self.snapshot();
        let pages = page_count(apply_filters(&results, &filters).len(), self.results_per_page);
        let mut state = self.lock_state();
        state.page = page_number.clamp(1, pages.max(1));
        state.page
    }

    /// The current page of the filtered results.
    #[must_use]
    pub fn visible_page(&self) -> PageView {
        let (results, filters) = self.snapshot();
        let current_page = self.lock_state().page;
        let filtered = apply_filters(&results, &filters);
        PageView {
            vehicles: page(&*filtered, self.results_per_page, current_page).to_vec(),
            page: current_page,
            page_count: page_count(filtered.len(), self.results_per_page),
            matching: filtered.len(),
            total: results.len(),
        }
    }

    /// Filter choices derived from the full, unfiltered result set.
    #[must_use]
    pub fn options(&self) -> FilterOptions {
        available_options(&self.snapshot().0)
    }

    #[must_use]
    pub fn results(&self) -> Arc<[Vehicle]> {
        Arc::clone(&self.lock_state().results)
    }

    #[must_use]
    pub fn no_inventory(&self) -> Option<NoInventoryInfo> {
        self.lock_state().no_inventory.clone()
    }

    #[must_use]
    pub fn qualified_amount(&self) -> Option<u64> {
        self.lock_state().qualified_amount
    }

    fn snapshot(&self) -> (Arc<[Vehicle]>, Filters) {
        let state = self.lock_state();
        (Arc::clone(&state.results), state.filters.clone())
    }
}

enum Finished {
    NoInventory(NoInventoryInfo),
    Vehicles {
        vehicles: Vec<Vehicle>,
        total_found: u64,
        pages_failed: u32,
    },
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
