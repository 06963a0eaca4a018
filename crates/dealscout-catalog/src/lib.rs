pub mod aggregate;
pub mod client;
pub mod error;
pub mod normalize;
pub mod probe;
pub mod source;
pub mod types;

pub use aggregate::{AggregatorConfig, InventoryAggregator, Retrieval};
pub use client::{redact_api_key, CatalogClient, CatalogPage, InventoryQuery};
pub use error::CatalogError;
pub use normalize::{normalize_listing, normalize_listings};
pub use probe::{DealerStatusProbe, StatusMonitor};
pub use source::{PageSource, Pause, TokioPause};
pub use types::{CatalogBuild, CatalogListing, CatalogMedia, CatalogResponse};
