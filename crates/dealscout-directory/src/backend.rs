//! The seam every dealer directory backend implements.

use std::future::Future;
use std::sync::Arc;

use dealscout_core::{AppConfig, Dealer, DirectorySource};

use crate::error::DirectoryError;
use crate::file::FileDirectory;
use crate::rest::RestDirectory;

pub trait DealerDirectory: Send + Sync {
    /// Dealers whose name contains `partial`, case-insensitively, at most
    /// `limit` rows, in backend order.
    fn search(
        &self,
        partial: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Dealer>, DirectoryError>> + Send;

    /// The dealer whose name equals `name` ignoring case and surrounding
    /// whitespace.
    fn lookup_exact(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Dealer>, DirectoryError>> + Send;
}

impl<D: DealerDirectory> DealerDirectory for Arc<D> {
    fn search(
        &self,
        partial: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Dealer>, DirectoryError>> + Send {
        (**self).search(partial, limit)
    }

    fn lookup_exact(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Dealer>, DirectoryError>> + Send {
        (**self).lookup_exact(name)
    }
}

/// The backend selected by configuration.
pub enum ConfiguredDirectory {
    Rest(RestDirectory),
    File(FileDirectory),
}

impl ConfiguredDirectory {
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the REST client cannot be built or the
    /// dealers file cannot be loaded.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DirectoryError> {
        match &config.directory {
            DirectorySource::Rest { base_url, api_key } => Ok(Self::Rest(RestDirectory::new(
                base_url,
                api_key,
                config.request_timeout_secs,
                &config.user_agent,
            )?)),
            DirectorySource::File(path) => Ok(Self::File(FileDirectory::load(path)?)),
        }
    }
}

impl DealerDirectory for ConfiguredDirectory {
    async fn search(&self, partial: &str, limit: usize) -> Result<Vec<Dealer>, DirectoryError> {
        match self {
            Self::Rest(d) => d.search(partial, limit).await,
            Self::File(d) => d.search(partial, limit).await,
        }
    }

    async fn lookup_exact(&self, name: &str) -> Result<Option<Dealer>, DirectoryError> {
        match self {
            Self::Rest(d) => d.lookup_exact(name).await,
            Self::File(d) => d.lookup_exact(name).await,
        }
    }
}
