//! Dealer directory backed by a validated YAML file.

use std::path::Path;

use dealscout_core::{load_dealers, names_match, Dealer, DealersFile};

use crate::backend::DealerDirectory;
use crate::error::DirectoryError;

/// In-memory directory, loaded once.
#[derive(Debug, Clone)]
pub struct FileDirectory {
    dealers: Vec<Dealer>,
}

impl FileDirectory {
    /// # Errors
    ///
    /// Returns [`DirectoryError::Config`] if the file cannot be read, parsed,
    /// or fails validation.
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let DealersFile { dealers } = load_dealers(path)?;
        tracing::debug!(path = %path.display(), count = dealers.len(), "loaded dealer directory");
        Ok(Self { dealers })
    }

    #[must_use]
    pub fn from_dealers(dealers: Vec<Dealer>) -> Self {
        Self { dealers }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dealers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dealers.is_empty()
    }
}

impl DealerDirectory for FileDirectory {
    async fn search(&self, partial: &str, limit: usize) -> Result<Vec<Dealer>, DirectoryError> {
        let needle = partial.trim().to_lowercase();
        Ok(self
            .dealers
            .iter()
            .filter(|d| d.name.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn lookup_exact(&self, name: &str) -> Result<Option<Dealer>, DirectoryError> {
        Ok(self
            .dealers
            .iter()
            .find(|d| names_match(&d.name, name))
            .cloned())
    }
}
