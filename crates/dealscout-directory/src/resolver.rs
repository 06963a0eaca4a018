//! Dealer name suggestion and resolution.

use std::collections::HashSet;

use dealscout_core::{Dealer, ResolvedDealer};

use crate::backend::DealerDirectory;
use crate::error::ResolveError;

/// Default cap on suggestion rows.
pub const SUGGESTION_LIMIT: usize = 10;

pub struct DealerResolver<D> {
    directory: D,
    limit: usize,
}

impl<D: DealerDirectory> DealerResolver<D> {
    pub fn new(directory: D, limit: usize) -> Self {
        Self {
            directory,
            limit: limit.max(1),
        }
    }

    #[must_use]
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Dealers whose name contains `partial`, deduplicated by name in
    /// directory order.
    ///
    /// Blank input yields nothing without touching the directory. Lookup
    /// failures are logged and yield nothing.
    pub async fn suggest(&self, partial: &str) -> Vec<Dealer> {
        let partial = partial.trim();
        if partial.is_empty() {
            return Vec::new();
        }

        let dealers = match self.directory.search(partial, self.limit).await {
            Ok(dealers) => dealers,
            Err(e) => {
                tracing::warn!(partial, error = %e, "dealer suggestion lookup failed");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        dealers
            .into_iter()
            .filter(|d| !d.name.trim().is_empty())
            .filter(|d| seen.insert(d.name.clone()))
            .take(self.limit)
            .collect()
    }

    /// Resolves a typed dealer name to a dealer with a feed identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::DealerNotFound`] when no dealer matches, when
    /// the match has no website, or when the directory cannot be reached.
    pub async fn resolve(&self, name: &str) -> Result<ResolvedDealer, ResolveError> {
        let not_found = || ResolveError::DealerNotFound {
            name: name.to_owned(),
        };

        let found = match self.directory.lookup_exact(name).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(name, error = %e, "dealer lookup failed");
                return Err(not_found());
            }
        };

        let Some(dealer) = found else {
            tracing::debug!(name, "no directory entry matches dealer name");
            return Err(not_found());
        };

        dealer.into_resolved().ok_or_else(|| {
            tracing::debug!(name, "dealer has no website on record");
            not_found()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::DirectoryError;
    use crate::file::FileDirectory;

    fn dealer(name: &str, website: Option<&str>) -> Dealer {
        Dealer {
            name: name.to_owned(),
            website: website.map(str::to_owned),
        }
    }

    /// Returns canned rows and counts calls; fails when `rows` is `None`.
    struct Canned {
        rows: Option<Vec<Dealer>>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn new(rows: Option<Vec<Dealer>>) -> Self {
            Self {
                rows,
                calls: AtomicUsize::new(0),
            }
        }

        fn failure() -> DirectoryError {
            DirectoryError::RequestFailed {
                status: 503,
                detail: "down".to_owned(),
                url: "https://dir.test/rest/v1/dealer_site".to_owned(),
            }
        }
    }

    impl DealerDirectory for Canned {
        async fn search(&self, _partial: &str, limit: usize) -> Result<Vec<Dealer>, DirectoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rows = self.rows.clone().ok_or_else(Self::failure)?;
            Ok(rows.into_iter().take(limit).collect())
        }

        async fn lookup_exact(&self, name: &str) -> Result<Option<Dealer>, DirectoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rows = self.rows.clone().ok_or_else(Self::failure)?;
            Ok(rows
                .into_iter()
                .find(|d| dealscout_core::names_match(&d.name, name)))
        }
    }

    #[tokio::test]
    async fn suggest_skips_blank_input() {
        let resolver = DealerResolver::new(Canned::new(Some(vec![])), SUGGESTION_LIMIT);
        assert!(resolver.suggest("   ").await.is_empty());
        assert_eq!(resolver.directory().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn suggest_dedupes_by_name_preserving_order() {
        let resolver = DealerResolver::new(
            Canned::new(Some(vec![
                dealer("Lakeside Auto", Some("lakesideauto.com")),
                dealer("Lakeside Auto", Some("lakeside-auto.net")),
                dealer("Lakeview Motors", None),
            ])),
            SUGGESTION_LIMIT,
        );
        let names: Vec<String> = resolver
            .suggest("lake")
            .await
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["Lakeside Auto", "Lakeview Motors"]);
    }

    #[tokio::test]
    async fn suggest_fails_soft() {
        let resolver = DealerResolver::new(Canned::new(None), SUGGESTION_LIMIT);
        assert!(resolver.suggest("lake").await.is_empty());
    }

    #[tokio::test]
    async fn suggest_caps_results() {
        let rows = (0..25)
            .map(|i| dealer(&format!("Dealer {i}"), Some("d.com")))
            .collect();
        let resolver = DealerResolver::new(Canned::new(Some(rows)), SUGGESTION_LIMIT);
        assert_eq!(resolver.suggest("dealer").await.len(), 10);
    }

    #[tokio::test]
    async fn unknown_dealer_is_not_found_with_guidance() {
        let resolver = DealerResolver::new(
            FileDirectory::from_dealers(vec![dealer("Lakeside Auto", Some("lakesideauto.com"))]),
            SUGGESTION_LIMIT,
        );

        let err = resolver.resolve("Acme Motors").await.unwrap_err();

        assert_eq!(
            err,
            ResolveError::DealerNotFound {
                name: "Acme Motors".to_owned()
            }
        );
        assert_eq!(
            err.to_string(),
            "Could not find a website for \"Acme Motors\". Please select a valid dealership from the suggestion list."
        );
    }

    #[tokio::test]
    async fn dealer_without_website_is_not_found() {
        let resolver = DealerResolver::new(
            FileDirectory::from_dealers(vec![dealer("Hilltop Cars", Some(" "))]),
            SUGGESTION_LIMIT,
        );
        assert!(matches!(
            resolver.resolve("Hilltop Cars").await,
            Err(ResolveError::DealerNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn directory_failure_resolves_as_not_found() {
        let resolver = DealerResolver::new(Canned::new(None), SUGGESTION_LIMIT);
        assert!(matches!(
            resolver.resolve("Lakeside Auto").await,
            Err(ResolveError::DealerNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn resolve_matches_case_insensitively() {
        let resolver = DealerResolver::new(
            FileDirectory::from_dealers(vec![dealer("Lakeside Auto", Some("lakesideauto.com"))]),
            SUGGESTION_LIMIT,
        );
        let resolved = resolver.resolve(" LAKESIDE auto").await.unwrap();
        assert_eq!(resolved.name, "Lakeside Auto");
        assert_eq!(resolved.feed_id(), "lakesideauto.com");
    }
}
