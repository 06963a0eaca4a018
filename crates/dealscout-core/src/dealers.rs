use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A dealership as returned by the dealer directory.
///
/// `website` doubles as the catalog feed identifier; directory rows without
/// one can be suggested but never searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dealer {
    #[serde(rename = "dealer_name")]
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
}

impl Dealer {
    /// Returns the feed identifier, treating a blank website as absent.
    #[must_use]
    pub fn feed_id(&self) -> Option<&str> {
        self.website
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }

    /// Converts into a [`ResolvedDealer`] when a feed identifier is present.
    #[must_use]
    pub fn into_resolved(self) -> Option<ResolvedDealer> {
        let website = self.feed_id()?.to_owned();
        Some(ResolvedDealer {
            name: self.name,
            website,
        })
    }
}

/// A dealer whose feed identifier is known to be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDealer {
    pub name: String,
    /// Website domain used as the catalog `source`.
    pub website: String,
}

impl ResolvedDealer {
    #[must_use]
    pub fn feed_id(&self) -> &str {
        &self.website
    }
}

/// Names compare equal when they match after trimming and lowercasing.
#[must_use]
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[derive(Debug, Deserialize)]
pub struct DealersFile {
    pub dealers: Vec<Dealer>,
}

/// Load and validate a dealer directory from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_dealers(path: &Path) -> Result<DealersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DealersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_dealers(&content)
}

fn parse_dealers(content: &str) -> Result<DealersFile, ConfigError> {
    let dealers_file: DealersFile =
        serde_yaml::from_str(content).map_err(ConfigError::DealersFileParse)?;

    validate_dealers(&dealers_file)?;

    Ok(dealers_file)
}

fn validate_dealers(dealers_file: &DealersFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for dealer in &dealers_file.dealers {
        if dealer.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "dealer name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(dealer.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate dealer name: '{}'",
                dealer.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_id_ignores_blank_website() {
        let dealer = Dealer {
            name: "Acme Motors".to_string(),
            website: Some("  ".to_string()),
        };
        assert!(dealer.feed_id().is_none());
        assert!(dealer.into_resolved().is_none());
    }

    #[test]
    fn into_resolved_trims_website() {
        let dealer = Dealer {
            name: "Acme Motors".to_string(),
            website: Some(" acmemotors.com ".to_string()),
        };
        let resolved = dealer.into_resolved().expect("website present");
        assert_eq!(resolved.feed_id(), "acmemotors.com");
        assert_eq!(resolved.name, "Acme Motors");
    }

    #[test]
    fn names_match_is_case_and_whitespace_insensitive() {
        assert!(names_match("  acme MOTORS ", "Acme Motors"));
        assert!(!names_match("Acme Motor", "Acme Motors"));
    }

    #[test]
    fn dealer_deserializes_directory_row_shape() {
        let dealer: Dealer =
            serde_json::from_str(r#"{"dealer_name":"Lakeside Auto","website":null}"#).unwrap();
        assert_eq!(dealer.name, "Lakeside Auto");
        assert!(dealer.website.is_none());
    }

    #[test]
    fn parse_dealers_accepts_valid_file() {
        let yaml = "dealers:\n  - dealer_name: Lakeside Auto\n    website: lakesideauto.com\n  - dealer_name: Hilltop Cars\n";
        let file = parse_dealers(yaml).unwrap();
        assert_eq!(file.dealers.len(), 2);
        assert!(file.dealers[1].website.is_none());
    }

    #[test]
    fn parse_dealers_rejects_duplicate_names_case_insensitively() {
        let yaml = "dealers:\n  - dealer_name: Lakeside Auto\n  - dealer_name: LAKESIDE AUTO\n";
        let err = parse_dealers(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")));
    }

    #[test]
    fn parse_dealers_rejects_blank_name() {
        let yaml = "dealers:\n  - dealer_name: '  '\n";
        let err = parse_dealers(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn load_dealers_reports_missing_file() {
        let err = load_dealers(Path::new("/nonexistent/dealers.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::DealersFileIo { .. }));
    }
}
