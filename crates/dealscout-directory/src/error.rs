use dealscout_core::ConfigError;
use thiserror::Error;

/// Failures talking to a dealer directory backend.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("directory request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("directory returned HTTP {status} for {url}: {detail}")]
    RequestFailed {
        status: u16,
        detail: String,
        url: String,
    },

    #[error("JSON deserialization error for {url}: {source}")]
    Deserialize {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid directory URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Resolution of a typed dealer name to a searchable dealer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No exact match, or the match has no website to search.
    #[error(
        "Could not find a website for \"{name}\". Please select a valid dealership from the suggestion list."
    )]
    DealerNotFound { name: String },
}
