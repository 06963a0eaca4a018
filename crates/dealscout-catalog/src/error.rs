use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response. `detail` is the API's own error message when it sent
    /// one, otherwise the raw body or the status line.
    #[error("API Request Failed: {detail}\n\nURL Used: {url}")]
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

    #[error("invalid catalog URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl CatalogError {
    /// Redacted query URL the failing request was sent to, when known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            CatalogError::Transport { url, .. }
            | CatalogError::RequestFailed { url, .. }
            | CatalogError::Deserialize { url, .. } => Some(url),
            CatalogError::Client(_) | CatalogError::InvalidBaseUrl { .. } => None,
        }
    }
}
