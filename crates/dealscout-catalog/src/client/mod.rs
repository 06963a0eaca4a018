//! HTTP client for the catalog's dealer inventory endpoint.

mod query;

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::CatalogError;
use crate::types::{CatalogListing, CatalogResponse};

pub use query::{redact_api_key, InventoryQuery};

const DEFAULT_BASE_URL: &str = "https://mc-api.marketcheck.com/v2/car/dealer/inventory/active";

/// One decoded inventory response.
#[derive(Debug, Clone, Default)]
pub struct CatalogPage {
    /// Query URL this page was requested from, with `api_key` replaced by
    /// `REDACTED`; not replayable.
    pub url: String,
    /// `num_found` as reported by the API; `0` when absent.
    pub total_found: u64,
    pub listings: Vec<CatalogListing>,
}

/// Client for the catalog inventory API.
///
/// Non-2xx responses surface as [`CatalogError::RequestFailed`] carrying the
/// API's error message and the query URL. There is no retry: callers decide
/// whether a failure is terminal (first page) or skippable (later pages).
pub struct CatalogClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl CatalogClient {
    /// Creates a client pointed at the production inventory endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CatalogError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom endpoint URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Client`] if the `reqwest::Client` cannot be
    /// built, or [`CatalogError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| CatalogError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Builds a client from the loaded application configuration.
    ///
    /// # Errors
    ///
    /// See [`CatalogClient::with_base_url`].
    pub fn from_app_config(config: &dealscout_core::AppConfig) -> Result<Self, CatalogError> {
        Self::with_base_url(
            &config.catalog_api_key,
            config.request_timeout_secs,
            &config.user_agent,
            &config.catalog_url,
        )
    }

    /// Sends one inventory query and decodes the response.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Transport`] — network or TLS failure.
    /// - [`CatalogError::RequestFailed`] — any non-2xx status.
    /// - [`CatalogError::Deserialize`] — the body is not a valid response.
    pub async fn fetch_inventory(&self, query: &InventoryQuery) -> Result<CatalogPage, CatalogError> {
        let url = query.to_url(&self.base_url, &self.api_key);
        let shown = redact_api_key(&url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| CatalogError::Transport {
                url: shown.clone(),
                source: e,
            })?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::RequestFailed {
                status: status.as_u16(),
                detail: failure_detail(status, &body),
                url: shown,
            });
        }

        let body = response.text().await.map_err(|e| CatalogError::Transport {
            url: shown.clone(),
            source: e,
        })?;
        let parsed = serde_json::from_str::<CatalogResponse>(&body).map_err(|e| {
            CatalogError::Deserialize {
                url: shown.clone(),
                source: e,
            }
        })?;

        Ok(CatalogPage {
            url: shown,
            total_found: parsed.num_found.unwrap_or(0),
            listings: parsed.listings.unwrap_or_default(),
        })
    }

    /// Query URL for `query` with the API key redacted, as recorded in
    /// diagnostics.
    #[must_use]
    pub fn display_url(&self, query: &InventoryQuery) -> String {
        redact_api_key(&query.to_url(&self.base_url, &self.api_key))
    }
}

/// Picks the most useful description of a failed response: the API's own
/// `error.message`, else the JSON body verbatim, else the status line.
fn failure_detail(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<CatalogResponse>(body) {
        if let Some(message) = parsed
            .error
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
        {
            return message;
        }
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        return value.to_string();
    }
    format!(
        "Status {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or_default()
    )
    .trim_end()
    .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_detail_prefers_api_message() {
        let detail = failure_detail(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Invalid api_key"}}"#,
        );
        assert_eq!(detail, "Invalid api_key");
    }

    #[test]
    fn failure_detail_falls_back_to_json_body() {
        let detail = failure_detail(StatusCode::BAD_REQUEST, r#"{"code":400,"msg":"bad source"}"#);
        assert_eq!(detail, r#"{"code":400,"msg":"bad source"}"#);
    }

    #[test]
    fn failure_detail_falls_back_to_status_line() {
        let detail = failure_detail(StatusCode::BAD_GATEWAY, "<html>upstream down</html>");
        assert_eq!(detail, "Status 502 Bad Gateway");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = CatalogClient::with_base_url("key", 5, "test", "not a url");
        assert!(matches!(result, Err(CatalogError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn display_url_hides_api_key() {
        let client = CatalogClient::with_base_url(
            "secret-key",
            5,
            "test",
            "https://catalog.example/v2/car/dealer/inventory/active",
        )
        .unwrap();
        let url = client.display_url(&InventoryQuery::count_only("lakesideauto.com"));
        assert!(!url.contains("secret-key"), "{url}");
        assert!(url.contains("source=lakesideauto.com"), "{url}");
    }
}
