//! PostgREST-style dealer directory over the `dealer_site` table.

use std::time::Duration;

use dealscout_core::{names_match, Dealer};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::backend::DealerDirectory;
use crate::error::DirectoryError;

const TABLE_PATH: &str = "rest/v1/dealer_site";
/// Rows fetched for an exact lookup before the client-side name check.
const LOOKUP_CANDIDATES: usize = 25;

/// Row shape of `dealer_site`; the name may be null in the table.
#[derive(Debug, Deserialize)]
struct DealerRow {
    dealer_name: Option<String>,
    #[serde(default)]
    website: Option<String>,
}

impl DealerRow {
    fn into_dealer(self) -> Option<Dealer> {
        let name = self.dealer_name.filter(|n| !n.trim().is_empty())?;
        Some(Dealer {
            name,
            website: self.website,
        })
    }
}

/// Client for a hosted dealer directory.
///
/// Sends the anon key both as `apikey` and as a bearer token.
pub struct RestDirectory {
    client: Client,
    api_key: String,
    table_url: Url,
}

impl RestDirectory {
    /// # Errors
    ///
    /// Returns [`DirectoryError::Client`] if the `reqwest::Client` cannot be
    /// built, or [`DirectoryError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/{TABLE_PATH}", base_url.trim_end_matches('/'));
        let table_url = Url::parse(&normalised).map_err(|e| DirectoryError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            table_url,
        })
    }

    fn query_url(&self, name_filter: &str, limit: usize) -> Url {
        let mut url = self.table_url.clone();
        url.query_pairs_mut()
            .append_pair("select", "dealer_name,website")
            .append_pair("dealer_name", "not.is.null")
            .append_pair("dealer_name", name_filter)
            .append_pair("limit", &limit.to_string());
        url
    }

    async fn fetch_rows(&self, url: Url) -> Result<Vec<Dealer>, DirectoryError> {
        let shown = url.to_string();
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| DirectoryError::Transport {
                url: shown.clone(),
                source: e,
            })?;
        let status = response.status();

        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DirectoryError::RequestFailed {
                status: status.as_u16(),
                detail,
                url: shown,
            });
        }

        let body = response.text().await.map_err(|e| DirectoryError::Transport {
            url: shown.clone(),
            source: e,
        })?;
        let rows: Vec<DealerRow> =
            serde_json::from_str(&body).map_err(|e| DirectoryError::Deserialize {
                url: shown,
                source: e,
            })?;

        Ok(rows.into_iter().filter_map(DealerRow::into_dealer).collect())
    }
}

impl DealerDirectory for RestDirectory {
    async fn search(&self, partial: &str, limit: usize) -> Result<Vec<Dealer>, DirectoryError> {
        let pattern = format!("ilike.*{}*", escape_like(partial.trim()));
        self.fetch_rows(self.query_url(&pattern, limit)).await
    }

    /// Stored names may carry surrounding whitespace or differ in case, so
    /// candidates come from a substring match and are rechecked here. A
    /// match with a website wins over one without.
    async fn lookup_exact(&self, name: &str) -> Result<Option<Dealer>, DirectoryError> {
        let pattern = format!("ilike.*{}*", escape_like(name.trim()));
        let rows = self
            .fetch_rows(self.query_url(&pattern, LOOKUP_CANDIDATES))
            .await?;
        Ok(pick_exact(rows, name))
    }
}

fn pick_exact(rows: Vec<Dealer>, name: &str) -> Option<Dealer> {
    let matches: Vec<Dealer> = rows
        .into_iter()
        .filter(|d| names_match(&d.name, name))
        .collect();
    let chosen = matches
        .iter()
        .position(|d| d.feed_id().is_some())
        .unwrap_or(0);
    matches.into_iter().nth(chosen)
}

/// Neutralizes wildcard characters in user input for an `ilike` filter.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '*' => {}
            '%' | '_' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
