//! Query construction for the inventory endpoint.

use reqwest::Url;

const API_KEY_PARAM: &str = "api_key";

/// One request against the inventory endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryQuery {
    /// Dealer website used as the catalog `source`.
    pub feed_id: String,
    pub rows: u32,
    pub start: u32,
    /// Zero-row health check: no used-only or non-VIN filters, only the count
    /// matters.
    pub count_only: bool,
}

impl InventoryQuery {
    /// A used-inventory page including non-VIN listings.
    #[must_use]
    pub fn page(feed_id: &str, rows: u32, start: u32) -> Self {
        Self {
            feed_id: feed_id.to_owned(),
            rows,
            start,
            count_only: false,
        }
    }

    /// A `rows=0` request that only reads `num_found`.
    #[must_use]
    pub fn count_only(feed_id: &str) -> Self {
        Self {
            feed_id: feed_id.to_owned(),
            rows: 0,
            start: 0,
            count_only: true,
        }
    }

    pub(crate) fn to_url(&self, base_url: &Url, api_key: &str) -> Url {
        let mut url = base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(API_KEY_PARAM, api_key);
            pairs.append_pair("source", &self.feed_id);
            if self.count_only {
                pairs.append_pair("rows", "0");
            } else {
                pairs.append_pair("car_type", "used");
                pairs.append_pair("rows", &self.rows.to_string());
                pairs.append_pair("start", &self.start.to_string());
                pairs.append_pair("include_non_vin_listings", "true");
            }
        }
        url
    }
}

/// Renders `url` with the `api_key` value replaced, safe for logs and for
/// showing to users.
#[must_use]
pub fn redact_api_key(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY_PARAM {
                "REDACTED".to_owned()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    if pairs.is_empty() {
        return url.to_string();
    }

    let mut shown = url.clone();
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://catalog.example/v2/car/dealer/inventory/active").unwrap()
    }

    #[test]
    fn page_query_carries_used_and_non_vin_filters() {
        let url = InventoryQuery::page("lakesideauto.com", 50, 100).to_url(&base(), "k");
        assert_eq!(
            url.as_str(),
            "https://catalog.example/v2/car/dealer/inventory/active?api_key=k&source=lakesideauto.com&car_type=used&rows=50&start=100&include_non_vin_listings=true"
        );
    }

    #[test]
    fn count_only_query_requests_zero_rows() {
        let url = InventoryQuery::count_only("lakesideauto.com").to_url(&base(), "k");
        assert_eq!(
            url.as_str(),
            "https://catalog.example/v2/car/dealer/inventory/active?api_key=k&source=lakesideauto.com&rows=0"
        );
    }

    #[test]
    fn redaction_preserves_other_parameters_in_order() {
        let url = InventoryQuery::page("lakesideauto.com", 50, 0).to_url(&base(), "secret");
        assert_eq!(
            redact_api_key(&url),
            "https://catalog.example/v2/car/dealer/inventory/active?api_key=REDACTED&source=lakesideauto.com&car_type=used&rows=50&start=0&include_non_vin_listings=true"
        );
    }

    #[test]
    fn feed_id_is_percent_encoded() {
        let url = InventoryQuery::count_only("a&b.com").to_url(&base(), "k");
        assert!(url.as_str().contains("source=a%26b.com"), "{url}");
    }
}
