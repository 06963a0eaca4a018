//! Wire types for the dealer inventory endpoint of the catalog API.
//!
//! ## Observed shape
//!
//! ```json
//! {
//!   "num_found": 137,
//!   "listings": [{
//!     "id": "1FTFW1E50-abc",
//!     "vin": "1FTFW1E50LFA00000",
//!     "heading": "2020 Ford F-150 XLT",
//!     "price": 32995,
//!     "miles": 41234,
//!     "vdp_url": "https://dealer.example/vehicle/123",
//!     "media": { "photo_links": ["https://cdn.example/1.jpg"] },
//!     "build": { "year": 2020, "make": "Ford", "model": "F-150", "trim": "XLT" },
//!     "body_type": "Pickup"
//!   }]
//! }
//! ```
//!
//! Listings from smaller feeds are far less regular: `price` and `miles` show
//! up as numbers, numeric strings, empty strings or `null`; non-VIN listings
//! omit `id` and `vin`; `build` may be missing entirely. Every listing field
//! is therefore optional and scalar fields decode leniently, so one odd value
//! never fails the whole page. Coercion into domain values happens in
//! [`crate::normalize`].

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Top-level response envelope.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogResponse {
    /// Total listings matching the query across all pages.
    #[serde(default)]
    pub num_found: Option<u64>,
    #[serde(default)]
    pub listings: Option<Vec<CatalogListing>>,
    #[serde(default)]
    pub error: Option<CatalogApiError>,
}

/// Error object the API sends alongside non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogApiError {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogListing {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vin: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub heading: Option<String>,
    /// Number or numeric string; coerced during normalization.
    #[serde(default)]
    pub price: Option<Value>,
    /// Number, numeric string or `null`; coerced during normalization.
    #[serde(default)]
    pub miles: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vdp_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub media: Option<CatalogMedia>,
    #[serde(default, deserialize_with = "lenient_object")]
    pub build: Option<CatalogBuild>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub body_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogMedia {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub photo_links: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogBuild {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub trim: Option<String>,
}

/// Accepts strings, numbers and booleans as text; anything else is `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// Accepts integral numbers and numeric strings.
fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Decodes a nested object, treating a malformed one as absent.
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
