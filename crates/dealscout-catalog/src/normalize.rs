//! Normalization from raw catalog listings to [`dealscout_core::Vehicle`].
//!
//! Total by construction: every listing, however sparse, yields a vehicle.
//! Missing or unusable values fall back to documented defaults instead of
//! failing.

use std::collections::HashSet;

use dealscout_core::{estimate_monthly_payment, Vehicle};
use serde_json::Value;

use crate::types::CatalogListing;

const MISSING_VIN: &str = "N/A";
const UNTITLED: &str = "Untitled Vehicle";
const NO_DETAIL_URL: &str = "#";

/// Normalizes a raw [`CatalogListing`] into a [`Vehicle`].
///
/// `index` is the listing's position in its aggregated batch and only feeds
/// the synthetic id of listings that carry neither an id nor a VIN.
#[must_use]
pub fn normalize_listing(listing: &CatalogListing, index: usize) -> Vehicle {
    let id = non_empty(listing.id.as_deref())
        .or_else(|| non_empty(listing.vin.as_deref()))
        .map_or_else(|| format!("non-vin-listing-{index}"), str::to_owned);

    let price = coerce_price(listing.price.as_ref());
    let build = listing.build.as_ref();

    Vehicle {
        id,
        vin: non_empty(listing.vin.as_deref())
            .unwrap_or(MISSING_VIN)
            .to_owned(),
        name: non_empty(listing.heading.as_deref())
            .unwrap_or(UNTITLED)
            .to_owned(),
        price,
        miles: coerce_miles(listing.miles.as_ref()),
        est_monthly_payment: estimate_monthly_payment(price),
        detail_url: non_empty(listing.vdp_url.as_deref())
            .unwrap_or(NO_DETAIL_URL)
            .to_owned(),
        image_url: listing
            .media
            .as_ref()
            .and_then(|m| m.photo_links.first())
            .and_then(|link| owned(Some(link.as_str()))),
        year: build.and_then(|b| b.year).filter(|y| *y != 0),
        body_type: owned(listing.body_type.as_deref()),
        make: owned(build.and_then(|b| b.make.as_deref())),
        model: owned(build.and_then(|b| b.model.as_deref())),
        trim: owned(build.and_then(|b| b.trim.as_deref())),
    }
}

/// Normalizes a whole aggregated batch, indexing listings by position.
///
/// Ids are unique across the batch: a listing whose id was already taken
/// (a repeat across pages, or a VIN equal to another listing's id) gets
/// `<id>-<index>` instead.
#[must_use]
pub fn normalize_listings(listings: &[CatalogListing]) -> Vec<Vehicle> {
    let mut taken = HashSet::with_capacity(listings.len());
    listings
        .iter()
        .enumerate()
        .map(|(index, listing)| {
            let mut vehicle = normalize_listing(listing, index);
            if taken.contains(&vehicle.id) {
                vehicle.id = free_id(&vehicle.id, index, &taken);
            }
            taken.insert(vehicle.id.clone());
            vehicle
        })
        .collect()
}

fn free_id(id: &str, index: usize, taken: &HashSet<String>) -> String {
    let mut candidate = format!("{id}-{index}");
    let mut attempt = 1usize;
    while taken.contains(&candidate) {
        candidate = format!("{id}-{index}-{attempt}");
        attempt += 1;
    }
    candidate
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn owned(value: Option<&str>) -> Option<String> {
    non_empty(value).map(str::to_owned)
}

/// Numeric value of a JSON number or numeric string.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Price in dollars; `0.0` when missing, unparseable, negative or non-finite.
fn coerce_price(value: Option<&Value>) -> f64 {
    value
        .and_then(as_number)
        .filter(|p| p.is_finite() && *p >= 0.0)
        .unwrap_or(0.0)
}

/// Odometer reading rounded to whole miles; `None` when unusable.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce_miles(value: Option<&Value>) -> Option<u64> {
    value
        .and_then(as_number)
        .filter(|m| m.is_finite() && *m >= 0.0)
        .map(|m| m.round() as u64)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
