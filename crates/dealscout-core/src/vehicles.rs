use serde::{Deserialize, Serialize};

/// Number of months used for the flat monthly-payment estimate.
pub const PAYMENT_TERM_MONTHS: f64 = 60.0;

/// A used-inventory listing normalized from the catalog feed.
///
/// Every field a catalog record may omit is either optional or carries a
/// documented default, so a `Vehicle` always exists for every raw record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique within one aggregated result set: source id, else VIN, else a
    /// positional `non-vin-listing-<n>` key.
    pub id: String,
    /// VIN, or `"N/A"` for non-VIN listings.
    pub vin: String,
    pub name: String,
    /// Asking price in whole dollars; `0.0` when the feed had none.
    pub price: f64,
    /// Odometer reading; `None` when the feed did not report one.
    pub miles: Option<u64>,
    /// `round(price / 60)`.
    pub est_monthly_payment: u64,
    /// Dealer's vehicle detail page, `"#"` when absent.
    pub detail_url: String,
    pub image_url: Option<String>,
    pub year: Option<i32>,
    pub body_type: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
}

/// Flat, fixed-term payment approximation. Not an amortization.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_monthly_payment(price: f64) -> u64 {
    if !price.is_finite() || price <= 0.0 {
        return 0;
    }
    (price / PAYMENT_TERM_MONTHS).round() as u64
}

/// Terminal outcome of a search whose feed reported zero listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoInventoryInfo {
    pub dealer_name: String,
    /// The `source` value sent to the catalog.
    pub feed_id: String,
    pub dealer_website: Option<String>,
    /// Exact first-page query URL except that `api_key` reads `REDACTED`,
    /// so it cannot be replayed as-is.
    pub query_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_payment_rounds_to_nearest_dollar() {
        assert_eq!(estimate_monthly_payment(18_000.0), 300);
        assert_eq!(estimate_monthly_payment(100.0), 2);
        assert_eq!(estimate_monthly_payment(89.0), 1);
    }

    #[test]
    fn monthly_payment_is_zero_for_missing_price() {
        assert_eq!(estimate_monthly_payment(0.0), 0);
        assert_eq!(estimate_monthly_payment(f64::NAN), 0);
    }
}
