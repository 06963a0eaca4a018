//! Qualified-amount parsing and the price cutoff applied to a fresh
//! aggregation.

use thiserror::Error;

use crate::vehicles::Vehicle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    #[error("Please enter a valid qualified amount.")]
    InvalidAmount,
}

/// Parses a user-entered budget such as `"$25,000"`.
///
/// Every non-digit character is ignored, decimal points included, so the
/// input is expected in whole dollars (`"$25,000.00"` reads as `2500000`).
///
/// # Errors
///
/// Returns [`BudgetError::InvalidAmount`] when no digits remain, the value is
/// zero, or it overflows `u64`.
pub fn parse_qualified_amount(raw: &str) -> Result<u64, BudgetError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    match digits.parse::<u64>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(BudgetError::InvalidAmount),
    }
}

/// Keeps vehicles priced at or below `qualified_amount`, cheapest first.
///
/// Listings without a usable price were normalized to `0.0` and therefore
/// always pass the cutoff. The sort is stable, so equally priced vehicles
/// keep their retrieval order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn refine_to_budget(vehicles: Vec<Vehicle>, qualified_amount: u64) -> Vec<Vehicle> {
    let ceiling = qualified_amount as f64;
    let mut kept: Vec<Vehicle> = vehicles.into_iter().filter(|v| v.price <= ceiling).collect();
    kept.sort_by(|a, b| a.price.total_cmp(&b.price));
    kept
}
