//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use dealscout_core::{DealerStatus, FilterOptions, NoInventoryInfo, Vehicle, MILEAGE_CHOICES};

use crate::session::PageView;

/// Whole-dollar amount with thousands separators, e.g. `$12,500`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_dollars(amount: f64) -> String {
    let whole = if amount.is_finite() && amount > 0.0 {
        amount.round() as u64
    } else {
        0
    };
    format!("${}", group_thousands(whole))
}

#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn vehicle_line(vehicle: &Vehicle) -> String {
    let mut line = format!(
        "{}  {}  Est. {}/mo",
        vehicle.name,
        format_dollars(vehicle.price),
        format_dollars(vehicle.est_monthly_payment as f64),
    );
    let _ = write!(line, "\n    VIN: {}", vehicle.vin);
    if let Some(miles) = vehicle.miles {
        let _ = write!(line, " | Miles: {}", group_thousands(miles));
    }
    let _ = write!(line, "\n    {}", vehicle.detail_url);
    line
}

/// Results header, the visible vehicles and the page indicator.
#[must_use]
pub fn page_view(view: &PageView, qualified_amount: Option<u64>) -> String {
    let mut out = String::new();

    if view.total > 0 {
        let _ = writeln!(
            out,
            "Showing {} of {} vehicles",
            view.matching, view.total
        );
    }

    if view.vehicles.is_empty() {
        if view.total > 0 {
            out.push_str("No vehicles match your filter criteria. Try adjusting your filters.\n");
        } else {
            #[allow(clippy::cast_precision_loss)]
            let amount = format_dollars(qualified_amount.unwrap_or(0) as f64);
            let _ = writeln!(
                out,
                "No vehicles found under {amount}. Try a different dealership."
            );
        }
        return out;
    }

    for vehicle in &view.vehicles {
        let _ = writeln!(out, "{}", vehicle_line(vehicle));
    }
    if view.page_count > 1 {
        let _ = writeln!(out, "Page {} of {}", view.page, view.page_count);
    }
    out
}

#[must_use]
pub fn no_inventory(info: &NoInventoryInfo) -> String {
    let mut out = format!(
        "No Inventory Found\nWe couldn't find any inventory for {} (using source: {}).\n\
         This could be because the dealership has no online inventory with our partner, \
         or the source name is incorrect.\nAPI URL Used: {}\n",
        info.dealer_name, info.feed_id, info.query_url
    );
    if let Some(website) = info.dealer_website.as_deref() {
        let link = if website.starts_with("http") {
            website.to_owned()
        } else {
            format!("http://{website}")
        };
        let _ = writeln!(out, "Website: {link}");
    }
    out
}

#[must_use]
pub fn status(status: DealerStatus) -> String {
    match status.message() {
        Some(message) => format!("[{status}] {message}"),
        None => format!("[{status}]"),
    }
}

#[must_use]
pub fn options(options: &FilterOptions) -> String {
    fn row<T: ToString>(label: &str, values: &[T]) -> String {
        let joined: Vec<String> = values.iter().map(ToString::to_string).collect();
        format!("{label}: {}\n", joined.join(", "))
    }

    let mileage: Vec<String> = MILEAGE_CHOICES.iter().map(|m| group_thousands(*m)).collect();
    let mut out = String::new();
    out.push_str(&row("Years", &options.years));
    out.push_str(&row("Body types", &options.body_types));
    out.push_str(&row("Makes", &options.makes));
    out.push_str(&row("Models", &options.models));
    out.push_str(&row("Trims", &options.trims));
    out.push_str(&row("Max mileage", &mileage));
    out
}
