//! Client-side refinement of an aggregated vehicle collection.
//!
//! Filtering never fails and never reorders: it only drops vehicles that
//! contradict a set constraint. Unknown year or mileage never excludes a
//! vehicle, since the feed simply did not report it.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::vehicles::Vehicle;

/// Canonical body-type categories offered as filter choices.
pub const ALLOWED_BODY_TYPES: [&str; 8] = [
    "Truck",
    "Hatchback",
    "Wagon",
    "SUV/Crossover",
    "Coupe",
    "Van/Minivan",
    "Sedan",
    "Convertible",
];

/// Fixed "N or less" mileage choices.
pub const MILEAGE_CHOICES: [u64; 10] = [
    10_000, 20_000, 30_000, 40_000, 50_000, 60_000, 70_000, 80_000, 90_000, 100_000,
];

/// Active refinement constraints. `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub max_mileage: Option<u64>,
    pub body_type: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
}

/// Names one field of [`Filters`], as used by select-style inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    YearFrom,
    YearTo,
    MaxMileage,
    BodyType,
    Make,
    Model,
    Trim,
}

impl FromStr for FilterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "yearfrom" => Ok(Self::YearFrom),
            "yearto" => Ok(Self::YearTo),
            "maxmileage" | "mileage" => Ok(Self::MaxMileage),
            "bodytype" => Ok(Self::BodyType),
            "make" => Ok(Self::Make),
            "model" => Ok(Self::Model),
            "trim" => Ok(Self::Trim),
            _ => Err(format!("unknown filter field '{s}'")),
        }
    }
}

impl Filters {
    /// Returns `true` when no field constrains the collection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.year_from.is_none()
            && self.year_to.is_none()
            && self.max_mileage.is_none()
            && self.body_type.is_none()
            && self.make.is_none()
            && self.model.is_none()
            && self.trim.is_none()
    }

    /// Sets one field from a raw input value.
    ///
    /// An empty value clears the field. Numeric fields that fail to parse are
    /// cleared too, the same as choosing "any".
    pub fn set(&mut self, field: FilterField, raw: &str) {
        let raw = raw.trim();
        let text = (!raw.is_empty()).then(|| raw.to_owned());
        match field {
            FilterField::YearFrom => self.year_from = raw.parse().ok(),
            FilterField::YearTo => self.year_to = raw.parse().ok(),
            FilterField::MaxMileage => self.max_mileage = raw.parse().ok(),
            FilterField::BodyType => self.body_type = text,
            FilterField::Make => self.make = text,
            FilterField::Model => self.model = text,
            FilterField::Trim => self.trim = text,
        }
    }

    /// Builder-style variant of [`Filters::set`].
    #[must_use]
    pub fn with(mut self, field: FilterField, raw: &str) -> Self {
        self.set(field, raw);
        self
    }

    /// Returns `true` if `vehicle` satisfies every set constraint.
    #[must_use]
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if let (Some(from), Some(year)) = (self.year_from, vehicle.year) {
            if year < from {
                return false;
            }
        }
        if let (Some(to), Some(year)) = (self.year_to, vehicle.year) {
            if year > to {
                return false;
            }
        }
        if let (Some(max), Some(miles)) = (self.max_mileage, vehicle.miles) {
            if miles > max {
                return false;
            }
        }
        exact(self.body_type.as_deref(), vehicle.body_type.as_deref())
            && exact(self.make.as_deref(), vehicle.make.as_deref())
            && exact(self.model.as_deref(), vehicle.model.as_deref())
            && exact(self.trim.as_deref(), vehicle.trim.as_deref())
    }
}

fn exact(wanted: Option<&str>, actual: Option<&str>) -> bool {
    wanted.is_none_or(|w| actual == Some(w))
}

/// Applies `filters` to `vehicles`, preserving relative order.
///
/// With no constraint set the input slice is returned as-is.
#[must_use]
pub fn apply_filters<'a>(vehicles: &'a [Vehicle], filters: &Filters) -> Cow<'a, [Vehicle]> {
    if filters.is_empty() {
        return Cow::Borrowed(vehicles);
    }
    Cow::Owned(
        vehicles
            .iter()
            .filter(|v| filters.matches(v))
            .cloned()
            .collect(),
    )
}

/// Distinct values available for each select-style filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Newest first.
    pub years: Vec<i32>,
    pub body_types: Vec<String>,
    pub makes: Vec<String>,
    pub models: Vec<String>,
    /// Excludes the catch-all "other" trim.
    pub trims: Vec<String>,
}

/// Derives the filter choices present in `vehicles`.
#[must_use]
pub fn available_options(vehicles: &[Vehicle]) -> FilterOptions {
    let years: BTreeSet<i32> = vehicles.iter().filter_map(|v| v.year).collect();

    let body_types = distinct(vehicles, |v| v.body_type.as_deref())
        .into_iter()
        .filter(|bt| is_canonical_body_type(bt))
        .collect();

    let trims = distinct(vehicles, |v| v.trim.as_deref())
        .into_iter()
        .filter(|t| !t.eq_ignore_ascii_case("other"))
        .collect();

    FilterOptions {
        years: years.into_iter().rev().collect(),
        body_types,
        makes: distinct(vehicles, |v| v.make.as_deref()),
        models: distinct(vehicles, |v| v.model.as_deref()),
        trims,
    }
}

fn distinct<'a, F>(vehicles: &'a [Vehicle], field: F) -> Vec<String>
where
    F: Fn(&'a Vehicle) -> Option<&'a str>,
{
    vehicles
        .iter()
        .filter_map(field)
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Raw body types qualify when one of [`ALLOWED_BODY_TYPES`] appears inside
/// them, ignoring case (`"SUV/Crossover AWD"` qualifies, `"Chassis Cab"` does not).
fn is_canonical_body_type(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    ALLOWED_BODY_TYPES
        .iter()
        .any(|allowed| lower.contains(&allowed.to_lowercase()))
}

#[cfg(test)]
#[path = "filters_test.rs"]
mod tests;
