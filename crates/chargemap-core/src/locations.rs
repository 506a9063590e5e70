//! Canonical charging-location record and the query parameters used to
//! filter a list of them.

use serde::{Deserialize, Serialize};

/// Placeholder used when a record carries no usable operator title.
pub const UNKNOWN_OPERATOR: &str = "Unknown";

/// Placeholder used when a record carries no usable address title.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Result cap applied when the caller does not pass an explicit limit.
pub const DEFAULT_LIMIT: usize = 500;

/// A normalized charging location.
///
/// `id` is assigned at import time and is only stable for the lifetime of
/// the process that ran the import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: u32,
    pub name: String,
    pub city: String,
    pub operator: String,
    pub lat: f64,
    pub lon: f64,
    /// Highest rounded connector rating in kW; `None` when no connector
    /// reports a numeric rating.
    pub power_kw: Option<i32>,
}

/// Inclusive latitude/longitude rectangle used as a sanity filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Mainland Finland plus Åland.
    pub const FINLAND: BoundingBox = BoundingBox {
        min_lat: 59.0,
        max_lat: 71.5,
        min_lon: 19.0,
        max_lon: 32.5,
    };

    #[must_use]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }

    /// True when `lat` sits in the longitude band and `lon` in the latitude
    /// band, i.e. the pair only fits the box once transposed.
    #[must_use]
    pub fn looks_swapped(&self, lat: f64, lon: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lat) && (self.min_lat..=self.max_lat).contains(&lon)
    }
}

/// Parameters for listing locations.
///
/// Blank `city`/`operator` strings are treated the same as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFilter {
    pub city: Option<String>,
    pub min_power_kw: Option<i32>,
    /// Case-insensitive substring matched against `Location::operator`.
    pub operator: Option<String>,
    /// Whether records without a power rating survive a `min_power_kw` filter.
    pub include_unknown: bool,
    pub limit: usize,
}

impl Default for LocationFilter {
    fn default() -> Self {
        Self {
            city: None,
            min_power_kw: None,
            operator: None,
            include_unknown: false,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl LocationFilter {
    /// Trimmed, non-empty operator needle if one was supplied.
    #[must_use]
    pub fn operator_needle(&self) -> Option<&str> {
        non_blank(self.operator.as_deref())
    }

    /// Trimmed, non-empty city if one was supplied.
    #[must_use]
    pub fn city_needle(&self) -> Option<&str> {
        non_blank(self.city.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
