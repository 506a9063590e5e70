//! Mapping from raw OCM records to canonical [`Location`] values.
//!
//! This step is pure: it never touches the filesystem and never fails the
//! import. Records that cannot be placed on the map are reported back as a
//! [`SkipReason`] so the caller can count them.

use chargemap_core::{BoundingBox, Location, UNKNOWN_NAME, UNKNOWN_OPERATOR};

use crate::types::{RawConnection, RawPoi};

/// Why a raw record did not make it into the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingAddress,
    MissingCoordinates,
    /// Coordinates fall outside the bounding box even after the swap fix.
    OutOfRegion,
}

/// A usable record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoi {
    pub name: String,
    pub city: String,
    pub operator: String,
    pub lat: f64,
    pub lon: f64,
    pub power_kw: Option<i32>,
    /// Whether the source had latitude and longitude transposed.
    pub swapped: bool,
}

impl NormalizedPoi {
    #[must_use]
    pub fn into_location(self, id: u32) -> Location {
        Location {
            id,
            name: self.name,
            city: self.city,
            operator: self.operator,
            lat: self.lat,
            lon: self.lon,
            power_kw: self.power_kw,
        }
    }
}

/// Normalizes a raw [`RawPoi`] against the given bounding box.
///
/// # Errors
///
/// Returns the [`SkipReason`] when the record lacks an address, lacks numeric
/// coordinates, or lies outside `bbox` after the swap correction.
pub fn normalize_poi(poi: &RawPoi, bbox: &BoundingBox) -> Result<NormalizedPoi, SkipReason> {
    let address = poi
        .address_info
        .as_ref()
        .ok_or(SkipReason::MissingAddress)?;

    let (Some(mut lat), Some(mut lon)) = (address.latitude, address.longitude) else {
        return Err(SkipReason::MissingCoordinates);
    };

    // Must run before the retention check: a transposed pair is otherwise
    // always out of region.
    let swapped = bbox.looks_swapped(lat, lon);
    if swapped {
        std::mem::swap(&mut lat, &mut lon);
    }

    if !bbox.contains(lat, lon) {
        return Err(SkipReason::OutOfRegion);
    }

    let operator = poi
        .operator_info
        .as_ref()
        .and_then(|op| op.title.clone())
        .unwrap_or_else(|| UNKNOWN_OPERATOR.to_string());

    Ok(NormalizedPoi {
        name: address
            .title
            .clone()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        city: address.town.clone().unwrap_or_default(),
        operator,
        lat,
        lon,
        power_kw: max_power_kw(&poi.connections),
        swapped,
    })
}

/// Highest connector rating, each rounded half away from zero.
#[must_use]
pub fn max_power_kw(connections: &[RawConnection]) -> Option<i32> {
    connections
        .iter()
        .filter_map(|c| c.power_kw)
        .filter(|kw| kw.is_finite())
        .map(round_kw)
        .max()
}

#[allow(clippy::cast_possible_truncation)]
fn round_kw(kw: f64) -> i32 {
    // `as` saturates, which is what we want for absurd ratings.
    kw.round() as i32
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
