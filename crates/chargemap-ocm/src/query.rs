//! Pure list and facet queries over an imported location slice.

use std::collections::BTreeSet;

use chargemap_core::{Location, LocationFilter, UNKNOWN_OPERATOR};

/// Apply `filter` to `locations`, keeping source (id) order.
///
/// Predicates run in order power, operator, city, and all of them apply
/// before the result is truncated to `filter.limit`.
#[must_use]
pub fn filter_locations(locations: &[Location], filter: &LocationFilter) -> Vec<Location> {
    let operator = filter.operator_needle().map(str::to_lowercase);
    let city = filter.city_needle().map(str::to_lowercase);

    locations
        .iter()
        .filter(|l| matches_power(l, filter.min_power_kw, filter.include_unknown))
        .filter(|l| {
            operator
                .as_deref()
                .is_none_or(|needle| l.operator.to_lowercase().contains(needle))
        })
        .filter(|l| {
            city.as_deref()
                .is_none_or(|wanted| l.city.trim().to_lowercase() == wanted)
        })
        .take(filter.limit)
        .cloned()
        .collect()
}

fn matches_power(location: &Location, min_power_kw: Option<i32>, include_unknown: bool) -> bool {
    let Some(min) = min_power_kw else {
        return true;
    };
    match location.power_kw {
        Some(kw) => kw >= min,
        None => include_unknown,
    }
}

/// Sorted, de-duplicated operator names, excluding blanks and the
/// `"Unknown"` placeholder.
#[must_use]
pub fn distinct_operators(locations: &[Location]) -> Vec<String> {
    locations
        .iter()
        .map(|l| l.operator.as_str())
        .filter(|op| !op.trim().is_empty() && *op != UNKNOWN_OPERATOR)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}

/// Sorted, de-duplicated power ratings; unrated locations contribute nothing.
#[must_use]
pub fn distinct_powers(locations: &[Location]) -> Vec<i32> {
    locations
        .iter()
        .filter_map(|l| l.power_kw)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
