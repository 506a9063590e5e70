//! Command handlers. Each one runs a fresh import of the input file; nothing
//! is cached between invocations.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use chargemap_core::LocationFilter;
use chargemap_ocm::{distinct_operators, distinct_powers, filter_locations, import_file, ImportReport};

/// Import `input` and write the normalized locations to `output` as pretty JSON.
///
/// # Errors
///
/// Returns an error if the import fails or `output` cannot be written.
pub(crate) fn run_normalize(input: &Path, output: &Path) -> anyhow::Result<()> {
    let report = import_file(input)?;
    let json = serde_json::to_string_pretty(&report.locations)?;
    std::fs::write(output, json)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "OK: wrote {} locations to {}",
        report.locations.len(),
        output.display()
    );
    Ok(())
}

/// Print import counters plus the operator and power facets.
///
/// # Errors
///
/// Returns an error if the import fails.
pub(crate) fn run_stats(input: &Path) -> anyhow::Result<()> {
    let report = import_file(input)?;
    print!("{}", format_stats(&report));
    Ok(())
}

/// Print the locations matching `filter` as pretty JSON.
///
/// # Errors
///
/// Returns an error if the import fails.
pub(crate) fn run_query(input: &Path, filter: &LocationFilter) -> anyhow::Result<()> {
    let report = import_file(input)?;
    let matches = filter_locations(&report.locations, filter);
    tracing::debug!(count = matches.len(), ?filter, "query finished");
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

fn format_stats(report: &ImportReport) -> String {
    let stats = &report.stats;
    let operators = distinct_operators(&report.locations);
    let powers = distinct_powers(&report.locations)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    let rows = [
        ("records", stats.total),
        ("retained", stats.retained),
        ("swapped lat/lon", stats.swapped),
        ("not an object", stats.not_an_object),
        ("missing address", stats.missing_address),
        ("missing coords", stats.missing_coordinates),
        ("out of region", stats.out_of_region),
        ("operators", operators.len()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{label:<18}{value}");
    }
    let _ = writeln!(out, "{:<18}{}", "power levels (kW)", powers);
    out
}
