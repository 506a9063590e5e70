//! Reads an OCM export and produces the ordered list of [`Location`]s.

use std::path::Path;

use chargemap_core::{BoundingBox, Location};
use serde::Serialize;
use serde_json::Value;

use crate::error::ImportError;
use crate::normalize::{normalize_poi, SkipReason};
use crate::types::RawPoi;

/// Diagnostic counters for one import pass. Skips are never errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Top-level array elements seen, including non-objects.
    pub total: usize,
    pub retained: usize,
    /// Retained records whose coordinates were transposed in the source.
    pub swapped: usize,
    /// Array elements that were not JSON objects.
    pub not_an_object: usize,
    pub missing_address: usize,
    pub missing_coordinates: usize,
    pub out_of_region: usize,
}

impl ImportStats {
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.total - self.retained
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MissingAddress => self.missing_address += 1,
            SkipReason::MissingCoordinates => self.missing_coordinates += 1,
            SkipReason::OutOfRegion => self.out_of_region += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImportReport {
    pub locations: Vec<Location>,
    pub stats: ImportStats,
}

/// Import the OCM export at `path`.
///
/// # Errors
///
/// Returns [`ImportError::NotFound`] if the file does not exist,
/// [`ImportError::Io`] for other read failures and [`ImportError::Format`]
/// if the content is not a JSON array.
pub fn import_file(path: &Path) -> Result<ImportReport, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ImportError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ImportError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let report = import_str(&text)?;
    tracing::info!(
        path = %path.display(),
        total = report.stats.total,
        retained = report.stats.retained,
        swapped = report.stats.swapped,
        missing_address = report.stats.missing_address,
        missing_coordinates = report.stats.missing_coordinates,
        out_of_region = report.stats.out_of_region,
        "imported OCM export"
    );
    Ok(report)
}

/// Import an OCM export already held in memory.
///
/// Ids start at 1 and follow source order; skipped records do not consume one.
///
/// # Errors
///
/// Returns [`ImportError::Format`] if `text` is not valid JSON or its top
/// level is not an array.
pub fn import_str(text: &str) -> Result<ImportReport, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if !text.trim_start().starts_with('[') {
        return Err(not_an_array(text));
    }

    let document: Value = serde_json::from_str(text).map_err(|e| ImportError::Format {
        reason: format!("invalid JSON: {e}"),
    })?;
    let Value::Array(items) = document else {
        return Err(not_an_array(text));
    };

    let bbox = BoundingBox::FINLAND;
    let mut stats = ImportStats {
        total: items.len(),
        ..ImportStats::default()
    };
    let mut locations = Vec::with_capacity(items.len());
    let mut next_id: u32 = 1;

    for item in items {
        let Some(poi) = RawPoi::from_value(item) else {
            stats.not_an_object += 1;
            continue;
        };

        match normalize_poi(&poi, &bbox) {
            Ok(normalized) => {
                if normalized.swapped {
                    stats.swapped += 1;
                }
                locations.push(normalized.into_location(next_id));
                next_id += 1;
            }
            Err(reason) => stats.record_skip(reason),
        }
    }

    stats.retained = locations.len();
    Ok(ImportReport { locations, stats })
}

fn not_an_array(text: &str) -> ImportError {
    let first_line = text.trim_start().lines().next().unwrap_or_default();
    ImportError::Format {
        reason: format!(
            "OCM JSON is not an array (file should start with '['). First line: {first_line}"
        ),
    }
}
