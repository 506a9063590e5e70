//! Open Charge Map (OCM) import and the cached, read-only location catalog.
//!
//! The importer turns a raw OCM JSON export into canonical
//! [`chargemap_core::Location`] records; [`LocationCatalog`] imports once per
//! process and answers list/facet queries from memory.

pub mod catalog;
pub mod error;
pub mod import;
pub mod normalize;
pub mod query;
pub mod types;

pub use catalog::LocationCatalog;
pub use error::{CatalogError, ImportError};
pub use import::{import_file, import_str, ImportReport, ImportStats};
pub use normalize::{normalize_poi, NormalizedPoi, SkipReason};
pub use query::{distinct_operators, distinct_powers, filter_locations};
pub use types::{RawAddress, RawConnection, RawOperator, RawPoi};
