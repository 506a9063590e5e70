//! Read-only location catalog backed by a lazily imported OCM export.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chargemap_core::{Location, LocationFilter};
use tokio::sync::OnceCell;

use crate::error::CatalogError;
use crate::import::import_file;
use crate::query::{distinct_operators, distinct_powers, filter_locations};

/// Owns the imported locations for the lifetime of the process.
///
/// The import runs on first use, on its own task, so a caller that gives up
/// waiting does not cancel it. Concurrent first callers wait for the same
/// import; a failed import leaves the catalog empty, so the next call tries
/// again instead of serving partial data.
#[derive(Debug)]
pub struct LocationCatalog {
    inner: Arc<CatalogState>,
}

#[derive(Debug)]
struct CatalogState {
    source: PathBuf,
    locations: OnceCell<Arc<[Location]>>,
    imports: AtomicUsize,
}

impl LocationCatalog {
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(CatalogState {
                source: source.into(),
                locations: OnceCell::new(),
                imports: AtomicUsize::new(0),
            }),
        }
    }

    #[must_use]
    pub fn source(&self) -> &Path {
        &self.inner.source
    }

    /// Whether the import has completed successfully.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.locations.initialized()
    }

    /// Number of import passes started so far, successful or not.
    #[must_use]
    pub fn import_count(&self) -> usize {
        self.inner.imports.load(Ordering::SeqCst)
    }

    /// All imported locations, importing them first if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Import`] if the source file is missing or
    /// malformed, and [`CatalogError::Task`] if the import task panicked.
    pub async fn locations(&self) -> Result<Arc<[Location]>, CatalogError> {
        if let Some(locations) = self.inner.locations.get() {
            return Ok(Arc::clone(locations));
        }

        // Dropping the handle detaches the task; the import still fills the cell.
        let state = Arc::clone(&self.inner);
        let init = tokio::spawn(async move {
            state
                .locations
                .get_or_try_init(|| state.import())
                .await
                .map(Arc::clone)
        });
        init.await?
    }

    /// Filtered, truncated list of locations in id order.
    ///
    /// # Errors
    ///
    /// Propagates import failures; an empty result is not an error.
    pub async fn list_locations(
        &self,
        filter: &LocationFilter,
    ) -> Result<Vec<Location>, CatalogError> {
        let locations = self.locations().await?;
        Ok(filter_locations(&locations, filter))
    }

    /// Distinct operator names, see [`distinct_operators`].
    ///
    /// # Errors
    ///
    /// Propagates import failures.
    pub async fn list_operators(&self) -> Result<Vec<String>, CatalogError> {
        let locations = self.locations().await?;
        Ok(distinct_operators(&locations))
    }

    /// Distinct power ratings, see [`distinct_powers`].
    ///
    /// # Errors
    ///
    /// Propagates import failures.
    pub async fn list_powers(&self) -> Result<Vec<i32>, CatalogError> {
        let locations = self.locations().await?;
        Ok(distinct_powers(&locations))
    }
}

impl CatalogState {
    async fn import(&self) -> Result<Arc<[Location]>, CatalogError> {
        let attempt = self.imports.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self.source.clone();
        tracing::debug!(path = %path.display(), attempt, "starting OCM import");

        let result = tokio::task::spawn_blocking(move || import_file(&path)).await?;
        match result {
            Ok(report) => Ok(report.locations.into()),
            Err(e) => {
                tracing::error!(error = %e, attempt, "OCM import failed");
                Err(e.into())
            }
        }
    }
}
