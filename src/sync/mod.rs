use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use crate::db::Store;
use crate::models::{ImportPanelRequest, ImportResult, SyncStatus};

/// Catalog sync applies bulk imports and tells readers when one is running
pub struct CatalogSync {
    store: Store,
    updating: AtomicBool,
}

/// Why an import request was not applied
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("a catalog import is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Clears the updating flag when the import finishes, including on error
struct UpdatingGuard<'a>(&'a AtomicBool);

impl Drop for UpdatingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl CatalogSync {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            updating: AtomicBool::new(false),
        }
    }

    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::SeqCst)
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            is_updating: self.is_updating(),
        }
    }

    #[cfg(test)]
    pub(crate) fn mark_updating(&self) {
        self.updating.store(true, Ordering::SeqCst);
    }

    /// Upsert a batch of catalog rows. Only one import runs at a time;
    /// a second caller gets `ImportError::AlreadyRunning`.
    pub async fn import(&self, rows: &[ImportPanelRequest]) -> Result<ImportResult, ImportError> {
        if self.updating.swap(true, Ordering::SeqCst) {
            return Err(ImportError::AlreadyRunning);
        }
        let _guard = UpdatingGuard(&self.updating);

        tracing::info!("Catalog import started: {} rows", rows.len());
        let result = self.store.upsert_panels(rows).await?;
        tracing::info!(
            "Catalog import finished: {} created, {} updated, {} errors",
            result.created,
            result.updated,
            result.errors.len()
        );
        Ok(result)
    }
}
