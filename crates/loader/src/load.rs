use std::path::Path;

use common::LoadMode;
use serde::Serialize;
use store::SalesStore;

use crate::{Result, parse};

/// Outcome of a completed CSV load.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub mode: LoadMode,
    pub rows_loaded: u64,
}

/// Loads CSV files into the sales store.
///
/// Cheap to clone, so a handle can move into a background task.
#[derive(Clone)]
pub struct CsvLoader {
    store: SalesStore,
}

impl CsvLoader {
    /// Creates a loader writing to the given store.
    pub fn new(store: SalesStore) -> Self {
        Self { store }
    }

    /// Parses the file and writes it in one transaction.
    ///
    /// The whole CSV is parsed before any write starts, so a malformed
    /// row rejects the load without touching the table; in replace mode
    /// the delete and the inserts commit together.
    pub async fn load(&self, path: &Path, mode: LoadMode) -> Result<LoadReport> {
        let records = parse::parse_file(path)?;

        let rows_loaded = match mode {
            LoadMode::Append => self.store.append(&records).await?,
            LoadMode::Replace => self.store.replace(&records).await?,
        };

        tracing::info!(
            rows = rows_loaded,
            %mode,
            path = %path.display(),
            "csv load committed"
        );
        Ok(LoadReport { mode, rows_loaded })
    }
}
