// src/cache.rs

use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{debug, info};

use crate::{config::ReshapeOptions, error::LoadError, reshape, table::ObservationTable};

/// Read-through cache of reshaped workbooks, one entry per distinct path.
pub struct ObservationCache {
    options: ReshapeOptions,
    entries: Mutex<HashMap<PathBuf, Arc<ObservationTable>>>,
}

impl ObservationCache {
    pub fn new(options: ReshapeOptions) -> Self {
        Self {
            options,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &ReshapeOptions {
        &self.options
    }

    /// Return the table for `path`, reading the workbook only on first use.
    /// Failed loads are not remembered.
    pub fn get_or_load(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Arc<ObservationTable>, LoadError> {
        let path = path.as_ref();
        let key = cache_key(path);

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = entries.get(&key) {
            debug!(path = %key.display(), "cache hit");
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(reshape::reshape(path, &self.options)?);
        info!(path = %key.display(), rows = table.len(), "cached observations");
        entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for ObservationCache {
    fn default() -> Self {
        Self::new(ReshapeOptions::default())
    }
}

fn cache_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

static GLOBAL: Lazy<ObservationCache> = Lazy::new(ObservationCache::default);

/// Process-wide cached load with the default sheet layout.
pub fn load_cached(path: impl AsRef<Path>) -> Result<Arc<ObservationTable>, LoadError> {
    GLOBAL.get_or_load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn write_fixture(path: &Path, value: f64) -> Result<()> {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet().set_name("Data")?;
        ws.write_string(3, 0, "Country Name")?;
        ws.write_string(3, 1, "Country Code")?;
        ws.write_string(3, 2, "2010")?;
        ws.write_string(4, 0, "Chad")?;
        ws.write_string(4, 1, "TCD")?;
        ws.write_number(4, 2, value)?;
        wb.save(path)?;
        Ok(())
    }

    #[test]
    fn second_load_reuses_first_result() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("chad.xlsx");
        write_fixture(&path, 44.0)?;

        let cache = ObservationCache::default();
        let first = cache.get_or_load(&path)?;

        // overwriting the file does not change what the cache serves
        write_fixture(&path, 99.0)?;
        let second = cache.get_or_load(&path)?;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.observations()[0].enrollment_pct, 44.0);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        let third = cache.get_or_load(&path)?;
        assert_eq!(third.observations()[0].enrollment_pct, 99.0);
        Ok(())
    }

    #[test]
    fn distinct_paths_get_distinct_entries() -> Result<()> {
        let dir = TempDir::new()?;
        let a = dir.path().join("a.xlsx");
        let b = dir.path().join("b.xlsx");
        write_fixture(&a, 1.0)?;
        write_fixture(&b, 2.0)?;

        let cache = ObservationCache::default();
        cache.get_or_load(&a)?;
        cache.get_or_load(&b)?;
        assert_eq!(cache.len(), 2);
        Ok(())
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cache = ObservationCache::default();
        assert!(cache.get_or_load("/no/such/file.xls").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn global_cache_serves_same_table() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("global.xlsx");
        write_fixture(&path, 12.5)?;
        let first = load_cached(&path)?;
        let second = load_cached(&path)?;
        assert!(Arc::ptr_eq(&first, &second));
        Ok(())
    }
}
