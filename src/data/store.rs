use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::{self, LoadError};
use super::model::Table;

// ---------------------------------------------------------------------------
// DataStore – load-once cache for one data file
// ---------------------------------------------------------------------------

/// Owns the parsed [`Table`] for a file and hands out shared references.
///
/// The cache is keyed on the file identity (path + modification time): a
/// changed mtime reloads, an unchanged one returns the cached table without
/// reading the file again. [`DataStore::invalidate`] forces a reload.
#[derive(Debug)]
pub struct DataStore {
    path: PathBuf,
    cached: Option<CachedTable>,
    load_count: usize,
}

#[derive(Debug)]
struct CachedTable {
    modified: Option<SystemTime>,
    table: Arc<Table>,
}

impl DataStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DataStore {
            path: path.into(),
            cached: None,
            load_count: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.is_some()
    }

    /// How many times the file has actually been parsed.
    pub fn load_count(&self) -> usize {
        self.load_count
    }

    /// Return the table, loading it on first access.
    pub fn table(&mut self) -> Result<Arc<Table>, LoadError> {
        let modified = modified_time(&self.path);

        if let Some(cached) = &self.cached {
            if cached.modified == modified {
                return Ok(Arc::clone(&cached.table));
            }
            log::info!("{} changed on disk, reloading", self.path.display());
        }

        let table = Arc::new(loader::load(&self.path)?);
        self.load_count += 1;
        log::info!(
            "Loaded {} records from {}",
            table.len(),
            self.path.display()
        );

        self.cached = Some(CachedTable {
            modified,
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    /// Drop the cached table; the next [`DataStore::table`] call reloads.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    /// Point the store at another file. The old table is discarded, not merged.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.invalidate();
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
