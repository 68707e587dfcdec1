use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use super::loader::{self, LoadError};
use super::model::Dataset;

// ---------------------------------------------------------------------------
// Single-entry dataset cache
// ---------------------------------------------------------------------------

/// Memoizes the load of one fixed path. The entry is filled on the first
/// successful load and never invalidated; failed loads are not cached.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    cell: OnceLock<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached dataset, loading it on first use.
    pub fn get(&self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(ds) = self.cell.get() {
            return Ok(Arc::clone(ds));
        }
        let loaded = Arc::new(loader::load(&self.path)?);
        // Another caller may have won the race; either value is equivalent.
        Ok(Arc::clone(self.cell.get_or_init(|| loaded)))
    }
}

static SHARED: OnceLock<DatasetCache> = OnceLock::new();

/// Process-wide accessor. The first call fixes the cached path; later calls
/// for a different path load directly without touching the cache.
pub fn load_shared(path: &Path) -> Result<Arc<Dataset>, LoadError> {
    let cache = SHARED.get_or_init(|| DatasetCache::new(path));
    if cache.path() == path {
        cache.get()
    } else {
        log::debug!(
            "{} is not the cached path {}; loading uncached",
            path.display(),
            cache.path().display()
        );
        loader::load(path).map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn table_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Unidade;Mês;Microorganismo;Meropenem").unwrap();
        writeln!(file, "UTI;Jan;E. coli;Sensível").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn second_get_returns_same_dataset() {
        let file = table_file();
        let cache = DatasetCache::new(file.path());
        let a = cache.get().unwrap();
        let b = cache.get().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn cached_value_survives_file_removal() {
        let file = table_file();
        let cache = DatasetCache::new(file.path());
        let first = cache.get().unwrap();
        let path = file.path().to_path_buf();
        drop(file);
        assert!(!path.exists());
        assert!(Arc::ptr_eq(&first, &cache.get().unwrap()));
    }

    // The only test touching the process-wide cache: the first path it
    // requests becomes the cached one for the whole test binary.
    #[test]
    fn shared_accessor_caches_first_path_only() {
        let first = table_file();
        let other = table_file();

        let a = load_shared(first.path()).unwrap();
        let b = load_shared(first.path()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let c = load_shared(other.path()).unwrap();
        let d = load_shared(other.path()).unwrap();
        assert!(!Arc::ptr_eq(&c, &d));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(*c, *d);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let cache = DatasetCache::new(&path);
        assert!(matches!(cache.get(), Err(LoadError::NotFound { .. })));

        std::fs::write(&path, "Unidade;Mês;Microorganismo\nUTI;Jan;E. coli\n").unwrap();
        assert_eq!(cache.get().unwrap().len(), 1);
    }
}
