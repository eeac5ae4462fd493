use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::loader::{LoadError, load_file};
use super::model::Dataset;

/// Memoised dataset: the file is read once and shared read-only until
/// [`DatasetCache::invalidate`] or [`DatasetCache::set_path`].
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    entry: Option<Arc<Dataset>>,
    loads: usize,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry: None,
            loads: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.entry.is_some()
    }

    /// How many times the file has actually been read.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    /// Return the cached dataset, reading the file on first use.
    pub fn get_or_load(&mut self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(ds) = &self.entry {
            log::debug!("dataset cache hit for {}", self.path.display());
            return Ok(Arc::clone(ds));
        }

        self.loads += 1;
        let dataset = Arc::new(load_file(&self.path)?);
        log::info!(
            "Loaded {} rows with columns {:?} from {}",
            dataset.row_count(),
            dataset.column_names(),
            self.path.display()
        );
        if dataset.is_empty() {
            log::warn!("{} has no data rows", self.path.display());
        }
        self.entry = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop the cached copy; the next call re-reads the file.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::info!("dataset cache invalidated for {}", self.path.display());
        }
    }

    /// Point the cache at another file.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn file_is_read_once_across_calls() {
        let file = csv_file("id,final_score\n1,80\n");
        let mut cache = DatasetCache::new(file.path());
        let first = cache.get_or_load().unwrap();
        let second = cache.get_or_load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn cached_copy_survives_file_changes_until_invalidated() {
        let mut file = csv_file("id\n1\n");
        let mut cache = DatasetCache::new(file.path());
        assert_eq!(cache.get_or_load().unwrap().row_count(), 1);

        file.write_all(b"2\n").unwrap();
        file.flush().unwrap();
        assert_eq!(cache.get_or_load().unwrap().row_count(), 1);

        cache.invalidate();
        assert!(!cache.is_loaded());
        assert_eq!(cache.get_or_load().unwrap().row_count(), 2);
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache = DatasetCache::new("no/such/students.xlsx");
        assert!(cache.get_or_load().is_err());
        assert!(!cache.is_loaded());
        assert!(cache.get_or_load().is_err());
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn switching_path_reloads() {
        let a = csv_file("id\n1\n");
        let b = csv_file("id\n1\n2\n3\n");
        let mut cache = DatasetCache::new(a.path());
        assert_eq!(cache.get_or_load().unwrap().row_count(), 1);
        cache.set_path(b.path());
        assert_eq!(cache.get_or_load().unwrap().row_count(), 3);
    }
}
