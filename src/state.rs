use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::cache::DatasetCache;
use crate::data::model::{CellValue, Dataset};
use crate::view::{DashboardView, Selections, build_view};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Memoised file read.
    pub cache: DatasetCache,

    /// Loaded dataset (None until the first successful load).
    pub dataset: Option<Arc<Dataset>>,

    /// Widget values: status filter and selected student.
    pub selections: Selections,

    /// Last built view; rebuilt only when `dirty`.
    pub view: Option<DashboardView>,
    dirty: bool,

    /// Load failure shown instead of the dashboard.
    pub load_error: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = DatasetCache::new(config.data_path.clone());
        Self {
            config,
            cache,
            dataset: None,
            selections: Selections::default(),
            view: None,
            dirty: true,
            load_error: None,
        }
    }

    /// Load the dataset on first use. A failure is kept until the user
    /// reloads or opens another file, so frames do not re-read a broken file.
    pub fn ensure_loaded(&mut self) {
        if self.dataset.is_some() || self.load_error.is_some() {
            return;
        }
        match self.cache.get_or_load() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load data: {e:#}");
                self.load_error = Some(format!("Error: {e}"));
                self.view = None;
            }
        }
    }

    /// Ingest a newly loaded dataset and reset the widgets to their defaults.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.selections = Selections::for_dataset(&dataset);
        self.dataset = Some(dataset);
        self.load_error = None;
        self.dirty = true;
    }

    /// Drop the cached copy and read the file again.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.dataset = None;
        self.load_error = None;
        self.ensure_loaded();
    }

    /// Switch to another data file.
    pub fn open_path(&mut self, path: PathBuf) {
        self.config.data_path = path.clone();
        self.cache.set_path(path);
        self.dataset = None;
        self.load_error = None;
        self.ensure_loaded();
    }

    /// Whether a selection changed since the last [`AppState::refresh_view`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the view if a selection or the dataset changed.
    pub fn refresh_view(&mut self) {
        if !self.dirty {
            return;
        }
        if let Some(ds) = &self.dataset {
            self.view = Some(build_view(ds, &self.selections, &self.config));
        }
        self.dirty = false;
    }

    /// Toggle a single completion-status value in the filter.
    pub fn toggle_status(&mut self, value: &CellValue) {
        if let Some(filter) = self.selections.status.as_mut() {
            filter.toggle(value);
            self.dirty = true;
        }
    }

    pub fn select_all_status(&mut self) {
        if let Some(filter) = self.selections.status.as_mut() {
            filter.select_all();
            self.dirty = true;
        }
    }

    pub fn select_no_status(&mut self) {
        if let Some(filter) = self.selections.status.as_mut() {
            filter.select_none();
            self.dirty = true;
        }
    }

    pub fn select_student(&mut self, id: CellValue) {
        if self.selections.student_id.as_ref() != Some(&id) {
            self.selections.student_id = Some(id);
            self.dirty = true;
        }
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

    fn state_for(path: &std::path::Path) -> AppState {
        AppState::new(DashboardConfig {
            data_path: path.to_path_buf(),
            ..DashboardConfig::default()
        })
    }

    #[test]
    fn first_refresh_builds_view_from_loaded_file() {
        let file = csv_file("id,completion_status,final_score\n1,Completed,80\n2,Dropped,90\n");
        let mut state = state_for(file.path());
        state.ensure_loaded();
        state.refresh_view();

        let view = state.view.as_ref().unwrap();
        assert_eq!(view.working_rows, 2);
        assert_eq!(
            state.selections.student_id,
            Some(CellValue::Integer(1))
        );
    }

    #[test]
    fn interactions_reuse_the_cached_dataset() {
        let file = csv_file("id,completion_status\n1,Completed\n2,Dropped\n");
        let mut state = state_for(file.path());
        state.ensure_loaded();
        state.refresh_view();

        state.toggle_status(&CellValue::String("Dropped".into()));
        state.ensure_loaded();
        state.refresh_view();
        assert_eq!(state.view.as_ref().unwrap().working_rows, 1);

        state.select_student(CellValue::Integer(2));
        state.refresh_view();
        assert_eq!(state.cache.load_count(), 1);
    }

    #[test]
    fn load_failure_blocks_the_view_until_reload() {
        let mut state = state_for(std::path::Path::new("missing/students.xlsx"));
        state.ensure_loaded();
        state.ensure_loaded();
        state.refresh_view();
        assert!(state.view.is_none());
        assert!(state.load_error.as_deref().unwrap().contains("not found"));
        assert_eq!(state.cache.load_count(), 1);

        state.reload();
        assert_eq!(state.cache.load_count(), 2);
    }

    #[test]
    fn opening_another_file_replaces_the_dataset() {
        let a = csv_file("id\n1\n");
        let b = csv_file("id\n7\n8\n");
        let mut state = state_for(a.path());
        state.ensure_loaded();
        state.open_path(b.path().to_path_buf());
        state.refresh_view();
        assert_eq!(state.view.as_ref().unwrap().total_rows, 2);
        assert_eq!(state.selections.student_id, Some(CellValue::Integer(7)));
    }
}
